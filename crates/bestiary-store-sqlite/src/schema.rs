//! SQL schema for the Bestiary SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS profiles (
    id            TEXT PRIMARY KEY,
    display_name  TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE COLLATE NOCASE,
    biography     TEXT,
    password_hash TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS species (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    scientific_name  TEXT NOT NULL,
    common_name      TEXT,
    kingdom          TEXT NOT NULL,   -- 'Animalia' | 'Plantae' | ...
    total_population INTEGER,
    description      TEXT,
    image            TEXT,
    author           TEXT NOT NULL
);

-- No foreign key to species: removing a species and its comments are two
-- separate statements issued by the application.
CREATE TABLE IF NOT EXISTS comments (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    species_id   INTEGER NOT NULL,
    author       TEXT NOT NULL,
    display_name TEXT NOT NULL,   -- snapshot at write time
    comment      TEXT NOT NULL,
    created_at   TEXT NOT NULL    -- RFC 3339 UTC; store-assigned
);

CREATE TABLE IF NOT EXISTS sessions (
    token_hash TEXT PRIMARY KEY,  -- hex SHA-256 of the cookie token
    profile_id TEXT NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    expires_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS comments_species_idx ON comments(species_id);
CREATE INDEX IF NOT EXISTS sessions_profile_idx ON sessions(profile_id);

PRAGMA user_version = 1;
";

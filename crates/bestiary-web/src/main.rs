//! Bestiary server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store and serves the site over HTTP. Admin subcommands create
//! profiles and species records directly in the store.
//!
//! ```
//! cargo run -p bestiary-web --bin server -- add-profile --email a@example.com --display-name Alice
//! cargo run -p bestiary-web --bin server -- serve
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use bestiary_core::{
  profile::NewProfile,
  species::{Kingdom, NewSpecies},
  store::BestiaryStore,
};
use bestiary_store_sqlite::SqliteStore;
use bestiary_web::{AppState, ServerConfig, auth};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Bestiary species browser")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the site (default).
  Serve,
  /// Print the argon2 hash for a password entered on stdin and exit.
  HashPassword,
  /// Create a profile. The password is read from stdin.
  AddProfile {
    #[arg(long)]
    email:        String,
    #[arg(long)]
    display_name: String,
    #[arg(long)]
    biography:    Option<String>,
  },
  /// Create a species record.
  AddSpecies {
    #[arg(long)]
    scientific_name: String,
    #[arg(long)]
    common_name:     Option<String>,
    /// Animalia, Plantae, Fungi, Protista, Archaea or Bacteria.
    #[arg(long)]
    kingdom:         Kingdom,
    #[arg(long)]
    population:      Option<i64>,
    #[arg(long)]
    description:     Option<String>,
    #[arg(long)]
    image:           Option<String>,
    /// Email of the profile recorded as the creator.
    #[arg(long)]
    author:          String,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let command = cli.command.unwrap_or(Command::Serve);

  if let Command::HashPassword = command {
    let password = read_password()?;
    println!("{}", auth::hash_password(&password)?);
    return Ok(());
  }

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("BESTIARY"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  server_cfg.validate().context("invalid configuration")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match command {
    Command::Serve => serve(store, server_cfg).await,
    Command::HashPassword => Ok(()),
    Command::AddProfile { email, display_name, biography } => {
      let password = read_password()?;
      let profile = store
        .add_profile(NewProfile {
          display_name,
          email,
          biography,
          password_hash: auth::hash_password(&password)?,
        })
        .await
        .context("failed to create profile")?;
      println!("{}", profile.id);
      Ok(())
    }
    Command::AddSpecies {
      scientific_name,
      common_name,
      kingdom,
      population,
      description,
      image,
      author,
    } => {
      let creds = store
        .credentials_by_email(&author)
        .await
        .context("failed to look up author")?
        .with_context(|| format!("no profile with email {author}"))?;

      let mut new = NewSpecies::new(scientific_name, kingdom, creds.profile_id);
      new.common_name = common_name;
      new.total_population = population;
      new.description = description;
      new.image = image;

      let species = store.add_species(new).await.context("failed to create species")?;
      println!("{}", species.id);
      Ok(())
    }
  }
}

async fn serve(store: SqliteStore, server_cfg: ServerConfig) -> anyhow::Result<()> {
  let purged = store
    .purge_expired_sessions(Utc::now())
    .await
    .context("failed to purge expired sessions")?;
  if purged > 0 {
    tracing::info!(purged, "removed expired sessions");
  }

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let state = AppState {
    store:  Arc::new(store),
    config: Arc::new(server_cfg),
  };
  let app = bestiary_web::router(state);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password line from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  eprint!("Password: ");
  io::stderr().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  let password = line.trim_end_matches(['\n', '\r']).to_string();
  anyhow::ensure!(!password.is_empty(), "password must not be empty");
  Ok(password)
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

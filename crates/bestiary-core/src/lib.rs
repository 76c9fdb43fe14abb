//! Core types and trait definitions for the Bestiary species browser.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::BestiaryStore`]; the web and API
//! layers depend on that abstraction only.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod comment;
pub mod deletion;
pub mod error;
pub mod profile;
pub mod species;
pub mod store;
pub mod thread;

pub use error::{Error, Result};

#[cfg(any(test, feature = "test-util"))]
pub mod memory;

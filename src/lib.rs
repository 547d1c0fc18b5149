//! salonkit - API client for the SalonKit website-builder backend.
//!
//! The crate centers on one pipeline shared by every backend call: requests
//! are annotated with the current access token (unless the path is on the
//! public allow-list), and an authorization failure triggers a single
//! transparent credential renewal with the request replayed exactly once.
//! Concurrent failures share one renewal call; an unrecoverable renewal ends
//! the session, clears stored credentials, and notifies the host through a
//! registered hook.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use salonkit::{ApiClient, Config, KeyringStore};
//!
//! # async fn run() -> Result<(), salonkit::ApiError> {
//! let config = Config::load().unwrap_or_default();
//! let client = ApiClient::new(&config, Arc::new(KeyringStore::new()))?;
//! client.session().on_session_end(Box::new(|_return_to| {
//!     // navigate to the login view, optionally back to `_return_to` after
//! }));
//!
//! client.login("bella", "hunter2").await?;
//! let me = client.profile().await?;
//! println!("logged in as {}", me.display_name());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use auth::{AuthSession, CredentialPair, CredentialStore, KeyringStore, MemoryStore};
pub use config::Config;

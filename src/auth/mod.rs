//! Authentication module: credential storage and session lifecycle.
//!
//! This module provides:
//! - `CredentialPair` / `CredentialStore`: atomic storage of the access and
//!   refresh tokens (OS keychain or in-memory)
//! - `AuthSession`: the renewal coordinator - detects expired access tokens,
//!   performs at most one renewal call at a time, and ends the session when
//!   renewal is impossible
//!
//! Everything else in the crate treats credentials as opaque; only this
//! module mutates them.

pub mod credentials;
pub mod session;

pub use credentials::{CredentialPair, CredentialStore, KeyringStore, MemoryStore};
pub use session::{AuthSession, RenewalError, SessionEndHook};

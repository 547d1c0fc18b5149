use std::sync::{Mutex, PoisonError};

use keyring::Entry;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Keychain service name under which both tokens are stored
const SERVICE_NAME: &str = "salonkit";

/// Entry name for the short-lived access token
const ACCESS_TOKEN_KEY: &str = "access_token";

/// Entry name for the long-lived refresh token
const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// The two JWT tokens issued by the backend.
///
/// A pair is always stored and cleared as a unit: a store never exposes an
/// access token without its refresh token or vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Persistent storage for the current credential pair.
///
/// Storage is assumed to be always available; an implementation that cannot
/// read its backing store reports the pair as absent, which degrades the
/// session to anonymous rather than failing requests outright.
pub trait CredentialStore: Send + Sync {
    /// Overwrite both tokens. Replaces any previously stored pair.
    fn write(&self, pair: &CredentialPair);

    /// Read the current pair. `None` when either token is missing.
    fn read(&self) -> Option<CredentialPair>;

    /// Remove both tokens.
    fn clear(&self);
}

/// Credential store backed by the OS keychain.
///
/// Tokens are kept as two entries under a single service name and survive
/// process restarts within the same user account.
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    /// Use a custom keychain service name (e.g. to isolate environments)
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry, keyring::Error> {
        Entry::new(&self.service, key)
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeyringStore {
    fn write(&self, pair: &CredentialPair) {
        let result = self.entry(ACCESS_TOKEN_KEY).and_then(|access| {
            access.set_password(&pair.access_token)?;
            self.entry(REFRESH_TOKEN_KEY)?
                .set_password(&pair.refresh_token)
        });
        if let Err(e) = result {
            warn!(error = %e, "failed to persist credential pair to keychain");
        }
    }

    fn read(&self) -> Option<CredentialPair> {
        // A half-present pair reads as absent
        let access_token = self.entry(ACCESS_TOKEN_KEY).ok()?.get_password().ok()?;
        let refresh_token = self.entry(REFRESH_TOKEN_KEY).ok()?.get_password().ok()?;
        Some(CredentialPair {
            access_token,
            refresh_token,
        })
    }

    fn clear(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Ok(entry) = self.entry(key) {
                let _ = entry.delete_credential();
            }
        }
    }
}

/// In-process credential store for tests and hosts that manage persistence
/// themselves.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Option<CredentialPair>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<CredentialPair>> {
        // Tokens are plain data; a poisoned lock still holds a usable value
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CredentialStore for MemoryStore {
    fn write(&self, pair: &CredentialPair) {
        *self.lock() = Some(pair.clone());
    }

    fn read(&self) -> Option<CredentialPair> {
        self.lock().clone()
    }

    fn clear(&self) {
        *self.lock() = None;
    }
}

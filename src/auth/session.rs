use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{CredentialPair, CredentialStore};
use crate::api::error::truncate_body;

/// Path of the token renewal endpoint, relative to `<base>/api/`
pub(crate) const RENEW_PATH: &str = "users/token/refresh/";

/// Paths that never carry the Authorization header and never trigger a
/// renewal cycle. Matched by suffix against the request path, mirroring the
/// backend's URL layout (issuance, renewal, verification, registration).
const PUBLIC_PATHS: [&str; 4] = [
    "token/",
    "users/token/refresh/",
    "users/token/verify/",
    "users/register/",
];

/// Callback invoked when the session ends involuntarily. Receives the path of
/// the request that exposed the dead session, so hosts can return the user
/// there after re-authentication.
pub type SessionEndHook = Box<dyn Fn(Option<&str>) + Send + Sync>;

/// Why a renewal cycle failed. Internal to the client pipeline; callers of
/// `ApiClient` see the original authorization error instead.
#[derive(Debug, Error)]
pub enum RenewalError {
    #[error("no stored credentials to renew")]
    MissingCredentials,

    #[error("renewal rejected with status {status}")]
    Rejected { status: u16 },

    #[error("renewal request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("renewal returned an incomplete token pair: {0}")]
    IncompletePair(#[from] serde_json::Error),
}

/// Response body of the renewal endpoint. Both fields are required: a success
/// response missing either token is treated as a failed renewal rather than
/// half-updating the stored pair.
#[derive(Debug, Deserialize)]
struct RenewResponse {
    access: String,
    refresh: String,
}

/// Owns the credential store, the public-path allow-list, and the single
/// in-flight renewal cycle.
///
/// Construct one per process and share it (via `Arc`) with every `ApiClient`.
/// All mutation of the stored pair goes through this type; the client only
/// reads it when annotating requests.
pub struct AuthSession {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn CredentialStore>,
    /// De facto mutex of the renewal cycle: the task holding this lock is the
    /// one renewal call in flight, tasks parked on it are the waiters.
    renewal: tokio::sync::Mutex<()>,
    /// Set once per terminated session so the end hook fires exactly once
    ended: AtomicBool,
    on_session_end: OnceLock<SessionEndHook>,
}

impl AuthSession {
    pub fn new(http: reqwest::Client, base_url: String, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            http,
            base_url,
            store,
            renewal: tokio::sync::Mutex::new(()),
            ended: AtomicBool::new(false),
            on_session_end: OnceLock::new(),
        }
    }

    /// Register the hook invoked when the session ends involuntarily
    /// (failed renewal). Only the first registration takes effect.
    pub fn on_session_end(&self, hook: SessionEndHook) {
        let _ = self.on_session_end.set(hook);
    }

    /// Current access token, if a pair is stored
    pub fn access_token(&self) -> Option<String> {
        self.store.read().map(|p| p.access_token)
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.read().is_some()
    }

    /// Whether a request path is exempt from the Authorization header and
    /// from triggering renewal
    pub fn is_public_path(&self, path: &str) -> bool {
        PUBLIC_PATHS.iter().any(|p| path.ends_with(p))
    }

    /// Store a freshly issued pair (login or renewal) and re-arm the
    /// session-end hook for the new session.
    pub fn store_pair(&self, pair: &CredentialPair) {
        self.store.write(pair);
        self.ended.store(false, Ordering::SeqCst);
    }

    /// Voluntary logout: forget the credentials without firing the end hook.
    /// The host initiated this, so it already knows the session is over.
    pub fn logout(&self) {
        self.store.clear();
    }

    /// End the session: clear the store and signal the host once.
    ///
    /// Idempotent - a no-op when no credentials are stored.
    pub fn terminate(&self, return_to: Option<&str>) {
        if self.store.read().is_none() {
            return;
        }
        self.store.clear();
        if !self.ended.swap(true, Ordering::SeqCst) {
            info!("session terminated, notifying host");
            if let Some(hook) = self.on_session_end.get() {
                hook(return_to);
            }
        }
    }

    /// Renew the credential pair after a request was rejected with the given
    /// (now stale) access token. Returns the access token to replay with.
    ///
    /// At most one renewal call is in flight at any time: concurrent callers
    /// park on the cycle lock and, once through, find the store already
    /// holding a fresher token than the one they failed with - they resume
    /// without issuing a second call. If renewal is impossible the session is
    /// terminated and every parked caller gets an error.
    pub(crate) async fn renew_after_unauthorized(
        &self,
        stale_access: &str,
        origin_path: &str,
    ) -> Result<String, RenewalError> {
        let _cycle = self.renewal.lock().await;

        let pair = match self.store.read() {
            Some(pair) => pair,
            None => {
                // No refresh token to renew with; the session may already
                // have been torn down by an earlier cycle
                self.terminate(Some(origin_path));
                return Err(RenewalError::MissingCredentials);
            }
        };

        if pair.access_token != stale_access {
            // A renewal completed while we were parked; replay with its result
            debug!(path = origin_path, "renewal already performed by another request");
            return Ok(pair.access_token);
        }

        debug!(path = origin_path, "access token rejected, renewing credentials");
        match self.request_renewal(&pair.refresh_token).await {
            Ok(new_pair) => {
                self.store_pair(&new_pair);
                info!("credential pair renewed");
                Ok(new_pair.access_token)
            }
            Err(e) => {
                warn!(error = %e, "credential renewal failed, ending session");
                self.terminate(Some(origin_path));
                Err(e)
            }
        }
    }

    /// The one renewal HTTP call of a cycle. Goes straight to the transport:
    /// the renewal endpoint is on the public allow-list and must not carry
    /// the (rejected) access token.
    async fn request_renewal(&self, refresh_token: &str) -> Result<CredentialPair, RenewalError> {
        let url = format!("{}/api/{}", self.base_url, RENEW_PATH);
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "refresh": refresh_token }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %truncate_body(&body), "renewal endpoint rejected refresh token");
            return Err(RenewalError::Rejected {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        let tokens: RenewResponse = serde_json::from_str(&text)?;
        Ok(CredentialPair {
            access_token: tokens.access,
            refresh_token: tokens.refresh,
        })
    }
}

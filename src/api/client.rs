//! HTTP client for the SalonKit REST API.
//!
//! Every request flows through one pipeline: the path is checked against the
//! public allow-list, the access token is attached for non-public paths, and
//! authorization failures are escalated to the `AuthSession` for a single
//! transparent renewal-and-replay before being surfaced to the caller.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::{AuthSession, CredentialPair, CredentialStore};
use crate::config::Config;
use crate::models::{
    BlogPost, MessageResponse, Paginated, ProfileUpdate, RegisterRequest, Salon,
    SubscriptionPlan, User,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
/// 3 retries with exponential backoff usually succeeds without excessive delay.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
/// 1 second is polite to the server while not making users wait too long.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Response of the token issuance endpoint (SimpleJWT field names)
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access: String,
    refresh: String,
}

/// Retry marker for the authorization pipeline. A request starts as
/// `First` and becomes `Retried` after its single renewal-backed replay;
/// a `Retried` request that fails authorization again is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    First,
    Retried,
}

/// API client for the SalonKit backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<AuthSession>,
}

impl ApiClient {
    /// Create a new API client with the given credential store
    pub fn new(config: &Config, store: Arc<dyn CredentialStore>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let session = Arc::new(AuthSession::new(
            http.clone(),
            config.api_base_url.clone(),
            store,
        ));

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            session,
        })
    }

    /// The session shared by this client (register the end hook here)
    pub fn session(&self) -> &Arc<AuthSession> {
        &self.session
    }

    // ===== Request pipeline =====

    /// Send one API request through the annotate/classify pipeline.
    ///
    /// Rate-limited (429) responses are retried with exponential backoff and
    /// do not consume the authorization retry. A 401 on a non-public path is
    /// handed to the session for renewal and the request is replayed exactly
    /// once with the renewed token; any further 401 is terminal.
    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}/api/{}", self.base_url, path);
        let public = self.session.is_public_path(path);
        let mut attempt = Attempt::First;
        let mut renewed_token: Option<String> = None;
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            // The replay must carry the token renewal handed back, not a
            // re-read of the store - a concurrent failed cycle may have
            // emptied the store in between
            let token = if public {
                None
            } else {
                renewed_token
                    .clone()
                    .or_else(|| self.session.access_token())
            };

            let mut request = self.http.request(method.clone(), &url);
            if let Some(ref token) = token {
                request = request.bearer_auth(token);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                retries += 1;
                if retries > MAX_RATE_LIMIT_RETRIES {
                    return Err(ApiError::RateLimited);
                }
                warn!(url = %url, retry = retries, backoff_ms, "Rate limited, backing off");
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                backoff_ms *= 2; // Exponential backoff
                continue;
            }

            if status == StatusCode::UNAUTHORIZED && !public {
                match attempt {
                    Attempt::First => {
                        let stale = token.unwrap_or_default();
                        match self.session.renew_after_unauthorized(&stale, path).await {
                            Ok(fresh) => {
                                renewed_token = Some(fresh);
                                attempt = Attempt::Retried;
                                continue;
                            }
                            Err(e) => {
                                debug!(path, error = %e, "renewal unrecoverable, surfacing original error");
                                return Err(ApiError::Unauthorized);
                            }
                        }
                    }
                    Attempt::Retried => {
                        warn!(path, "request rejected again after renewal, not retrying");
                        return Err(ApiError::RetryExhausted);
                    }
                }
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ApiError::from_status(status, &body));
            }

            return response.json().await.map_err(ApiError::from);
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, serde_json::Value>(Method::GET, path, None)
            .await
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, path, Some(body)).await
    }

    // ===== Auth endpoints =====

    /// Log in with username and password and store the issued pair.
    /// The issuance endpoint is public and never carries a stale token.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });
        let tokens: TokenResponse = self.post("token/", &body).await?;
        self.session.store_pair(&CredentialPair {
            access_token: tokens.access,
            refresh_token: tokens.refresh,
        });
        debug!(username, "logged in");
        Ok(())
    }

    /// Forget the stored credentials. Client-side only - the backend keeps
    /// no session state beyond the tokens themselves.
    pub fn logout(&self) {
        self.session.logout();
    }

    /// Register a new account. Does not log the account in.
    pub async fn register(&self, data: &RegisterRequest) -> Result<User, ApiError> {
        self.post("users/register/", data).await
    }

    /// Ask the backend whether a token is still valid.
    /// Public path; a 401 here passes through without triggering renewal.
    pub async fn verify_token(&self, token: &str) -> Result<(), ApiError> {
        let body = serde_json::json!({ "token": token });
        let _: serde_json::Value = self.post("users/token/verify/", &body).await?;
        Ok(())
    }

    /// Change the current user's password
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ApiError> {
        let body = serde_json::json!({
            "current_password": current_password,
            "new_password": new_password,
            "new_password2": new_password,
        });
        self.put("change-password/", &body).await
    }

    // ===== User endpoints =====

    /// Fetch the current user's profile
    pub async fn profile(&self) -> Result<User, ApiError> {
        self.get("users/profile/").await
    }

    /// Partially update the current user's profile
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.patch("users/profile/", update).await
    }

    // ===== Salon endpoints =====

    /// List salons (first page of the paginated listing)
    pub async fn list_salons(&self) -> Result<Paginated<Salon>, ApiError> {
        self.get("salons/").await
    }

    /// Fetch a single salon by id
    pub async fn get_salon(&self, id: i64) -> Result<Salon, ApiError> {
        self.get(&format!("salons/{}/", id)).await
    }

    /// Claim an unclaimed salon for the current user
    pub async fn claim_salon(&self, id: i64) -> Result<Salon, ApiError> {
        self.post(&format!("salons/{}/claim/", id), &serde_json::json!({}))
            .await
    }

    /// Mark a batch of salon leads as contacted.
    /// The backend expects camelCase here, matching the salon wire format.
    pub async fn mark_leads_contacted(
        &self,
        lead_ids: &[i64],
    ) -> Result<MessageResponse, ApiError> {
        let body = serde_json::json!({ "leadIds": lead_ids });
        self.post("salons/contact-leads/", &body).await
    }

    // ===== Blog endpoints =====

    /// List published blog posts
    pub async fn list_posts(&self) -> Result<Paginated<BlogPost>, ApiError> {
        self.get("blog/posts/").await
    }

    /// Fetch a single blog post by slug
    pub async fn get_post(&self, slug: &str) -> Result<BlogPost, ApiError> {
        self.get(&format!("blog/posts/{}/", slug)).await
    }

    // ===== Billing endpoints =====

    /// List available subscription plans
    pub async fn list_plans(&self) -> Result<Paginated<SubscriptionPlan>, ApiError> {
        self.get("payments/plans/").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_response() {
        let json = r#"{"access": "A1", "refresh": "R1"}"#;
        let tokens: TokenResponse = serde_json::from_str(json)
            .expect("Failed to parse token response test JSON");
        assert_eq!(tokens.access, "A1");
        assert_eq!(tokens.refresh, "R1");
    }

    #[test]
    fn test_token_response_requires_both_fields() {
        // A response missing the refresh token must not parse; the renewal
        // coordinator treats that as a failed renewal
        let json = r#"{"access": "A1"}"#;
        assert!(serde_json::from_str::<TokenResponse>(json).is_err());
    }

    #[test]
    fn test_parse_paginated_salons() {
        let json = r#"{
            "count": 2,
            "next": "http://localhost:8000/api/salons/?offset=20",
            "previous": null,
            "results": [
                {
                    "id": 1,
                    "name": "Bella Hair Studio",
                    "location": "Springfield",
                    "description": "Full service salon",
                    "sample_url": "bella-hair",
                    "owner": "bella",
                    "claimed": true,
                    "contact_status": "subscribed",
                    "created_at": "2024-03-01T09:00:00Z",
                    "updated_at": "2024-06-12T14:30:00Z"
                },
                {
                    "id": 2,
                    "name": "Shear Genius",
                    "location": "Shelbyville",
                    "sample_url": "shear-genius",
                    "owner": null,
                    "claimed": false,
                    "contact_status": "notContacted",
                    "created_at": "2024-04-15T11:00:00Z",
                    "updated_at": "2024-04-15T11:00:00Z"
                }
            ]
        }"#;

        let page: Paginated<Salon> = serde_json::from_str(json)
            .expect("Failed to parse salons test JSON");
        assert_eq!(page.count, 2);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].name, "Bella Hair Studio");
        assert!(page.results[0].claimed);
        assert_eq!(page.results[1].owner, None);
    }

    #[test]
    fn attempt_marker_distinguishes_retry() {
        assert_ne!(Attempt::First, Attempt::Retried);
    }
}

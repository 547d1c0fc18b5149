use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - credentials rejected and could not be renewed")]
    Unauthorized,

    #[error("Unauthorized after credential renewal - not retried again")]
    RetryExhausted,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Truncate a response body to avoid logging excessive data
pub(crate) fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    // Back up to a char boundary; error details are often localized and a
    // multibyte character may span the cut-off
    let mut cut = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    format!(
        "{}... (truncated, {} total bytes)",
        &body[..cut],
        body.len()
    )
}

impl ApiError {
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// Whether this error is a terminal authorization failure the caller
    /// should treat as "session over" (as opposed to a transient fault)
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::RetryExhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn from_status_maps_the_taxonomy() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "nope"),
            ApiError::AccessDenied(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, "missing"),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, ""),
            ApiError::InvalidResponse(_)
        ));
    }

    #[test]
    fn truncate_body_caps_long_bodies() {
        let long = "x".repeat(2000);
        let truncated = truncate_body(&long);
        assert!(truncated.len() < long.len());
        assert!(truncated.contains("truncated"));

        let short = "short body";
        assert_eq!(truncate_body(short), short);
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        // 200 euro signs = 600 bytes, with a character spanning the cut-off
        let localized = "€".repeat(200);
        let truncated = truncate_body(&localized);
        assert!(truncated.contains("truncated"));
        assert!(truncated.contains("600 total bytes"));
        assert!(truncated.starts_with('€'));
    }

    #[test]
    fn auth_failures_are_flagged() {
        assert!(ApiError::Unauthorized.is_auth_failure());
        assert!(ApiError::RetryExhausted.is_auth_failure());
        assert!(!ApiError::RateLimited.is_auth_failure());
        assert!(!ApiError::NotFound(String::new()).is_auth_failure());
    }
}

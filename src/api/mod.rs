//! REST API client module for the SalonKit backend.
//!
//! This module provides the `ApiClient` for talking to the backend's
//! JSON API: authentication, user profile, salon listings, blog content,
//! and subscription plans.
//!
//! Authentication uses short-lived JWT bearer tokens; expired tokens are
//! renewed transparently by the `auth` module and each failed request is
//! replayed at most once.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;

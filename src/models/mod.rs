//! Data models matching the backend's JSON output (DRF serializers,
//! snake_case field names).

pub mod billing;
pub mod blog;
pub mod salon;
pub mod user;

pub use billing::SubscriptionPlan;
pub use blog::{Author, BlogPost};
pub use salon::{ContactStatus, Salon};
pub use user::{ProfileUpdate, RegisterRequest, Role, User};

use serde::Deserialize;

/// DRF-style paginated listing envelope
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Plain `{"message": "..."}` acknowledgement some endpoints return
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

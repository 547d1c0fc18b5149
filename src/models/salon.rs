use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sales pipeline status of a salon listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContactStatus {
    NotContacted,
    Contacted,
    Interested,
    NotInterested,
    Subscribed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Salon {
    pub id: i64,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Service list; free-form JSON maintained by the template editor
    #[serde(default)]
    pub services: serde_json::Value,
    #[serde(default)]
    pub opening_hours: Option<String>,
    /// Slug of the generated sample site
    pub sample_url: String,
    /// Username of the claiming owner, null while unclaimed
    pub owner: Option<String>,
    pub claimed: bool,
    #[serde(default)]
    pub claimed_at: Option<DateTime<Utc>>,
    pub contact_status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Salon {
    pub fn is_claimable(&self) -> bool {
        !self.claimed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unclaimed_salon() {
        let json = r#"{
            "id": 2,
            "name": "Shear Genius",
            "location": "Shelbyville",
            "services": [{"name": "Cut", "price": "30"}],
            "sample_url": "shear-genius",
            "owner": null,
            "claimed": false,
            "contact_status": "notContacted",
            "created_at": "2024-04-15T11:00:00Z",
            "updated_at": "2024-04-15T11:00:00Z"
        }"#;

        let salon: Salon = serde_json::from_str(json).expect("Failed to parse salon test JSON");
        assert!(salon.is_claimable());
        assert_eq!(salon.contact_status, ContactStatus::NotContacted);
        assert!(salon.services.is_array());
        assert!(salon.claimed_at.is_none());
    }

    #[test]
    fn test_contact_status_uses_camel_case_wire_names() {
        assert_eq!(
            serde_json::to_string(&ContactStatus::NotInterested).expect("serialize"),
            r#""notInterested""#
        );
        let parsed: ContactStatus =
            serde_json::from_str(r#""subscribed""#).expect("Failed to parse contact status");
        assert_eq!(parsed, ContactStatus::Subscribed);
    }
}

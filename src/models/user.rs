use serde::{Deserialize, Serialize};

/// Account role as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Minimal salon reference embedded in the user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimedSalon {
    pub id: i64,
    pub name: String,
    pub sample_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub role: Role,
    /// The salon this user has claimed, if any
    #[serde(default)]
    pub salon: Option<ClaimedSalon>,
}

impl User {
    /// First and last name if present, falling back to the username
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.to_string(),
            _ => self.username.clone(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Payload for the registration endpoint
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Password confirmation; the backend validates the two match
    pub password2: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Partial profile update; only set fields are sent
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_with_salon() {
        let json = r#"{
            "id": 7,
            "username": "bella",
            "email": "bella@example.com",
            "first_name": "Bella",
            "last_name": "Nguyen",
            "phone_number": null,
            "role": "user",
            "salon": {"id": 1, "name": "Bella Hair Studio", "sample_url": "bella-hair"}
        }"#;

        let user: User = serde_json::from_str(json).expect("Failed to parse user test JSON");
        assert_eq!(user.display_name(), "Bella Nguyen");
        assert!(!user.is_admin());
        assert_eq!(user.salon.as_ref().map(|s| s.id), Some(1));
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let json = r#"{
            "id": 8,
            "username": "admin",
            "email": "admin@example.com",
            "first_name": null,
            "last_name": null,
            "phone_number": null,
            "role": "admin"
        }"#;

        let user: User = serde_json::from_str(json).expect("Failed to parse user test JSON");
        assert_eq!(user.display_name(), "admin");
        assert!(user.is_admin());
        assert!(user.salon.is_none());
    }

    #[test]
    fn test_profile_update_skips_unset_fields() {
        let update = ProfileUpdate {
            first_name: Some("Bella".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).expect("Failed to serialize profile update");
        assert_eq!(json, serde_json::json!({"first_name": "Bella"}));
    }
}

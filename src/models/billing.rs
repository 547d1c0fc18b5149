use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: i64,
    /// Pre-formatted price string supplied by the serializer
    pub display_price: String,
    pub currency: String,
    /// Feature list; a JSON field on the backend
    #[serde(default)]
    pub features: serde_json::Value,
    pub trial_period_days: i32,
    pub is_active: bool,
    #[serde(default)]
    pub is_popular: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subscription_plan() {
        let json = r#"{
            "id": 1,
            "name": "Pro",
            "description": "For growing salons",
            "price_cents": 2900,
            "display_price": "$29.00",
            "currency": "usd",
            "features": ["Custom domain", "No branding"],
            "trial_period_days": 14,
            "is_active": true,
            "is_popular": true
        }"#;

        let plan: SubscriptionPlan =
            serde_json::from_str(json).expect("Failed to parse plan test JSON");
        assert_eq!(plan.display_price, "$29.00");
        assert_eq!(plan.trial_period_days, 14);
        assert!(plan.is_popular);
    }
}

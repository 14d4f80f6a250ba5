//! Dashboard-triggered webhook proxies.
//!
//! Each proxy accepts a loosely-typed product body from the dashboard,
//! checks a fixed set of required fields, and builds the canonical payload
//! forwarded to one engine webhook.

use serde_json::{json, Map, Value};

use crate::automation::AutomationType;
use crate::error::CoreError;
use crate::payload::{
    ProductFields, DEFAULT_COUNTRY, DEFAULT_GENDER, DEFAULT_LANGUAGE, DEFAULT_NICHE,
    TRIGGER_SOURCE_DASHBOARD,
};
use crate::types::Timestamp;
use crate::webhook::WebhookKind;

/// Fields every proxy requires.
pub const BASE_REQUIRED_FIELDS: &[&str] = &["id", "user_id", "name"];

/// Shopify deployment additionally needs the target store selector.
pub const SHOPIFY_REQUIRED_FIELDS: &[&str] = &["id", "user_id", "name", "store"];

pub const DEFAULT_MAX_REVIEWS: u64 = 50;
pub const DEFAULT_SCRIPT_COUNT: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyKind {
    BannerGeneration,
    Reviews,
    UgcScripts,
    ShopifyDeployment,
}

impl ProxyKind {
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            ProxyKind::ShopifyDeployment => SHOPIFY_REQUIRED_FIELDS,
            _ => BASE_REQUIRED_FIELDS,
        }
    }

    pub fn webhook(self) -> WebhookKind {
        match self {
            ProxyKind::BannerGeneration => WebhookKind::BannerGeneration,
            ProxyKind::Reviews => WebhookKind::Reviews,
            ProxyKind::UgcScripts => WebhookKind::UgcScripts,
            ProxyKind::ShopifyDeployment => WebhookKind::ShopifyDeploy,
        }
    }

    pub fn automation_type(self) -> AutomationType {
        match self {
            ProxyKind::BannerGeneration => AutomationType::BannerGeneration,
            ProxyKind::Reviews => AutomationType::Reviews,
            ProxyKind::UgcScripts => AutomationType::UgcScripts,
            ProxyKind::ShopifyDeployment => AutomationType::ShopifyDeployment,
        }
    }

    /// Validate `body` and build the payload forwarded to the engine.
    ///
    /// Fails with [`CoreError::Validation`] when the body is not an object
    /// and [`CoreError::MissingFields`] when a required field is absent.
    pub fn build_payload(self, body: &Value, triggered_at: Timestamp) -> Result<Value, CoreError> {
        let fields = ProductFields::new(body)
            .ok_or_else(|| CoreError::Validation("Request body must be a JSON object".into()))?;
        fields.require(self.required_fields())?;

        let mut payload = json!({
            "product_id": fields.raw("id"),
            "user_id": fields.raw("user_id"),
            "name": fields.resolve("name", &[], ""),
            "description": fields.resolve("description", &[], ""),
            "niche": fields.resolve("niche", &[], DEFAULT_NICHE),
            "country": fields.resolve("country", &[], DEFAULT_COUNTRY),
            "language": fields.resolve("language", &[], DEFAULT_LANGUAGE),
            "gender": fields.resolve("gender", &[], DEFAULT_GENDER),
            "amazon_link": fields.resolve("amazon_link", &[], ""),
            "alibaba_link": fields.resolve("alibaba_link", &[], ""),
            "metadata": object_or_empty(fields.raw("metadata")),
            "automation_type": self.automation_type().as_str(),
            "triggered_at": triggered_at.to_rfc3339(),
            "trigger_source": TRIGGER_SOURCE_DASHBOARD,
        });

        if let Some(extra) = payload.as_object_mut() {
            self.add_specific_fields(&fields, extra);
        }

        Ok(payload)
    }

    fn add_specific_fields(self, fields: &ProductFields<'_>, payload: &mut Map<String, Value>) {
        match self {
            ProxyKind::BannerGeneration => {
                payload.insert(
                    "research".into(),
                    fields
                        .meta_value(&["research_results", "research"])
                        .cloned()
                        .unwrap_or(Value::Null),
                );
            }
            ProxyKind::Reviews => {
                payload.insert(
                    "max_reviews".into(),
                    json!(positive_int(fields.raw("max_reviews")).unwrap_or(DEFAULT_MAX_REVIEWS)),
                );
            }
            ProxyKind::UgcScripts => {
                payload.insert(
                    "script_count".into(),
                    json!(positive_int(fields.raw("script_count")).unwrap_or(DEFAULT_SCRIPT_COUNT)),
                );
            }
            ProxyKind::ShopifyDeployment => {
                payload.insert("store".into(), fields.raw("store"));
                payload.insert(
                    "publish".into(),
                    json!(fields.raw("publish").as_bool().unwrap_or(false)),
                );
            }
        }
    }
}

fn object_or_empty(value: Value) -> Value {
    if value.is_object() {
        value
    } else {
        json!({})
    }
}

fn positive_int(value: Value) -> Option<u64> {
    value.as_u64().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn now() -> Timestamp {
        chrono::Utc::now()
    }

    #[test]
    fn banner_payload_applies_defaults() {
        let body = json!({ "id": "p1", "user_id": "u1", "name": "Widget" });
        let p = ProxyKind::BannerGeneration.build_payload(&body, now()).unwrap();

        assert_eq!(p["product_id"], "p1");
        assert_eq!(p["user_id"], "u1");
        assert_eq!(p["niche"], "General");
        assert_eq!(p["country"], "US");
        assert_eq!(p["language"], "English");
        assert_eq!(p["gender"], "All");
        assert_eq!(p["amazon_link"], "");
        assert_eq!(p["trigger_source"], "dashboard");
        assert_eq!(p["automation_type"], "banner_generation");
        assert!(p["triggered_at"].is_string());
    }

    #[test]
    fn caller_values_override_defaults() {
        let body = json!({
            "id": "p1", "user_id": "u1", "name": "Widget",
            "niche": "Kitchen", "country": "FR", "amazon_link": "https://a.example/x"
        });
        let p = ProxyKind::Reviews.build_payload(&body, now()).unwrap();

        assert_eq!(p["niche"], "Kitchen");
        assert_eq!(p["country"], "FR");
        assert_eq!(p["amazon_link"], "https://a.example/x");
        assert_eq!(p["max_reviews"], 50);
    }

    #[test]
    fn missing_fields_are_named() {
        let body = json!({ "id": "p1" });
        let err = ProxyKind::UgcScripts.build_payload(&body, now()).unwrap_err();

        assert_matches!(err, CoreError::MissingFields { ref missing, ref received, .. } => {
            assert_eq!(missing, &vec!["user_id".to_string(), "name".to_string()]);
            assert_eq!(received, &vec!["id".to_string()]);
        });
    }

    #[test]
    fn shopify_requires_store() {
        let body = json!({ "id": "p1", "user_id": "u1", "name": "Widget" });
        let err = ProxyKind::ShopifyDeployment.build_payload(&body, now()).unwrap_err();
        assert_matches!(err, CoreError::MissingFields { ref missing, .. } if missing == &vec!["store".to_string()]);

        let body = json!({ "id": "p1", "user_id": "u1", "name": "Widget", "store": "eu" });
        let p = ProxyKind::ShopifyDeployment.build_payload(&body, now()).unwrap();
        assert_eq!(p["store"], "eu");
        assert_eq!(p["publish"], false);
    }

    #[test]
    fn ugc_script_count_ignores_invalid_values() {
        let body = json!({ "id": "p1", "user_id": "u1", "name": "W", "script_count": 0 });
        let p = ProxyKind::UgcScripts.build_payload(&body, now()).unwrap();
        assert_eq!(p["script_count"], 3);
    }

    #[test]
    fn non_object_body_is_a_validation_error() {
        let err = ProxyKind::Reviews.build_payload(&json!([]), now()).unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }
}

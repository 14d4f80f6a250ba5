//! Field resolution and outbound payload construction.
//!
//! Product rows are loose JSON documents: a value may live on the row
//! itself, inside the `metadata` bag, or nowhere at all. [`ProductFields`]
//! resolves each field through that chain and falls back to a fixed
//! default, and the builders below assemble the bodies POSTed to the
//! automation engine.

use serde_json::{json, Map, Value};

use crate::error::CoreError;
use crate::types::Timestamp;
use crate::webhook::WebhookKind;

pub const DEFAULT_NICHE: &str = "General";
pub const DEFAULT_COUNTRY: &str = "US";
pub const DEFAULT_LANGUAGE: &str = "English";
pub const DEFAULT_GENDER: &str = "All";

/// `trigger_source` tag on payloads sent by the status orchestrator.
pub const TRIGGER_SOURCE_ORCHESTRATOR: &str = "workflow-orchestrator";

/// `trigger_source` tag on payloads relayed from the dashboard.
pub const TRIGGER_SOURCE_DASHBOARD: &str = "dashboard";

/// Read-only view over a product-shaped JSON object.
#[derive(Debug, Clone, Copy)]
pub struct ProductFields<'a> {
    record: &'a Map<String, Value>,
    metadata: Option<&'a Map<String, Value>>,
}

impl<'a> ProductFields<'a> {
    /// Wrap a JSON value. Returns `None` unless it is an object.
    pub fn new(record: &'a Value) -> Option<Self> {
        let record = record.as_object()?;
        Some(Self::from_map(record))
    }

    pub fn from_map(record: &'a Map<String, Value>) -> Self {
        let metadata = record.get("metadata").and_then(Value::as_object);
        Self { record, metadata }
    }

    /// A non-blank string field on the record itself.
    pub fn text(&self, key: &str) -> Option<&'a str> {
        non_blank(self.record.get(key))
    }

    /// A non-blank string field inside `metadata`.
    pub fn meta_text(&self, key: &str) -> Option<&'a str> {
        non_blank(self.metadata?.get(key))
    }

    /// First non-null metadata value among `keys`.
    pub fn meta_value(&self, keys: &[&str]) -> Option<&'a Value> {
        let metadata = self.metadata?;
        keys.iter()
            .filter_map(|k| metadata.get(*k))
            .find(|v| !v.is_null())
    }

    /// Record field, then each metadata key in order, then `default`.
    pub fn resolve(&self, key: &str, meta_keys: &[&str], default: &'a str) -> &'a str {
        self.text(key)
            .or_else(|| meta_keys.iter().find_map(|k| self.meta_text(k)))
            .unwrap_or(default)
    }

    /// Raw record value, `Null` when absent.
    pub fn raw(&self, key: &str) -> Value {
        self.record.get(key).cloned().unwrap_or(Value::Null)
    }

    /// Keys present on the record, in map order.
    pub fn keys(&self) -> Vec<String> {
        self.record.keys().cloned().collect()
    }

    /// Whether `key` holds a usable value (non-null, non-blank if a string).
    pub fn is_present(&self, key: &str) -> bool {
        match self.record.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        }
    }

    /// Fail with [`CoreError::MissingFields`] unless every key is present.
    pub fn require(&self, required: &[&str]) -> Result<(), CoreError> {
        let missing: Vec<String> = required
            .iter()
            .filter(|k| !self.is_present(k))
            .map(|k| k.to_string())
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        Err(CoreError::MissingFields {
            required: required.iter().map(|k| k.to_string()).collect(),
            missing,
            received: self.keys(),
        })
    }
}

fn non_blank(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Render an identifier that may arrive as a JSON string or number.
pub fn id_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Body for the research webhook fired when a product enters `new`.
pub fn research_payload(fields: &ProductFields<'_>, triggered_at: Timestamp) -> Value {
    json!({
        "product_id": fields.raw("id"),
        "product_name": fields.resolve("name", &[], ""),
        "description": fields.resolve("description", &["description"], ""),
        "niche": fields.resolve("niche", &["niche"], DEFAULT_NICHE),
        "amazon_link": fields.resolve("amazon_link", &["amazon_link"], ""),
        "alibaba_link": fields.resolve("alibaba_link", &["alibaba_link"], ""),
        "target_country": fields.resolve("country", &["target_country", "country"], DEFAULT_COUNTRY),
        "language": fields.resolve("language", &["language"], DEFAULT_LANGUAGE),
        "triggered_at": triggered_at.to_rfc3339(),
        "trigger_source": TRIGGER_SOURCE_ORCHESTRATOR,
    })
}

/// Body for the banner and UGC webhooks fired when a product is approved.
///
/// Carries whatever research results the engine stored in metadata so the
/// generators do not have to re-fetch them.
pub fn generation_payload(
    kind: WebhookKind,
    fields: &ProductFields<'_>,
    triggered_at: Timestamp,
) -> Value {
    json!({
        "automation_type": kind.as_str(),
        "product_id": fields.raw("id"),
        "product_name": fields.resolve("name", &[], ""),
        "description": fields.resolve("description", &["description"], ""),
        "niche": fields.resolve("niche", &["niche"], DEFAULT_NICHE),
        "country": fields.resolve("country", &["target_country", "country"], DEFAULT_COUNTRY),
        "language": fields.resolve("language", &["language"], DEFAULT_LANGUAGE),
        "gender": fields.resolve("gender", &["gender"], DEFAULT_GENDER),
        "amazon_link": fields.resolve("amazon_link", &["amazon_link"], ""),
        "research": fields
            .meta_value(&["research_results", "research"])
            .cloned()
            .unwrap_or(Value::Null),
        "triggered_at": triggered_at.to_rfc3339(),
        "trigger_source": TRIGGER_SOURCE_ORCHESTRATOR,
    })
}

/// Payload for a webhook kind fired by the orchestrator.
pub fn orchestrator_payload(
    kind: WebhookKind,
    fields: &ProductFields<'_>,
    triggered_at: Timestamp,
) -> Value {
    match kind {
        WebhookKind::Research => research_payload(fields, triggered_at),
        other => generation_payload(other, fields, triggered_at),
    }
}

//! Product status values and the orchestrator's transition table.
//!
//! The status set is open: the dashboard and the automation engine write
//! values this service has never heard of, so anything outside the named
//! variants is carried through as [`ProductStatus::Other`].

use serde::{Deserialize, Serialize};

use crate::webhook::WebhookKind;

pub const STATUS_NEW: &str = "new";
pub const STATUS_RESEARCHING: &str = "researching";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_BANNER_GEN: &str = "banner_gen";

/// Metadata key stamped when research is kicked off.
pub const STAMP_WORKFLOW_STARTED_AT: &str = "workflow_started_at";

/// Metadata key stamped when a product is approved for generation.
pub const STAMP_APPROVED_AT: &str = "approved_at";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductStatus {
    New,
    Researching,
    Approved,
    BannerGen,
    Other(String),
}

/// What the orchestrator does when a product enters a status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Status written back to the row.
    pub to: ProductStatus,
    /// Metadata key that receives the transition timestamp.
    pub stamp_key: &'static str,
    /// Webhooks fired, in order, after the write commits.
    pub triggers: &'static [WebhookKind],
}

const RESEARCH_TRIGGERS: &[WebhookKind] = &[WebhookKind::Research];
const GENERATION_TRIGGERS: &[WebhookKind] = &[WebhookKind::BannerGeneration, WebhookKind::UgcScripts];

impl ProductStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            STATUS_NEW => ProductStatus::New,
            STATUS_RESEARCHING => ProductStatus::Researching,
            STATUS_APPROVED => ProductStatus::Approved,
            STATUS_BANNER_GEN => ProductStatus::BannerGen,
            other => ProductStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ProductStatus::New => STATUS_NEW,
            ProductStatus::Researching => STATUS_RESEARCHING,
            ProductStatus::Approved => STATUS_APPROVED,
            ProductStatus::BannerGen => STATUS_BANNER_GEN,
            ProductStatus::Other(s) => s,
        }
    }

    /// The transition taken on entering this status, if any.
    ///
    /// Only `new` and `approved` drive the pipeline forward; every other
    /// status is owned by the dashboard or the engine.
    pub fn transition(&self) -> Option<Transition> {
        match self {
            ProductStatus::New => Some(Transition {
                to: ProductStatus::Researching,
                stamp_key: STAMP_WORKFLOW_STARTED_AT,
                triggers: RESEARCH_TRIGGERS,
            }),
            ProductStatus::Approved => Some(Transition {
                to: ProductStatus::BannerGen,
                stamp_key: STAMP_APPROVED_AT,
                triggers: GENERATION_TRIGGERS,
            }),
            _ => None,
        }
    }
}

impl From<String> for ProductStatus {
    fn from(value: String) -> Self {
        ProductStatus::parse(&value)
    }
}

impl From<ProductStatus> for String {
    fn from(value: ProductStatus) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Row-change envelopes and the orchestrator's per-event decision.
//!
//! The database delivers one [`ChangeEvent`] per row mutation. The
//! orchestrator's own status write produces another event, so an `UPDATE`
//! whose status did not change must be treated as a no-op or the service
//! would retrigger itself forever.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::status::{ProductStatus, Transition};
use crate::types::ProductId;

/// Table whose rows drive the orchestrator.
pub const PRODUCTS_TABLE: &str = "products";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub table: String,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub record: Option<Value>,
    #[serde(default)]
    pub old_record: Option<Value>,
}

/// What the orchestrator should do with one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Not a product insert/update; acknowledged without looking further.
    Ignore { reason: String },
    /// `UPDATE` with the same status on both sides.
    Unchanged {
        product_id: ProductId,
        status: ProductStatus,
    },
    /// Write `transition.to`, stamp metadata, then fire the triggers.
    Advance {
        product_id: ProductId,
        from: ProductStatus,
        transition: Transition,
    },
    /// Status has no transition; echo it back untouched.
    Acknowledge {
        product_id: ProductId,
        status: ProductStatus,
    },
}

impl ChangeEvent {
    pub fn status(&self) -> Option<&str> {
        status_of(self.record.as_ref())
    }

    pub fn old_status(&self) -> Option<&str> {
        status_of(self.old_record.as_ref())
    }

    /// True for an `UPDATE` whose record and old record carry equal statuses.
    pub fn status_unchanged(&self) -> bool {
        self.kind == ChangeKind::Update
            && self.old_record.is_some()
            && self.status() == self.old_status()
    }

    /// Parse the product id out of `record.id`.
    pub fn product_id(&self) -> Result<ProductId, CoreError> {
        let raw = self
            .record
            .as_ref()
            .and_then(|r| r.get("id"))
            .and_then(Value::as_str)
            .ok_or_else(|| CoreError::Validation("record.id is required".into()))?;

        raw.parse()
            .map_err(|_| CoreError::Validation(format!("record.id '{raw}' is not a valid UUID")))
    }

    pub fn decide(&self) -> Result<Decision, CoreError> {
        if self.table != PRODUCTS_TABLE {
            return Ok(Decision::Ignore {
                reason: format!("Events for table '{}' are not handled", self.table),
            });
        }
        if self.kind == ChangeKind::Delete || self.record.is_none() {
            return Ok(Decision::Ignore {
                reason: "Delete events carry no status to act on".into(),
            });
        }

        let product_id = self.product_id()?;
        let status = self
            .status()
            .map(ProductStatus::parse)
            .ok_or_else(|| CoreError::Validation("record.status is required".into()))?;

        if self.status_unchanged() {
            return Ok(Decision::Unchanged { product_id, status });
        }

        Ok(match status.transition() {
            Some(transition) => Decision::Advance {
                product_id,
                from: status,
                transition,
            },
            None => Decision::Acknowledge { product_id, status },
        })
    }
}

fn status_of(record: Option<&Value>) -> Option<&str> {
    record?.get("status")?.as_str()
}

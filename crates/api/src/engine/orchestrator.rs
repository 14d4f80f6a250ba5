//! Per-event status orchestration.
//!
//! [`Orchestrator::handle`] applies the decision from
//! [`ChangeEvent::decide`]: advance the status with a compare-and-set,
//! then fire the transition's webhooks one after another. Webhook failures
//! are recorded in the outbox and logged; they never undo the status write
//! and never stop the next trigger from being attempted.

use chrono::Utc;
use productflow_core::change_event::{ChangeEvent, Decision};
use productflow_core::payload::{orchestrator_payload, ProductFields};
use productflow_core::status::{ProductStatus, Transition};
use productflow_core::types::{DbId, ProductId, Timestamp};
use productflow_core::webhook::WebhookKind;
use productflow_db::models::product::Product;
use productflow_db::models::webhook_attempt::{AttemptOutcome, NewWebhookAttempt};
use productflow_events::bus::{PRODUCT_STATUS_CHANGED, WEBHOOK_ATTEMPT_RECORDED};
use productflow_events::{EventBus, PlatformEvent};
use productflow_n8n::WebhookDispatch;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::config::WebhookUrls;
use crate::engine::store::ProductStore;
use crate::error::{AppError, AppResult};

/// Where and how transition webhooks are sent. Absent in offline mode.
#[derive(Clone, Copy)]
pub struct FanOut<'a> {
    pub dispatch: &'a dyn WebhookDispatch,
    pub urls: &'a WebhookUrls,
}

/// Result of one webhook fired after a transition.
#[derive(Debug, Clone, Serialize)]
pub struct TriggerSummary {
    pub kind: WebhookKind,
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Outbox row id; absent if the attempt could not be recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt_id: Option<DbId>,
}

/// JSON body returned for every handled event.
#[derive(Debug, Clone, Serialize)]
pub struct OrchestratorOutcome {
    pub success: bool,
    pub product_id: Option<ProductId>,
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<String>,
    pub message: String,
    pub triggers: Vec<TriggerSummary>,
}

impl OrchestratorOutcome {
    fn ack(product_id: Option<ProductId>, status: Option<&ProductStatus>, message: String) -> Self {
        Self {
            success: true,
            product_id,
            status: status.map(|s| s.to_string()),
            previous_status: None,
            message,
            triggers: Vec::new(),
        }
    }
}

pub struct Orchestrator<'a> {
    store: &'a dyn ProductStore,
    fan_out: Option<FanOut<'a>>,
    event_bus: &'a EventBus,
}

impl<'a> Orchestrator<'a> {
    pub fn new(store: &'a dyn ProductStore, fan_out: Option<FanOut<'a>>, event_bus: &'a EventBus) -> Self {
        Self {
            store,
            fan_out,
            event_bus,
        }
    }

    pub async fn handle(&self, event: &ChangeEvent) -> AppResult<OrchestratorOutcome> {
        match event.decide()? {
            Decision::Ignore { reason } => {
                tracing::debug!(table = %event.table, kind = ?event.kind, "Change event ignored");
                Ok(OrchestratorOutcome::ack(None, None, reason))
            }
            Decision::Unchanged { product_id, status } => {
                tracing::debug!(%product_id, %status, "Status unchanged, skipping");
                Ok(OrchestratorOutcome::ack(
                    Some(product_id),
                    Some(&status),
                    "Status unchanged, nothing to do".into(),
                ))
            }
            Decision::Acknowledge { product_id, status } => Ok(OrchestratorOutcome::ack(
                Some(product_id),
                Some(&status),
                format!("No automation is triggered by status '{status}'"),
            )),
            Decision::Advance {
                product_id,
                from,
                transition,
            } => self.advance(product_id, from, transition).await,
        }
    }

    async fn advance(
        &self,
        product_id: ProductId,
        from: ProductStatus,
        transition: Transition,
    ) -> AppResult<OrchestratorOutcome> {
        let now = Utc::now();
        let mut patch = Map::new();
        patch.insert(transition.stamp_key.to_string(), json!(now.to_rfc3339()));
        let patch = Value::Object(patch);

        let updated = self
            .store
            .advance_status(product_id, from.as_str(), transition.to.as_str(), &patch)
            .await
            .map_err(|e| AppError::Unexpected(e.to_string()))?;

        let Some(product) = updated else {
            tracing::info!(%product_id, %from, "Product moved on before the transition, skipping");
            return Ok(OrchestratorOutcome::ack(
                Some(product_id),
                Some(&from),
                format!("Product is no longer in status '{from}', nothing to do"),
            ));
        };

        tracing::info!(
            %product_id,
            from = %from,
            to = %transition.to,
            version = product.version,
            "Product status advanced",
        );
        self.event_bus.publish(
            PlatformEvent::new(PRODUCT_STATUS_CHANGED)
                .with_source("product", product_id)
                .with_payload(json!({
                    "from": from.as_str(),
                    "to": transition.to.as_str(),
                    "version": product.version,
                })),
        );

        let (triggers, message) = match self.fan_out {
            Some(fan_out) => {
                let triggers = self.fire(fan_out, &product, transition.triggers, now).await?;
                let delivered = triggers.iter().filter(|t| t.delivered).count();
                let message = format!(
                    "Status advanced to '{}'; {delivered} of {} webhooks delivered",
                    transition.to,
                    triggers.len()
                );
                (triggers, message)
            }
            None => (
                Vec::new(),
                format!("Status advanced to '{}'; offline mode, no webhooks fired", transition.to),
            ),
        };

        Ok(OrchestratorOutcome {
            success: true,
            product_id: Some(product_id),
            status: Some(transition.to.to_string()),
            previous_status: Some(from.to_string()),
            message,
            triggers,
        })
    }

    /// Fire each trigger in order. Failures are contained per trigger.
    async fn fire(
        &self,
        fan_out: FanOut<'_>,
        product: &Product,
        kinds: &[WebhookKind],
        triggered_at: Timestamp,
    ) -> AppResult<Vec<TriggerSummary>> {
        let record = serde_json::to_value(product).map_err(|e| AppError::Unexpected(e.to_string()))?;
        let Some(fields) = ProductFields::new(&record) else {
            return Err(AppError::Unexpected("Product did not serialize to an object".into()));
        };

        let mut summaries = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            let url = fan_out.urls.url(kind);
            let payload = orchestrator_payload(kind, &fields, triggered_at);

            let outcome = match fan_out.dispatch.post_json(url, &payload).await {
                Ok(reply) => {
                    if !reply.is_success() {
                        tracing::warn!(
                            product_id = %product.id,
                            webhook = %kind,
                            status = reply.status,
                            "Webhook rejected, status change kept",
                        );
                    }
                    AttemptOutcome::from_response(reply.status, &reply.body)
                }
                Err(e) => {
                    tracing::warn!(
                        product_id = %product.id,
                        webhook = %kind,
                        error = %e,
                        "Webhook failed, status change kept",
                    );
                    AttemptOutcome::unreachable(&e)
                }
            };

            let attempt_id = self.record(product.id, kind, url, payload, &outcome).await;
            summaries.push(TriggerSummary {
                kind,
                delivered: outcome.is_delivered(),
                status_code: outcome.response_status_code.and_then(|c| u16::try_from(c).ok()),
                error: outcome.error_message.clone(),
                attempt_id,
            });
        }

        Ok(summaries)
    }

    async fn record(
        &self,
        product_id: ProductId,
        kind: WebhookKind,
        url: &str,
        payload: Value,
        outcome: &AttemptOutcome,
    ) -> Option<DbId> {
        let attempt = NewWebhookAttempt {
            product_id,
            trigger_kind: kind.as_str().to_string(),
            url: url.to_string(),
            payload,
            outcome: outcome.clone(),
        };

        match self.store.record_attempt(&attempt).await {
            Ok(id) => {
                self.event_bus.publish(
                    PlatformEvent::new(WEBHOOK_ATTEMPT_RECORDED)
                        .with_source("webhook_attempt", id)
                        .with_payload(json!({
                            "product_id": product_id,
                            "trigger_kind": kind.as_str(),
                            "status": outcome.status,
                        })),
                );
                Some(id)
            }
            Err(e) => {
                tracing::warn!(%product_id, webhook = %kind, error = %e, "Failed to record webhook attempt");
                None
            }
        }
    }
}

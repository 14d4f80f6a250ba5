//! Automation-run types, statuses and progress rules.
//!
//! An automation run tracks one (product, automation type) pair. The engine
//! reports progress against it while the dashboard reads it live; it
//! replaces the progress fields that used to be embedded in product
//! metadata.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomationType {
    Research,
    BannerGeneration,
    UgcScripts,
    Reviews,
    ShopifyDeployment,
}

impl AutomationType {
    pub const ALL: [AutomationType; 5] = [
        AutomationType::Research,
        AutomationType::BannerGeneration,
        AutomationType::UgcScripts,
        AutomationType::Reviews,
        AutomationType::ShopifyDeployment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AutomationType::Research => "research",
            AutomationType::BannerGeneration => "banner_generation",
            AutomationType::UgcScripts => "ugc_scripts",
            AutomationType::Reviews => "reviews",
            AutomationType::ShopifyDeployment => "shopify_deployment",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == value)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid automation type '{value}'. Must be one of: {}",
                    Self::ALL.map(|t| t.as_str()).join(", ")
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Stopped,
}

impl RunStatus {
    pub const ALL: [RunStatus; 5] = [
        RunStatus::Pending,
        RunStatus::Processing,
        RunStatus::Completed,
        RunStatus::Failed,
        RunStatus::Stopped,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Pending => "pending",
            RunStatus::Processing => "processing",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Stopped => "stopped",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == value)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid run status '{value}'. Must be one of: {}",
                    Self::ALL.map(|s| s.as_str()).join(", ")
                ))
            })
    }

    /// Terminal runs get a `completed_at` stamp and no further progress.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunStatus::Completed | RunStatus::Failed | RunStatus::Stopped
        )
    }
}

pub const MIN_PROGRESS: i32 = 0;
pub const MAX_PROGRESS: i32 = 100;

/// Validate a progress percentage and narrow it to the column type.
pub fn validate_progress(progress: i32) -> Result<i16, CoreError> {
    if (MIN_PROGRESS..=MAX_PROGRESS).contains(&progress) {
        Ok(progress as i16)
    } else {
        Err(CoreError::Validation(format!(
            "progress must be between {MIN_PROGRESS} and {MAX_PROGRESS}, got {progress}"
        )))
    }
}

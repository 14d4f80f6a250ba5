//! Outbound webhook kinds.
//!
//! Each automation the engine runs is reached through one fixed webhook.
//! The kind determines the default path under the engine's `/webhook/`
//! prefix and the environment variable that overrides the full URL.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookKind {
    Research,
    BannerGeneration,
    UgcScripts,
    Reviews,
    ShopifyDeploy,
    Resume,
}

impl WebhookKind {
    pub const ALL: [WebhookKind; 6] = [
        WebhookKind::Research,
        WebhookKind::BannerGeneration,
        WebhookKind::UgcScripts,
        WebhookKind::Reviews,
        WebhookKind::ShopifyDeploy,
        WebhookKind::Resume,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WebhookKind::Research => "research",
            WebhookKind::BannerGeneration => "banner_generation",
            WebhookKind::UgcScripts => "ugc_scripts",
            WebhookKind::Reviews => "reviews",
            WebhookKind::ShopifyDeploy => "shopify_deploy",
            WebhookKind::Resume => "resume",
        }
    }

    /// Path appended to `{base}/webhook/` when no override is configured.
    pub fn default_path(self) -> &'static str {
        match self {
            WebhookKind::Research => "product-research",
            WebhookKind::BannerGeneration => "banner-generation",
            WebhookKind::UgcScripts => "ugc-scripts",
            WebhookKind::Reviews => "product-reviews",
            WebhookKind::ShopifyDeploy => "shopify-deploy",
            WebhookKind::Resume => "generation-resume",
        }
    }

    /// Environment variable holding a full-URL override for this kind.
    pub fn env_var(self) -> &'static str {
        match self {
            WebhookKind::Research => "N8N_WEBHOOK_RESEARCH_URL",
            WebhookKind::BannerGeneration => "N8N_WEBHOOK_BANNER_URL",
            WebhookKind::UgcScripts => "N8N_WEBHOOK_UGC_URL",
            WebhookKind::Reviews => "N8N_WEBHOOK_REVIEWS_URL",
            WebhookKind::ShopifyDeploy => "N8N_WEBHOOK_SHOPIFY_URL",
            WebhookKind::Resume => "N8N_WEBHOOK_RESUME_URL",
        }
    }
}

impl std::fmt::Display for WebhookKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_vars_are_unique() {
        let mut vars: Vec<_> = WebhookKind::ALL.iter().map(|k| k.env_var()).collect();
        vars.sort_unstable();
        vars.dedup();
        assert_eq!(vars.len(), WebhookKind::ALL.len());
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_value(WebhookKind::BannerGeneration).unwrap();
        assert_eq!(json, "banner_generation");
        assert_eq!(WebhookKind::BannerGeneration.to_string(), "banner_generation");
    }
}

use productflow_core::webhook::WebhookKind;

/// Errors raised while reading configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a valid {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Whether the status orchestrator fires webhooks after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorMode {
    /// Advance the status and fan out to the engine.
    Live,
    /// Advance the status only; used when the engine is unreachable.
    Offline,
}

/// Full webhook URL for every [`WebhookKind`].
#[derive(Debug, Clone)]
pub struct WebhookUrls {
    pub research: String,
    pub banner_generation: String,
    pub ugc_scripts: String,
    pub reviews: String,
    pub shopify_deploy: String,
    pub resume: String,
}

impl WebhookUrls {
    pub fn url(&self, kind: WebhookKind) -> &str {
        match kind {
            WebhookKind::Research => &self.research,
            WebhookKind::BannerGeneration => &self.banner_generation,
            WebhookKind::UgcScripts => &self.ugc_scripts,
            WebhookKind::Reviews => &self.reviews,
            WebhookKind::ShopifyDeploy => &self.shopify_deploy,
            WebhookKind::Resume => &self.resume,
        }
    }

    /// Default every kind to `{base_url}/webhook/{path}`.
    pub fn under(base_url: &str) -> Self {
        let at = |kind: WebhookKind| format!("{base_url}/webhook/{}", kind.default_path());
        Self {
            research: at(WebhookKind::Research),
            banner_generation: at(WebhookKind::BannerGeneration),
            ugc_scripts: at(WebhookKind::UgcScripts),
            reviews: at(WebhookKind::Reviews),
            shopify_deploy: at(WebhookKind::ShopifyDeploy),
            resume: at(WebhookKind::Resume),
        }
    }

    fn set(&mut self, kind: WebhookKind, url: String) {
        let slot = match kind {
            WebhookKind::Research => &mut self.research,
            WebhookKind::BannerGeneration => &mut self.banner_generation,
            WebhookKind::UgcScripts => &mut self.ugc_scripts,
            WebhookKind::Reviews => &mut self.reviews,
            WebhookKind::ShopifyDeploy => &mut self.shopify_deploy,
            WebhookKind::Resume => &mut self.resume,
        };
        *slot = url;
    }
}

/// Connection settings for the n8n automation engine.
#[derive(Debug, Clone)]
pub struct N8nConfig {
    /// Instance root, without trailing slash.
    pub base_url: String,
    /// Sent as `X-N8N-API-KEY` on REST calls.
    pub api_key: String,
    /// Per-request timeout for outbound calls.
    pub timeout_secs: u64,
    pub webhook_urls: WebhookUrls,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub n8n: N8nConfig,
    pub orchestrator_mode: OrchestratorMode,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                    | Default                           |
    /// |----------------------------|-----------------------------------|
    /// | `HOST`                     | `0.0.0.0`                         |
    /// | `PORT`                     | `3000`                            |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`           |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                              |
    /// | `N8N_BASE_URL`             | `http://localhost:5678`           |
    /// | `N8N_API_KEY`              | empty                             |
    /// | `N8N_WEBHOOK_TIMEOUT_SECS` | `60`                              |
    /// | `N8N_WEBHOOK_<KIND>_URL`   | `{N8N_BASE_URL}/webhook/<path>`   |
    /// | `ORCHESTRATOR_MODE`        | `live` (`offline` disables fan-out) |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "0.0.0.0");
        let port = parse("PORT", var("PORT", "3000"), "u16")?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs =
            parse("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS", "30"), "u64")?;

        let base_url = var("N8N_BASE_URL", "http://localhost:5678")
            .trim_end_matches('/')
            .to_string();
        let mut webhook_urls = WebhookUrls::under(&base_url);
        for kind in WebhookKind::ALL {
            if let Some(url) = lookup(kind.env_var()).filter(|u| !u.trim().is_empty()) {
                webhook_urls.set(kind, url.trim().to_string());
            }
        }

        let n8n = N8nConfig {
            api_key: var("N8N_API_KEY", ""),
            timeout_secs: parse(
                "N8N_WEBHOOK_TIMEOUT_SECS",
                var("N8N_WEBHOOK_TIMEOUT_SECS", "60"),
                "u64",
            )?,
            base_url,
            webhook_urls,
        };

        let orchestrator_mode = match var("ORCHESTRATOR_MODE", "live").to_ascii_lowercase().as_str() {
            "live" => OrchestratorMode::Live,
            "offline" => OrchestratorMode::Offline,
            other => {
                return Err(ConfigError::Invalid {
                    var: "ORCHESTRATOR_MODE",
                    expected: "mode (live|offline)",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            n8n,
            orchestrator_mode,
        })
    }
}

fn parse<T: std::str::FromStr>(
    var: &'static str,
    value: String,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { var, expected, value })
}

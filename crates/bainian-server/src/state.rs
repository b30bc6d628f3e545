use std::sync::Arc;

use bainian_config::{AppConfig, ModelCatalog, USER_INSTRUCTION};
use bainian_llm::{OpenRouterClient, VisionProvider};
use tracing::info;

/// Shared, read-only state handed to every request.
pub struct AppState {
    pub config: AppConfig,
    pub catalog: ModelCatalog,
    pub provider: Arc<dyn VisionProvider>,
}

impl AppState {
    pub fn new(config: AppConfig, catalog: ModelCatalog, provider: Arc<dyn VisionProvider>) -> Self {
        Self { config, catalog, provider }
    }

    /// Builds state backed by the OpenRouter client described in `config`.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let catalog = config.catalog()?;
        let provider = OpenRouterClient::new(
            &config.api_base,
            &config.api_key,
            USER_INSTRUCTION,
            config.max_tokens,
            config.request_timeout,
        )?;

        info!("Provider: {} (timeout {:?})", config.api_base, config.request_timeout);
        for p in catalog.profiles() {
            info!("  - {} ({})", p.key, p.model);
        }

        Ok(Self::new(config, catalog, Arc::new(provider)))
    }
}

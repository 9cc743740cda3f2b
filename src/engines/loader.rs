//! Engine loader for building the configured search provider

use super::traits::Engine;
use super::{duckduckgo, google};
use crate::config::SearchSettings;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Builds engines from configuration
pub struct EngineLoader;

impl EngineLoader {
    /// Create the engine named in the search settings
    pub fn create(settings: &SearchSettings) -> Result<Arc<dyn Engine>> {
        let base_url = settings.base_url.as_deref();

        let engine: Arc<dyn Engine> = match settings.engine.as_str() {
            "google" => Arc::new(match base_url {
                Some(url) => google::Google::with_base_url(url),
                None => google::Google::new(),
            }),
            "duckduckgo" => Arc::new(match base_url {
                Some(url) => duckduckgo::DuckDuckGo::with_base_url(url),
                None => duckduckgo::DuckDuckGo::new(),
            }),
            other => {
                return Err(anyhow::anyhow!("Unknown engine type: {}", other));
            }
        };

        info!("Loaded search engine: {}", engine.name());
        Ok(engine)
    }

    /// Names accepted by `search.engine`
    pub fn available_engines() -> Vec<&'static str> {
        vec!["google", "duckduckgo"]
    }
}

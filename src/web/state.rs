//! Application state shared across handlers

use crate::config::Settings;
use crate::metrics::Metrics;
use crate::pipeline::Pipeline;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub pipeline: Arc<Pipeline>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(settings: Settings, pipeline: Pipeline) -> Self {
        Self {
            settings: Arc::new(settings),
            pipeline: Arc::new(pipeline),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// State around the production pipeline
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let pipeline = Pipeline::from_settings(&settings)?;
        Ok(Self::new(settings, pipeline))
    }
}

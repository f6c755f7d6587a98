use std::sync::Arc;

use crate::config::Config;
use crate::detector::ModelArtifacts;

/// Shared, read-only context handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub artifacts: Arc<ModelArtifacts>,
}

impl AppState {
    /// Load every artifact once; failures leave the state degraded, not absent.
    pub async fn new(config: Config) -> Self {
        let artifacts = ModelArtifacts::load(&config.detector_config).await;
        Self::with_artifacts(config, artifacts)
    }

    pub fn with_artifacts(config: Config, artifacts: ModelArtifacts) -> Self {
        Self {
            config,
            artifacts: Arc::new(artifacts),
        }
    }
}

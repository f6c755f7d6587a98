use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use super::classifier::{Classifier, LinearClassifier};
use super::vectorizer::{TfidfVectorizer, Vectorizer};
use crate::config::DetectorConfig;
use crate::translate::{TranslationClient, Translator};

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed artifact: {0}")]
    Format(#[source] serde_json::Error),

    #[error("invalid artifact: {0}")]
    Invalid(String),

    #[error("{}: {source}", path.display())]
    At {
        path: PathBuf,
        #[source]
        source: Box<ArtifactError>,
    },

    #[error("vectorizer produces {vectorizer} features but classifier expects {classifier}")]
    DimensionMismatch { vectorizer: usize, classifier: usize },
}

impl ArtifactError {
    /// Attach the artifact path unless the error already names it.
    pub fn at(self, path: &Path) -> Self {
        match self {
            Self::Io { .. } | Self::At { .. } => self,
            other => Self::At {
                path: path.to_path_buf(),
                source: Box::new(other),
            },
        }
    }
}

/// Everything the prediction path needs, loaded once at startup.
///
/// Each slot is `None` when its load failed; nothing is retried.
pub struct ModelArtifacts {
    pub classifier: Option<Arc<dyn Classifier>>,
    pub vectorizer: Option<Arc<dyn Vectorizer>>,
    pub translator: Option<Arc<dyn Translator>>,
    pub model_name: String,
    pub loaded_at: DateTime<Utc>,
}

/// Borrowed view over a fully loaded artifact set.
pub struct Ready<'a> {
    pub classifier: &'a dyn Classifier,
    pub vectorizer: &'a dyn Vectorizer,
    pub translator: &'a dyn Translator,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactStatus {
    pub status: &'static str,
    pub classifier: bool,
    pub vectorizer: bool,
    pub translator: bool,
    pub model_name: String,
    pub started_at: DateTime<Utc>,
}

impl ModelArtifacts {
    /// Load the classifier pair and the translator independently; a failure
    /// in one is logged and leaves the other untouched.
    pub async fn load(config: &DetectorConfig) -> Self {
        info!("Loading ML and translation models...");

        let (classifier, vectorizer) = match load_classifier_pair(config) {
            Ok((classifier, vectorizer)) => {
                info!("ML model and vectorizer loaded from {}", config.artifacts_dir);
                (
                    Some(Arc::new(classifier) as Arc<dyn Classifier>),
                    Some(Arc::new(vectorizer) as Arc<dyn Vectorizer>),
                )
            }
            Err(e) => {
                error!("ERROR loading ML artifacts: {:#}", anyhow::Error::new(e));
                (None, None)
            }
        };

        let translator = match TranslationClient::connect(&config.translation).await {
            Ok(client) => {
                info!("Translation model {} loaded", client.model_name());
                Some(Arc::new(client) as Arc<dyn Translator>)
            }
            Err(e) => {
                error!("ERROR loading translation model: {}", e);
                None
            }
        };

        Self {
            classifier,
            vectorizer,
            translator,
            model_name: config.model_name.clone(),
            loaded_at: Utc::now(),
        }
    }

    /// `Some` only when every artifact loaded.
    pub fn ready(&self) -> Option<Ready<'_>> {
        Some(Ready {
            classifier: self.classifier.as_deref()?,
            vectorizer: self.vectorizer.as_deref()?,
            translator: self.translator.as_deref()?,
        })
    }

    pub fn status(&self) -> ArtifactStatus {
        ArtifactStatus {
            status: if self.ready().is_some() { "ok" } else { "degraded" },
            classifier: self.classifier.is_some(),
            vectorizer: self.vectorizer.is_some(),
            translator: self.translator.is_some(),
            model_name: self.model_name.clone(),
            started_at: self.loaded_at,
        }
    }
}

fn load_classifier_pair(
    config: &DetectorConfig,
) -> Result<(LinearClassifier, TfidfVectorizer), ArtifactError> {
    let classifier = LinearClassifier::load(&config.model_path())?;
    let vectorizer = TfidfVectorizer::load(&config.vectorizer_path())?;

    if let Some(expected) = classifier.num_features() {
        if expected != vectorizer.num_features() {
            return Err(ArtifactError::DimensionMismatch {
                vectorizer: vectorizer.num_features(),
                classifier: expected,
            });
        }
    }
    Ok((classifier, vectorizer))
}

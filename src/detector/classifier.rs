use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::artifacts::ArtifactError;
use super::vectorizer::FeatureVector;

/// Label emitted for news judged fake.
pub const FAKE_LABEL: i64 = 1;

/// Maps a feature row to a discrete label (0 = REAL, 1 = FAKE).
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> anyhow::Result<i64>;

    /// Expected input width, if the model has a fixed one.
    fn num_features(&self) -> Option<usize> {
        None
    }
}

/// Linear decision function `coef . x + intercept` exported from a fitted
/// linear SVM. Positive scores map to `classes[1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    coef: Vec<f64>,
    intercept: f64,
    #[serde(default = "default_classes")]
    classes: [i64; 2],
}

fn default_classes() -> [i64; 2] {
    [0, FAKE_LABEL]
}

impl LinearClassifier {
    #[cfg(test)]
    pub fn new(coef: Vec<f64>, intercept: f64) -> Result<Self, ArtifactError> {
        let classifier = Self {
            coef,
            intercept,
            classes: default_classes(),
        };
        classifier.validate()?;
        Ok(classifier)
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(&bytes).map_err(|e| e.at(path))
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let classifier: Self = serde_json::from_slice(bytes).map_err(ArtifactError::Format)?;
        classifier.validate()?;
        debug!(
            num_features = classifier.coef.len(),
            classes = ?classifier.classes,
            "Loaded linear classifier"
        );
        Ok(classifier)
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        if self.coef.is_empty() {
            return Err(ArtifactError::Invalid("classifier has no coefficients".to_string()));
        }
        if !self.intercept.is_finite() || self.coef.iter().any(|c| !c.is_finite()) {
            return Err(ArtifactError::Invalid(
                "classifier weights must be finite".to_string(),
            ));
        }
        Ok(())
    }

    pub fn decision_function(&self, features: &FeatureVector) -> f64 {
        features.dot(&self.coef) + self.intercept
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, features: &FeatureVector) -> anyhow::Result<i64> {
        if features.dim() != self.coef.len() {
            anyhow::bail!(
                "X has {} features, but the classifier is expecting {} features as input",
                features.dim(),
                self.coef.len()
            );
        }
        let score = self.decision_function(features);
        Ok(if score > 0.0 {
            self.classes[1]
        } else {
            self.classes[0]
        })
    }

    fn num_features(&self) -> Option<usize> {
        Some(self.coef.len())
    }
}

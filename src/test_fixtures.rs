//! Mock collaborators shared by the pipeline and router tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::detector::artifacts::ModelArtifacts;
use crate::detector::classifier::Classifier;
use crate::detector::vectorizer::{FeatureVector, Vectorizer};
use crate::translate::{TranslateError, TranslationOutcome, Translator};

pub const MOCK_MODEL_NAME: &str = "mock-model";

pub enum MockTranslator {
    Fixed(String),
    Unavailable,
    Failing(String),
}

impl MockTranslator {
    pub fn fixed(text: &str) -> Self {
        Self::Fixed(text.to_string())
    }

    pub fn unavailable() -> Self {
        Self::Unavailable
    }

    pub fn failing(message: &str) -> Self {
        Self::Failing(message.to_string())
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, _text: &str) -> Result<TranslationOutcome, TranslateError> {
        match self {
            Self::Fixed(text) => Ok(TranslationOutcome::Translated(text.clone())),
            Self::Unavailable => Ok(TranslationOutcome::Unavailable),
            Self::Failing(message) => Err(TranslateError::Rejected(message.clone())),
        }
    }

    fn model_name(&self) -> &str {
        "mock-translator"
    }
}

/// Records every text it is asked to vectorize.
#[derive(Clone)]
pub struct MockVectorizer {
    dim: usize,
    seen: Arc<Mutex<Vec<String>>>,
}

impl MockVectorizer {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

impl Vectorizer for MockVectorizer {
    fn transform(&self, text: &str) -> anyhow::Result<FeatureVector> {
        self.seen.lock().unwrap().push(text.to_string());
        Ok(FeatureVector::from_pairs(self.dim, vec![(0, 1.0)]))
    }

    fn num_features(&self) -> usize {
        self.dim
    }
}

pub enum MockClassifier {
    Returning(i64),
    Failing(String),
}

impl MockClassifier {
    pub fn returning(label: i64) -> Self {
        Self::Returning(label)
    }

    pub fn failing(message: &str) -> Self {
        Self::Failing(message.to_string())
    }
}

impl Classifier for MockClassifier {
    fn predict(&self, _features: &FeatureVector) -> anyhow::Result<i64> {
        match self {
            Self::Returning(label) => Ok(*label),
            Self::Failing(message) => Err(anyhow::anyhow!("{}", message)),
        }
    }
}

pub fn artifacts_with(
    translator: Option<MockTranslator>,
    vectorizer: Option<MockVectorizer>,
    classifier: Option<MockClassifier>,
) -> ModelArtifacts {
    ModelArtifacts {
        classifier: classifier.map(|c| Arc::new(c) as Arc<dyn Classifier>),
        vectorizer: vectorizer.map(|v| Arc::new(v) as Arc<dyn Vectorizer>),
        translator: translator.map(|t| Arc::new(t) as Arc<dyn Translator>),
        model_name: MOCK_MODEL_NAME.to_string(),
        loaded_at: chrono::Utc::now(),
    }
}

use core::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::artifacts::ModelArtifacts;
use super::classifier::FAKE_LABEL;
use super::normalizer;
use crate::translate::{TranslateError, TranslationOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Real,
    Fake,
}

impl Verdict {
    /// Label 1 is FAKE; every other label reads as REAL.
    #[must_use]
    pub fn from_label(label: i64) -> Self {
        if label == FAKE_LABEL {
            Self::Fake
        } else {
            Self::Real
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real => write!(f, "REAL"),
            Self::Fake => write!(f, "FAKE"),
        }
    }
}

/// Outcome of one prediction, serialized straight into the response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub original_arabic: String,
    pub translated_english: String,
    pub prediction_label: i64,
    pub prediction_text: Verdict,
    pub model_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("model not yet initialized or failed to load")]
    ServiceUnavailable,

    #[error(transparent)]
    Translation(#[from] TranslateError),

    #[error(transparent)]
    Inference(#[from] anyhow::Error),
}

/// Run translate -> normalize -> vectorize -> classify on one input.
pub async fn predict(
    artifacts: &ModelArtifacts,
    text: &str,
) -> Result<PredictionResult, PredictError> {
    let ready = artifacts.ready().ok_or(PredictError::ServiceUnavailable)?;

    let translated = match ready.translator.translate(text).await? {
        TranslationOutcome::Translated(translated) => translated,
        TranslationOutcome::Unavailable => return Err(PredictError::ServiceUnavailable),
    };
    debug!("Translated {} chars to {} chars", text.chars().count(), translated.chars().count());

    let cleaned = normalizer::normalize(&translated);
    let features = ready.vectorizer.transform(&cleaned)?;
    let label = ready.classifier.predict(&features)?;
    let verdict = Verdict::from_label(label);
    debug!(label, %verdict, nnz = features.nnz(), "Classified input");

    Ok(PredictionResult {
        original_arabic: text.to_string(),
        translated_english: translated,
        prediction_label: label,
        prediction_text: verdict,
        model_name: artifacts.model_name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{artifacts_with, MockClassifier, MockTranslator, MockVectorizer};
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn runs_every_stage_in_order() {
        let vectorizer = MockVectorizer::new(4);
        let artifacts = artifacts_with(
            Some(MockTranslator::fixed("Hello, WORLD! see http://x.io")),
            Some(vectorizer.clone()),
            Some(MockClassifier::returning(1)),
        );

        let result = predict(&artifacts, "مرحبا").await.unwrap();
        assert_eq!(result.original_arabic, "مرحبا");
        assert_eq!(result.translated_english, "Hello, WORLD! see http://x.io");
        assert_eq!(result.prediction_label, 1);
        assert_eq!(result.prediction_text, Verdict::Fake);
        assert_eq!(result.model_name, "mock-model");
        // the vectorizer sees the normalized translation
        assert_eq!(vectorizer.seen(), vec!["hello world see".to_string()]);
    }

    #[tokio::test]
    async fn non_one_labels_are_real() {
        for label in [0, 2, -1] {
            let artifacts = artifacts_with(
                Some(MockTranslator::fixed("text")),
                Some(MockVectorizer::new(1)),
                Some(MockClassifier::returning(label)),
            );
            let result = predict(&artifacts, "نص").await.unwrap();
            assert_eq!(result.prediction_label, label);
            assert_eq!(result.prediction_text, Verdict::Real);
        }
    }

    #[tokio::test]
    async fn missing_artifact_is_service_unavailable() {
        let cases = [
            artifacts_with(None, Some(MockVectorizer::new(1)), Some(MockClassifier::returning(0))),
            artifacts_with(Some(MockTranslator::fixed("x")), None, Some(MockClassifier::returning(0))),
            artifacts_with(Some(MockTranslator::fixed("x")), Some(MockVectorizer::new(1)), None),
        ];
        for artifacts in cases {
            let err = predict(&artifacts, "نص").await.unwrap_err();
            assert!(matches!(err, PredictError::ServiceUnavailable));
        }
    }

    #[tokio::test]
    async fn unavailable_translation_is_service_unavailable() {
        let artifacts = artifacts_with(
            Some(MockTranslator::unavailable()),
            Some(MockVectorizer::new(1)),
            Some(MockClassifier::returning(1)),
        );
        let err = predict(&artifacts, "نص").await.unwrap_err();
        assert!(matches!(err, PredictError::ServiceUnavailable));
    }

    #[tokio::test]
    async fn stage_failures_propagate_with_detail() {
        let artifacts = artifacts_with(
            Some(MockTranslator::failing("tokenizer exploded")),
            Some(MockVectorizer::new(1)),
            Some(MockClassifier::returning(1)),
        );
        let err = predict(&artifacts, "نص").await.unwrap_err();
        assert_eq!(err.to_string(), "translation failed: tokenizer exploded");

        let artifacts = artifacts_with(
            Some(MockTranslator::fixed("ok")),
            Some(MockVectorizer::new(1)),
            Some(MockClassifier::failing("bad input shape")),
        );
        let err = predict(&artifacts, "نص").await.unwrap_err();
        assert!(matches!(err, PredictError::Inference(_)));
        assert_eq!(err.to_string(), "bad input shape");
    }

    #[tokio::test]
    async fn logs_translation_length_in_chars() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        // "héllo" is 5 chars but 6 bytes
        let artifacts = artifacts_with(
            Some(MockTranslator::fixed("héllo")),
            Some(MockVectorizer::new(1)),
            Some(MockClassifier::returning(0)),
        );
        predict(&artifacts, "مرحبا").await.unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Translated 5 chars to 5 chars"), "{output}");
    }

    #[test]
    fn verdict_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Verdict::Fake).unwrap(), "\"FAKE\"");
        assert_eq!(serde_json::to_string(&Verdict::Real).unwrap(), "\"REAL\"");
        assert_eq!(Verdict::from_label(1).to_string(), "FAKE");
    }
}

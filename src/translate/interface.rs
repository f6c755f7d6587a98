use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Request body for the model service's translate endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    #[serde(default)]
    pub translated_text: String,
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Result of a translation attempt.
///
/// `Unavailable` means the model could not serve the request at all, which is
/// distinct from a translation that happens to be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    Translated(String),
    Unavailable,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("translation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("translation service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("translation failed: {0}")]
    Rejected(String),

    #[error("translation model is not ready at {0}")]
    NotReady(String),
}

/// Translator interface - the seq2seq model itself runs in the model service
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate a single text from the configured source language.
    async fn translate(&self, text: &str) -> Result<TranslationOutcome, TranslateError>;

    fn model_name(&self) -> &str;
}

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use super::interface::{TranslateError, TranslateRequest, TranslationOutcome, Translator};
use crate::config::TranslationConfig;
use crate::model_service::{ModelServiceClient, ServiceReply};

/// Translator backed by the model service
pub struct TranslationClient {
    model_service: Arc<ModelServiceClient>,
    model: String,
    source_lang: String,
    target_lang: String,
}

impl TranslationClient {
    pub fn new(model_service: Arc<ModelServiceClient>, config: &TranslationConfig) -> Self {
        Self {
            model_service,
            model: config.model.clone(),
            source_lang: config.source_lang.clone(),
            target_lang: config.target_lang.clone(),
        }
    }

    /// Build the client and make sure the service has the model loaded.
    pub async fn connect(config: &TranslationConfig) -> Result<Self, TranslateError> {
        let model_service = Arc::new(ModelServiceClient::new(
            config.service_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )?);

        if !model_service.health_check().await? {
            return Err(TranslateError::NotReady(model_service.base_url().to_string()));
        }

        info!(
            "Translation model {} reachable at {}",
            config.model,
            model_service.base_url()
        );
        Ok(Self::new(model_service, config))
    }
}

#[async_trait]
impl Translator for TranslationClient {
    async fn translate(&self, text: &str) -> Result<TranslationOutcome, TranslateError> {
        if text.is_empty() {
            return Ok(TranslationOutcome::Translated(String::new()));
        }

        let request = TranslateRequest {
            text: text.to_string(),
            source_lang: self.source_lang.clone(),
            target_lang: self.target_lang.clone(),
            model: self.model.clone(),
        };

        match self.model_service.translate(&request).await? {
            ServiceReply::Translated(response) if response.success => {
                debug!("Translation successful: {} chars", response.translated_text.len());
                Ok(TranslationOutcome::Translated(response.translated_text))
            }
            ServiceReply::Translated(response) => {
                let error_msg = response.error.unwrap_or_else(|| "Unknown error".to_string());
                error!("Translation failed: {}", error_msg);
                Err(TranslateError::Rejected(error_msg))
            }
            ServiceReply::ModelUnavailable => Ok(TranslationOutcome::Unavailable),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

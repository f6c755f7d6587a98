use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::translate::interface::{TranslateError, TranslateRequest, TranslateResponse};

/// HTTP client for the model service that hosts the translation model.
#[derive(Debug, Clone)]
pub struct ModelServiceClient {
    client: Client,
    base_url: String,
}

/// Reply from the translate endpoint once transport errors are ruled out.
#[derive(Debug)]
pub enum ServiceReply {
    Translated(TranslateResponse),
    ModelUnavailable,
}

impl ModelServiceClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, TranslateError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn translate(&self, request: &TranslateRequest) -> Result<ServiceReply, TranslateError> {
        let url = format!("{}/translate", self.base_url);
        debug!("POST {} ({} chars)", url, request.text.chars().count());

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();

        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Ok(ServiceReply::ModelUnavailable);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TranslateError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let result: TranslateResponse = response.json().await?;
        Ok(ServiceReply::Translated(result))
    }

    pub async fn health_check(&self) -> Result<bool, TranslateError> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        Ok(response.status().is_success())
    }
}

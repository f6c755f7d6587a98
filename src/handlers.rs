use axum::{
    body::Bytes,
    extract::State,
    response::Html,
    Json,
};
use serde_json::Value;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::detector::artifacts::ArtifactStatus;
use crate::detector::{pipeline, PredictionResult};
use crate::error::ApiError;
use crate::state::AppState;

/// Renders the main input page.
pub async fn home() -> Html<&'static str> {
    Html(include_str!("../templates/home.html"))
}

/// Classify the Arabic text in `{"text": ...}`.
///
/// The artifact guard runs before the body is parsed, so a degraded process
/// answers every POST with the same error.
pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictionResult>, ApiError> {
    if state.artifacts.ready().is_none() {
        return Err(ApiError::ServiceUnavailable);
    }

    let text = extract_text(&body)?;
    let request_id = Uuid::new_v4();

    let result = pipeline::predict(&state.artifacts, &text)
        .instrument(info_span!("predict", %request_id))
        .await?;

    info!(
        %request_id,
        label = result.prediction_label,
        verdict = %result.prediction_text,
        "Prediction complete"
    );
    Ok(Json(result))
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn health_check(State(state): State<AppState>) -> Json<ArtifactStatus> {
    Json(state.artifacts.status())
}

/// Pull a non-empty `text` string out of a JSON object body.
fn extract_text(body: &[u8]) -> Result<String, ApiError> {
    let payload: Value = serde_json::from_slice(body).map_err(|_| ApiError::InvalidJson)?;
    match payload.get("text") {
        Some(Value::String(text)) if !text.is_empty() => Ok(text.clone()),
        _ => Err(ApiError::MissingText),
    }
}

use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{auth::services::AuthUser, error::ApiError, ocr::extract};

/// Raw text from the client-side recognition pass over the meter photo.
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub extracted_reading: Option<f64>,
    pub suggestions: Vec<f64>,
}

/// POST /ocr/extract — digit-run extraction only; recognition itself runs
/// outside this service.
#[instrument(skip(payload))]
pub async fn extract_reading(
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, ApiError> {
    if payload.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text is required".into()));
    }

    let out = extract::extract_reading(&payload.text);
    debug!(
        user_id = %user_id,
        reading = ?out.reading,
        suggestions = out.suggestions.len(),
        "reading extracted"
    );
    Ok(Json(ExtractResponse {
        extracted_reading: out.reading,
        suggestions: out.suggestions,
    }))
}

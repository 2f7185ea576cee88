use axum::Json;
use tracing::{info, instrument};

use crate::{
    auth::services::AuthUser,
    error::ApiError,
    sheet::parser::{parse_sheet as parse, SheetError, SheetUser},
};

/// POST /sheet/parse — body is the raw CSV export of the legacy spreadsheet;
/// returns the reconstructed per-user monthly readings.
#[instrument(skip(body))]
pub async fn parse_sheet(
    AuthUser(user_id): AuthUser,
    body: String,
) -> Result<Json<Vec<SheetUser>>, ApiError> {
    if body.trim().is_empty() {
        return Err(ApiError::BadRequest("csv body is required".into()));
    }

    let users = parse(&body).map_err(|e: SheetError| ApiError::BadRequest(e.to_string()))?;

    info!(user_id = %user_id, users = users.len(), "sheet parsed");
    Ok(Json(users))
}

use axum::{
    extract::{Multipart, Path, State},
    response::Redirect,
    Json,
};
use bytes::Bytes;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::services::AuthUser,
    bills::{dto::BillResponse, repo_types::Bill},
    error::ApiError,
    photos::services::store_meter_photo,
    state::AppState,
};

const PRESIGN_TTL_SECS: u64 = 600;

/// POST /bills/:id/photo — multipart field `photo`, image/* only.
#[instrument(skip(state, mp))]
pub async fn upload_meter_photo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    mut mp: Multipart,
) -> Result<Json<BillResponse>, ApiError> {
    let bill = Bill::get(&state.db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("bill not found".into()))?;

    let mut upload: Option<(Bytes, String)> = None;
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("photo") {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            upload = Some((data, content_type));
            break;
        }
    }
    let (data, content_type) =
        upload.ok_or_else(|| ApiError::BadRequest("photo field is required".into()))?;

    let key = store_meter_photo(&state, user_id, id, data, &content_type).await?;

    let updated = Bill::set_photo_key(&state.db, user_id, id, &key)
        .await?
        .ok_or_else(|| ApiError::NotFound("bill not found".into()))?;

    // The row now points at the new object; the replaced one is an orphan.
    if let Some(old_key) = &bill.photo_key {
        if let Err(e) = state.storage.delete_object(old_key).await {
            warn!(error = %e, key = %old_key, "failed to delete replaced photo");
        }
    }

    info!(user_id = %user_id, bill_id = %id, key = %key, "meter photo attached");
    Ok(Json(updated.into()))
}

/// GET /bills/:id/photo — 302 to a short-lived presigned URL.
#[instrument(skip(state))]
pub async fn get_meter_photo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Redirect, ApiError> {
    let bill = Bill::get(&state.db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("bill not found".into()))?;

    let key = bill
        .photo_key
        .ok_or_else(|| ApiError::NotFound("no photo for this bill".into()))?;

    let url = state.storage.presign_get(&key, PRESIGN_TTL_SECS).await?;
    Ok(Redirect::temporary(&url))
}

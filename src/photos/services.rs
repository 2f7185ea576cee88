use bytes::Bytes;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Upload one meter photo and return its object key.
pub async fn store_meter_photo(
    st: &AppState,
    user_id: Uuid,
    bill_id: Uuid,
    body: Bytes,
    content_type: &str,
) -> Result<String, ApiError> {
    if !content_type.starts_with("image/") {
        return Err(ApiError::BadRequest(
            "only image uploads are accepted".into(),
        ));
    }
    if body.is_empty() {
        return Err(ApiError::BadRequest("empty photo upload".into()));
    }

    let ext = ext_from_mime(content_type).unwrap_or("bin");
    let key = format!("meters/{}/{}-{}.{}", user_id, bill_id, Uuid::new_v4(), ext);
    st.storage.put_object(&key, body, content_type).await?;
    Ok(key)
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ext_from_mime() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(ext_from_mime("image/heic"), Some("heic"));
        assert_eq!(ext_from_mime("application/octet-stream"), None);
    }

    #[tokio::test]
    async fn store_rejects_non_image() {
        let state = AppState::fake();
        let err = store_meter_photo(
            &state,
            Uuid::new_v4(),
            Uuid::new_v4(),
            Bytes::from_static(b"data"),
            "application/pdf",
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn store_builds_namespaced_key() {
        let state = AppState::fake();
        let user_id = Uuid::new_v4();
        let bill_id = Uuid::new_v4();
        let key = store_meter_photo(
            &state,
            user_id,
            bill_id,
            Bytes::from_static(b"jpegdata"),
            "image/jpeg",
        )
        .await
        .unwrap();
        assert!(key.starts_with(&format!("meters/{}/{}-", user_id, bill_id)));
        assert!(key.ends_with(".jpg"));

        let url = state.storage.presign_get(&key, 600).await.unwrap();
        assert!(url.contains(&key));
    }
}

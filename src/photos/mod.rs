use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, routing::get, Router};

pub mod handlers;
pub mod services;

/// 5 MB cap on meter photo uploads.
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/bills/:id/photo",
            get(handlers::get_meter_photo).post(handlers::upload_meter_photo),
        )
        .layer(DefaultBodyLimit::max(MAX_PHOTO_BYTES))
}

use crate::state::AppState;
use axum::{routing::post, Router};

pub mod extract;
pub mod handlers;

pub fn router() -> Router<AppState> {
    Router::new().route("/ocr/extract", post(handlers::extract_reading))
}

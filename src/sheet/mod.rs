use crate::state::AppState;
use axum::{routing::post, Router};

pub mod handlers;
pub mod parser;

pub fn router() -> Router<AppState> {
    Router::new().route("/sheet/parse", post(handlers::parse_sheet))
}

use std::sync::Arc;

use axum::{routing::get, Router};

use selection_cell::router::selection_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Care provider selection API is running!" }))
        .merge(selection_routes(state))
}

use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn selection_routes(state: Arc<AppConfig>) -> Router {
    // Authentication is optional on this endpoint; the handler resolves the
    // bearer token itself when one is present.
    Router::new()
        .route(
            "/care_provider_selection",
            get(handlers::care_provider_selection),
        )
        .with_state(state)
}

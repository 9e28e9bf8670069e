//! Router construction and shared application state.

use std::sync::Arc;

use axum::{http::StatusCode, middleware as axum_middleware, response::Html, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::enrich_request;
use crate::pipeline::Enricher;

/// Shared, immutable per-process state. Resolvers hold only their decision
/// tables, so cloning the `Arc` is all concurrency discipline required.
#[derive(Debug, Default)]
pub struct AppState {
    pub enricher: Enricher,
}

/// Build the application router with the enrichment middleware in front of
/// every route.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(page_handler)
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&state),
            enrich_request,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Placeholder downstream content handler. The product's page rendering
/// lives behind this; the pipeline treats it as an opaque downstream call.
async fn page_handler() -> (StatusCode, Html<&'static str>) {
    (StatusCode::OK, Html("<!doctype html><title>ok</title>"))
}

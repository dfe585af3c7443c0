//! Verto Catalog Service library.
//!
//! This crate provides the catalog HTTP service as a library, allowing it to
//! be tested in-process and embedded by the integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the full application router.
///
/// Layers, innermost first: request id, request tracing, CORS.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::routes())
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        // The storefront UI is served from a different origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}

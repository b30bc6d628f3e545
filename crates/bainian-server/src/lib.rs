//! HTTP server for the bainian reply assistant.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod services;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{Request, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

pub use state::AppState;

/// Builds the full application router.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                id = %Uuid::new_v4(),
                method = %req.method(),
                uri = %req.uri(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route(
            "/api/generate",
            post(handlers::generate::generate).layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
        .route("/api/models", get(handlers::models::list))
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .merge(bainian_web::router())
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

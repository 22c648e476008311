//! HTTP surface of the marketplace.
//!
//! Handlers are thin: they parse input with the extractors in [`extract`],
//! call one service on [`AppState`] and wrap the result in the JSON
//! envelopes from [`envelope`]. Every failure becomes an [`ApiError`]
//! with a `{ "success": false, "error": ... }` body.

pub mod envelope;
pub mod error;
pub mod extract;
mod routes;
pub mod state;
pub mod views;

pub use error::{ApiError, ApiResult};
pub use state::{AppState, Outbound, Repositories};

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Builds the application router with tracing and permissive CORS.
pub fn router(state: AppState) -> Router {
    routes::api()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

//! Route tables per resource.

mod agents;
mod chat;
mod execute;
mod jobs;
mod logs;
mod marketplace;
mod skills;
mod wallet;

use super::state::AppState;
use axum::{Json, Router, routing::get};
use chrono::Utc;
use serde_json::{Value, json};

/// Builds the `/api/v1` tree plus `/health`, without middleware.
pub fn api() -> Router<AppState> {
    let v1 = Router::new()
        .nest("/agents", agents::routes())
        .nest("/skills", skills::routes())
        .nest("/jobs", jobs::routes())
        .nest("/chat", chat::routes())
        .nest("/logs", logs::routes())
        .nest("/marketplace", marketplace::routes())
        .nest("/wallet", wallet::routes())
        .nest("/execute", execute::routes());
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", v1)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "timestamp": Utc::now() }))
}

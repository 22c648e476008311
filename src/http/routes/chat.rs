//! `/api/v1/chat`: the shared chat room.

use crate::chat::domain::ChatMessageId;
use crate::http::{
    envelope::{counted, lenient_u32, parse_instant},
    error::ApiResult,
    extract::{Authenticated, ValidJson},
    state::AppState,
};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};

/// Routes mounted under `/api/v1/chat`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(send).get(history))
        .route("/recent", get(recent))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendBody {
    content: String,
    #[serde(default)]
    reply_to_id: Option<ChatMessageId>,
}

async fn send(
    State(state): State<AppState>,
    Authenticated(agent): Authenticated,
    ValidJson(body): ValidJson<SendBody>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let message = state
        .chat
        .post(&agent, body.content, body.reply_to_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": message })),
    ))
}

#[derive(Debug, Default, Deserialize)]
struct HistoryQuery {
    limit: Option<String>,
    before: Option<String>,
}

async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Value>> {
    let before = parse_instant("before", query.before.as_deref())?;
    let messages = state
        .chat
        .history(before, lenient_u32(query.limit.as_deref()))
        .await?;
    Ok(Json(counted("messages", &messages)?))
}

#[derive(Debug, Default, Deserialize)]
struct RecentQuery {
    limit: Option<String>,
    after: Option<String>,
}

async fn recent(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> ApiResult<Json<Value>> {
    let after = parse_instant("after", query.after.as_deref())?;
    let messages = state
        .chat
        .recent(after, lenient_u32(query.limit.as_deref()))
        .await?;
    Ok(Json(counted("messages", &messages)?))
}

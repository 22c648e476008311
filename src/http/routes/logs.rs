//! `/api/v1/logs`: the public activity log.

use crate::activity::{
    domain::{LogFilter, LogLevel},
    services::NewLogEntry,
};
use crate::agent::domain::AgentId;
use crate::http::{
    envelope::{PageParams, counted, lenient_u32, paginated, parse_instant},
    error::{ApiError, ApiResult},
    extract::{Authenticated, ValidJson},
    state::AppState,
};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};

const LIST_DEFAULT_LIMIT: u32 = 100;

/// Routes mounted under `/api/v1/logs`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/recent", get(recent))
        .route("/stats/overview", get(stats))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    #[serde(flatten)]
    page: PageParams,
    level: Option<String>,
    source: Option<String>,
    agent_id: Option<AgentId>,
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Value>> {
    let level = query
        .level
        .as_deref()
        .map(LogLevel::try_from)
        .transpose()
        .map_err(ApiError::invalid_input)?;
    let filter = LogFilter {
        level,
        source: query.source.filter(|text| !text.trim().is_empty()),
        agent_id: query.agent_id,
    };
    let page = state
        .journal
        .list(&filter, query.page.request(LIST_DEFAULT_LIMIT))
        .await?;
    Ok(Json(paginated("logs", &page)?))
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
    let logs = state
        .journal
        .recent(after, lenient_u32(query.limit.as_deref()))
        .await?;
    Ok(Json(counted("logs", &logs)?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBody {
    #[serde(default)]
    level: LogLevel,
    message: String,
    #[serde(default)]
    metadata: Option<Value>,
}

async fn create(
    State(state): State<AppState>,
    Authenticated(agent): Authenticated,
    ValidJson(body): ValidJson<CreateBody>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let metadata = body.metadata.map(|value| match value {
        Value::String(text) => text,
        other => other.to_string(),
    });
    let log = state
        .journal
        .record(
            &agent,
            NewLogEntry {
                level: body.level,
                message: body.message,
                metadata,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "log": log })),
    ))
}

async fn stats(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let stats = state.journal.stats().await?;
    Ok(Json(json!({
        "success": true,
        "stats": {
            "total": stats.total,
            "errors": stats.errors,
            "today": stats.last_24h,
            "levels": stats.levels,
        },
    })))
}

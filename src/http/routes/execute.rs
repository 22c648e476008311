//! `/api/v1/execute`: the platform's built-in executable skills.
//!
//! Handlers are stateless apart from the scrape rate limiter. Each response
//! flattens the skill output next to `success: true`.

use crate::forecast::{ForecastRequest, forecast};
use crate::http::{
    envelope::flattened,
    error::ApiResult,
    extract::{ClientAddress, ValidJson},
    state::AppState,
};
use crate::skill_runtime::domain::{
    ScrapeRequest, SlackRequest, SlackTemplate, TransformRequest, TxAnalysisRequest, transform,
};
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};

/// Routes mounted under `/api/v1/execute`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analyze-text", post(analyze_text))
        .route("/transform", post(transform_data))
        .route("/scrape", post(scrape))
        .route("/slack", post(notify_slack))
        .route("/slack/templates", get(slack_templates))
        .route("/analyze-tx", post(analyze_tx))
        .route("/forecast", post(forecast_series))
}

#[derive(Debug, Deserialize)]
struct AnalyzeTextBody {
    text: String,
}

async fn analyze_text(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<AnalyzeTextBody>,
) -> ApiResult<Json<Value>> {
    let analysis = state.text.analyze(body.text).await?;
    Ok(Json(flattened(&analysis)?))
}

async fn transform_data(ValidJson(request): ValidJson<TransformRequest>) -> ApiResult<Json<Value>> {
    let outcome = transform(request)?;
    Ok(Json(flattened(&outcome)?))
}

async fn scrape(
    State(state): State<AppState>,
    ClientAddress(client): ClientAddress,
    ValidJson(request): ValidJson<ScrapeRequest>,
) -> ApiResult<Json<Value>> {
    let result = state.scraper.scrape(&client, request).await?;
    Ok(Json(flattened(&result)?))
}

async fn notify_slack(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<SlackRequest>,
) -> ApiResult<Json<Value>> {
    let delivery = state.slack.notify(request).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Notification sent successfully",
        "messageId": delivery.message_id,
        "threadTs": delivery.thread_ts,
    })))
}

async fn slack_templates() -> Json<Value> {
    Json(json!({ "success": true, "templates": SlackTemplate::catalogue() }))
}

async fn analyze_tx(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<TxAnalysisRequest>,
) -> ApiResult<Json<Value>> {
    let report = state.transactions.analyze(request).await?;
    Ok(Json(flattened(&report)?))
}

async fn forecast_series(ValidJson(request): ValidJson<ForecastRequest>) -> ApiResult<Json<Value>> {
    let report = forecast(request)?;
    Ok(Json(flattened(&report)?))
}

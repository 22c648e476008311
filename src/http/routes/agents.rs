//! `/api/v1/agents`: registration, claiming and profiles.

use crate::agent::{
    domain::AgentId,
    services::{ProfileUpdate, RegisterAgentRequest},
};
use crate::http::{
    envelope::{PageParams, paginated},
    error::ApiResult,
    extract::{Authenticated, ValidJson, ValidPath},
    state::AppState,
    views::{AgentListItem, AgentStatusView, AgentSummary, OwnProfile, PublicProfile},
};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use serde::Deserialize;
use serde_json::{Value, json};

const LIST_DEFAULT_LIMIT: u32 = 20;

/// Routes mounted under `/api/v1/agents`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/register", post(register))
        .route("/claim/{token}", post(claim))
        .route("/status", get(status))
        .route("/me/profile", get(own_profile))
        .route("/me", patch(update_me))
        .route("/{id}", get(public_profile))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterBody {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

async fn register(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<RegisterBody>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let registered = state
        .agents
        .register(RegisterAgentRequest {
            name: body.name,
            description: body.description,
            email: body.email,
        })
        .await?;
    let agent = &registered.agent;
    let code = agent.verification_code().as_str();
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "agent": AgentSummary::from(agent),
            "apiKey": registered.api_key.expose(),
            "claimUrl": registered.claim_url,
            "verificationCode": code,
            "message": "Agent registered. Save your API key now; it is shown only once.",
            "instructions": [
                "1. Store the apiKey securely",
                format!("2. Ask your human to open {}", registered.claim_url),
                format!("3. They post on X including the code {code}"),
                "4. Once claimed, your agent appears in the public directory",
            ],
        })),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClaimBody {
    x_handle: String,
    #[serde(default)]
    tweet_url: Option<String>,
}

async fn claim(
    State(state): State<AppState>,
    ValidPath(token): ValidPath<String>,
    ValidJson(body): ValidJson<ClaimBody>,
) -> ApiResult<Json<Value>> {
    let agent = state
        .agents
        .claim(&token, &body.x_handle, body.tweet_url)
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Agent {} claimed successfully", agent.name()),
        "agent": AgentListItem::from(&agent),
    })))
}

async fn status(
    State(state): State<AppState>,
    Authenticated(agent): Authenticated,
) -> Json<Value> {
    let claim_url = state.agents.claim_url(&agent);
    Json(json!({
        "success": true,
        "agent": AgentStatusView::new(&agent, claim_url),
    }))
}

async fn own_profile(
    State(state): State<AppState>,
    Authenticated(agent): Authenticated,
) -> ApiResult<Json<Value>> {
    let skills = state.skills.list_for_agent(agent.id()).await?;
    let claim_url = state.agents.claim_url(&agent);
    Ok(Json(json!({
        "success": true,
        "agent": OwnProfile::new(&agent, claim_url, &skills),
    })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBody {
    #[serde(default)]
    description: Option<String>,
    #[serde(default, alias = "avatarUrl")]
    avatar: Option<String>,
    #[serde(default, alias = "websiteUrl")]
    website: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

async fn update_me(
    State(state): State<AppState>,
    Authenticated(agent): Authenticated,
    ValidJson(body): ValidJson<UpdateBody>,
) -> ApiResult<Json<Value>> {
    let updated = state
        .agents
        .update_profile(
            agent.id(),
            ProfileUpdate {
                description: body.description,
                avatar_url: body.avatar,
                website_url: body.website,
                email: body.email,
            },
        )
        .await?;
    let skills = state.skills.list_for_agent(updated.id()).await?;
    let claim_url = state.agents.claim_url(&updated);
    Ok(Json(json!({
        "success": true,
        "agent": OwnProfile::new(&updated, claim_url, &skills),
    })))
}

async fn public_profile(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<AgentId>,
) -> ApiResult<Json<Value>> {
    let agent = state.agents.require(id).await?;
    let skills = state.skills.list_for_agent(id).await?;
    Ok(Json(json!({
        "success": true,
        "agent": PublicProfile::new(&agent, &skills),
    })))
}

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    #[serde(flatten)]
    page: PageParams,
    search: Option<String>,
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Value>> {
    let page = state
        .agents
        .list_claimed(query.search.as_deref(), query.page.request(LIST_DEFAULT_LIMIT))
        .await?
        .map(|agent| AgentListItem::from(&agent));
    Ok(Json(paginated("agents", &page)?))
}

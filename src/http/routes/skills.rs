//! `/api/v1/skills`: the skill catalogue.

use crate::http::{
    envelope::{PageParams, paginated},
    error::{ApiError, ApiResult},
    extract::{Authenticated, ValidJson, ValidPath},
    state::AppState,
};
use crate::skill::{
    domain::{EndpointMethod, PricingModel, SkillCategory, SkillFilter, SkillId},
    services::{EndpointRequest, PricingRequest, PublishSkillRequest, UpdateSkillRequest},
};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};

const LIST_DEFAULT_LIMIT: u32 = 20;

/// Routes mounted under `/api/v1/skills`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(publish).get(list))
        .route("/me/list", get(mine))
        .route("/{id}", get(show).patch(update).delete(remove))
        .route("/{id}/endpoints", post(add_endpoint))
        .route("/{id}/use", post(record_use))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PricingBody {
    #[serde(default)]
    price_cents: u64,
    #[serde(default)]
    currency: Option<String>,
    model: PricingModel,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishBody {
    name: String,
    #[serde(default)]
    version: Option<String>,
    description: String,
    category: SkillCategory,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    api_endpoint: Option<String>,
    #[serde(default)]
    repo_url: Option<String>,
    #[serde(default)]
    documentation: Option<String>,
    #[serde(default)]
    pricing: Option<PricingBody>,
}

async fn publish(
    State(state): State<AppState>,
    Authenticated(agent): Authenticated,
    ValidJson(body): ValidJson<PublishBody>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let request = PublishSkillRequest {
        name: body.name,
        version: body.version,
        description: body.description,
        category: body.category,
        tags: body.tags,
        api_endpoint: body.api_endpoint,
        repo_url: body.repo_url,
        documentation: body.documentation,
        pricing: body.pricing.map(|pricing| PricingRequest {
            price_cents: pricing.price_cents,
            currency: pricing.currency,
            model: pricing.model,
        }),
    };
    let skill = state.skills.publish(&agent, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "skill": skill,
            "message": "Skill published successfully!",
        })),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EndpointBody {
    path: String,
    method: EndpointMethod,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Option<Value>,
}

async fn add_endpoint(
    State(state): State<AppState>,
    Authenticated(agent): Authenticated,
    ValidPath(id): ValidPath<SkillId>,
    ValidJson(body): ValidJson<EndpointBody>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let parameters = body.parameters.map(|schema| match schema {
        Value::String(text) => text,
        other => other.to_string(),
    });
    let endpoint = state
        .skills
        .add_endpoint(
            agent.id(),
            id,
            EndpointRequest {
                path: body.path,
                method: body.method,
                description: body.description,
                parameters,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "endpoint": endpoint })),
    ))
}

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    #[serde(flatten)]
    page: PageParams,
    category: Option<String>,
    search: Option<String>,
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Value>> {
    let category = query
        .category
        .as_deref()
        .map(SkillCategory::try_from)
        .transpose()
        .map_err(ApiError::invalid_input)?;
    let filter = SkillFilter {
        category,
        search: query.search.filter(|text| !text.trim().is_empty()),
    };
    let page = state
        .skills
        .list_published(&filter, query.page.request(LIST_DEFAULT_LIMIT))
        .await?;
    Ok(Json(paginated("skills", &page)?))
}

async fn show(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<SkillId>,
) -> ApiResult<Json<Value>> {
    let skill = state.skills.find(id).await?;
    Ok(Json(json!({ "success": true, "skill": skill })))
}

async fn mine(
    State(state): State<AppState>,
    Authenticated(agent): Authenticated,
) -> ApiResult<Json<Value>> {
    let skills = state.skills.list_for_agent(agent.id()).await?;
    Ok(Json(json!({ "success": true, "skills": skills })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBody {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    is_published: Option<bool>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    documentation: Option<String>,
    #[serde(default)]
    api_endpoint: Option<String>,
}

async fn update(
    State(state): State<AppState>,
    Authenticated(agent): Authenticated,
    ValidPath(id): ValidPath<SkillId>,
    ValidJson(body): ValidJson<UpdateBody>,
) -> ApiResult<Json<Value>> {
    let skill = state
        .skills
        .update(
            agent.id(),
            id,
            UpdateSkillRequest {
                description: body.description,
                is_published: body.is_published,
                version: body.version,
                documentation: body.documentation,
                api_endpoint: body.api_endpoint,
            },
        )
        .await?;
    Ok(Json(json!({ "success": true, "skill": skill })))
}

async fn remove(
    State(state): State<AppState>,
    Authenticated(agent): Authenticated,
    ValidPath(id): ValidPath<SkillId>,
) -> ApiResult<Json<Value>> {
    state.skills.delete(agent.id(), id).await?;
    Ok(Json(json!({ "success": true, "message": "Skill deleted" })))
}

async fn record_use(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<SkillId>,
) -> ApiResult<Json<Value>> {
    state.skills.record_use(id).await?;
    Ok(Json(json!({ "success": true })))
}

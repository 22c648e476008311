//! `/api/v1/jobs`: the job board.

use crate::http::{
    envelope::{PageParams, paginated},
    error::{ApiError, ApiResult},
    extract::{Authenticated, ValidJson, ValidPath},
    state::AppState,
};
use crate::job::{
    domain::{JobFilter, JobId, JobRole, JobStatus, JobType},
    services::PostJobRequest,
};
use crate::skill::domain::SkillCategory;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};

const LIST_DEFAULT_LIMIT: u32 = 20;
const ANY_STATUS: &str = "all";

/// Routes mounted under `/api/v1/jobs`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(post_job).get(list))
        .route("/me/list", get(mine))
        .route("/{id}", get(show))
        .route("/{id}/accept", post(accept))
        .route("/{id}/complete", post(complete))
        .route("/{id}/cancel", post(cancel))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostJobBody {
    title: String,
    description: String,
    #[serde(rename = "type")]
    job_type: JobType,
    category: SkillCategory,
    #[serde(default)]
    requirements: Option<String>,
    #[serde(default)]
    budget: Option<String>,
}

async fn post_job(
    State(state): State<AppState>,
    Authenticated(agent): Authenticated,
    ValidJson(body): ValidJson<PostJobBody>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let job = state
        .jobs
        .post(
            &agent,
            PostJobRequest {
                title: body.title,
                description: body.description,
                job_type: body.job_type,
                category: body.category,
                requirements: body.requirements,
                budget: body.budget,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "job": job })),
    ))
}

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    #[serde(flatten)]
    page: PageParams,
    status: Option<String>,
    category: Option<String>,
    #[serde(rename = "type")]
    job_type: Option<String>,
}

impl ListQuery {
    fn filter(&self) -> ApiResult<JobFilter> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => Some(JobStatus::Open),
            Some(value) if value.eq_ignore_ascii_case(ANY_STATUS) => None,
            Some(value) => Some(JobStatus::try_from(value).map_err(ApiError::invalid_input)?),
        };
        let category = self
            .category
            .as_deref()
            .map(SkillCategory::try_from)
            .transpose()
            .map_err(ApiError::invalid_input)?;
        let job_type = self
            .job_type
            .as_deref()
            .map(JobType::try_from)
            .transpose()
            .map_err(ApiError::invalid_input)?;
        Ok(JobFilter {
            status,
            category,
            job_type,
        })
    }
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Value>> {
    let filter = query.filter()?;
    let page = state
        .jobs
        .list(&filter, query.page.request(LIST_DEFAULT_LIMIT))
        .await?;
    Ok(Json(paginated("jobs", &page)?))
}

async fn show(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<JobId>,
) -> ApiResult<Json<Value>> {
    let job = state.jobs.get(id).await?;
    Ok(Json(json!({ "success": true, "job": job })))
}

async fn accept(
    State(state): State<AppState>,
    Authenticated(agent): Authenticated,
    ValidPath(id): ValidPath<JobId>,
) -> ApiResult<Json<Value>> {
    let job = state.jobs.accept(&agent, id).await?;
    Ok(Json(json!({ "success": true, "job": job })))
}

async fn complete(
    State(state): State<AppState>,
    Authenticated(agent): Authenticated,
    ValidPath(id): ValidPath<JobId>,
) -> ApiResult<Json<Value>> {
    let job = state.jobs.complete(&agent, id).await?;
    Ok(Json(json!({ "success": true, "job": job })))
}

async fn cancel(
    State(state): State<AppState>,
    Authenticated(agent): Authenticated,
    ValidPath(id): ValidPath<JobId>,
) -> ApiResult<Json<Value>> {
    let job = state.jobs.cancel(&agent, id).await?;
    Ok(Json(json!({ "success": true, "job": job })))
}

#[derive(Debug, Default, Deserialize)]
struct MineQuery {
    #[serde(rename = "type")]
    role: Option<String>,
}

async fn mine(
    State(state): State<AppState>,
    Authenticated(agent): Authenticated,
    Query(query): Query<MineQuery>,
) -> ApiResult<Json<Value>> {
    let role = query
        .role
        .as_deref()
        .map(JobRole::try_from)
        .transpose()
        .map_err(ApiError::invalid_input)?
        .unwrap_or_default();
    let jobs = state.jobs.mine(agent.id(), role).await?;
    Ok(Json(json!({ "success": true, "jobs": jobs })))
}

//! `/api/v1/marketplace`: purchases, access checks and reviews.

use crate::http::{
    envelope::{PageParams, paginated},
    error::ApiResult,
    extract::{Authenticated, ValidJson, ValidPath},
    state::AppState,
};
use crate::marketplace::{
    domain::LicenseType,
    services::{PurchaseRequest, PurchaseVerification, REVIEWS_DEFAULT_LIMIT, ReviewRequest},
};
use crate::skill::domain::SkillId;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};

/// Routes mounted under `/api/v1/marketplace`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/purchase", post(purchase))
        .route("/my-purchases", get(my_purchases))
        .route("/verify/{skill_id}", get(verify))
        .route("/review", post(review))
        .route("/reviews/{skill_id}", get(reviews))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PurchaseBody {
    skill_id: SkillId,
    #[serde(default)]
    license_type: LicenseType,
    tx_hash: String,
}

async fn purchase(
    State(state): State<AppState>,
    Authenticated(agent): Authenticated,
    ValidJson(body): ValidJson<PurchaseBody>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let purchase = state
        .marketplace
        .purchase(
            &agent,
            PurchaseRequest {
                skill_id: body.skill_id,
                license_type: body.license_type,
                tx_hash: body.tx_hash,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "purchase": purchase })),
    ))
}

async fn my_purchases(
    State(state): State<AppState>,
    Authenticated(agent): Authenticated,
) -> ApiResult<Json<Value>> {
    let purchases = state.marketplace.my_purchases(agent.id()).await?;
    Ok(Json(json!({ "success": true, "purchases": purchases })))
}

async fn verify(
    State(state): State<AppState>,
    Authenticated(agent): Authenticated,
    ValidPath(skill_id): ValidPath<SkillId>,
) -> ApiResult<Json<Value>> {
    let body = match state.marketplace.verify(agent.id(), skill_id).await? {
        PurchaseVerification::Valid(purchase) => json!({
            "success": true,
            "valid": true,
            "purchase": {
                "id": purchase.id(),
                "expiresAt": purchase.expires_at(),
                "currentUsage": purchase.current_usage(),
                "usageLimit": purchase.usage_limit(),
            },
        }),
        PurchaseVerification::Denied(denial) => json!({
            "success": true,
            "valid": false,
            "message": denial.message(),
        }),
    };
    Ok(Json(body))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewBody {
    skill_id: SkillId,
    rating: i64,
    #[serde(default)]
    comment: Option<String>,
}

async fn review(
    State(state): State<AppState>,
    Authenticated(agent): Authenticated,
    ValidJson(body): ValidJson<ReviewBody>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let review = state
        .marketplace
        .review(
            &agent,
            ReviewRequest {
                skill_id: body.skill_id,
                rating: body.rating,
                comment: body.comment,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "review": review })),
    ))
}

async fn reviews(
    State(state): State<AppState>,
    ValidPath(skill_id): ValidPath<SkillId>,
    Query(query): Query<PageParams>,
) -> ApiResult<Json<Value>> {
    let page = state
        .marketplace
        .reviews(skill_id, query.request(REVIEWS_DEFAULT_LIMIT))
        .await?;
    Ok(Json(paginated("reviews", &page)?))
}

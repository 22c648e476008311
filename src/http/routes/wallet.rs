//! `/api/v1/wallet`: linking an EVM wallet to the calling agent.

use crate::agent::services::ConnectWalletRequest;
use crate::http::{
    error::ApiResult,
    extract::{Authenticated, ValidJson},
    state::AppState,
};
use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};

/// Routes mounted under `/api/v1/wallet`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/connect", post(connect))
        .route("/me", get(me))
        .route("/disconnect", delete(disconnect))
        .route("/nonce", post(nonce))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectBody {
    wallet_address: String,
    #[serde(default)]
    chain_id: Option<u64>,
}

async fn connect(
    State(state): State<AppState>,
    Authenticated(agent): Authenticated,
    ValidJson(body): ValidJson<ConnectBody>,
) -> ApiResult<Json<Value>> {
    let wallet = state
        .wallets
        .connect(
            &agent,
            ConnectWalletRequest {
                wallet_address: body.wallet_address,
                chain_id: body.chain_id,
            },
        )
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Wallet connected successfully",
        "wallet": { "address": wallet.address(), "chainId": wallet.chain_id() },
    })))
}

async fn me(
    State(state): State<AppState>,
    Authenticated(agent): Authenticated,
) -> ApiResult<Json<Value>> {
    let overview = state.wallets.overview(agent.id()).await?;
    let wallet = &overview.wallet;
    Ok(Json(json!({
        "success": true,
        "wallet": {
            "address": wallet.address(),
            "chainId": wallet.chain_id(),
            "connectedAt": wallet.connected_at(),
            "onChainBalance": overview.on_chain_balance,
        },
    })))
}

async fn disconnect(
    State(state): State<AppState>,
    Authenticated(agent): Authenticated,
) -> ApiResult<Json<Value>> {
    state.wallets.disconnect(&agent).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Wallet disconnected successfully",
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NonceBody {
    wallet_address: String,
}

async fn nonce(
    State(state): State<AppState>,
    Authenticated(agent): Authenticated,
    ValidJson(body): ValidJson<NonceBody>,
) -> ApiResult<Json<Value>> {
    let challenge = state.wallets.challenge(&agent, &body.wallet_address)?;
    Ok(Json(json!({
        "success": true,
        "nonce": challenge.nonce,
        "message": challenge.message,
    })))
}

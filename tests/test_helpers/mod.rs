//! Shared wiring for integration tests: in-memory stores and outbound
//! clients that never leave the process.

use async_trait::async_trait;
use clawos::http::{AppState, Outbound, Repositories};
use clawos::skill_runtime::{
    domain::{Chain, EvmTransaction, SolanaTransaction},
    ports::{
        ChainRpc, FetchedPage, OutboundError, OutboundResult, PageFetcher, WebhookPoster,
        WebhookReply,
    },
};
use mockable::DefaultClock;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use url::Url;

/// Public URL used in claim links.
pub const APP_URL: &str = "https://clawos.test";

/// Outbound client that fails every call, for tests that must not touch
/// the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

#[async_trait]
impl PageFetcher for Offline {
    async fn fetch(
        &self,
        _url: &Url,
        _headers: &BTreeMap<String, String>,
    ) -> OutboundResult<FetchedPage> {
        Err(OutboundError::invalid_response("offline"))
    }
}

#[async_trait]
impl WebhookPoster for Offline {
    async fn post_json(&self, _url: &Url, _payload: &Value) -> OutboundResult<WebhookReply> {
        Err(OutboundError::invalid_response("offline"))
    }
}

#[async_trait]
impl ChainRpc for Offline {
    async fn solana_transaction(
        &self,
        _signature: &str,
    ) -> OutboundResult<Option<SolanaTransaction>> {
        Ok(None)
    }

    async fn evm_transaction(
        &self,
        _chain: Chain,
        _hash: &str,
    ) -> OutboundResult<Option<EvmTransaction>> {
        Ok(None)
    }

    async fn erc20_balance(
        &self,
        _chain: Chain,
        _token: &str,
        _holder: &str,
    ) -> OutboundResult<u128> {
        Err(OutboundError::invalid_response("offline"))
    }
}

/// Outbound set with no remote completion backend.
pub fn offline_outbound() -> Outbound {
    Outbound {
        pages: Arc::new(Offline),
        webhooks: Arc::new(Offline),
        chain: Arc::new(Offline),
        completion: None,
    }
}

/// Application state over fresh in-memory stores.
pub fn in_memory_state() -> AppState {
    AppState::new(
        Repositories::in_memory(),
        offline_outbound(),
        APP_URL,
        Arc::new(DefaultClock),
    )
    .expect("local analyser patterns compile")
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

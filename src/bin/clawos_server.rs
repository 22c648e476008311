//! Serves the ClawOS marketplace API.
//!
//! Uses `PostgreSQL` when `DATABASE_URL` is set and in-memory stores
//! otherwise. Apply `migrations/` with the Diesel CLI before the first
//! start against a new database.

use anyhow::Context;
use clap::Parser;
use clawos::config::ServerConfig;
use clawos::http::{self, AppState, Outbound, Repositories};
use clawos::persistence::build_pool;
use clawos::skill_runtime::{
    adapters::{
        chain_rpc::JsonRpcChainClient, http::ReqwestHttp, http::build_client,
        openai::OpenAiCompletionClient,
    },
    ports::CompletionClient,
};
use mockable::DefaultClock;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::parse();

    let repositories = match config.database_url.as_deref() {
        Some(url) => {
            let pool = build_pool(url, config.pool_size).context("connect to PostgreSQL")?;
            info!(pool_size = config.pool_size, "using PostgreSQL stores");
            Repositories::postgres(&pool)
        }
        None => {
            warn!("DATABASE_URL not set; data lives in memory only");
            Repositories::in_memory()
        }
    };

    let client = build_client().context("build HTTP client")?;
    let web = Arc::new(ReqwestHttp::new(client.clone()));
    let completion = match config.openai_api_key.clone() {
        Some(key) => {
            let openai = OpenAiCompletionClient::new(client.clone(), key, &config.openai_base_url)
                .context("configure OpenAI client")?;
            Some(Arc::new(openai) as Arc<dyn CompletionClient>)
        }
        None => {
            info!("OPENAI_API_KEY not set; text analysis runs locally");
            None
        }
    };
    let outbound = Outbound {
        pages: web.clone(),
        webhooks: web,
        chain: Arc::new(JsonRpcChainClient::new(client, config.chain_endpoints())),
        completion,
    };

    let state = AppState::new(
        repositories,
        outbound,
        &config.app_url,
        Arc::new(DefaultClock),
    )
    .context("initialise services")?
    .with_trusted_proxy(config.trust_proxy);
    if config.trust_proxy {
        info!("client addresses taken from X-Forwarded-For");
    }
    let app = http::router(state);

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("bind {}", config.listen))?;
    info!(address = %config.listen, "listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("serve")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

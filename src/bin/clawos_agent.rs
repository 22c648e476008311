//! Runs a ClawOS agent: registers once, then heartbeats until interrupted.

use anyhow::{Context, bail};
use clap::Parser;
use clawos::config::{RunOptions, RunnerCommand, RunnerConfig};
use clawos::runner::{AgentSession, HttpMarketplaceApi, MarketplaceApi, SessionOptions, StateStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const CLAIM_PAUSE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = RunnerConfig::parse();
    let store = match config.state_file.clone() {
        Some(path) => StateStore::at(path),
        None => StateStore::default_location()?,
    };
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("build HTTP client")?;
    let api = Arc::new(HttpMarketplaceApi::new(client, &config.api_url));

    match config.command {
        RunnerCommand::Run(options) => run(api, &store, options).await,
        RunnerCommand::Status => status(api.as_ref(), &store).await,
    }
}

async fn run(
    api: Arc<HttpMarketplaceApi>,
    store: &StateStore,
    options: RunOptions,
) -> anyhow::Result<()> {
    let interval = options.heartbeat_interval();
    let profile = options.profile().context("load runner config")?;
    let session_options = SessionOptions {
        auto_accept: options.auto_accept,
        jobs: profile.job_preferences.clone(),
    };
    let (session, registration) = AgentSession::start(
        api,
        store,
        profile.name.clone(),
        profile.description(),
        options.force_register,
        session_options,
    )
    .await
    .context("start agent session")?;

    if let Some(fresh) = registration {
        info!(
            name = %fresh.name,
            claim_url = %fresh.claim_url,
            verification_code = %fresh.verification_code,
            state_file = %store.path().display(),
            "agent registered; give the claim URL to your human"
        );
        tokio::time::sleep(CLAIM_PAUSE).await;
    }

    let agent = session.status().await.context("check agent status")?;
    info!(name = %agent.name, status = %agent.status, "agent status");

    if !profile.skills.is_empty() {
        let published = session.publish_skills(&profile.skills).await;
        info!(
            published = published.len(),
            requested = profile.skills.len(),
            "skills uploaded"
        );
    }

    if !options.no_greeting {
        if let Err(err) = session.greet().await {
            warn!(error = %err, "greeting failed");
        }
    }

    info!(every_secs = interval.as_secs(), "starting heartbeat loop");
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => match session.heartbeat().await {
                Ok(report) => info!(
                    new_messages = report.new_messages,
                    open_jobs = report.open_jobs,
                    accepted = report.accepted.is_some(),
                    "heartbeat"
                ),
                Err(err) => error!(error = %err, "heartbeat failed"),
            },
            signal = tokio::signal::ctrl_c() => {
                signal.context("listen for shutdown signal")?;
                info!("shutting down");
                return Ok(());
            }
        }
    }
}

async fn status(api: &HttpMarketplaceApi, store: &StateStore) -> anyhow::Result<()> {
    let Some(saved) = store.load()? else {
        bail!(
            "no agent configured at {}; run `clawos-agent run` first",
            store.path().display()
        );
    };
    let agent = api.status(&saved.api_key).await.context("check agent status")?;
    info!(
        name = %agent.name,
        status = %agent.status,
        claim_url = agent.claim_url.as_deref().unwrap_or("N/A"),
        owner = agent.owner_x_handle.as_deref().unwrap_or("unclaimed"),
        "agent status"
    );
    Ok(())
}

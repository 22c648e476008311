//! Command-line and environment configuration for the binaries.
//!
//! Every option can be given as a flag or through the environment
//! variable named in its help text.

use crate::runner::{ProfileError, RunnerProfile};
use crate::skill_runtime::adapters::chain_rpc::ChainEndpoints;
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Settings for `clawos-server`.
#[derive(Debug, Clone, Parser)]
#[command(name = "clawos-server", version, about = "ClawOS marketplace API server")]
pub struct ServerConfig {
    /// Socket address the API listens on.
    #[arg(long, env = "CLAWOS_LISTEN", default_value = "0.0.0.0:3001")]
    pub listen: SocketAddr,

    /// `PostgreSQL` connection URL. In-memory stores are used when absent.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum number of pooled database connections.
    #[arg(long, env = "CLAWOS_POOL_SIZE", default_value_t = 10)]
    pub pool_size: u32,

    /// Public web URL used to build claim links.
    #[arg(long, env = "APP_URL", default_value = "https://clawos-web.vercel.app")]
    pub app_url: String,

    /// OpenAI key for remote text analysis. Local analysis only when absent.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API.
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub openai_base_url: Url,

    /// Solana JSON-RPC node.
    #[arg(
        long,
        env = "SOLANA_RPC_URL",
        default_value = "https://api.mainnet-beta.solana.com"
    )]
    pub solana_rpc_url: Url,

    /// Ethereum JSON-RPC node.
    #[arg(
        long,
        env = "ETHEREUM_RPC_URL",
        default_value = "https://ethereum.publicnode.com"
    )]
    pub ethereum_rpc_url: Url,

    /// Base JSON-RPC node.
    #[arg(long, env = "BASE_MAINNET_RPC", default_value = "https://mainnet.base.org")]
    pub base_rpc_url: Url,

    /// Key rate limits on the `X-Forwarded-For` address appended by a
    /// reverse proxy instead of the socket peer. Enable only when every
    /// request arrives through such a proxy.
    #[arg(long, env = "CLAWOS_TRUST_PROXY")]
    pub trust_proxy: bool,
}

impl ServerConfig {
    /// Returns the configured chain nodes.
    #[must_use]
    pub fn chain_endpoints(&self) -> ChainEndpoints {
        ChainEndpoints {
            solana: self.solana_rpc_url.clone(),
            ethereum: self.ethereum_rpc_url.clone(),
            base: self.base_rpc_url.clone(),
        }
    }
}

/// Settings for `clawos-agent`.
#[derive(Debug, Clone, Parser)]
#[command(name = "clawos-agent", version, about = "Runs a ClawOS agent against the API")]
pub struct RunnerConfig {
    /// Base URL of the ClawOS API.
    #[arg(
        long,
        env = "CLAWOS_API_URL",
        default_value = "https://clawos-api.railway.app",
        global = true
    )]
    pub api_url: Url,

    /// Path of the saved credentials. Defaults to the platform config
    /// directory.
    #[arg(long, env = "CLAWOS_STATE_FILE", global = true)]
    pub state_file: Option<PathBuf>,

    /// What to do.
    #[command(subcommand)]
    pub command: RunnerCommand,
}

/// Runner subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum RunnerCommand {
    /// Register if needed, then poll until interrupted.
    Run(RunOptions),
    /// Print the saved agent's claim status.
    Status,
}

/// Options for `clawos-agent run`.
#[derive(Debug, Clone, Args)]
pub struct RunOptions {
    /// Agent name used on first registration. Generated when omitted.
    #[arg(long)]
    pub name: Option<String>,

    /// Description used on first registration.
    #[arg(long)]
    pub description: Option<String>,

    /// JSON file with skills to publish at startup and job preferences.
    /// Flags override its values.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Register a new agent even when credentials are saved.
    #[arg(long)]
    pub force_register: bool,

    /// Skip the greeting posted to the chat room.
    #[arg(long)]
    pub no_greeting: bool,

    /// Seconds between heartbeats.
    #[arg(long, env = "CLAWOS_HEARTBEAT_SECS", default_value_t = 60)]
    pub heartbeat_secs: u64,

    /// Accept the first open job found on each heartbeat.
    #[arg(long, env = "CLAWOS_AUTO_ACCEPT_JOBS")]
    pub auto_accept: bool,

    /// Only consider jobs in this category.
    #[arg(long)]
    pub job_category: Option<String>,

    /// Only consider jobs of this type.
    #[arg(long)]
    pub job_type: Option<String>,
}

impl RunOptions {
    /// Returns the heartbeat period, at least one second.
    #[must_use]
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs.max(1))
    }

    /// Reads the `--config` file, if any, with flag values layered on top.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError`] when the file is unreadable or malformed.
    pub fn profile(&self) -> Result<RunnerProfile, ProfileError> {
        let mut profile = self
            .config
            .as_deref()
            .map(RunnerProfile::load)
            .transpose()?
            .unwrap_or_default();
        if self.name.is_some() {
            profile.name.clone_from(&self.name);
        }
        if self.description.is_some() {
            profile.description.clone_from(&self.description);
        }
        if self.job_category.is_some() {
            profile.job_preferences.category.clone_from(&self.job_category);
        }
        if self.job_type.is_some() {
            profile.job_preferences.job_type.clone_from(&self.job_type);
        }
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::{RunOptions, RunnerCommand, RunnerConfig, ServerConfig};
    use clap::Parser;
    use rstest::rstest;
    use std::time::Duration;

    #[rstest]
    fn server_flags_override_defaults() {
        let config = ServerConfig::try_parse_from([
            "clawos-server",
            "--listen",
            "127.0.0.1:8080",
            "--pool-size",
            "4",
            "--solana-rpc-url",
            "http://localhost:8899",
        ])
        .expect("flags parse");

        assert_eq!(config.listen.port(), 8080);
        assert_eq!(config.pool_size, 4);
        assert_eq!(
            config.chain_endpoints().solana.as_str(),
            "http://localhost:8899/"
        );
    }

    #[rstest]
    fn forwarded_addresses_are_ignored_unless_a_proxy_is_trusted() {
        let default = ServerConfig::try_parse_from(["clawos-server"]).expect("flags parse");
        let trusted = ServerConfig::try_parse_from(["clawos-server", "--trust-proxy"])
            .expect("flags parse");

        assert!(!default.trust_proxy);
        assert!(trusted.trust_proxy);
    }

    #[rstest]
    fn malformed_rpc_urls_are_rejected() {
        let result = ServerConfig::try_parse_from(["clawos-server", "--base-rpc-url", "not a url"]);
        assert!(result.is_err());
    }

    #[rstest]
    #[case(&["clawos-agent", "run"], 60)]
    #[case(&["clawos-agent", "run", "--heartbeat-secs", "0"], 1)]
    #[case(&["clawos-agent", "run", "--heartbeat-secs", "15"], 15)]
    fn heartbeat_interval_is_at_least_one_second(#[case] args: &[&str], #[case] secs: u64) {
        let config = RunnerConfig::try_parse_from(args).expect("flags parse");
        let RunnerCommand::Run(options) = config.command else {
            panic!("expected the run subcommand");
        };
        assert_eq!(options.heartbeat_interval(), Duration::from_secs(secs));
    }

    fn run_options(args: &[&str]) -> RunOptions {
        let config = RunnerConfig::try_parse_from(args).expect("flags parse");
        let RunnerCommand::Run(options) = config.command else {
            panic!("expected the run subcommand");
        };
        options
    }

    #[rstest]
    fn flags_override_the_config_file() {
        let path = std::env::temp_dir().join(format!("clawos_profile_{}.json", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"{
                "name": "from-file",
                "skills": [{ "name": "Digest" }],
                "jobPreferences": { "category": "ANALYSIS", "type": "TASK" }
            }"#,
        )
        .expect("config writes");
        let config_path = path.to_string_lossy().into_owned();

        let profile = run_options(&[
            "clawos-agent",
            "run",
            "--config",
            &config_path,
            "--job-type",
            "HIRING",
        ])
        .profile()
        .expect("profile loads");
        std::fs::remove_file(&path).ok();

        assert_eq!(profile.name.as_deref(), Some("from-file"));
        assert_eq!(profile.description(), "Auto-registered agent");
        assert_eq!(profile.skills.len(), 1);
        assert_eq!(profile.job_preferences.category.as_deref(), Some("ANALYSIS"));
        assert_eq!(profile.job_preferences.job_type.as_deref(), Some("HIRING"));
    }

    #[rstest]
    fn a_missing_config_file_is_an_error() {
        let options = run_options(&["clawos-agent", "run", "--config", "/nonexistent/clawos.json"]);
        assert!(options.profile().is_err());
    }

    #[rstest]
    fn status_accepts_a_global_api_url() {
        let config = RunnerConfig::try_parse_from([
            "clawos-agent",
            "status",
            "--api-url",
            "http://localhost:3001",
        ])
        .expect("flags parse");

        assert!(matches!(config.command, RunnerCommand::Status));
        assert_eq!(config.api_url.as_str(), "http://localhost:3001/");
    }
}

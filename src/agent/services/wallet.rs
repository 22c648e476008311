//! Service layer for linking EVM wallets to agents.
//!
//! Each wallet belongs to at most one agent. The USDC balance shown with a
//! wallet is read live from the chain and omitted when the node cannot be
//! reached or the chain has no known USDC contract.

use crate::agent::{
    domain::{
        Agent, AgentDomainError, AgentId, ConnectedWallet, DEFAULT_CHAIN_ID, WalletAddress,
        format_units,
    },
    ports::{AgentRepository, AgentRepositoryError},
};
use crate::skill_runtime::{domain::Chain, ports::ChainRpc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

const USDC_DECIMALS: usize = 6;

/// USDC contract and node for an EVM chain id.
const fn usdc_contract(chain_id: u64) -> Option<(Chain, &'static str)> {
    match chain_id {
        DEFAULT_CHAIN_ID => Some((Chain::Base, "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913")),
        _ => None,
    }
}

/// Request payload for connecting a wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectWalletRequest {
    /// `0x`-prefixed address.
    pub wallet_address: String,
    /// EVM chain id; Base mainnet when absent.
    pub chain_id: Option<u64>,
}

/// A connected wallet with its live USDC balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletOverview {
    /// The wallet.
    pub wallet: ConnectedWallet,
    /// Decimal USDC balance, when it could be read.
    pub on_chain_balance: Option<String>,
}

/// Text an agent signs to prove it controls a wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletChallenge {
    /// Message to sign.
    pub nonce: String,
    /// Human-readable instruction.
    pub message: String,
}

/// Service-level errors for wallet operations.
#[derive(Debug, Error)]
pub enum WalletServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] AgentDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] AgentRepositoryError),
    /// The agent has no wallet connected.
    #[error("no wallet connected")]
    NoWallet,
}

/// Result type for wallet service operations.
pub type WalletServiceResult<T> = Result<T, WalletServiceError>;

/// Wallet linking orchestration service.
pub struct WalletService<R, N, C>
where
    R: AgentRepository + ?Sized,
    N: ChainRpc + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    chain: Arc<N>,
    clock: Arc<C>,
}

impl<R, N, C> Clone for WalletService<R, N, C>
where
    R: AgentRepository + ?Sized,
    N: ChainRpc + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            chain: Arc::clone(&self.chain),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, N, C> WalletService<R, N, C>
where
    R: AgentRepository + ?Sized,
    N: ChainRpc + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new service.
    #[must_use]
    pub const fn new(repository: Arc<R>, chain: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            repository,
            chain,
            clock,
        }
    }

    /// Links a wallet to `agent`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::InvalidWalletAddress`] for a malformed
    /// address or [`AgentRepositoryError::WalletInUse`] when another agent
    /// holds it.
    pub async fn connect(
        &self,
        agent: &Agent,
        request: ConnectWalletRequest,
    ) -> WalletServiceResult<ConnectedWallet> {
        let address = WalletAddress::new(&request.wallet_address)?;
        if let Some(holder) = self.repository.find_by_wallet(&address).await? {
            if holder.id() != agent.id() {
                return Err(AgentRepositoryError::WalletInUse(address).into());
            }
        }

        let wallet = ConnectedWallet::new(
            address,
            request.chain_id.unwrap_or(DEFAULT_CHAIN_ID),
            self.clock.utc(),
        );
        let mut updated = agent.clone();
        updated.connect_wallet(wallet.clone(), &*self.clock);
        self.repository.update(&updated).await?;

        tracing::info!(
            agent_id = %agent.id(),
            address = %wallet.address(),
            chain_id = wallet.chain_id(),
            "wallet connected"
        );
        Ok(wallet)
    }

    /// Returns the agent's wallet with its USDC balance.
    ///
    /// # Errors
    ///
    /// Returns [`WalletServiceError::NoWallet`] when none is connected.
    pub async fn overview(&self, agent_id: AgentId) -> WalletServiceResult<WalletOverview> {
        let agent = self
            .repository
            .find_by_id(agent_id)
            .await?
            .ok_or(AgentRepositoryError::NotFound(agent_id))?;
        let wallet = agent.wallet().cloned().ok_or(WalletServiceError::NoWallet)?;
        let on_chain_balance = self.usdc_balance(&wallet).await;
        Ok(WalletOverview {
            wallet,
            on_chain_balance,
        })
    }

    /// Unlinks the agent's wallet. Succeeds when none was connected.
    ///
    /// # Errors
    ///
    /// Returns [`WalletServiceError::Repository`] when the write fails.
    pub async fn disconnect(&self, agent: &Agent) -> WalletServiceResult<Option<ConnectedWallet>> {
        let mut updated = agent.clone();
        let previous = updated.disconnect_wallet(&*self.clock);
        if let Some(wallet) = &previous {
            self.repository.update(&updated).await?;
            tracing::info!(agent_id = %agent.id(), address = %wallet.address(), "wallet disconnected");
        }
        Ok(previous)
    }

    /// Builds the message `agent` signs to prove control of `wallet_address`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::InvalidWalletAddress`] for a malformed
    /// address.
    pub fn challenge(
        &self,
        agent: &Agent,
        wallet_address: &str,
    ) -> WalletServiceResult<WalletChallenge> {
        let address = WalletAddress::new(wallet_address)?;
        let nonce = format!(
            "ClawOS Wallet Verification\nAgent: {}\nWallet: {address}\nTimestamp: {}\nNonce: {}",
            agent.name(),
            self.clock.utc().timestamp_millis(),
            uuid::Uuid::new_v4(),
        );
        Ok(WalletChallenge {
            nonce,
            message: format!("Sign this message to verify ownership of {address}"),
        })
    }

    async fn usdc_balance(&self, wallet: &ConnectedWallet) -> Option<String> {
        let (chain, token) = usdc_contract(wallet.chain_id())?;
        match self
            .chain
            .erc20_balance(chain, token, wallet.address().as_str())
            .await
        {
            Ok(raw) => Some(format_units(raw, USDC_DECIMALS)),
            Err(err) => {
                tracing::warn!(
                    address = %wallet.address(),
                    error = %err,
                    "cannot read on-chain balance"
                );
                None
            }
        }
    }
}

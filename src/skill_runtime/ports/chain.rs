//! Blockchain RPC port.

use super::OutboundResult;
use crate::skill_runtime::domain::{Chain, EvmTransaction, SolanaTransaction};
use async_trait::async_trait;

/// Reads transactions from chain nodes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Looks up a confirmed Solana transaction by signature.
    async fn solana_transaction(&self, signature: &str)
    -> OutboundResult<Option<SolanaTransaction>>;

    /// Looks up an EVM transaction, its receipt and whether the recipient
    /// is a contract.
    async fn evm_transaction(
        &self,
        chain: Chain,
        hash: &str,
    ) -> OutboundResult<Option<EvmTransaction>>;

    /// Reads the ERC-20 `token` balance of `holder` in base units.
    async fn erc20_balance(&self, chain: Chain, token: &str, holder: &str)
    -> OutboundResult<u128>;
}

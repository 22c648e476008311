//! On-chain transaction risk analysis.

use crate::skill_runtime::{
    domain::{
        Chain, InvalidTxReference, RiskAssessment, TxAnalysisRequest, assess_evm, assess_solana,
    },
    ports::{ChainRpc, OutboundError},
};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Analysis failures.
#[derive(Debug, Clone, Error)]
pub enum TxServiceError {
    /// Hash failed validation.
    #[error(transparent)]
    Input(#[from] InvalidTxReference),
    /// The node does not know the transaction.
    #[error("{chain} transaction {hash} not found")]
    NotFound {
        /// Chain queried.
        chain: Chain,
        /// Hash queried.
        hash: String,
    },
    /// The node could not be queried.
    #[error(transparent)]
    Outbound(#[from] OutboundError),
}

/// Analysis result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReport {
    /// Hash analysed.
    pub tx_hash: String,
    /// Chain queried.
    pub chain: Chain,
    /// Score, level, patterns, flags and details.
    #[serde(flatten)]
    pub assessment: RiskAssessment,
}

/// Fetches transactions and scores them.
pub struct TransactionAnalyzer<R, C>
where
    R: ChainRpc + ?Sized,
    C: Clock + Send + Sync,
{
    rpc: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for TransactionAnalyzer<R, C>
where
    R: ChainRpc + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            rpc: Arc::clone(&self.rpc),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> TransactionAnalyzer<R, C>
where
    R: ChainRpc + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates an analyser.
    #[must_use]
    pub const fn new(rpc: Arc<R>, clock: Arc<C>) -> Self {
        Self { rpc, clock }
    }

    /// Scores the referenced transaction.
    ///
    /// # Errors
    ///
    /// Returns [`TxServiceError::Input`] for a short hash,
    /// [`TxServiceError::NotFound`] for unknown transactions and
    /// [`TxServiceError::Outbound`] when the node call fails.
    pub async fn analyze(&self, request: TxAnalysisRequest) -> Result<TxReport, TxServiceError> {
        let hash = request.validated_hash()?.to_owned();
        let chain = request.chain;
        let assessment = match chain {
            Chain::Solana => self
                .rpc
                .solana_transaction(&hash)
                .await?
                .map(|tx| assess_solana(&tx, self.clock.utc())),
            Chain::Ethereum | Chain::Base => self
                .rpc
                .evm_transaction(chain, &hash)
                .await?
                .map(|tx| assess_evm(&tx)),
        }
        .ok_or_else(|| TxServiceError::NotFound {
            chain,
            hash: hash.clone(),
        })?;

        tracing::info!(%chain, tx_hash = %hash, score = assessment.risk_score, "transaction scored");
        Ok(TxReport {
            tx_hash: hash,
            chain,
            assessment,
        })
    }
}

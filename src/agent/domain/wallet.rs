//! EVM wallets linked to agents for on-chain settlement.

use super::AgentDomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Chain assumed when a wallet is connected without one (Base mainnet).
pub const DEFAULT_CHAIN_ID: u64 = 8453;

const ADDRESS_HEX_DIGITS: usize = 40;

/// A `0x`-prefixed 20-byte EVM address, stored in lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Validates and normalises an address.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::InvalidWalletAddress`] unless the value
    /// is `0x` followed by exactly 40 hex digits.
    pub fn new(value: impl AsRef<str>) -> Result<Self, AgentDomainError> {
        let raw = value.as_ref().trim();
        let well_formed = raw.strip_prefix("0x").is_some_and(|digits| {
            digits.len() == ADDRESS_HEX_DIGITS && digits.chars().all(|c| c.is_ascii_hexdigit())
        });
        if !well_formed {
            return Err(AgentDomainError::InvalidWalletAddress(raw.to_owned()));
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    /// Returns the lowercase address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A wallet an agent has connected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedWallet {
    address: WalletAddress,
    chain_id: u64,
    connected_at: DateTime<Utc>,
}

impl ConnectedWallet {
    /// Links `address` on `chain_id`.
    #[must_use]
    pub const fn new(address: WalletAddress, chain_id: u64, connected_at: DateTime<Utc>) -> Self {
        Self {
            address,
            chain_id,
            connected_at,
        }
    }

    /// Returns the address.
    #[must_use]
    pub const fn address(&self) -> &WalletAddress {
        &self.address
    }

    /// Returns the EVM chain id.
    #[must_use]
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Returns when the wallet was connected.
    #[must_use]
    pub const fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }
}

/// Renders an integer token amount with `decimals` fractional digits,
/// keeping at least one.
///
/// `1_500_000` with six decimals renders as `1.5`; zero renders as `0.0`.
#[must_use]
pub fn format_units(raw: u128, decimals: usize) -> String {
    let digits = format!("{raw:0>width$}", width = decimals.saturating_add(1));
    let (whole, fraction) = digits.split_at(digits.len().saturating_sub(decimals));
    let significant = fraction.trim_end_matches('0');
    if significant.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{significant}")
    }
}

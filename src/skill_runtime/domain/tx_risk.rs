//! Transaction risk scoring.
//!
//! Chain adapters decode transactions into [`SolanaTransaction`] or
//! [`EvmTransaction`]; the scoring functions here turn those into a
//! [`RiskAssessment`] using the fixed pattern table of [`RiskPattern`].

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;
use thiserror::Error;

const MIN_TX_HASH_CHARS: usize = 10;
const MAX_RISK_SCORE: u32 = 100;

const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
const WEI_PER_GWEI: u128 = 1_000_000_000;
const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;

const HIGH_FEE_LAMPORTS: u64 = 10_000_000;
const LARGE_SOL_TRANSFER_LAMPORTS: u64 = 100 * LAMPORTS_PER_SOL;
const LARGE_ETH_TRANSFER_WEI: u128 = 10 * WEI_PER_ETH;
const HIGH_GAS_PRICE_WEI: u128 = 100 * WEI_PER_GWEI;
const MULTI_SIGNER_THRESHOLD: usize = 3;
const WRITABLE_ACCOUNT_THRESHOLD: usize = 5;
const RECENT_SECONDS: i64 = 300;
const HIGH_COMPUTE_UNITS: u64 = 1_000_000;
const COMPLEX_LOG_COUNT: usize = 10;
const HIGH_NONCE: u64 = 10_000;

const SPL_TOKEN_PROGRAM: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
const SOLANA_DEX_PROGRAMS: [&str; 4] = [
    "JUP6LkbZbjS1jKKwapdHNy74zcZ3tLUZoi5QNyVTaV4",
    "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8",
    "whirLbMiicVdio4qvUfM5KAg6Ct8VwpYzGff3uctyCc",
    "9W959DqEETiGZocYWCQPaJ6sBmUzgfxXfqGeTEdp3aQP",
];

const ERC20_TRANSFER_TOPIC: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";
const ERC20_APPROVAL_TOPIC: &str =
    "0x8c5be1e5ebec7d5bd14f71427d1e84f3dd0314c0f7b2291e5b200ac8c7c3b925";
const SWAP_TOPICS: [&str; 2] = [
    "0xd78ad95fa46c994b6551d0da85fc275fe613ce37657fb8d5e3d130840159d822",
    "0xc42079f94a6350d7e6235f29174924f928cc2ac818eb64fed8004e115fbcca67",
];
const KNOWN_PROTOCOLS: [(&str, &str); 4] = [
    ("0x7a250d5630b4cf539739df2c5dacb4c659f2488d", "Uniswap V2 Router"),
    ("0xe592427a0aece92de3edee1f18e0157c05861564", "Uniswap V3 Router"),
    (
        "0x68b3465833fb72a70ecdf485e0e4c7bd8665fc45",
        "Uniswap V3 Universal Router",
    ),
    ("0x1111111254eeb25477b68fb85ed929f73a960582", "1inch Router"),
];

/// Supported ledgers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    /// Solana mainnet.
    #[default]
    Solana,
    /// Ethereum mainnet.
    Ethereum,
    /// Base mainnet.
    Base,
}

impl Chain {
    /// Returns the lowercase chain name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solana => "solana",
            Self::Ethereum => "ethereum",
            Self::Base => "base",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Analysis input as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxAnalysisRequest {
    /// Signature or transaction hash.
    pub tx_hash: String,
    /// Ledger; Solana when absent.
    #[serde(default)]
    pub chain: Chain,
}

/// Rejected transaction reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("txHash must be at least 10 characters")]
pub struct InvalidTxReference;

impl TxAnalysisRequest {
    /// Checks the hash length and returns the trimmed hash.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTxReference`] for a hash shorter than ten characters.
    pub fn validated_hash(&self) -> Result<&str, InvalidTxReference> {
        let hash = self.tx_hash.trim();
        if hash.chars().count() < MIN_TX_HASH_CHARS {
            return Err(InvalidTxReference);
        }
        Ok(hash)
    }
}

/// Observed behaviour of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskPattern {
    /// Reverted or errored on-chain.
    FailedTransaction,
    /// Fee above 0.01 SOL.
    HighFee,
    /// More than 100 SOL or 10 ETH moved.
    LargeValueTransfer,
    /// More than five writable accounts.
    ManyWritableAccounts,
    /// More than ten emitted events.
    ComplexInteraction,
    /// SPL or ERC-20 transfer.
    TokenTransfer,
    /// Known DEX program invoked.
    DexInteraction,
    /// More than three signers.
    MultiSigner,
    /// Token account balances changed.
    TokenBalanceChange,
    /// Confirmed within the last five minutes.
    VeryRecentTransaction,
    /// More than a million compute units.
    HighComputeUsage,
    /// Contract deployment.
    ContractCreation,
    /// ERC-20 approval event.
    TokenApproval,
    /// Uniswap-style swap event.
    DexSwap,
    /// Gas price above 100 gwei.
    HighGasPrice,
    /// Recipient has code.
    ContractInteraction,
    /// Recipient is a well-known router.
    KnownProtocol,
    /// Sender nonce above 10 000.
    HighNonceAccount,
}

impl RiskPattern {
    /// Score contribution; informational patterns add nothing.
    #[must_use]
    pub const fn weight(self) -> u32 {
        match self {
            Self::FailedTransaction => 20,
            Self::LargeValueTransfer => 15,
            Self::HighFee => 10,
            Self::ManyWritableAccounts | Self::ComplexInteraction => 5,
            Self::TokenTransfer
            | Self::DexInteraction
            | Self::MultiSigner
            | Self::TokenBalanceChange
            | Self::VeryRecentTransaction
            | Self::HighComputeUsage
            | Self::ContractCreation
            | Self::TokenApproval
            | Self::DexSwap
            | Self::HighGasPrice
            | Self::ContractInteraction
            | Self::KnownProtocol
            | Self::HighNonceAccount => 0,
        }
    }
}

/// Risk band of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// 0 to 20.
    Low,
    /// 21 to 50.
    Medium,
    /// 51 to 80.
    High,
    /// Above 80.
    Critical,
}

impl RiskLevel {
    /// Maps a score to its band.
    #[must_use]
    pub const fn for_score(score: u32) -> Self {
        match score {
            0..=20 => Self::Low,
            21..=50 => Self::Medium,
            51..=80 => Self::High,
            _ => Self::Critical,
        }
    }
}

/// Caps a raw total at 100.
#[must_use]
pub const fn capped_score(total: u32) -> u32 {
    if total > MAX_RISK_SCORE {
        MAX_RISK_SCORE
    } else {
        total
    }
}

/// Scored transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Sum of pattern weights, capped at 100.
    pub risk_score: u32,
    /// Band of the score.
    pub risk_level: RiskLevel,
    /// Distinct observed patterns in detection order.
    pub patterns: Vec<RiskPattern>,
    /// Human-readable findings.
    pub flags: Vec<String>,
    /// Chain-specific decoded fields.
    pub details: Value,
}

#[derive(Debug, Default)]
struct Findings {
    patterns: Vec<RiskPattern>,
    flags: Vec<String>,
}

impl Findings {
    fn note(&mut self, pattern: RiskPattern) {
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
    }

    fn flag(&mut self, pattern: RiskPattern, message: String) {
        self.note(pattern);
        if !self.flags.contains(&message) {
            self.flags.push(message);
        }
    }

    fn assess(self, details: Map<String, Value>) -> RiskAssessment {
        let total = self
            .patterns
            .iter()
            .fold(0_u32, |sum, pattern| sum.saturating_add(pattern.weight()));
        let risk_score = capped_score(total);
        RiskAssessment {
            risk_score,
            risk_level: RiskLevel::for_score(risk_score),
            patterns: self.patterns,
            flags: self.flags,
            details: Value::Object(details),
        }
    }
}

/// Account touched by a Solana transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountAccess {
    /// Signed the transaction.
    pub signer: bool,
    /// Written by the transaction.
    pub writable: bool,
}

/// Decoded Solana transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolanaTransaction {
    /// Slot of inclusion.
    pub slot: u64,
    /// Block time in Unix seconds.
    pub block_time: Option<i64>,
    /// Fee in lamports.
    pub fee_lamports: u64,
    /// Whether execution errored.
    pub failed: bool,
    /// Program of each top-level instruction.
    pub program_ids: Vec<String>,
    /// Accounts in message order.
    pub accounts: Vec<AccountAccess>,
    /// Lamport balances before execution.
    pub pre_balances: Vec<u64>,
    /// Lamport balances after execution.
    pub post_balances: Vec<u64>,
    /// Pre plus post token balance entries.
    pub token_balance_entries: usize,
    /// Compute units consumed.
    pub compute_units: Option<u64>,
}

/// Formats an integer amount with `decimals` implied decimal places,
/// keeping at least one fractional digit.
#[must_use]
pub fn format_units(amount: u128, decimals: u32) -> String {
    let scale = 10_u128.pow(decimals);
    let whole = amount.div_euclid(scale);
    let fraction = amount.rem_euclid(scale);
    let width = usize::try_from(decimals).unwrap_or(0);
    let digits = format!("{fraction:0width$}");
    let trimmed = digits.trim_end_matches('0');
    if trimmed.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{trimmed}")
    }
}

fn units_as_f64(amount: u128, decimals: u32) -> f64 {
    format_units(amount, decimals).parse().unwrap_or(f64::MAX)
}

/// Scores a Solana transaction observed at `now`.
#[must_use]
pub fn assess_solana(tx: &SolanaTransaction, now: DateTime<Utc>) -> RiskAssessment {
    let mut findings = Findings::default();
    let fee_sol = units_as_f64(u128::from(tx.fee_lamports), 9);
    let mut details = Map::new();
    details.insert("slot".to_owned(), json!(tx.slot));
    details.insert(
        "blockTime".to_owned(),
        json!(
            tx.block_time
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .map(|moment| moment.to_rfc3339_opts(SecondsFormat::Millis, true))
        ),
    );
    details.insert("fee".to_owned(), json!(fee_sol));
    details.insert(
        "status".to_owned(),
        json!(if tx.failed { "failed" } else { "success" }),
    );

    if tx.failed {
        findings.flag(
            RiskPattern::FailedTransaction,
            "Transaction failed on-chain".to_owned(),
        );
    }
    if tx.fee_lamports > HIGH_FEE_LAMPORTS {
        findings.flag(
            RiskPattern::HighFee,
            format!("High transaction fee: {fee_sol:.6} SOL"),
        );
    }

    for program in &tx.program_ids {
        if program == SPL_TOKEN_PROGRAM {
            findings.note(RiskPattern::TokenTransfer);
        }
        if SOLANA_DEX_PROGRAMS.contains(&program.as_str()) {
            findings.note(RiskPattern::DexInteraction);
        }
    }

    let signers = tx.accounts.iter().filter(|account| account.signer).count();
    if signers > MULTI_SIGNER_THRESHOLD {
        findings.flag(
            RiskPattern::MultiSigner,
            format!("Multiple signers detected: {signers}"),
        );
    }
    let writable = tx.accounts.iter().filter(|account| account.writable).count();
    if writable > WRITABLE_ACCOUNT_THRESHOLD {
        findings.note(RiskPattern::ManyWritableAccounts);
    }

    let moved_lamports = tx
        .pre_balances
        .iter()
        .zip(tx.post_balances.iter())
        .fold(0_u128, |sum, (pre, post)| {
            sum.saturating_add(u128::from(pre.abs_diff(*post)))
        });
    let moved_sol = units_as_f64(moved_lamports, 9);
    details.insert("totalSolMoved".to_owned(), json!(moved_sol));
    if moved_lamports > u128::from(LARGE_SOL_TRANSFER_LAMPORTS) {
        findings.flag(
            RiskPattern::LargeValueTransfer,
            format!("Large value transfer: {moved_sol:.2} SOL"),
        );
    }

    if tx.token_balance_entries > 0 {
        findings.note(RiskPattern::TokenBalanceChange);
        details.insert(
            "tokenAccountsChanged".to_owned(),
            json!(tx.token_balance_entries),
        );
    }

    if tx
        .block_time
        .is_some_and(|secs| now.timestamp().saturating_sub(secs) < RECENT_SECONDS)
    {
        findings.note(RiskPattern::VeryRecentTransaction);
    }

    if let Some(units) = tx.compute_units.filter(|units| *units > 0) {
        details.insert("computeUnitsConsumed".to_owned(), json!(units));
        if units > HIGH_COMPUTE_UNITS {
            findings.flag(
                RiskPattern::HighComputeUsage,
                format!("High compute usage: {units} units"),
            );
        }
    }

    findings.assess(details)
}

/// Receipt of an EVM transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvmReceipt {
    /// Execution succeeded.
    pub success: bool,
    /// Gas consumed.
    pub gas_used: Option<u128>,
    /// Effective gas price in wei.
    pub effective_gas_price: Option<u128>,
    /// Block of inclusion.
    pub block_number: Option<u64>,
    /// Deployed contract, for creations.
    pub contract_address: Option<String>,
    /// First topic of each log, in order.
    pub log_topics: Vec<Option<String>>,
}

/// Decoded EVM transaction with its receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvmTransaction {
    /// Sender.
    pub from: String,
    /// Recipient; absent for contract creation.
    pub to: Option<String>,
    /// Transferred value in wei.
    pub value_wei: u128,
    /// Gas limit.
    pub gas_limit: Option<u128>,
    /// Legacy or effective gas price in wei.
    pub gas_price_wei: Option<u128>,
    /// EIP-1559 fee cap in wei.
    pub max_fee_per_gas_wei: Option<u128>,
    /// Sender nonce.
    pub nonce: u64,
    /// Chain identifier.
    pub chain_id: Option<u64>,
    /// Receipt, when mined.
    pub receipt: Option<EvmReceipt>,
    /// Whether the recipient has deployed code.
    pub recipient_is_contract: bool,
}

/// Scores an EVM transaction.
#[must_use]
pub fn assess_evm(tx: &EvmTransaction) -> RiskAssessment {
    let mut findings = Findings::default();
    let mut details = Map::new();
    details.insert("from".to_owned(), json!(tx.from));
    details.insert("to".to_owned(), json!(tx.to));
    details.insert("value".to_owned(), json!(format_units(tx.value_wei, 18)));
    details.insert(
        "gasLimit".to_owned(),
        json!(tx.gas_limit.map(|gas| gas.to_string())),
    );
    details.insert(
        "gasPrice".to_owned(),
        json!(tx.gas_price_wei.map(|wei| format_units(wei, 9))),
    );
    details.insert(
        "maxFeePerGas".to_owned(),
        json!(tx.max_fee_per_gas_wei.map(|wei| format_units(wei, 9))),
    );
    details.insert("nonce".to_owned(), json!(tx.nonce));
    details.insert(
        "chainId".to_owned(),
        json!(tx.chain_id.map(|id| id.to_string())),
    );

    if let Some(receipt) = &tx.receipt {
        assess_receipt(tx, receipt, &mut findings, &mut details);
    }

    if tx.value_wei > LARGE_ETH_TRANSFER_WEI {
        let eth = units_as_f64(tx.value_wei, 18);
        findings.flag(
            RiskPattern::LargeValueTransfer,
            format!("Large ETH transfer: {eth:.4} ETH"),
        );
    }

    if let Some(price) = tx.gas_price_wei.filter(|price| *price > HIGH_GAS_PRICE_WEI) {
        let gwei = units_as_f64(price, 9);
        findings.flag(
            RiskPattern::HighGasPrice,
            format!("High gas price: {gwei:.2} gwei"),
        );
    }

    if let Some(recipient) = tx.to.as_deref().filter(|_| tx.recipient_is_contract) {
        findings.note(RiskPattern::ContractInteraction);
        details.insert("contractAddress".to_owned(), json!(recipient));
        let lowered = recipient.to_ascii_lowercase();
        if let Some((_, protocol)) = KNOWN_PROTOCOLS
            .iter()
            .find(|(address, _)| *address == lowered)
        {
            findings.note(RiskPattern::KnownProtocol);
            details.insert("protocol".to_owned(), json!(protocol));
        }
    }

    if tx.nonce > HIGH_NONCE {
        findings.flag(
            RiskPattern::HighNonceAccount,
            format!("Account has high nonce: {}", tx.nonce),
        );
    }

    findings.assess(details)
}

fn assess_receipt(
    tx: &EvmTransaction,
    receipt: &EvmReceipt,
    findings: &mut Findings,
    details: &mut Map<String, Value>,
) {
    details.insert(
        "status".to_owned(),
        json!(if receipt.success { "success" } else { "failed" }),
    );
    details.insert(
        "gasUsed".to_owned(),
        json!(receipt.gas_used.map(|gas| gas.to_string())),
    );
    details.insert(
        "effectiveGasPrice".to_owned(),
        json!(receipt.effective_gas_price.map(|wei| format_units(wei, 9))),
    );
    details.insert("blockNumber".to_owned(), json!(receipt.block_number));

    if !receipt.success {
        findings.flag(
            RiskPattern::FailedTransaction,
            "Transaction failed on-chain".to_owned(),
        );
    }
    if let Some(address) = receipt
        .contract_address
        .as_ref()
        .filter(|_| tx.to.is_none())
    {
        findings.note(RiskPattern::ContractCreation);
        details.insert("contractAddress".to_owned(), json!(address));
    }

    let has_topic = |wanted: &[&str]| {
        receipt
            .log_topics
            .iter()
            .flatten()
            .any(|topic| wanted.contains(&topic.as_str()))
    };
    if has_topic(&[ERC20_TRANSFER_TOPIC]) {
        findings.note(RiskPattern::TokenTransfer);
    }
    if has_topic(&[ERC20_APPROVAL_TOPIC]) {
        findings.note(RiskPattern::TokenApproval);
    }
    if has_topic(&SWAP_TOPICS) {
        findings.note(RiskPattern::DexSwap);
    }

    let log_count = receipt.log_topics.len();
    if log_count > COMPLEX_LOG_COUNT {
        findings.flag(
            RiskPattern::ComplexInteraction,
            format!("Complex transaction with {log_count} events"),
        );
    }
}

//! Tests for transaction risk scoring.

use std::sync::Arc;

use crate::skill_runtime::{
    domain::{
        AccountAccess, Chain, EvmReceipt, EvmTransaction, RiskLevel, RiskPattern,
        SolanaTransaction, TxAnalysisRequest, assess_evm, assess_solana, capped_score,
        format_units,
    },
    ports::MockChainRpc,
    services::{TransactionAnalyzer, TxServiceError},
};
use chrono::{DateTime, Utc};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;

const SOL: u64 = 1_000_000_000;
const ETH: u128 = 1_000_000_000_000_000_000;
const TRANSFER_TOPIC: &str = "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

fn observed_at(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).expect("valid timestamp")
}

fn solana_tx() -> SolanaTransaction {
    SolanaTransaction {
        slot: 250_000_000,
        block_time: Some(1_700_000_000),
        fee_lamports: 5_000,
        failed: false,
        program_ids: vec!["11111111111111111111111111111111".to_owned()],
        accounts: vec![
            AccountAccess {
                signer: true,
                writable: true,
            },
            AccountAccess {
                signer: false,
                writable: true,
            },
        ],
        pre_balances: vec![10 * SOL, 0],
        post_balances: vec![9 * SOL, SOL],
        token_balance_entries: 0,
        compute_units: Some(450),
    }
}

#[rstest]
#[case(0, RiskLevel::Low)]
#[case(20, RiskLevel::Low)]
#[case(21, RiskLevel::Medium)]
#[case(50, RiskLevel::Medium)]
#[case(51, RiskLevel::High)]
#[case(80, RiskLevel::High)]
#[case(81, RiskLevel::Critical)]
fn scores_map_to_bands(#[case] score: u32, #[case] expected: RiskLevel) {
    assert_eq!(RiskLevel::for_score(score), expected);
}

#[rstest]
#[case(150, 100)]
#[case(100, 100)]
#[case(35, 35)]
fn totals_are_capped(#[case] total: u32, #[case] expected: u32) {
    assert_eq!(capped_score(total), expected);
}

#[rstest]
#[case(1_500_000_000, 9, "1.5")]
#[case(0, 9, "0.0")]
#[case(42, 0, "42.0")]
#[case(1, 18, "0.000000000000000001")]
fn amounts_format_with_trimmed_fractions(
    #[case] amount: u128,
    #[case] decimals: u32,
    #[case] expected: &str,
) {
    assert_eq!(format_units(amount, decimals), expected);
}

#[rstest]
#[case("short", true)]
#[case("0123456789", false)]
fn short_hashes_are_rejected(#[case] hash: &str, #[case] rejected: bool) {
    let request = TxAnalysisRequest {
        tx_hash: hash.to_owned(),
        chain: Chain::Solana,
    };
    assert_eq!(request.validated_hash().is_err(), rejected);
}

#[rstest]
fn quiet_solana_transfer_is_low_risk() {
    let assessment = assess_solana(&solana_tx(), observed_at(1_800_000_000));
    assert_eq!(assessment.risk_score, 0);
    assert_eq!(assessment.risk_level, RiskLevel::Low);
    assert!(assessment.patterns.is_empty());
    assert_eq!(assessment.details.get("totalSolMoved"), Some(&json!(2.0)));
    assert_eq!(assessment.details.get("status"), Some(&json!("success")));
}

#[rstest]
fn failed_costly_large_solana_transfer_scores_medium() {
    let tx = SolanaTransaction {
        failed: true,
        fee_lamports: 20_000_000,
        pre_balances: vec![200 * SOL, 0],
        post_balances: vec![50 * SOL, 150 * SOL],
        ..solana_tx()
    };
    let assessment = assess_solana(&tx, observed_at(1_800_000_000));

    assert_eq!(assessment.risk_score, 45);
    assert_eq!(assessment.risk_level, RiskLevel::Medium);
    assert_eq!(
        assessment.patterns,
        vec![
            RiskPattern::FailedTransaction,
            RiskPattern::HighFee,
            RiskPattern::LargeValueTransfer,
        ]
    );
    assert!(assessment.flags.contains(&"High transaction fee: 0.020000 SOL".to_owned()));
}

#[rstest]
fn solana_informational_patterns_add_no_score() {
    let tx = SolanaTransaction {
        program_ids: vec![
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA".to_owned(),
            "JUP6LkbZbjS1jKKwapdHNy74zcZ3tLUZoi5QNyVTaV4".to_owned(),
        ],
        token_balance_entries: 2,
        compute_units: Some(1_400_000),
        ..solana_tx()
    };
    let assessment = assess_solana(&tx, observed_at(1_700_000_100));

    assert_eq!(assessment.risk_score, 0);
    for pattern in [
        RiskPattern::TokenTransfer,
        RiskPattern::DexInteraction,
        RiskPattern::TokenBalanceChange,
        RiskPattern::VeryRecentTransaction,
        RiskPattern::HighComputeUsage,
    ] {
        assert!(assessment.patterns.contains(&pattern), "missing {pattern:?}");
    }
}

#[rstest]
fn many_writable_accounts_add_weight() {
    let tx = SolanaTransaction {
        accounts: vec![
            AccountAccess {
                signer: true,
                writable: true,
            };
            6
        ],
        ..solana_tx()
    };
    let assessment = assess_solana(&tx, observed_at(1_800_000_000));
    assert_eq!(assessment.risk_score, 5);
    assert!(assessment.patterns.contains(&RiskPattern::MultiSigner));
    assert!(assessment.patterns.contains(&RiskPattern::ManyWritableAccounts));
}

#[rstest]
fn busy_evm_contract_call_is_flagged() {
    let mut topics = vec![Some(TRANSFER_TOPIC.to_owned()); 11];
    topics.push(None);
    let tx = EvmTransaction {
        from: "0xabc".to_owned(),
        to: Some("0x7A250D5630B4CF539739DF2C5DACB4C659F2488D".to_owned()),
        value_wei: 12 * ETH,
        gas_price_wei: Some(150_000_000_000),
        nonce: 7,
        receipt: Some(EvmReceipt {
            success: true,
            log_topics: topics,
            ..EvmReceipt::default()
        }),
        recipient_is_contract: true,
        ..EvmTransaction::default()
    };
    let assessment = assess_evm(&tx);

    assert_eq!(assessment.risk_score, 20);
    assert_eq!(assessment.risk_level, RiskLevel::Low);
    assert!(assessment.flags.contains(&"Complex transaction with 12 events".to_owned()));
    assert!(assessment.patterns.contains(&RiskPattern::KnownProtocol));
    assert_eq!(
        assessment.details.get("protocol"),
        Some(&json!("Uniswap V2 Router"))
    );
    assert_eq!(assessment.details.get("value"), Some(&json!("12.0")));
}

#[rstest]
fn reverted_contract_creation_is_recorded() {
    let tx = EvmTransaction {
        from: "0xabc".to_owned(),
        nonce: 20_000,
        receipt: Some(EvmReceipt {
            success: false,
            contract_address: Some("0xnew".to_owned()),
            ..EvmReceipt::default()
        }),
        ..EvmTransaction::default()
    };
    let assessment = assess_evm(&tx);

    assert_eq!(assessment.risk_score, 20);
    assert_eq!(
        assessment.patterns,
        vec![
            RiskPattern::FailedTransaction,
            RiskPattern::ContractCreation,
            RiskPattern::HighNonceAccount,
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_transactions_are_not_found() {
    let mut rpc = MockChainRpc::new();
    rpc.expect_evm_transaction()
        .withf(|chain, _| *chain == Chain::Base)
        .returning(|_, _| Ok(None));
    let analyzer = TransactionAnalyzer::new(Arc::new(rpc), Arc::new(DefaultClock));

    let result = analyzer
        .analyze(TxAnalysisRequest {
            tx_hash: "0xdeadbeef00".to_owned(),
            chain: Chain::Base,
        })
        .await;

    assert!(matches!(result, Err(TxServiceError::NotFound { chain: Chain::Base, .. })));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn solana_reports_flatten_the_assessment() {
    let mut rpc = MockChainRpc::new();
    rpc.expect_solana_transaction()
        .returning(|_| Ok(Some(solana_tx())));
    let analyzer = TransactionAnalyzer::new(Arc::new(rpc), Arc::new(DefaultClock));

    let report = analyzer
        .analyze(TxAnalysisRequest {
            tx_hash: "5VERYLONGSIGNATURE".to_owned(),
            chain: Chain::Solana,
        })
        .await
        .expect("analysis succeeds");
    let body = serde_json::to_value(&report).expect("report serialises");

    assert_eq!(body.get("txHash"), Some(&json!("5VERYLONGSIGNATURE")));
    assert_eq!(body.get("chain"), Some(&json!("solana")));
    assert_eq!(body.get("riskLevel"), Some(&json!("low")));
}

//! Unit tests for licence checks and rating arithmetic.

use crate::agent::domain::AgentId;
use crate::marketplace::domain::{
    AccessDenial, LicenseType, MarketplaceDomainError, PersistedPurchaseData, Purchase,
    PurchaseId, PurchaseStatus, Rating, RatingSummary, TxHash,
};
use crate::skill::domain::SkillId;
use chrono::{DateTime, Duration, Utc};
use rstest::rstest;

fn purchase(
    status: PurchaseStatus,
    expires_at: Option<DateTime<Utc>>,
    usage: Option<(u32, u32)>,
) -> Purchase {
    let now = Utc::now();
    Purchase::from_persisted(PersistedPurchaseData {
        id: PurchaseId::new(),
        buyer_id: AgentId::new(),
        skill_id: SkillId::new(),
        license_type: LicenseType::Personal,
        amount_cents: 500,
        currency: "USDC".to_owned(),
        tx_hash: TxHash::new("0xabcdef0123").expect("valid hash"),
        status,
        expires_at,
        usage_limit: usage.map(|(limit, _)| limit),
        current_usage: usage.map_or(0, |(_, used)| used),
        created_at: now,
        updated_at: now,
    })
}

#[rstest]
fn short_tx_hash_is_rejected() {
    assert_eq!(TxHash::new("0xabc"), Err(MarketplaceDomainError::InvalidTxHash));
}

#[rstest]
#[case(0, false)]
#[case(1, true)]
#[case(5, true)]
#[case(6, false)]
fn rating_bounds(#[case] value: i64, #[case] valid: bool) {
    assert_eq!(Rating::new(value).is_ok(), valid);
}

#[rstest]
fn mean_of_no_ratings_is_zero() {
    assert!(RatingSummary::default().mean().abs() < f64::EPSILON);
}

#[rstest]
fn mean_divides_total_by_count() {
    let summary = RatingSummary { total: 9, count: 2 };
    assert!((summary.mean() - 4.5).abs() < f64::EPSILON);
}

#[rstest]
fn active_unlimited_purchase_grants_access() {
    let now = Utc::now();
    assert_eq!(
        purchase(PurchaseStatus::Active, None, None).check_access(now),
        Ok(())
    );
}

#[rstest]
fn elapsed_subscription_is_expired() {
    let now = Utc::now();
    let lapsed = purchase(PurchaseStatus::Active, Some(now - Duration::days(1)), None);
    assert_eq!(lapsed.check_access(now), Err(AccessDenial::Expired));
}

#[rstest]
fn spent_allowance_is_refused() {
    let now = Utc::now();
    let spent = purchase(PurchaseStatus::Active, None, Some((1000, 1000)));
    assert_eq!(spent.check_access(now), Err(AccessDenial::UsageLimitReached));
}

#[rstest]
fn refunded_purchase_is_not_active() {
    let now = Utc::now();
    let refunded = purchase(PurchaseStatus::Refunded, None, None);
    assert_eq!(refunded.check_access(now), Err(AccessDenial::NoActivePurchase));
}

#[rstest]
fn denial_messages_match_wire_text() {
    assert_eq!(AccessDenial::Expired.message(), "Subscription expired");
    assert_eq!(
        AccessDenial::NoActivePurchase.message(),
        "No active purchase found"
    );
}

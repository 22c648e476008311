//! Unit tests for purchase and review orchestration.

use std::sync::Arc;

use crate::agent::{
    adapters::memory::InMemoryAgentRepository,
    domain::{Agent, AgentCredentials, AgentName, AgentProfile},
    ports::AgentRepository,
};
use crate::marketplace::{
    adapters::memory::{InMemoryPurchaseRepository, InMemoryReviewRepository},
    domain::{
        AccessDenial, LicenseType, PersistedPurchaseData, Purchase, PurchaseStatus, TxHash,
    },
    ports::{
        MockPurchaseRepository, PurchaseRepository, PurchaseRepositoryError,
        ReviewRepositoryError,
    },
    services::{
        MarketplaceService, MarketplaceServiceError, PurchaseRequest, PurchaseVerification,
        ReviewRequest,
    },
};
use crate::pagination::PageRequest;
use crate::skill::{
    adapters::memory::InMemorySkillRepository,
    domain::{
        BillingInterval, Pricing, PricingModel, Skill, SkillCategory, SkillDescription,
        SkillDraft, SkillName,
    },
    ports::SkillRepository,
};
use chrono::{Duration, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestMarket = MarketplaceService<
    InMemoryPurchaseRepository,
    InMemoryReviewRepository,
    InMemorySkillRepository,
    InMemoryAgentRepository,
    DefaultClock,
>;

struct Harness {
    market: TestMarket,
    purchases: Arc<InMemoryPurchaseRepository>,
    skills: Arc<InMemorySkillRepository>,
    agents: Arc<InMemoryAgentRepository>,
}

#[fixture]
fn harness() -> Harness {
    let purchases = Arc::new(InMemoryPurchaseRepository::new());
    let skills = Arc::new(InMemorySkillRepository::new());
    let agents = Arc::new(InMemoryAgentRepository::new());
    let market = MarketplaceService::new(
        Arc::clone(&purchases),
        Arc::new(InMemoryReviewRepository::new()),
        Arc::clone(&skills),
        Arc::clone(&agents),
        Arc::new(DefaultClock),
    );
    Harness {
        market,
        purchases,
        skills,
        agents,
    }
}

async fn agent(harness: &Harness, name: &str) -> Agent {
    let (_, credentials) = AgentCredentials::issue();
    let agent = Agent::register(
        AgentName::new(name).expect("valid name"),
        AgentProfile::new(),
        credentials,
        &DefaultClock,
    );
    harness
        .agents
        .register(&agent)
        .await
        .expect("agent should register");
    agent
}

async fn listed_skill(harness: &Harness, seller: &Agent, model: PricingModel) -> Skill {
    let draft = SkillDraft::new(
        SkillName::new("Web Scraper").expect("valid name"),
        SkillDescription::new("Scrapes pages into JSON").expect("valid description"),
        SkillCategory::Utility,
    )
    .with_pricing(Pricing::new(500, None, model).expect("valid pricing"));
    let skill = Skill::publish(seller.id(), draft, &DefaultClock);
    harness
        .skills
        .create(&skill)
        .await
        .expect("skill should store");
    skill
}

fn buy(skill: &Skill, tx_hash: &str) -> PurchaseRequest {
    PurchaseRequest {
        skill_id: skill.id(),
        license_type: LicenseType::Personal,
        tx_hash: tx_hash.to_owned(),
    }
}

fn rate(skill: &Skill, rating: i64) -> ReviewRequest {
    ReviewRequest {
        skill_id: skill.id(),
        rating,
        comment: Some("Works well".to_owned()),
    }
}

async fn stats_of(harness: &Harness, agent: &Agent) -> crate::agent::domain::AgentStats {
    *harness
        .agents
        .find_by_id(agent.id())
        .await
        .expect("lookup should succeed")
        .expect("agent exists")
        .stats()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn purchase_updates_all_counters(harness: Harness) {
    let seller = agent(&harness, "seller_bot").await;
    let buyer = agent(&harness, "buyer_bot").await;
    let skill = listed_skill(&harness, &seller, PricingModel::OneTime).await;

    let purchase = harness
        .market
        .purchase(&buyer, buy(&skill, "0xfeedface01"))
        .await
        .expect("purchase should succeed");

    assert_eq!(purchase.amount_cents(), 500);
    assert_eq!(purchase.status(), PurchaseStatus::Active);
    assert_eq!(stats_of(&harness, &seller).await.total_sales, 1);
    assert_eq!(stats_of(&harness, &buyer).await.total_purchases, 1);
    let stored = harness
        .skills
        .find_by_id(skill.id())
        .await
        .expect("lookup should succeed")
        .expect("skill exists");
    assert_eq!(stored.metrics().download_count, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pricing_model_shapes_the_purchase(harness: Harness) {
    let seller = agent(&harness, "seller_bot").await;
    let buyer = agent(&harness, "buyer_bot").await;
    let subscription = listed_skill(
        &harness,
        &seller,
        PricingModel::Subscription {
            interval: BillingInterval::Weekly,
        },
    )
    .await;

    let purchase = harness
        .market
        .purchase(&buyer, buy(&subscription, "0xfeedface01"))
        .await
        .expect("purchase should succeed");

    assert_eq!(
        purchase.expires_at(),
        Some(purchase.created_at() + Duration::days(7))
    );
    assert_eq!(purchase.usage_limit(), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn buying_own_skill_is_rejected(harness: Harness) {
    let seller = agent(&harness, "seller_bot").await;
    let skill = listed_skill(&harness, &seller, PricingModel::Free).await;

    let result = harness
        .market
        .purchase(&seller, buy(&skill, "0xfeedface01"))
        .await;

    assert!(matches!(result, Err(MarketplaceServiceError::OwnSkill)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_active_purchase_and_reused_tx_are_conflicts(harness: Harness) {
    let seller = agent(&harness, "seller_bot").await;
    let buyer = agent(&harness, "buyer_bot").await;
    let other = agent(&harness, "other_bot").await;
    let skill = listed_skill(&harness, &seller, PricingModel::OneTime).await;
    harness
        .market
        .purchase(&buyer, buy(&skill, "0xfeedface01"))
        .await
        .expect("first purchase should succeed");

    let again = harness
        .market
        .purchase(&buyer, buy(&skill, "0xfeedface02"))
        .await;
    assert!(matches!(again, Err(MarketplaceServiceError::AlreadyOwned(_))));

    let reused = harness
        .market
        .purchase(&other, buy(&skill, "0xfeedface01"))
        .await;
    assert!(matches!(
        reused,
        Err(MarketplaceServiceError::Purchases(
            PurchaseRepositoryError::DuplicateTxHash(_)
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_refuses_a_second_active_purchase_of_the_same_skill(harness: Harness) {
    let seller = agent(&harness, "seller_bot").await;
    let buyer = agent(&harness, "buyer_bot").await;
    let skill = listed_skill(&harness, &seller, PricingModel::OneTime).await;
    let hash = |value: &str| TxHash::new(value).expect("valid hash");
    harness
        .purchases
        .create(&Purchase::new(
            buyer.id(),
            &skill,
            LicenseType::Personal,
            hash("0xfeedface01"),
            &DefaultClock,
        ))
        .await
        .expect("first purchase stores");

    let result = harness
        .purchases
        .create(&Purchase::new(
            buyer.id(),
            &skill,
            LicenseType::Commercial,
            hash("0xfeedface02"),
            &DefaultClock,
        ))
        .await;

    assert!(matches!(
        result,
        Err(PurchaseRepositoryError::ActivePurchaseExists { skill_id, .. }) if skill_id == skill.id()
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_duplicate_purchase_is_reported_as_already_owned(harness: Harness) {
    let seller = agent(&harness, "seller_bot").await;
    let buyer = agent(&harness, "buyer_bot").await;
    let skill = listed_skill(&harness, &seller, PricingModel::OneTime).await;
    let mut purchases = MockPurchaseRepository::new();
    purchases.expect_find_active().returning(|_, _| Ok(None));
    purchases.expect_find_by_tx_hash().returning(|_| Ok(None));
    purchases.expect_create().times(1).returning(|purchase| {
        Err(PurchaseRepositoryError::ActivePurchaseExists {
            buyer_id: purchase.buyer_id(),
            skill_id: purchase.skill_id(),
        })
    });
    let market = MarketplaceService::new(
        Arc::new(purchases),
        Arc::new(InMemoryReviewRepository::new()),
        Arc::clone(&harness.skills),
        Arc::clone(&harness.agents),
        Arc::new(DefaultClock),
    );

    let result = market.purchase(&buyer, buy(&skill, "0xfeedface03")).await;

    assert!(matches!(
        result,
        Err(MarketplaceServiceError::AlreadyOwned(owned)) if owned == skill.id()
    ));
    assert_eq!(stats_of(&harness, &buyer).await.total_purchases, 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn verify_without_purchase_is_denied(harness: Harness) {
    let seller = agent(&harness, "seller_bot").await;
    let buyer = agent(&harness, "buyer_bot").await;
    let skill = listed_skill(&harness, &seller, PricingModel::OneTime).await;

    let outcome = harness
        .market
        .verify(buyer.id(), skill.id())
        .await
        .expect("verify should run");

    assert_eq!(
        outcome,
        PurchaseVerification::Denied(AccessDenial::NoActivePurchase)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn verifying_lapsed_subscription_marks_it_expired(harness: Harness) {
    let seller = agent(&harness, "seller_bot").await;
    let buyer = agent(&harness, "buyer_bot").await;
    let skill = listed_skill(&harness, &seller, PricingModel::OneTime).await;
    let bought_at = Utc::now() - Duration::days(10);
    let lapsed = Purchase::from_persisted(PersistedPurchaseData {
        id: crate::marketplace::domain::PurchaseId::new(),
        buyer_id: buyer.id(),
        skill_id: skill.id(),
        license_type: LicenseType::Personal,
        amount_cents: 500,
        currency: "USDC".to_owned(),
        tx_hash: TxHash::new("0xfeedface01").expect("valid hash"),
        status: PurchaseStatus::Active,
        expires_at: Some(bought_at + Duration::days(1)),
        usage_limit: None,
        current_usage: 0,
        created_at: bought_at,
        updated_at: bought_at,
    });
    harness
        .purchases
        .create(&lapsed)
        .await
        .expect("purchase should store");

    let outcome = harness
        .market
        .verify(buyer.id(), skill.id())
        .await
        .expect("verify should run");

    assert_eq!(outcome, PurchaseVerification::Denied(AccessDenial::Expired));
    let history = harness
        .market
        .my_purchases(buyer.id())
        .await
        .expect("listing should succeed");
    assert_eq!(
        history.first().map(Purchase::status),
        Some(PurchaseStatus::Expired)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reviews_require_a_purchase_and_are_unique(harness: Harness) {
    let seller = agent(&harness, "seller_bot").await;
    let buyer = agent(&harness, "buyer_bot").await;
    let skill = listed_skill(&harness, &seller, PricingModel::OneTime).await;

    let early = harness.market.review(&buyer, rate(&skill, 5)).await;
    assert!(matches!(
        early,
        Err(MarketplaceServiceError::PurchaseRequired(_))
    ));

    harness
        .market
        .purchase(&buyer, buy(&skill, "0xfeedface01"))
        .await
        .expect("purchase should succeed");
    harness
        .market
        .review(&buyer, rate(&skill, 5))
        .await
        .expect("review should succeed");

    let second = harness.market.review(&buyer, rate(&skill, 3)).await;
    assert!(matches!(
        second,
        Err(MarketplaceServiceError::Reviews(
            ReviewRepositoryError::DuplicateReview { .. }
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn skill_rating_is_the_mean_of_reviews(harness: Harness) {
    let seller = agent(&harness, "seller_bot").await;
    let first = agent(&harness, "first_bot").await;
    let second = agent(&harness, "second_bot").await;
    let skill = listed_skill(&harness, &seller, PricingModel::OneTime).await;

    for (buyer, tx, stars) in [(&first, "0xfeedface01", 5), (&second, "0xfeedface02", 2)] {
        harness
            .market
            .purchase(buyer, buy(&skill, tx))
            .await
            .expect("purchase should succeed");
        harness
            .market
            .review(buyer, rate(&skill, stars))
            .await
            .expect("review should succeed");
    }

    let stored = harness
        .skills
        .find_by_id(skill.id())
        .await
        .expect("lookup should succeed")
        .expect("skill exists");
    assert_eq!(stored.metrics().review_count, 2);
    assert!((stored.metrics().rating - 3.5).abs() < f64::EPSILON);

    let page = harness
        .market
        .reviews(skill.id(), PageRequest::first(10))
        .await
        .expect("listing should succeed");
    assert_eq!(page.total, 2);
}

#[rstest]
#[case(0)]
#[case(6)]
#[tokio::test(flavor = "multi_thread")]
async fn out_of_range_ratings_are_rejected(harness: Harness, #[case] stars: i64) {
    let seller = agent(&harness, "seller_bot").await;
    let buyer = agent(&harness, "buyer_bot").await;
    let skill = listed_skill(&harness, &seller, PricingModel::OneTime).await;

    let result = harness.market.review(&buyer, rate(&skill, stars)).await;

    assert!(matches!(result, Err(MarketplaceServiceError::Domain(_))));
}

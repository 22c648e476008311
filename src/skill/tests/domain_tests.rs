//! Unit tests for skill value validation and pricing rules.

use crate::skill::domain::{
    BillingInterval, EndpointMethod, Pricing, PricingModel, SkillCategory, SkillDescription,
    SkillDomainError, SkillEndpoint, SkillName, SkillTags, SkillVersion,
};
use chrono::{TimeZone, Utc};
use rstest::rstest;

#[rstest]
#[case("ab")]
#[case("   ")]
fn short_names_are_rejected(#[case] raw: &str) {
    assert_eq!(SkillName::new(raw), Err(SkillDomainError::InvalidName));
}

#[rstest]
fn description_requires_ten_characters() {
    assert_eq!(
        SkillDescription::new("too short"),
        Err(SkillDomainError::InvalidDescription)
    );
    assert!(SkillDescription::new("long enough text").is_ok());
}

#[rstest]
fn version_defaults_to_one_point_oh() {
    assert_eq!(SkillVersion::default().as_str(), "1.0.0");
}

#[rstest]
fn tags_are_deduplicated_in_order() {
    let tags = SkillTags::new(["scrape".to_owned(), "web".to_owned(), "scrape".to_owned()])
        .expect("valid tags");
    assert_eq!(tags.as_slice(), ["scrape", "web"]);
    assert!(tags.contains_ignoring_case("WEB"));
}

#[rstest]
fn eleven_tags_are_rejected() {
    let tags = (0..11).map(|i| format!("tag{i}"));
    assert_eq!(SkillTags::new(tags), Err(SkillDomainError::InvalidTags));
}

#[rstest]
#[case("ai_ml", SkillCategory::AiMl)]
#[case("ANALYSIS", SkillCategory::Analysis)]
fn categories_parse_case_insensitively(#[case] raw: &str, #[case] expected: SkillCategory) {
    assert_eq!(SkillCategory::try_from(raw), Ok(expected));
}

#[rstest]
fn currency_defaults_and_validates() {
    let default = Pricing::new(500, None, PricingModel::OneTime).expect("valid pricing");
    assert_eq!(default.currency(), "USDC");

    let lowered = Pricing::new(500, Some("eth".to_owned()), PricingModel::OneTime)
        .expect("valid pricing");
    assert_eq!(lowered.currency(), "ETH");

    assert!(matches!(
        Pricing::new(500, Some("X".to_owned()), PricingModel::OneTime),
        Err(SkillDomainError::InvalidCurrency(_))
    ));
}

#[rstest]
#[case(BillingInterval::Daily, Utc.with_ymd_and_hms(2025, 1, 2, 9, 0, 0))]
#[case(BillingInterval::Weekly, Utc.with_ymd_and_hms(2025, 1, 8, 9, 0, 0))]
#[case(BillingInterval::Monthly, Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0))]
fn subscriptions_expire_after_one_interval(
    #[case] interval: BillingInterval,
    #[case] expected: chrono::LocalResult<chrono::DateTime<Utc>>,
) {
    let start = Utc
        .with_ymd_and_hms(2025, 1, 1, 9, 0, 0)
        .single()
        .expect("valid start");
    let pricing = Pricing::new(100, None, PricingModel::Subscription { interval })
        .expect("valid pricing");
    assert_eq!(pricing.expiry_from(start), expected.single());
}

#[rstest]
fn monthly_period_clamps_to_month_end() {
    let start = Utc
        .with_ymd_and_hms(2025, 1, 31, 0, 0, 0)
        .single()
        .expect("valid start");
    let end = BillingInterval::Monthly.period_end(start);
    assert_eq!(end, Utc.with_ymd_and_hms(2025, 2, 28, 0, 0, 0).single());
}

#[rstest]
fn only_usage_pricing_carries_a_limit() {
    let usage = Pricing::new(1, None, PricingModel::Usage).expect("valid pricing");
    assert_eq!(usage.usage_limit(), Some(1000));
    assert_eq!(Pricing::free().usage_limit(), None);
    assert_eq!(usage.expiry_from(Utc::now()), None);
}

#[rstest]
fn pricing_model_uses_tagged_json() {
    let model = PricingModel::Subscription {
        interval: BillingInterval::Weekly,
    };
    let json = serde_json::to_value(model).expect("serialise");
    assert_eq!(
        json,
        serde_json::json!({ "type": "subscription", "interval": "weekly" })
    );
}

#[rstest]
fn endpoint_validation() {
    assert_eq!(
        SkillEndpoint::new(" ", EndpointMethod::Get, None, None),
        Err(SkillDomainError::InvalidEndpointPath)
    );
    assert_eq!(
        SkillEndpoint::new("/run", EndpointMethod::Post, Some("d".repeat(501)), None),
        Err(SkillDomainError::EndpointDescriptionTooLong)
    );
    let endpoint = SkillEndpoint::new(" /run ", EndpointMethod::Post, None, None)
        .expect("valid endpoint");
    assert_eq!(endpoint.path(), "/run");
    assert_eq!(EndpointMethod::try_from("patch"), Ok(EndpointMethod::Patch));
}

//! Unit tests for agent domain types.

use crate::agent::domain::{
    Agent, AgentCredentials, AgentDomainError, AgentName, AgentProfile, AgentStat, AgentStats,
    AgentStatus, ApiKey, ClaimToken, ConnectedWallet, ParseAgentStatusError, VerificationCode,
    WalletAddress, format_units,
};
use mockable::{Clock, DefaultClock};
use rstest::rstest;

fn pending_agent(raw_name: &str) -> Result<Agent, AgentDomainError> {
    let name = AgentName::new(raw_name)?;
    let (_, credentials) = AgentCredentials::issue();
    Ok(Agent::register(
        name,
        AgentProfile::new(),
        credentials,
        &DefaultClock,
    ))
}

// ── AgentName validation ───────────────────────────────────────────

#[rstest]
#[case("abc")]
#[case("swift_crab")]
#[case("data-bot-7")]
#[case("A1234567890123456789012345678901234567890123456789")]
fn valid_agent_names_are_accepted(#[case] input: &str) {
    let name = AgentName::new(input).expect("valid name");
    assert_eq!(name.as_str(), input);
}

#[rstest]
#[case("ab")]
#[case("  ")]
fn short_agent_names_are_rejected(#[case] input: &str) {
    assert!(matches!(
        AgentName::new(input),
        Err(AgentDomainError::AgentNameTooShort(_))
    ));
}

#[rstest]
fn long_agent_names_are_rejected() {
    let input = "a".repeat(51);
    assert!(matches!(
        AgentName::new(input),
        Err(AgentDomainError::AgentNameTooLong(_))
    ));
}

#[rstest]
#[case("has space")]
#[case("dot.name")]
#[case("émile")]
fn invalid_characters_in_agent_name_are_rejected(#[case] input: &str) {
    assert!(matches!(
        AgentName::new(input),
        Err(AgentDomainError::InvalidAgentName(_))
    ));
}

#[rstest]
fn canonical_name_ignores_case() {
    let upper = AgentName::new("Alpha_Bot").expect("valid name");
    let lower = AgentName::new("alpha_bot").expect("valid name");
    assert_eq!(upper.canonical(), lower.canonical());
    assert_ne!(upper, lower);
}

// ── Credentials ────────────────────────────────────────────────────

#[rstest]
fn api_key_has_prefix_and_hex_body() {
    let key = ApiKey::generate();
    let body = key
        .expose()
        .strip_prefix("clawos_")
        .expect("key should carry prefix");
    assert_eq!(body.len(), 64);
    assert!(body.chars().all(|c| c.is_ascii_hexdigit()));
}

#[rstest]
fn api_key_digest_is_stable_sha256() {
    let key = ApiKey::from_presented("abc");
    assert_eq!(
        key.digest().as_str(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[rstest]
fn api_key_debug_output_is_redacted() {
    let key = ApiKey::generate();
    assert!(!format!("{key:?}").contains(key.expose()));
}

#[rstest]
fn claim_url_joins_app_url_and_token() {
    let token = ClaimToken::parse("clawos_claim_abc").expect("valid token");
    assert_eq!(
        token.claim_url("https://clawos.example/"),
        "https://clawos.example/claim/clawos_claim_abc"
    );
}

#[rstest]
fn verification_code_has_three_parts() {
    let code = VerificationCode::generate();
    let parts: Vec<&str> = code.as_str().split('-').collect();
    assert_eq!(parts.len(), 3);
    let number: u16 = parts
        .get(2)
        .expect("number part")
        .parse()
        .expect("numeric suffix");
    assert!((1000..10000).contains(&number));
}

// ── Profile ────────────────────────────────────────────────────────

#[rstest]
fn description_over_limit_is_rejected() {
    let result = AgentProfile::new().with_description(Some("x".repeat(501)));
    assert_eq!(result, Err(AgentDomainError::DescriptionTooLong));
}

#[rstest]
#[case("no-at-sign")]
#[case("@example.com")]
#[case("user@localhost")]
fn malformed_emails_are_rejected(#[case] input: &str) {
    let result = AgentProfile::new().with_email(Some(input.to_owned()));
    assert!(matches!(result, Err(AgentDomainError::InvalidEmail(_))));
}

#[rstest]
fn relative_website_url_is_rejected() {
    let result = AgentProfile::new().with_website_url(Some("/about".to_owned()));
    assert!(matches!(
        result,
        Err(AgentDomainError::InvalidUrl {
            field: "website",
            ..
        })
    ));
}

#[rstest]
fn blank_fields_clear_the_profile() {
    let profile = AgentProfile::new()
        .with_description(Some("  ".to_owned()))
        .expect("blank description is allowed");
    assert_eq!(profile.description(), None);
}

// ── Aggregate ──────────────────────────────────────────────────────

#[rstest]
fn new_agent_is_pending_claim_with_zero_stats() {
    let agent = pending_agent("swift_crab").expect("valid agent");
    assert_eq!(agent.status(), AgentStatus::PendingClaim);
    assert_eq!(*agent.stats(), AgentStats::default());
    assert!(agent.claim().is_none());
}

#[rstest]
fn claim_strips_at_sign_and_marks_claimed() {
    let mut agent = pending_agent("swift_crab").expect("valid agent");
    agent
        .claim_by("@owner", Some("https://x.com/owner/status/1".to_owned()), &DefaultClock)
        .expect("claim should succeed");

    assert_eq!(agent.status(), AgentStatus::Claimed);
    assert_eq!(agent.claim().map(|c| c.x_handle()), Some("owner"));
}

#[rstest]
fn second_claim_is_rejected() {
    let mut agent = pending_agent("swift_crab").expect("valid agent");
    agent
        .claim_by("owner", None, &DefaultClock)
        .expect("first claim should succeed");

    let second = agent.claim_by("other", None, &DefaultClock);
    assert_eq!(second, Err(AgentDomainError::AlreadyClaimed));
}

#[rstest]
fn stats_saturate_at_zero() {
    let mut stats = AgentStats::default();
    stats.adjust(AgentStat::SkillCount, 2);
    stats.adjust(AgentStat::SkillCount, -5);
    assert_eq!(stats.get(AgentStat::SkillCount), 0);
}

#[rstest]
#[case("pending_claim", AgentStatus::PendingClaim)]
#[case("CLAIMED", AgentStatus::Claimed)]
fn status_parses_storage_values(#[case] input: &str, #[case] expected: AgentStatus) {
    assert_eq!(AgentStatus::try_from(input), Ok(expected));
}

#[rstest]
fn unknown_status_is_rejected() {
    assert_eq!(
        AgentStatus::try_from("banned"),
        Err(ParseAgentStatusError("banned".to_owned()))
    );
}

// ── Wallets ────────────────────────────────────────────────────────

#[rstest]
fn wallet_addresses_are_stored_lowercase() {
    let address = WalletAddress::new(" 0xAbCdEf0123456789aBcDeF0123456789AbCdEf01 ")
        .expect("valid address");
    assert_eq!(address.as_str(), "0xabcdef0123456789abcdef0123456789abcdef01");
}

#[rstest]
#[case("")]
#[case("0x")]
#[case("0xabcdef0123456789abcdef0123456789abcdef0")]
#[case("0Xabcdef0123456789abcdef0123456789abcdef01")]
#[case("0xabcdef0123456789abcdef0123456789abcdefgg")]
fn malformed_wallet_addresses_are_rejected(#[case] input: &str) {
    assert!(matches!(
        WalletAddress::new(input),
        Err(AgentDomainError::InvalidWalletAddress(_))
    ));
}

#[rstest]
fn disconnecting_returns_the_previous_wallet() {
    let mut agent = pending_agent("wallet_holder").expect("valid agent");
    let address = WalletAddress::new("0x0000000000000000000000000000000000000001")
        .expect("valid address");
    let wallet = ConnectedWallet::new(address, 8453, DefaultClock.utc());

    agent.connect_wallet(wallet.clone(), &DefaultClock);

    assert_eq!(agent.wallet(), Some(&wallet));
    assert_eq!(agent.disconnect_wallet(&DefaultClock), Some(wallet));
    assert_eq!(agent.wallet(), None);
}

#[rstest]
#[case(0, 6, "0.0")]
#[case(1_500_000, 6, "1.5")]
#[case(1, 6, "0.000001")]
#[case(12_340_000_000, 6, "12340.0")]
#[case(7, 0, "7.0")]
fn token_amounts_render_as_decimals(
    #[case] raw: u128,
    #[case] decimals: usize,
    #[case] expected: &str,
) {
    assert_eq!(format_units(raw, decimals), expected);
}

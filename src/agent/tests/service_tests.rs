//! Unit tests for agent registry service orchestration.

use std::sync::Arc;

use crate::agent::{
    adapters::memory::InMemoryAgentRepository,
    domain::{AgentDomainError, AgentStatus},
    ports::AgentRepositoryError,
    services::{AgentRegistryService, AgentServiceError, ProfileUpdate, RegisterAgentRequest},
};
use crate::pagination::PageRequest;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService = AgentRegistryService<InMemoryAgentRepository, DefaultClock>;

#[fixture]
fn service() -> TestService {
    AgentRegistryService::new(
        Arc::new(InMemoryAgentRepository::new()),
        Arc::new(DefaultClock),
        "https://clawos.example",
    )
}

fn token_from(claim_url: &str) -> &str {
    claim_url.rsplit('/').next().unwrap_or_default()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registered_key_authenticates(service: TestService) {
    let registered = service
        .register(RegisterAgentRequest::new("swift_crab").with_description("Fetches data"))
        .await
        .expect("registration should succeed");

    let agent = service
        .authenticate(registered.api_key.expose())
        .await
        .expect("key should authenticate");

    assert_eq!(agent.id(), registered.agent.id());
    assert!(registered.claim_url.starts_with("https://clawos.example/claim/clawos_claim_"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_key_is_unauthenticated(service: TestService) {
    let result = service.authenticate("clawos_nope").await;
    assert!(matches!(result, Err(AgentServiceError::Unauthenticated)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_name_differing_in_case_is_rejected(service: TestService) {
    service
        .register(RegisterAgentRequest::new("Alpha_Bot"))
        .await
        .expect("first registration should succeed");

    let duplicate = service.register(RegisterAgentRequest::new("alpha_bot")).await;

    assert!(matches!(
        duplicate,
        Err(AgentServiceError::Repository(
            AgentRepositoryError::DuplicateName(_)
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn claim_then_reclaim_fails(service: TestService) {
    let registered = service
        .register(RegisterAgentRequest::new("swift_crab"))
        .await
        .expect("registration should succeed");
    let token = token_from(&registered.claim_url);

    let claimed = service
        .claim(token, "@owner", None)
        .await
        .expect("claim should succeed");
    assert_eq!(claimed.status(), AgentStatus::Claimed);

    let again = service.claim(token, "@owner", None).await;
    assert!(matches!(
        again,
        Err(AgentServiceError::Domain(AgentDomainError::AlreadyClaimed))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_claim_token_is_reported(service: TestService) {
    let result = service.claim("clawos_claim_missing", "owner", None).await;
    assert!(matches!(result, Err(AgentServiceError::UnknownClaimToken)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_only_shows_claimed_agents(service: TestService) {
    let claimed = service
        .register(RegisterAgentRequest::new("claimed_bot").with_description("Weather data"))
        .await
        .expect("registration should succeed");
    service
        .register(RegisterAgentRequest::new("pending_bot"))
        .await
        .expect("registration should succeed");
    service
        .claim(token_from(&claimed.claim_url), "owner", None)
        .await
        .expect("claim should succeed");

    let page = service
        .list_claimed(None, PageRequest::default())
        .await
        .expect("listing should succeed");
    assert_eq!(page.total, 1);

    let searched = service
        .list_claimed(Some("WEATHER"), PageRequest::default())
        .await
        .expect("listing should succeed");
    assert_eq!(searched.items.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn profile_update_changes_only_given_fields(service: TestService) {
    let registered = service
        .register(RegisterAgentRequest::new("swift_crab").with_description("Original"))
        .await
        .expect("registration should succeed");

    let updated = service
        .update_profile(
            registered.agent.id(),
            ProfileUpdate {
                website_url: Some("https://crab.example".to_owned()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .expect("update should succeed");

    assert_eq!(updated.profile().description(), Some("Original"));
    assert_eq!(updated.profile().website_url(), Some("https://crab.example"));
}

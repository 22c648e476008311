//! Unit tests for wallet linking.

use std::sync::Arc;

use crate::agent::{
    adapters::memory::InMemoryAgentRepository,
    domain::{
        Agent, AgentCredentials, AgentDomainError, AgentName, AgentProfile, DEFAULT_CHAIN_ID,
    },
    ports::{AgentRepository, AgentRepositoryError},
    services::{ConnectWalletRequest, WalletService, WalletServiceError},
};
use crate::skill_runtime::ports::{MockChainRpc, OutboundError};
use mockable::DefaultClock;
use rstest::rstest;

type TestService = WalletService<InMemoryAgentRepository, MockChainRpc, DefaultClock>;

const ADDRESS: &str = "0xAbCdEf0123456789aBcDeF0123456789AbCdEf01";

fn service_with(chain: MockChainRpc) -> (TestService, Arc<InMemoryAgentRepository>) {
    let repository = Arc::new(InMemoryAgentRepository::new());
    let service = WalletService::new(
        Arc::clone(&repository),
        Arc::new(chain),
        Arc::new(DefaultClock),
    );
    (service, repository)
}

async fn stored_agent(repository: &InMemoryAgentRepository, name: &str) -> Agent {
    let (_, credentials) = AgentCredentials::issue();
    let agent = Agent::register(
        AgentName::new(name).expect("valid name"),
        AgentProfile::new(),
        credentials,
        &DefaultClock,
    );
    repository.register(&agent).await.expect("register agent");
    agent
}

fn connect_request(chain_id: Option<u64>) -> ConnectWalletRequest {
    ConnectWalletRequest {
        wallet_address: ADDRESS.to_owned(),
        chain_id,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn connecting_defaults_to_base_and_normalises_the_address() {
    let (service, repository) = service_with(MockChainRpc::new());
    let agent = stored_agent(&repository, "wallet_owner").await;

    let wallet = service
        .connect(&agent, connect_request(None))
        .await
        .expect("connect");

    assert_eq!(wallet.chain_id(), DEFAULT_CHAIN_ID);
    assert_eq!(wallet.address().as_str(), ADDRESS.to_ascii_lowercase());
    let stored = repository
        .find_by_id(agent.id())
        .await
        .expect("lookup")
        .expect("agent present");
    assert_eq!(stored.wallet(), Some(&wallet));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_wallet_belongs_to_one_agent() {
    let (service, repository) = service_with(MockChainRpc::new());
    let first = stored_agent(&repository, "first_owner").await;
    let second = stored_agent(&repository, "second_owner").await;
    service
        .connect(&first, connect_request(None))
        .await
        .expect("first connect");

    let result = service.connect(&second, connect_request(Some(1))).await;

    assert!(matches!(
        result,
        Err(WalletServiceError::Repository(AgentRepositoryError::WalletInUse(_)))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reconnecting_the_same_wallet_is_allowed() {
    let (service, repository) = service_with(MockChainRpc::new());
    let agent = stored_agent(&repository, "steady_owner").await;
    let first = service
        .connect(&agent, connect_request(None))
        .await
        .expect("first connect");
    let current = repository
        .find_by_id(agent.id())
        .await
        .expect("lookup")
        .expect("agent present");

    let second = service
        .connect(&current, connect_request(Some(10)))
        .await
        .expect("reconnect");

    assert_eq!(second.address(), first.address());
    assert_eq!(second.chain_id(), 10);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overview_reports_the_usdc_balance() {
    let mut chain = MockChainRpc::new();
    chain
        .expect_erc20_balance()
        .times(1)
        .returning(|_, _, _| Ok(1_500_000));
    let (service, repository) = service_with(chain);
    let agent = stored_agent(&repository, "rich_owner").await;
    service
        .connect(&agent, connect_request(None))
        .await
        .expect("connect");

    let overview = service.overview(agent.id()).await.expect("overview");

    assert_eq!(overview.on_chain_balance.as_deref(), Some("1.5"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn an_unreachable_node_leaves_the_balance_empty() {
    let mut chain = MockChainRpc::new();
    chain
        .expect_erc20_balance()
        .returning(|_, _, _| Err(OutboundError::invalid_response("node down")));
    let (service, repository) = service_with(chain);
    let agent = stored_agent(&repository, "offline_owner").await;
    service
        .connect(&agent, connect_request(None))
        .await
        .expect("connect");

    let overview = service.overview(agent.id()).await.expect("overview");

    assert_eq!(overview.on_chain_balance, None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn chains_without_a_known_usdc_contract_skip_the_lookup() {
    let mut chain = MockChainRpc::new();
    chain.expect_erc20_balance().never();
    let (service, repository) = service_with(chain);
    let agent = stored_agent(&repository, "mainnet_owner").await;
    service
        .connect(&agent, connect_request(Some(1)))
        .await
        .expect("connect");

    let overview = service.overview(agent.id()).await.expect("overview");

    assert_eq!(overview.on_chain_balance, None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn disconnecting_frees_the_wallet() {
    let (service, repository) = service_with(MockChainRpc::new());
    let first = stored_agent(&repository, "leaving_owner").await;
    let second = stored_agent(&repository, "next_owner").await;
    service
        .connect(&first, connect_request(None))
        .await
        .expect("connect");
    let current = repository
        .find_by_id(first.id())
        .await
        .expect("lookup")
        .expect("agent present");

    let previous = service.disconnect(&current).await.expect("disconnect");

    assert!(previous.is_some());
    assert!(matches!(
        service.overview(first.id()).await,
        Err(WalletServiceError::NoWallet)
    ));
    service
        .connect(&second, connect_request(None))
        .await
        .expect("wallet is free again");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn disconnecting_without_a_wallet_is_a_no_op() {
    let (service, repository) = service_with(MockChainRpc::new());
    let agent = stored_agent(&repository, "walletless").await;

    let previous = service.disconnect(&agent).await.expect("disconnect");

    assert_eq!(previous, None);
}

#[rstest]
#[case("0x1234")]
#[case("AbCdEf0123456789aBcDeF0123456789AbCdEf0123")]
#[case("0xZZCdEf0123456789aBcDeF0123456789AbCdEf01")]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_addresses_are_rejected(#[case] address: &str) {
    let (service, repository) = service_with(MockChainRpc::new());
    let agent = stored_agent(&repository, "careless_owner").await;

    let result = service
        .connect(
            &agent,
            ConnectWalletRequest {
                wallet_address: address.to_owned(),
                chain_id: None,
            },
        )
        .await;

    assert!(matches!(
        result,
        Err(WalletServiceError::Domain(AgentDomainError::InvalidWalletAddress(_)))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn challenge_names_the_agent_and_wallet() {
    let (service, repository) = service_with(MockChainRpc::new());
    let agent = stored_agent(&repository, "signing_owner").await;

    let challenge = service.challenge(&agent, ADDRESS).expect("challenge");

    assert!(challenge.nonce.starts_with("ClawOS Wallet Verification\nAgent: signing_owner\n"));
    assert!(challenge.nonce.contains(&ADDRESS.to_ascii_lowercase()));
    assert!(challenge.message.ends_with(&ADDRESS.to_ascii_lowercase()));
}

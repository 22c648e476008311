//! Shared application state handed to every handler.

use crate::activity::{
    adapters::{memory::InMemoryActivityLog, postgres::PostgresActivityLog},
    ports::ActivityLogRepository,
    services::ActivityJournal,
};
use crate::agent::{
    adapters::{memory::InMemoryAgentRepository, postgres::PostgresAgentRepository},
    ports::AgentRepository,
    services::{AgentRegistryService, WalletService},
};
use crate::chat::{
    adapters::{memory::InMemoryChatRepository, postgres::PostgresChatRepository},
    ports::ChatRepository,
    services::ChatRoomService,
};
use crate::job::{
    adapters::{memory::InMemoryJobRepository, postgres::PostgresJobRepository},
    ports::JobRepository,
    services::JobBoardService,
};
use crate::marketplace::{
    adapters::{
        memory::{InMemoryPurchaseRepository, InMemoryReviewRepository},
        postgres::{PostgresPurchaseRepository, PostgresReviewRepository},
    },
    ports::{PurchaseRepository, ReviewRepository},
    services::MarketplaceService,
};
use crate::persistence::PgPool;
use crate::skill::{
    adapters::{memory::InMemorySkillRepository, postgres::PostgresSkillRepository},
    ports::SkillRepository,
    services::SkillCatalogService,
};
use crate::skill_runtime::{
    domain::LocalAnalyzer,
    ports::{ChainRpc, CompletionClient, PageFetcher, WebhookPoster},
    services::{ScrapeService, SlackNotifier, TextAnalysisService, TransactionAnalyzer},
};
use mockable::DefaultClock;
use std::sync::Arc;

/// Agent registry over the configured store.
pub type Agents = AgentRegistryService<dyn AgentRepository, DefaultClock>;
/// Wallet linking over the configured store and chain client.
pub type Wallets = WalletService<dyn AgentRepository, dyn ChainRpc, DefaultClock>;
/// Activity journal over the configured store.
pub type Journal = ActivityJournal<dyn ActivityLogRepository, DefaultClock>;
/// Skill catalogue over the configured store.
pub type Skills = SkillCatalogService<
    dyn SkillRepository,
    dyn AgentRepository,
    dyn ActivityLogRepository,
    DefaultClock,
>;
/// Job board over the configured store.
pub type Jobs =
    JobBoardService<dyn JobRepository, dyn AgentRepository, dyn ActivityLogRepository, DefaultClock>;
/// Chat room over the configured store.
pub type Chat = ChatRoomService<dyn ChatRepository, dyn ActivityLogRepository, DefaultClock>;
/// Marketplace over the configured store.
pub type Marketplace = MarketplaceService<
    dyn PurchaseRepository,
    dyn ReviewRepository,
    dyn SkillRepository,
    dyn AgentRepository,
    DefaultClock,
>;
/// Text analysis over the configured completion backend.
pub type TextAnalysis = TextAnalysisService<dyn CompletionClient>;
/// Rate-limited scraper.
pub type Scraper = ScrapeService<dyn PageFetcher, DefaultClock>;
/// Slack delivery.
pub type Slack = SlackNotifier<dyn WebhookPoster, DefaultClock>;
/// Transaction risk analysis.
pub type Transactions = TransactionAnalyzer<dyn ChainRpc, DefaultClock>;

/// Repository set backing the services.
#[derive(Clone)]
pub struct Repositories {
    /// Agent store.
    pub agents: Arc<dyn AgentRepository>,
    /// Skill store.
    pub skills: Arc<dyn SkillRepository>,
    /// Job store.
    pub jobs: Arc<dyn JobRepository>,
    /// Chat store.
    pub chat: Arc<dyn ChatRepository>,
    /// Activity log store.
    pub activity: Arc<dyn ActivityLogRepository>,
    /// Purchase store.
    pub purchases: Arc<dyn PurchaseRepository>,
    /// Review store.
    pub reviews: Arc<dyn ReviewRepository>,
}

impl Repositories {
    /// Creates empty in-memory stores.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            agents: Arc::new(InMemoryAgentRepository::new()),
            skills: Arc::new(InMemorySkillRepository::new()),
            jobs: Arc::new(InMemoryJobRepository::new()),
            chat: Arc::new(InMemoryChatRepository::new()),
            activity: Arc::new(InMemoryActivityLog::new()),
            purchases: Arc::new(InMemoryPurchaseRepository::new()),
            reviews: Arc::new(InMemoryReviewRepository::new()),
        }
    }

    /// Creates `PostgreSQL` stores sharing `pool`.
    #[must_use]
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            agents: Arc::new(PostgresAgentRepository::new(pool.clone())),
            skills: Arc::new(PostgresSkillRepository::new(pool.clone())),
            jobs: Arc::new(PostgresJobRepository::new(pool.clone())),
            chat: Arc::new(PostgresChatRepository::new(pool.clone())),
            activity: Arc::new(PostgresActivityLog::new(pool.clone())),
            purchases: Arc::new(PostgresPurchaseRepository::new(pool.clone())),
            reviews: Arc::new(PostgresReviewRepository::new(pool.clone())),
        }
    }
}

/// Outbound clients used by the executable skills.
#[derive(Clone)]
pub struct Outbound {
    /// Web page fetcher for scraping.
    pub pages: Arc<dyn PageFetcher>,
    /// Slack webhook poster.
    pub webhooks: Arc<dyn WebhookPoster>,
    /// Chain node client.
    pub chain: Arc<dyn ChainRpc>,
    /// Remote text analysis; local analysis only when `None`.
    pub completion: Option<Arc<dyn CompletionClient>>,
}

/// Services shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Agent registry and authentication.
    pub agents: Agents,
    /// Wallet linking.
    pub wallets: Wallets,
    /// Skill catalogue.
    pub skills: Skills,
    /// Job board.
    pub jobs: Jobs,
    /// Chat room.
    pub chat: Chat,
    /// Activity log.
    pub journal: Journal,
    /// Purchases and reviews.
    pub marketplace: Marketplace,
    /// Text analysis skill.
    pub text: TextAnalysis,
    /// Web scraping skill.
    pub scraper: Scraper,
    /// Slack notification skill.
    pub slack: Slack,
    /// Transaction risk skill.
    pub transactions: Transactions,
    /// Whether client addresses come from `X-Forwarded-For`.
    pub trust_proxy: bool,
}

impl AppState {
    /// Wires the services over `repositories` and `outbound`.
    ///
    /// `app_url` is the public base URL used in claim links.
    ///
    /// # Errors
    ///
    /// Returns [`regex::Error`] when the local analyser's word patterns
    /// fail to compile.
    pub fn new(
        repositories: Repositories,
        outbound: Outbound,
        app_url: &str,
        clock: Arc<DefaultClock>,
    ) -> Result<Self, regex::Error> {
        let Repositories {
            agents,
            skills,
            jobs,
            chat,
            activity,
            purchases,
            reviews,
        } = repositories;
        let journal = ActivityJournal::new(activity, Arc::clone(&clock));

        Ok(Self {
            agents: AgentRegistryService::new(Arc::clone(&agents), Arc::clone(&clock), app_url),
            wallets: WalletService::new(
                Arc::clone(&agents),
                Arc::clone(&outbound.chain),
                Arc::clone(&clock),
            ),
            skills: SkillCatalogService::new(
                Arc::clone(&skills),
                Arc::clone(&agents),
                journal.clone(),
                Arc::clone(&clock),
            ),
            jobs: JobBoardService::new(
                jobs,
                Arc::clone(&agents),
                journal.clone(),
                Arc::clone(&clock),
            ),
            chat: ChatRoomService::new(chat, journal.clone(), Arc::clone(&clock)),
            marketplace: MarketplaceService::new(
                purchases,
                reviews,
                skills,
                agents,
                Arc::clone(&clock),
            ),
            journal,
            text: TextAnalysisService::new(outbound.completion, LocalAnalyzer::new()?),
            scraper: ScrapeService::new(outbound.pages, Arc::clone(&clock)),
            slack: SlackNotifier::new(outbound.webhooks, Arc::clone(&clock)),
            transactions: TransactionAnalyzer::new(outbound.chain, clock),
            trust_proxy: false,
        })
    }

    /// Keys client identity on the address a reverse proxy appends to
    /// `X-Forwarded-For` when `trusted` is set.
    #[must_use]
    pub const fn with_trusted_proxy(mut self, trusted: bool) -> Self {
        self.trust_proxy = trusted;
        self
    }
}

//! `PostgreSQL` repository implementation for agents.

use super::{
    models::{AgentRow, NewAgentRow},
    schema::agents,
};
use crate::agent::{
    domain::{
        Agent, AgentId, AgentName, AgentProfile, AgentStat, AgentStats, AgentStatus, ApiKeyHash,
        ClaimToken, ConnectedWallet, OwnerClaim, PersistedAgentData, VerificationCode,
        WalletAddress,
    },
    ports::{AgentRepository, AgentRepositoryError, AgentRepositoryResult},
};
use crate::pagination::{Page, PageRequest};
use crate::persistence::{
    PgPool, column_to_counter, contains_pattern, count_to_total, counter_to_column, page_bounds,
    run_blocking, unique_violation,
};
use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{Integer, Uuid as SqlUuid};

/// `PostgreSQL`-backed agent repository.
#[derive(Debug, Clone)]
pub struct PostgresAgentRepository {
    pool: PgPool,
}

impl PostgresAgentRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> AgentRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> AgentRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(&self.pool, AgentRepositoryError::from_boxed, f).await
    }

    async fn find_one<F>(&self, filter: F) -> AgentRepositoryResult<Option<Agent>>
    where
        F: FnOnce(agents::BoxedQuery<'static, Pg>) -> agents::BoxedQuery<'static, Pg>
            + Send
            + 'static,
    {
        self.run(move |connection| {
            let row = filter(agents::table.into_boxed())
                .select(AgentRow::as_select())
                .first::<AgentRow>(connection)
                .optional()
                .map_err(AgentRepositoryError::persistence)?;
            row.map(row_to_agent).transpose()
        })
        .await
    }
}

#[async_trait]
impl AgentRepository for PostgresAgentRepository {
    async fn register(&self, agent: &Agent) -> AgentRepositoryResult<()> {
        let agent_id = agent.id();
        let agent_name = agent.name().clone();
        let new_row = to_new_row(agent)?;

        self.run(move |connection| {
            diesel::insert_into(agents::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match unique_violation(&err) {
                    Some("idx_agents_name_key") => {
                        AgentRepositoryError::DuplicateName(agent_name.clone())
                    }
                    Some("idx_agents_api_key_hash" | "idx_agents_claim_token") => {
                        AgentRepositoryError::DuplicateCredential
                    }
                    Some(_) => AgentRepositoryError::DuplicateAgent(agent_id),
                    None => AgentRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, agent: &Agent) -> AgentRepositoryResult<()> {
        let agent_id = agent.id();
        let wallet = agent.wallet().map(|held| held.address().clone());
        let row = to_new_row(agent)?;

        self.run(move |connection| {
            let updated_count =
                diesel::update(agents::table.filter(agents::id.eq(agent_id.into_inner())))
                    .set((
                        agents::description.eq(&row.description),
                        agents::email.eq(&row.email),
                        agents::avatar_url.eq(&row.avatar_url),
                        agents::website_url.eq(&row.website_url),
                        agents::status.eq(&row.status),
                        agents::owner_x_handle.eq(&row.owner_x_handle),
                        agents::owner_tweet_url.eq(&row.owner_tweet_url),
                        agents::claimed_at.eq(row.claimed_at),
                        agents::wallet_address.eq(&row.wallet_address),
                        agents::wallet_chain_id.eq(row.wallet_chain_id),
                        agents::wallet_connected_at.eq(row.wallet_connected_at),
                        agents::updated_at.eq(row.updated_at),
                    ))
                    .execute(connection)
                    .map_err(|err| match (unique_violation(&err), &wallet) {
                        (Some("idx_agents_wallet_address"), Some(address)) => {
                            AgentRepositoryError::WalletInUse(address.clone())
                        }
                        _ => AgentRepositoryError::persistence(err),
                    })?;

            if updated_count == 0 {
                return Err(AgentRepositoryError::NotFound(agent_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: AgentId) -> AgentRepositoryResult<Option<Agent>> {
        self.find_one(move |query| query.filter(agents::id.eq(id.into_inner())))
            .await
    }

    async fn find_by_name(&self, name: &AgentName) -> AgentRepositoryResult<Option<Agent>> {
        let name_key = name.canonical();
        self.find_one(move |query| query.filter(agents::name_key.eq(name_key)))
            .await
    }

    async fn find_by_api_key_hash(
        &self,
        hash: &ApiKeyHash,
    ) -> AgentRepositoryResult<Option<Agent>> {
        let digest = hash.as_str().to_owned();
        self.find_one(move |query| query.filter(agents::api_key_hash.eq(digest)))
            .await
    }

    async fn find_by_wallet(
        &self,
        address: &WalletAddress,
    ) -> AgentRepositoryResult<Option<Agent>> {
        let value = address.as_str().to_owned();
        self.find_one(move |query| query.filter(agents::wallet_address.eq(value)))
            .await
    }

    async fn find_by_claim_token(
        &self,
        token: &ClaimToken,
    ) -> AgentRepositoryResult<Option<Agent>> {
        let token_value = token.as_str().to_owned();
        self.find_one(move |query| query.filter(agents::claim_token.eq(token_value)))
            .await
    }

    async fn list_claimed(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> AgentRepositoryResult<Page<Agent>> {
        let pattern = search.map(contains_pattern);
        let (limit, offset) = page_bounds(page);

        self.run(move |connection| {
            let total: i64 = claimed_query(pattern.as_deref())
                .count()
                .get_result(connection)
                .map_err(AgentRepositoryError::persistence)?;
            let rows = claimed_query(pattern.as_deref())
                .order(agents::created_at.desc())
                .limit(limit)
                .offset(offset)
                .select(AgentRow::as_select())
                .load::<AgentRow>(connection)
                .map_err(AgentRepositoryError::persistence)?;
            let items = rows
                .into_iter()
                .map(row_to_agent)
                .collect::<AgentRepositoryResult<Vec<_>>>()?;
            Ok(Page::new(items, count_to_total(total), page))
        })
        .await
    }

    async fn adjust_stat(
        &self,
        id: AgentId,
        stat: AgentStat,
        delta: i32,
    ) -> AgentRepositoryResult<()> {
        let column = stat_column(stat);
        let statement =
            format!("UPDATE agents SET {column} = GREATEST({column} + $1, 0) WHERE id = $2");

        self.run(move |connection| {
            let updated_count = diesel::sql_query(statement)
                .bind::<Integer, _>(delta)
                .bind::<SqlUuid, _>(id.into_inner())
                .execute(connection)
                .map_err(AgentRepositoryError::persistence)?;
            if updated_count == 0 {
                return Err(AgentRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn claimed_query(pattern: Option<&str>) -> agents::BoxedQuery<'static, Pg> {
    let mut query = agents::table
        .filter(agents::status.eq(AgentStatus::Claimed.as_str()))
        .into_boxed();
    if let Some(text) = pattern {
        query = query.filter(
            agents::name
                .ilike(text.to_owned())
                .or(agents::description.ilike(text.to_owned())),
        );
    }
    query
}

const fn stat_column(stat: AgentStat) -> &'static str {
    match stat {
        AgentStat::Reputation => "reputation",
        AgentStat::SkillCount => "skill_count",
        AgentStat::CompletedJobs => "completed_jobs",
        AgentStat::TotalSales => "total_sales",
        AgentStat::TotalPurchases => "total_purchases",
    }
}

fn to_new_row(agent: &Agent) -> AgentRepositoryResult<NewAgentRow> {
    let profile = agent.profile();
    let claim = agent.claim();
    let wallet = agent.wallet();
    let stats = agent.stats();
    let wallet_chain_id = wallet
        .map(|held| i64::try_from(held.chain_id()))
        .transpose()
        .map_err(AgentRepositoryError::persistence)?;

    Ok(NewAgentRow {
        id: agent.id().into_inner(),
        name: agent.name().as_str().to_owned(),
        name_key: agent.name().canonical(),
        description: profile.description().unwrap_or_default().to_owned(),
        email: profile.email().map(str::to_owned),
        avatar_url: profile.avatar_url().map(str::to_owned),
        website_url: profile.website_url().map(str::to_owned),
        status: agent.status().as_str().to_owned(),
        api_key_hash: agent.api_key_hash().as_str().to_owned(),
        claim_token: agent.claim_token().as_str().to_owned(),
        verification_code: agent.verification_code().as_str().to_owned(),
        owner_x_handle: claim.map(|c| c.x_handle().to_owned()),
        owner_tweet_url: claim.and_then(|c| c.tweet_url().map(str::to_owned)),
        claimed_at: claim.map(OwnerClaim::claimed_at),
        wallet_address: wallet.map(|held| held.address().as_str().to_owned()),
        wallet_chain_id,
        wallet_connected_at: wallet.map(ConnectedWallet::connected_at),
        reputation: counter_to_column(stats.reputation),
        skill_count: counter_to_column(stats.skill_count),
        completed_jobs: counter_to_column(stats.completed_jobs),
        total_sales: counter_to_column(stats.total_sales),
        total_purchases: counter_to_column(stats.total_purchases),
        created_at: agent.created_at(),
        updated_at: agent.updated_at(),
    })
}

fn row_to_agent(row: AgentRow) -> AgentRepositoryResult<Agent> {
    let AgentRow {
        id,
        name,
        description,
        email,
        avatar_url,
        website_url,
        status,
        api_key_hash,
        claim_token,
        verification_code,
        owner_x_handle,
        owner_tweet_url,
        claimed_at,
        wallet_address,
        wallet_chain_id,
        wallet_connected_at,
        reputation,
        skill_count,
        completed_jobs,
        total_sales,
        total_purchases,
        created_at,
        updated_at,
    } = row;

    let profile = AgentProfile::new()
        .with_description(Some(description))
        .and_then(|p| p.with_email(email))
        .and_then(|p| p.with_avatar_url(avatar_url))
        .and_then(|p| p.with_website_url(website_url))
        .map_err(AgentRepositoryError::invalid_persisted_data)?;
    let claim = match (owner_x_handle, claimed_at) {
        (Some(handle), Some(at)) => Some(
            OwnerClaim::new(&handle, owner_tweet_url, at)
                .map_err(AgentRepositoryError::invalid_persisted_data)?,
        ),
        _ => None,
    };
    let wallet = match (wallet_address, wallet_chain_id, wallet_connected_at) {
        (Some(address), Some(chain_id), Some(connected_at)) => Some(ConnectedWallet::new(
            WalletAddress::new(address).map_err(AgentRepositoryError::invalid_persisted_data)?,
            u64::try_from(chain_id).map_err(AgentRepositoryError::invalid_persisted_data)?,
            connected_at,
        )),
        _ => None,
    };

    let data = PersistedAgentData {
        id: AgentId::from_uuid(id),
        name: AgentName::new(name).map_err(AgentRepositoryError::invalid_persisted_data)?,
        profile,
        status: AgentStatus::try_from(status.as_str())
            .map_err(AgentRepositoryError::invalid_persisted_data)?,
        api_key_hash: ApiKeyHash::from_persisted(api_key_hash)
            .map_err(AgentRepositoryError::invalid_persisted_data)?,
        claim_token: ClaimToken::parse(claim_token)
            .map_err(AgentRepositoryError::invalid_persisted_data)?,
        verification_code: VerificationCode::from_persisted(verification_code),
        claim,
        wallet,
        stats: AgentStats {
            reputation: column_to_counter(reputation),
            skill_count: column_to_counter(skill_count),
            completed_jobs: column_to_counter(completed_jobs),
            total_sales: column_to_counter(total_sales),
            total_purchases: column_to_counter(total_purchases),
        },
        created_at,
        updated_at,
    };
    Ok(Agent::from_persisted(data))
}

//! Service layer for agent registration, claiming and authentication.
//!
//! Provides [`AgentRegistryService`], the only component that mints
//! credentials or resolves a presented bearer key to an [`Agent`].

use crate::agent::{
    domain::{
        Agent, AgentCredentials, AgentDomainError, AgentId, AgentName, AgentProfile, ApiKey,
        ClaimToken,
    },
    ports::{AgentRepository, AgentRepositoryError},
};
use crate::pagination::{Page, PageRequest};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for registering a new agent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterAgentRequest {
    /// Requested agent name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional contact email.
    pub email: Option<String>,
}

impl RegisterAgentRequest {
    /// Creates a request with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Outcome of a successful registration.
///
/// This is the only place the clear API key is ever available.
#[derive(Debug, Clone)]
pub struct RegisteredAgent {
    /// The stored agent.
    pub agent: Agent,
    /// Clear bearer key.
    pub api_key: ApiKey,
    /// Public URL the owner visits to claim the agent.
    pub claim_url: String,
}

/// Partial profile update; `None` leaves a field unchanged and a blank string
/// clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// New description.
    pub description: Option<String>,
    /// New avatar URL.
    pub avatar_url: Option<String>,
    /// New website URL.
    pub website_url: Option<String>,
    /// New contact email.
    pub email: Option<String>,
}

/// Service-level errors for agent operations.
#[derive(Debug, Error)]
pub enum AgentServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] AgentDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] AgentRepositoryError),
    /// No agent is waiting for the presented claim token.
    #[error("invalid claim token")]
    UnknownClaimToken,
    /// The presented bearer key is missing or unknown.
    #[error("invalid API key")]
    Unauthenticated,
}

/// Result type for agent service operations.
pub type AgentServiceResult<T> = Result<T, AgentServiceError>;

/// Agent registration and identity orchestration service.
pub struct AgentRegistryService<R, C>
where
    R: AgentRepository + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    app_url: String,
}

impl<R, C> Clone for AgentRegistryService<R, C>
where
    R: AgentRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            app_url: self.app_url.clone(),
        }
    }
}

impl<R, C> AgentRegistryService<R, C>
where
    R: AgentRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new service; claim URLs are built under `app_url`.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>, app_url: impl Into<String>) -> Self {
        Self {
            repository,
            clock,
            app_url: app_url.into(),
        }
    }

    /// Registers a new agent and mints its credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AgentServiceError::Domain`] when validation fails or
    /// [`AgentServiceError::Repository`] with
    /// [`AgentRepositoryError::DuplicateName`] when the name is taken.
    pub async fn register(
        &self,
        request: RegisterAgentRequest,
    ) -> AgentServiceResult<RegisteredAgent> {
        let RegisterAgentRequest {
            name,
            description,
            email,
        } = request;

        let agent_name = AgentName::new(name)?;
        let profile = AgentProfile::new()
            .with_description(description)?
            .with_email(email)?;

        if self.repository.find_by_name(&agent_name).await?.is_some() {
            return Err(AgentRepositoryError::DuplicateName(agent_name).into());
        }

        let (api_key, credentials) = AgentCredentials::issue();
        let agent = Agent::register(agent_name, profile, credentials, &*self.clock);
        self.repository.register(&agent).await?;

        tracing::info!(agent_id = %agent.id(), name = %agent.name(), "agent registered");
        let claim_url = agent.claim_token().claim_url(&self.app_url);
        Ok(RegisteredAgent {
            agent,
            api_key,
            claim_url,
        })
    }

    /// Claims an agent on behalf of a human owner.
    ///
    /// # Errors
    ///
    /// Returns [`AgentServiceError::UnknownClaimToken`] when no agent holds
    /// the token, or [`AgentDomainError::AlreadyClaimed`] when it was
    /// claimed before.
    pub async fn claim(
        &self,
        token: &str,
        x_handle: &str,
        tweet_url: Option<String>,
    ) -> AgentServiceResult<Agent> {
        let claim_token =
            ClaimToken::parse(token).map_err(|_| AgentServiceError::UnknownClaimToken)?;
        let mut agent = self
            .repository
            .find_by_claim_token(&claim_token)
            .await?
            .ok_or(AgentServiceError::UnknownClaimToken)?;

        agent.claim_by(x_handle, tweet_url, &*self.clock)?;
        self.repository.update(&agent).await?;
        tracing::info!(agent_id = %agent.id(), "agent claimed");
        Ok(agent)
    }

    /// Returns the public claim link of `agent`.
    #[must_use]
    pub fn claim_url(&self, agent: &Agent) -> String {
        agent.claim_token().claim_url(&self.app_url)
    }

    /// Resolves a presented bearer key to its agent.
    ///
    /// # Errors
    ///
    /// Returns [`AgentServiceError::Unauthenticated`] when no agent holds
    /// the key.
    pub async fn authenticate(&self, presented_key: &str) -> AgentServiceResult<Agent> {
        if presented_key.trim().is_empty() {
            return Err(AgentServiceError::Unauthenticated);
        }
        let digest = ApiKey::from_presented(presented_key.trim()).digest();
        self.repository
            .find_by_api_key_hash(&digest)
            .await?
            .ok_or(AgentServiceError::Unauthenticated)
    }

    /// Finds an agent by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AgentServiceError::Repository`] when lookup fails.
    pub async fn find_by_id(&self, id: AgentId) -> AgentServiceResult<Option<Agent>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Finds an agent by identifier, failing when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRepositoryError::NotFound`] wrapped in
    /// [`AgentServiceError::Repository`] when the agent is missing.
    pub async fn require(&self, id: AgentId) -> AgentServiceResult<Agent> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AgentRepositoryError::NotFound(id).into())
    }

    /// Applies a partial profile update to the agent.
    ///
    /// # Errors
    ///
    /// Returns [`AgentServiceError::Domain`] when a field fails validation
    /// or [`AgentServiceError::Repository`] when the agent is missing.
    pub async fn update_profile(
        &self,
        id: AgentId,
        update: ProfileUpdate,
    ) -> AgentServiceResult<Agent> {
        let mut agent = self.require(id).await?;
        let ProfileUpdate {
            description,
            avatar_url,
            website_url,
            email,
        } = update;

        let mut profile = agent.profile().clone();
        if description.is_some() {
            profile = profile.with_description(description)?;
        }
        if avatar_url.is_some() {
            profile = profile.with_avatar_url(avatar_url)?;
        }
        if website_url.is_some() {
            profile = profile.with_website_url(website_url)?;
        }
        if email.is_some() {
            profile = profile.with_email(email)?;
        }

        agent.update_profile(profile, &*self.clock);
        self.repository.update(&agent).await?;
        Ok(agent)
    }

    /// Lists claimed agents newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AgentServiceError::Repository`] when lookup fails.
    pub async fn list_claimed(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> AgentServiceResult<Page<Agent>> {
        let needle = search.map(str::trim).filter(|text| !text.is_empty());
        Ok(self.repository.list_claimed(needle, page).await?)
    }
}

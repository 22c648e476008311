//! Service layer for the skill catalogue.
//!
//! [`SkillCatalogService`] validates publisher input, enforces ownership and
//! keeps the owner's `skill_count` in step with the catalogue.

use crate::activity::{ports::ActivityLogRepository, services::ActivityJournal};
use crate::agent::{
    domain::{Agent, AgentId, AgentStat},
    ports::{AgentRepository, AgentRepositoryError},
};
use crate::pagination::{Page, PageRequest};
use crate::skill::{
    domain::{
        EndpointMethod, Pricing, PricingModel, Skill, SkillCategory, SkillChanges, SkillCounter,
        SkillDescription, SkillDomainError, SkillDraft, SkillEndpoint, SkillFilter, SkillId,
        SkillName, SkillTags, SkillVersion,
    },
    ports::{SkillRepository, SkillRepositoryError},
};
use mockable::Clock;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

/// Requested pricing of a new skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingRequest {
    /// Price in hundredths of the currency unit.
    pub price_cents: u64,
    /// Currency code; `USDC` when absent.
    pub currency: Option<String>,
    /// Pricing model.
    pub model: PricingModel,
}

/// Request payload for publishing a skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSkillRequest {
    /// Skill name.
    pub name: String,
    /// Version label; `1.0.0` when absent.
    pub version: Option<String>,
    /// Description.
    pub description: String,
    /// Catalogue category.
    pub category: SkillCategory,
    /// Search tags.
    pub tags: Vec<String>,
    /// API endpoint URL.
    pub api_endpoint: Option<String>,
    /// Source repository URL.
    pub repo_url: Option<String>,
    /// Documentation body.
    pub documentation: Option<String>,
    /// Pricing; free when absent.
    pub pricing: Option<PricingRequest>,
}

impl PublishSkillRequest {
    /// Creates a request with the mandatory fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: SkillCategory,
    ) -> Self {
        Self {
            name: name.into(),
            version: None,
            description: description.into(),
            category,
            tags: Vec::new(),
            api_endpoint: None,
            repo_url: None,
            documentation: None,
            pricing: None,
        }
    }

    /// Sets the pricing.
    #[must_use]
    pub fn with_pricing(mut self, pricing: PricingRequest) -> Self {
        self.pricing = Some(pricing);
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }
}

/// Request payload for declaring an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRequest {
    /// Path relative to the skill's API endpoint.
    pub path: String,
    /// HTTP method.
    pub method: EndpointMethod,
    /// Description.
    pub description: Option<String>,
    /// Opaque JSON schema of the parameters.
    pub parameters: Option<String>,
}

/// Partial update of a skill; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSkillRequest {
    /// New description.
    pub description: Option<String>,
    /// New publication flag.
    pub is_published: Option<bool>,
    /// New version label.
    pub version: Option<String>,
    /// New documentation body.
    pub documentation: Option<String>,
    /// New API endpoint URL.
    pub api_endpoint: Option<String>,
}

/// Service-level errors for skill operations.
#[derive(Debug, Error)]
pub enum SkillServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] SkillDomainError),
    /// Skill repository operation failed.
    #[error(transparent)]
    Repository(#[from] SkillRepositoryError),
    /// Agent repository operation failed.
    #[error(transparent)]
    Agents(#[from] AgentRepositoryError),
    /// The skill does not exist or belongs to another agent.
    #[error("skill {0} not found or not owned by caller")]
    NotOwned(SkillId),
}

/// Result type for skill service operations.
pub type SkillServiceResult<T> = Result<T, SkillServiceError>;

/// Skill catalogue orchestration service.
pub struct SkillCatalogService<S, A, L, C>
where
    S: SkillRepository + ?Sized,
    A: AgentRepository + ?Sized,
    L: ActivityLogRepository + ?Sized,
    C: Clock + Send + Sync,
{
    skills: Arc<S>,
    agents: Arc<A>,
    journal: ActivityJournal<L, C>,
    clock: Arc<C>,
}

impl<S, A, L, C> Clone for SkillCatalogService<S, A, L, C>
where
    S: SkillRepository + ?Sized,
    A: AgentRepository + ?Sized,
    L: ActivityLogRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            skills: Arc::clone(&self.skills),
            agents: Arc::clone(&self.agents),
            journal: self.journal.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, A, L, C> SkillCatalogService<S, A, L, C>
where
    S: SkillRepository + ?Sized,
    A: AgentRepository + ?Sized,
    L: ActivityLogRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new catalogue service.
    #[must_use]
    pub const fn new(
        skills: Arc<S>,
        agents: Arc<A>,
        journal: ActivityJournal<L, C>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            skills,
            agents,
            journal,
            clock,
        }
    }

    /// Publishes a skill owned by `owner` and bumps its `skill_count`.
    ///
    /// # Errors
    ///
    /// Returns [`SkillServiceError::Domain`] when validation fails or
    /// [`SkillRepositoryError::DuplicateName`] when the owner already has a
    /// skill with this name.
    pub async fn publish(
        &self,
        owner: &Agent,
        request: PublishSkillRequest,
    ) -> SkillServiceResult<Skill> {
        let draft = build_draft(request)?;
        if self
            .skills
            .find_by_owner_and_name(owner.id(), draft.name())
            .await?
            .is_some()
        {
            return Err(SkillRepositoryError::DuplicateName {
                agent_id: owner.id(),
                name: draft.name().clone(),
            }
            .into());
        }

        let skill = Skill::publish(owner.id(), draft, &*self.clock);
        self.skills.create(&skill).await?;
        self.agents
            .adjust_stat(owner.id(), AgentStat::SkillCount, 1)
            .await?;

        tracing::info!(skill_id = %skill.id(), agent_id = %owner.id(), "skill published");
        self.journal
            .note(
                owner,
                format!("New skill published: {}", skill.name()),
                &json!({ "skillId": skill.id(), "category": skill.category() }),
            )
            .await;
        Ok(skill)
    }

    /// Declares an endpoint on a skill owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`SkillServiceError::NotOwned`] when the skill is missing or
    /// owned by another agent.
    pub async fn add_endpoint(
        &self,
        owner: AgentId,
        skill_id: SkillId,
        request: EndpointRequest,
    ) -> SkillServiceResult<SkillEndpoint> {
        let mut skill = self.owned_skill(owner, skill_id).await?;
        let EndpointRequest {
            path,
            method,
            description,
            parameters,
        } = request;
        let endpoint = SkillEndpoint::new(&path, method, description, parameters)?;
        skill.add_endpoint(endpoint.clone(), &*self.clock);
        self.skills.update(&skill).await?;
        Ok(endpoint)
    }

    /// Lists published skills, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`SkillServiceError::Repository`] when lookup fails.
    pub async fn list_published(
        &self,
        filter: &SkillFilter,
        page: PageRequest,
    ) -> SkillServiceResult<Page<Skill>> {
        Ok(self.skills.list_published(filter, page).await?)
    }

    /// Returns a skill by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SkillRepositoryError::NotFound`] when the skill is missing.
    pub async fn find(&self, id: SkillId) -> SkillServiceResult<Skill> {
        self.skills
            .find_by_id(id)
            .await?
            .ok_or_else(|| SkillRepositoryError::NotFound(id).into())
    }

    /// Lists every skill owned by `owner`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`SkillServiceError::Repository`] when lookup fails.
    pub async fn list_for_agent(&self, owner: AgentId) -> SkillServiceResult<Vec<Skill>> {
        Ok(self.skills.list_by_owner(owner).await?)
    }

    /// Applies a partial update to a skill owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`SkillServiceError::NotOwned`] for foreign or missing skills,
    /// or [`SkillServiceError::Domain`] when a field fails validation.
    pub async fn update(
        &self,
        owner: AgentId,
        skill_id: SkillId,
        request: UpdateSkillRequest,
    ) -> SkillServiceResult<Skill> {
        let mut skill = self.owned_skill(owner, skill_id).await?;
        let UpdateSkillRequest {
            description,
            is_published,
            version,
            documentation,
            api_endpoint,
        } = request;

        let changes = SkillChanges {
            description: description.map(SkillDescription::new).transpose()?,
            is_published,
            version: version.map(SkillVersion::new).transpose()?,
            documentation,
            api_endpoint,
        };
        skill.apply(changes, &*self.clock)?;
        self.skills.update(&skill).await?;
        Ok(skill)
    }

    /// Deletes a skill owned by `owner` and decrements its `skill_count`.
    ///
    /// # Errors
    ///
    /// Returns [`SkillServiceError::NotOwned`] for foreign or missing skills.
    pub async fn delete(&self, owner: AgentId, skill_id: SkillId) -> SkillServiceResult<()> {
        self.owned_skill(owner, skill_id).await?;
        self.skills.delete(skill_id).await?;
        self.agents
            .adjust_stat(owner, AgentStat::SkillCount, -1)
            .await?;
        tracing::info!(skill_id = %skill_id, agent_id = %owner, "skill deleted");
        Ok(())
    }

    /// Records one invocation of a skill.
    ///
    /// # Errors
    ///
    /// Returns [`SkillRepositoryError::NotFound`] when the skill is missing.
    pub async fn record_use(&self, skill_id: SkillId) -> SkillServiceResult<()> {
        Ok(self.skills.increment(skill_id, SkillCounter::Use).await?)
    }

    async fn owned_skill(&self, owner: AgentId, skill_id: SkillId) -> SkillServiceResult<Skill> {
        self.skills
            .find_by_id(skill_id)
            .await?
            .filter(|skill| skill.is_owned_by(owner))
            .ok_or(SkillServiceError::NotOwned(skill_id))
    }
}

fn build_draft(request: PublishSkillRequest) -> Result<SkillDraft, SkillDomainError> {
    let PublishSkillRequest {
        name,
        version,
        description,
        category,
        tags,
        api_endpoint,
        repo_url,
        documentation,
        pricing,
    } = request;

    let price = match pricing {
        Some(PricingRequest {
            price_cents,
            currency,
            model,
        }) => Pricing::new(price_cents, currency, model)?,
        None => Pricing::free(),
    };
    let version_label = match version {
        Some(label) => SkillVersion::new(label)?,
        None => SkillVersion::default(),
    };

    Ok(SkillDraft::new(
        SkillName::new(name)?,
        SkillDescription::new(description)?,
        category,
    )
    .with_version(version_label)
    .with_tags(SkillTags::new(tags)?)
    .with_links(api_endpoint, repo_url)?
    .with_documentation(documentation)
    .with_pricing(price))
}

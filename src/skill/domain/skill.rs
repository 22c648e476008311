//! Skill aggregate root.

use super::{
    Pricing, SkillCategory, SkillDescription, SkillDomainError, SkillEndpoint, SkillId, SkillName,
    SkillTags, SkillVersion, text::optional_url,
};
use crate::agent::domain::AgentId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Usage and review counters of a skill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillMetrics {
    /// Mean review rating, `0.0` before the first review.
    pub rating: f64,
    /// Number of reviews.
    pub review_count: u32,
    /// Recorded invocations.
    pub use_count: u32,
    /// Completed purchases.
    pub download_count: u32,
}

/// Counter of [`SkillMetrics`] that grows by one per event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkillCounter {
    /// [`SkillMetrics::use_count`].
    Use,
    /// [`SkillMetrics::download_count`].
    Download,
}

impl SkillMetrics {
    /// Increments one counter, saturating at `u32::MAX`.
    pub const fn increment(&mut self, counter: SkillCounter) {
        match counter {
            SkillCounter::Use => self.use_count = self.use_count.saturating_add(1),
            SkillCounter::Download => self.download_count = self.download_count.saturating_add(1),
        }
    }
}

/// Validated content of a skill about to be published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillDraft {
    name: SkillName,
    version: SkillVersion,
    description: SkillDescription,
    category: SkillCategory,
    tags: SkillTags,
    api_endpoint: Option<String>,
    repo_url: Option<String>,
    documentation: Option<String>,
    pricing: Pricing,
}

impl SkillDraft {
    /// Creates a draft with the mandatory fields and defaults elsewhere.
    #[must_use]
    pub fn new(name: SkillName, description: SkillDescription, category: SkillCategory) -> Self {
        Self {
            name,
            version: SkillVersion::default(),
            description,
            category,
            tags: SkillTags::default(),
            api_endpoint: None,
            repo_url: None,
            documentation: None,
            pricing: Pricing::free(),
        }
    }

    /// Sets the version label.
    #[must_use]
    pub fn with_version(mut self, version: SkillVersion) -> Self {
        self.version = version;
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: SkillTags) -> Self {
        self.tags = tags;
        self
    }

    /// Sets the API endpoint and repository links.
    ///
    /// # Errors
    ///
    /// Returns [`SkillDomainError::InvalidUrl`] for a non-absolute URL.
    pub fn with_links(
        mut self,
        api_endpoint: Option<String>,
        repo_url: Option<String>,
    ) -> Result<Self, SkillDomainError> {
        self.api_endpoint = optional_url("apiEndpoint", api_endpoint)?;
        self.repo_url = optional_url("repoUrl", repo_url)?;
        Ok(self)
    }

    /// Sets the documentation body.
    #[must_use]
    pub fn with_documentation(mut self, documentation: Option<String>) -> Self {
        self.documentation = documentation;
        self
    }

    /// Sets the pricing.
    #[must_use]
    pub fn with_pricing(mut self, pricing: Pricing) -> Self {
        self.pricing = pricing;
        self
    }

    /// Returns the draft name.
    #[must_use]
    pub const fn name(&self) -> &SkillName {
        &self.name
    }
}

/// Partial update of a skill's editable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillChanges {
    /// New description.
    pub description: Option<SkillDescription>,
    /// New publication flag.
    pub is_published: Option<bool>,
    /// New version label.
    pub version: Option<SkillVersion>,
    /// New documentation body.
    pub documentation: Option<String>,
    /// New API endpoint URL.
    pub api_endpoint: Option<String>,
}

/// Catalogue filter for published skills.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillFilter {
    /// Restrict to one category.
    pub category: Option<SkillCategory>,
    /// Case-insensitive match on name or description, or an exact tag.
    pub search: Option<String>,
}

/// A capability published by an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    id: SkillId,
    agent_id: AgentId,
    name: SkillName,
    version: SkillVersion,
    description: SkillDescription,
    category: SkillCategory,
    tags: SkillTags,
    api_endpoint: Option<String>,
    repo_url: Option<String>,
    documentation: Option<String>,
    pricing: Pricing,
    endpoints: Vec<SkillEndpoint>,
    is_published: bool,
    metrics: SkillMetrics,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted skill.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedSkillData {
    /// Persisted identifier.
    pub id: SkillId,
    /// Persisted owner.
    pub agent_id: AgentId,
    /// Persisted content.
    pub draft: SkillDraft,
    /// Persisted endpoints.
    pub endpoints: Vec<SkillEndpoint>,
    /// Persisted publication flag.
    pub is_published: bool,
    /// Persisted counters.
    pub metrics: SkillMetrics,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Skill {
    /// Publishes a new skill owned by `agent_id`.
    #[must_use]
    pub fn publish(agent_id: AgentId, draft: SkillDraft, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self::assemble(PersistedSkillData {
            id: SkillId::new(),
            agent_id,
            draft,
            endpoints: Vec::new(),
            is_published: true,
            metrics: SkillMetrics::default(),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a skill from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSkillData) -> Self {
        Self::assemble(data)
    }

    fn assemble(data: PersistedSkillData) -> Self {
        let SkillDraft {
            name,
            version,
            description,
            category,
            tags,
            api_endpoint,
            repo_url,
            documentation,
            pricing,
        } = data.draft;
        Self {
            id: data.id,
            agent_id: data.agent_id,
            name,
            version,
            description,
            category,
            tags,
            api_endpoint,
            repo_url,
            documentation,
            pricing,
            endpoints: data.endpoints,
            is_published: data.is_published,
            metrics: data.metrics,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the skill identifier.
    #[must_use]
    pub const fn id(&self) -> SkillId {
        self.id
    }

    /// Returns the owning agent.
    #[must_use]
    pub const fn agent_id(&self) -> AgentId {
        self.agent_id
    }

    /// Returns the skill name.
    #[must_use]
    pub const fn name(&self) -> &SkillName {
        &self.name
    }

    /// Returns the version label.
    #[must_use]
    pub const fn version(&self) -> &SkillVersion {
        &self.version
    }

    /// Returns the description.
    #[must_use]
    pub const fn description(&self) -> &SkillDescription {
        &self.description
    }

    /// Returns the category.
    #[must_use]
    pub const fn category(&self) -> SkillCategory {
        self.category
    }

    /// Returns the tags.
    #[must_use]
    pub const fn tags(&self) -> &SkillTags {
        &self.tags
    }

    /// Returns the API endpoint URL.
    #[must_use]
    pub fn api_endpoint(&self) -> Option<&str> {
        self.api_endpoint.as_deref()
    }

    /// Returns the repository URL.
    #[must_use]
    pub fn repo_url(&self) -> Option<&str> {
        self.repo_url.as_deref()
    }

    /// Returns the documentation body.
    #[must_use]
    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    /// Returns the pricing.
    #[must_use]
    pub const fn pricing(&self) -> &Pricing {
        &self.pricing
    }

    /// Returns the declared endpoints.
    #[must_use]
    pub fn endpoints(&self) -> &[SkillEndpoint] {
        &self.endpoints
    }

    /// Returns `true` when the skill is listed in the catalogue.
    #[must_use]
    pub const fn is_published(&self) -> bool {
        self.is_published
    }

    /// Returns the counters.
    #[must_use]
    pub const fn metrics(&self) -> &SkillMetrics {
        &self.metrics
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when `agent_id` owns this skill.
    #[must_use]
    pub fn is_owned_by(&self, agent_id: AgentId) -> bool {
        self.agent_id == agent_id
    }

    /// Returns the editable content as a draft, for persistence.
    #[must_use]
    pub fn to_draft(&self) -> SkillDraft {
        SkillDraft {
            name: self.name.clone(),
            version: self.version.clone(),
            description: self.description.clone(),
            category: self.category,
            tags: self.tags.clone(),
            api_endpoint: self.api_endpoint.clone(),
            repo_url: self.repo_url.clone(),
            documentation: self.documentation.clone(),
            pricing: self.pricing.clone(),
        }
    }

    /// Appends an endpoint declaration.
    pub fn add_endpoint(&mut self, endpoint: SkillEndpoint, clock: &impl Clock) {
        self.endpoints.push(endpoint);
        self.touch(clock);
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`SkillDomainError::InvalidUrl`] when the new API endpoint is
    /// not an absolute URL.
    pub fn apply(
        &mut self,
        changes: SkillChanges,
        clock: &impl Clock,
    ) -> Result<(), SkillDomainError> {
        let SkillChanges {
            description,
            is_published,
            version,
            documentation,
            api_endpoint,
        } = changes;

        if api_endpoint.is_some() {
            self.api_endpoint = optional_url("apiEndpoint", api_endpoint)?;
        }
        if let Some(text) = description {
            self.description = text;
        }
        if let Some(flag) = is_published {
            self.is_published = flag;
        }
        if let Some(label) = version {
            self.version = label;
        }
        if documentation.is_some() {
            self.documentation = documentation;
        }
        self.touch(clock);
        Ok(())
    }

    /// Returns `true` when the skill passes `filter`.
    #[must_use]
    pub fn matches(&self, filter: &SkillFilter) -> bool {
        let category_matches = filter
            .category
            .is_none_or(|category| category == self.category);
        let search_matches = filter.search.as_deref().is_none_or(|needle| {
            let lowered = needle.to_lowercase();
            self.name.as_str().to_lowercase().contains(&lowered)
                || self.description.as_str().to_lowercase().contains(&lowered)
                || self.tags.contains_ignoring_case(needle)
        });
        category_matches && search_matches
    }

    /// Returns the counters for in-place adjustment by repositories.
    pub(crate) const fn metrics_mut(&mut self) -> &mut SkillMetrics {
        &mut self.metrics
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

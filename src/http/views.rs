//! Wire views of agents.
//!
//! Agents are never serialized directly so the API key digest and claim
//! token stay server-side except where the owner asks for them.

use crate::agent::domain::{Agent, AgentId, AgentStatus};
use crate::skill::domain::{Skill, SkillCategory, SkillId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Minimal agent view returned on registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSummary {
    id: AgentId,
    name: String,
    description: Option<String>,
    status: AgentStatus,
}

impl From<&Agent> for AgentSummary {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id(),
            name: agent.name().as_str().to_owned(),
            description: agent.profile().description().map(str::to_owned),
            status: agent.status(),
        }
    }
}

/// Claim status of the calling agent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStatusView {
    id: AgentId,
    name: String,
    status: AgentStatus,
    owner_x_handle: Option<String>,
    verification_code: String,
    claim_url: String,
    claimed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl AgentStatusView {
    /// Builds the view; `claim_url` comes from the registry.
    #[must_use]
    pub fn new(agent: &Agent, claim_url: String) -> Self {
        Self {
            id: agent.id(),
            name: agent.name().as_str().to_owned(),
            status: agent.status(),
            owner_x_handle: agent.claim().map(|claim| claim.x_handle().to_owned()),
            verification_code: agent.verification_code().as_str().to_owned(),
            claim_url,
            claimed_at: agent.claim().map(|claim| claim.claimed_at()),
            created_at: agent.created_at(),
        }
    }
}

/// Public listing entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentListItem {
    id: AgentId,
    name: String,
    description: Option<String>,
    avatar: Option<String>,
    reputation: u32,
    owner_x_handle: Option<String>,
    skill_count: u32,
    created_at: DateTime<Utc>,
}

impl From<&Agent> for AgentListItem {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id(),
            name: agent.name().as_str().to_owned(),
            description: agent.profile().description().map(str::to_owned),
            avatar: agent.profile().avatar_url().map(str::to_owned),
            reputation: agent.stats().reputation,
            owner_x_handle: agent.claim().map(|claim| claim.x_handle().to_owned()),
            skill_count: agent.stats().skill_count,
            created_at: agent.created_at(),
        }
    }
}

/// Skill line shown on agent profiles.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSkill {
    id: SkillId,
    name: String,
    description: String,
    category: SkillCategory,
    rating: f64,
    is_published: bool,
    use_count: u32,
    created_at: DateTime<Utc>,
}

impl From<&Skill> for ProfileSkill {
    fn from(skill: &Skill) -> Self {
        Self {
            id: skill.id(),
            name: skill.name().as_str().to_owned(),
            description: skill.description().as_str().to_owned(),
            category: skill.category(),
            rating: skill.metrics().rating,
            is_published: skill.is_published(),
            use_count: skill.metrics().use_count,
            created_at: skill.created_at(),
        }
    }
}

/// Public profile with published skills.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    #[serde(flatten)]
    agent: AgentListItem,
    status: AgentStatus,
    skills: Vec<ProfileSkill>,
}

impl PublicProfile {
    /// Builds the profile, keeping only published skills.
    #[must_use]
    pub fn new(agent: &Agent, skills: &[Skill]) -> Self {
        Self {
            agent: AgentListItem::from(agent),
            status: agent.status(),
            skills: skills
                .iter()
                .filter(|skill| skill.is_published())
                .map(ProfileSkill::from)
                .collect(),
        }
    }
}

/// Full profile of the calling agent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnProfile {
    #[serde(flatten)]
    status: AgentStatusView,
    description: Option<String>,
    avatar: Option<String>,
    email: Option<String>,
    website: Option<String>,
    reputation: u32,
    skill_count: u32,
    completed_jobs: u32,
    total_sales: u32,
    total_purchases: u32,
    skills: Vec<ProfileSkill>,
}

impl OwnProfile {
    /// Builds the profile with every owned skill.
    #[must_use]
    pub fn new(agent: &Agent, claim_url: String, skills: &[Skill]) -> Self {
        let profile = agent.profile();
        let stats = agent.stats();
        Self {
            status: AgentStatusView::new(agent, claim_url),
            description: profile.description().map(str::to_owned),
            avatar: profile.avatar_url().map(str::to_owned),
            email: profile.email().map(str::to_owned),
            website: profile.website_url().map(str::to_owned),
            reputation: stats.reputation,
            skill_count: stats.skill_count,
            completed_jobs: stats.completed_jobs,
            total_sales: stats.total_sales,
            total_purchases: stats.total_purchases,
            skills: skills.iter().map(ProfileSkill::from).collect(),
        }
    }
}

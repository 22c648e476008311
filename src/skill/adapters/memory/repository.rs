//! In-memory repository for skills, used by tests and demo mode.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::agent::domain::AgentId;
use crate::pagination::{Page, PageRequest};
use crate::skill::{
    domain::{Skill, SkillCounter, SkillFilter, SkillId, SkillName},
    ports::{SkillRepository, SkillRepositoryError, SkillRepositoryResult},
};

/// Thread-safe in-memory skill repository.
#[derive(Debug, Clone, Default)]
pub struct InMemorySkillRepository {
    state: Arc<RwLock<InMemorySkillState>>,
}

#[derive(Debug, Default)]
struct InMemorySkillState {
    skills: HashMap<SkillId, Skill>,
    name_index: HashMap<(AgentId, SkillName), SkillId>,
}

impl InMemorySkillRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> SkillRepositoryError {
    SkillRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn newest_first(mut skills: Vec<Skill>) -> Vec<Skill> {
    skills.sort_by_key(|skill| Reverse(skill.created_at()));
    skills
}

#[async_trait]
impl SkillRepository for InMemorySkillRepository {
    async fn create(&self, skill: &Skill) -> SkillRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;

        if state.skills.contains_key(&skill.id()) {
            return Err(SkillRepositoryError::DuplicateSkill(skill.id()));
        }
        let key = (skill.agent_id(), skill.name().clone());
        if state.name_index.contains_key(&key) {
            return Err(SkillRepositoryError::DuplicateName {
                agent_id: skill.agent_id(),
                name: skill.name().clone(),
            });
        }

        state.name_index.insert(key, skill.id());
        state.skills.insert(skill.id(), skill.clone());
        Ok(())
    }

    async fn update(&self, skill: &Skill) -> SkillRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .skills
            .get_mut(&skill.id())
            .ok_or(SkillRepositoryError::NotFound(skill.id()))?;

        let metrics = *stored.metrics();
        *stored = skill.clone();
        *stored.metrics_mut() = metrics;
        Ok(())
    }

    async fn delete(&self, id: SkillId) -> SkillRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let removed = state
            .skills
            .remove(&id)
            .ok_or(SkillRepositoryError::NotFound(id))?;
        state
            .name_index
            .remove(&(removed.agent_id(), removed.name().clone()));
        Ok(())
    }

    async fn find_by_id(&self, id: SkillId) -> SkillRepositoryResult<Option<Skill>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.skills.get(&id).cloned())
    }

    async fn find_by_owner_and_name(
        &self,
        agent_id: AgentId,
        name: &SkillName,
    ) -> SkillRepositoryResult<Option<Skill>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .name_index
            .get(&(agent_id, name.clone()))
            .and_then(|id| state.skills.get(id))
            .cloned())
    }

    async fn list_published(
        &self,
        filter: &SkillFilter,
        page: PageRequest,
    ) -> SkillRepositoryResult<Page<Skill>> {
        let state = self.state.read().map_err(lock_error)?;
        let matching = newest_first(
            state
                .skills
                .values()
                .filter(|skill| skill.is_published() && skill.matches(filter))
                .cloned()
                .collect(),
        );
        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        Ok(Page::new(page.slice(&matching), total, page))
    }

    async fn list_by_owner(&self, agent_id: AgentId) -> SkillRepositoryResult<Vec<Skill>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(newest_first(
            state
                .skills
                .values()
                .filter(|skill| skill.is_owned_by(agent_id))
                .cloned()
                .collect(),
        ))
    }

    async fn increment(&self, id: SkillId, counter: SkillCounter) -> SkillRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let skill = state
            .skills
            .get_mut(&id)
            .ok_or(SkillRepositoryError::NotFound(id))?;
        skill.metrics_mut().increment(counter);
        Ok(())
    }

    async fn set_rating(
        &self,
        id: SkillId,
        rating: f64,
        review_count: u32,
    ) -> SkillRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let skill = state
            .skills
            .get_mut(&id)
            .ok_or(SkillRepositoryError::NotFound(id))?;
        let metrics = skill.metrics_mut();
        metrics.rating = rating;
        metrics.review_count = review_count;
        Ok(())
    }
}

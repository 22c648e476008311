//! Marketplace counters kept on each agent.

use serde::{Deserialize, Serialize};

/// Denormalised activity counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStats {
    /// Reputation score.
    pub reputation: u32,
    /// Number of skills the agent currently owns.
    pub skill_count: u32,
    /// Jobs the agent completed as taker.
    pub completed_jobs: u32,
    /// Purchases of the agent's skills by others.
    pub total_sales: u32,
    /// Skills the agent bought.
    pub total_purchases: u32,
}

/// Selects one counter of [`AgentStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentStat {
    /// [`AgentStats::reputation`].
    Reputation,
    /// [`AgentStats::skill_count`].
    SkillCount,
    /// [`AgentStats::completed_jobs`].
    CompletedJobs,
    /// [`AgentStats::total_sales`].
    TotalSales,
    /// [`AgentStats::total_purchases`].
    TotalPurchases,
}

impl AgentStats {
    /// Applies a signed delta to one counter, saturating at zero.
    pub const fn adjust(&mut self, stat: AgentStat, delta: i32) {
        let counter = match stat {
            AgentStat::Reputation => &mut self.reputation,
            AgentStat::SkillCount => &mut self.skill_count,
            AgentStat::CompletedJobs => &mut self.completed_jobs,
            AgentStat::TotalSales => &mut self.total_sales,
            AgentStat::TotalPurchases => &mut self.total_purchases,
        };
        *counter = counter.saturating_add_signed(delta);
    }

    /// Returns the current value of one counter.
    #[must_use]
    pub const fn get(&self, stat: AgentStat) -> u32 {
        match stat {
            AgentStat::Reputation => self.reputation,
            AgentStat::SkillCount => self.skill_count,
            AgentStat::CompletedJobs => self.completed_jobs,
            AgentStat::TotalSales => self.total_sales,
            AgentStat::TotalPurchases => self.total_purchases,
        }
    }
}

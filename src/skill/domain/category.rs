//! Skill catalogue categories.

use super::ParseSkillEnumError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalogue category of a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkillCategory {
    /// Messaging and notification skills.
    Communication,
    /// Workflow automation.
    Automation,
    /// Data analysis.
    Analysis,
    /// Content generation.
    Creative,
    /// General utilities.
    Utility,
    /// Third-party integrations.
    Integration,
    /// Machine learning.
    AiMl,
    /// Security tooling.
    Security,
}

impl SkillCategory {
    /// Every category in catalogue order.
    pub const ALL: [Self; 8] = [
        Self::Communication,
        Self::Automation,
        Self::Analysis,
        Self::Creative,
        Self::Utility,
        Self::Integration,
        Self::AiMl,
        Self::Security,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Communication => "communication",
            Self::Automation => "automation",
            Self::Analysis => "analysis",
            Self::Creative => "creative",
            Self::Utility => "utility",
            Self::Integration => "integration",
            Self::AiMl => "ai_ml",
            Self::Security => "security",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SkillCategory {
    type Error = ParseSkillEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| ParseSkillEnumError::new("skill category", value))
    }
}

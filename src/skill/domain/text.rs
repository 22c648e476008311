//! Validated free-text skill fields.

use super::SkillDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

const NAME_LENGTH: std::ops::RangeInclusive<usize> = 3..=100;
const DESCRIPTION_LENGTH: std::ops::RangeInclusive<usize> = 10..=2000;
const MAX_VERSION_LENGTH: usize = 20;
const MAX_TAGS: usize = 10;
const MAX_TAG_LENGTH: usize = 30;

/// Display name of a skill, unique per owning agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillName(String);

impl SkillName {
    /// Creates a validated skill name from trimmed input.
    ///
    /// # Errors
    ///
    /// Returns [`SkillDomainError::InvalidName`] outside 3 to 100 characters.
    pub fn new(value: impl AsRef<str>) -> Result<Self, SkillDomainError> {
        let trimmed = value.as_ref().trim();
        if !NAME_LENGTH.contains(&trimmed.chars().count()) {
            return Err(SkillDomainError::InvalidName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Long-form description of a skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillDescription(String);

impl SkillDescription {
    /// Creates a validated description.
    ///
    /// # Errors
    ///
    /// Returns [`SkillDomainError::InvalidDescription`] outside 10 to 2000
    /// characters.
    pub fn new(value: impl AsRef<str>) -> Result<Self, SkillDomainError> {
        let trimmed = value.as_ref().trim();
        if !DESCRIPTION_LENGTH.contains(&trimmed.chars().count()) {
            return Err(SkillDomainError::InvalidDescription);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the description as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Free-form version label, `1.0.0` unless set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillVersion(String);

impl SkillVersion {
    /// Creates a validated version label.
    ///
    /// # Errors
    ///
    /// Returns [`SkillDomainError::InvalidVersion`] for blank or overlong
    /// input.
    pub fn new(value: impl AsRef<str>) -> Result<Self, SkillDomainError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_VERSION_LENGTH {
            return Err(SkillDomainError::InvalidVersion);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SkillVersion {
    fn default() -> Self {
        Self("1.0.0".to_owned())
    }
}

/// Search tags attached to a skill.
///
/// Duplicates are dropped while keeping first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillTags(Vec<String>);

impl SkillTags {
    /// Creates a validated tag list.
    ///
    /// # Errors
    ///
    /// Returns [`SkillDomainError::InvalidTags`] for more than ten tags or a
    /// blank or overlong tag.
    pub fn new(tags: impl IntoIterator<Item = String>) -> Result<Self, SkillDomainError> {
        let mut unique: Vec<String> = Vec::new();
        for raw in tags {
            let tag = raw.trim();
            if tag.is_empty() || tag.chars().count() > MAX_TAG_LENGTH {
                return Err(SkillDomainError::InvalidTags);
            }
            if !unique.iter().any(|existing| existing == tag) {
                unique.push(tag.to_owned());
            }
        }
        if unique.len() > MAX_TAGS {
            return Err(SkillDomainError::InvalidTags);
        }
        Ok(Self(unique))
    }

    /// Returns the tags.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Returns `true` when a tag equals `needle`, ignoring case.
    #[must_use]
    pub fn contains_ignoring_case(&self, needle: &str) -> bool {
        self.0.iter().any(|tag| tag.eq_ignore_ascii_case(needle))
    }
}

/// Validates an optional absolute URL field.
pub(crate) fn optional_url(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<String>, SkillDomainError> {
    let Some(raw) = value.map(|text| text.trim().to_owned()) else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(None);
    }
    match Url::parse(&raw) {
        Ok(_) => Ok(Some(raw)),
        Err(_) => Err(SkillDomainError::InvalidUrl { field, value: raw }),
    }
}

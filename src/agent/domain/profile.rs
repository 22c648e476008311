//! Self-described agent profile fields.

use super::AgentDomainError;
use serde::{Deserialize, Serialize};
use url::Url;

const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Optional descriptive fields an agent may edit about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    description: Option<String>,
    email: Option<String>,
    avatar_url: Option<String>,
    website_url: Option<String>,
}

impl AgentProfile {
    /// Creates an empty profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the free-text description.
    ///
    /// Blank descriptions clear the field.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::DescriptionTooLong`] above 500 characters.
    pub fn with_description(
        mut self,
        description: Option<String>,
    ) -> Result<Self, AgentDomainError> {
        self.description = non_blank(description);
        if self
            .description
            .as_ref()
            .is_some_and(|text| text.chars().count() > MAX_DESCRIPTION_LENGTH)
        {
            return Err(AgentDomainError::DescriptionTooLong);
        }
        Ok(self)
    }

    /// Sets the contact email.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::InvalidEmail`] when the address lacks a
    /// local part or a dotted domain.
    pub fn with_email(mut self, email: Option<String>) -> Result<Self, AgentDomainError> {
        self.email = match non_blank(email) {
            Some(address) => Some(validate_email(address)?),
            None => None,
        };
        Ok(self)
    }

    /// Sets the avatar image URL.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::InvalidUrl`] when the value is not an
    /// absolute URL.
    pub fn with_avatar_url(mut self, url: Option<String>) -> Result<Self, AgentDomainError> {
        self.avatar_url = validate_url("avatar", url)?;
        Ok(self)
    }

    /// Sets the website URL.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::InvalidUrl`] when the value is not an
    /// absolute URL.
    pub fn with_website_url(mut self, url: Option<String>) -> Result<Self, AgentDomainError> {
        self.website_url = validate_url("website", url)?;
        Ok(self)
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the contact email.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the avatar URL.
    #[must_use]
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    /// Returns the website URL.
    #[must_use]
    pub fn website_url(&self) -> Option<&str> {
        self.website_url.as_deref()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

fn validate_email(address: String) -> Result<String, AgentDomainError> {
    let is_valid = address.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.contains('@')
            && domain
                .split_once('.')
                .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
    });
    if is_valid {
        Ok(address)
    } else {
        Err(AgentDomainError::InvalidEmail(address))
    }
}

fn validate_url(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<String>, AgentDomainError> {
    let Some(raw) = non_blank(value) else {
        return Ok(None);
    };
    match Url::parse(&raw) {
        Ok(_) => Ok(Some(raw)),
        Err(_) => Err(AgentDomainError::InvalidUrl { field, value: raw }),
    }
}

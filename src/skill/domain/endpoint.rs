//! Callable endpoints declared on a skill.

use super::{EndpointId, ParseSkillEnumError, SkillDomainError};
use serde::{Deserialize, Serialize};

const MAX_PATH_LENGTH: usize = 100;
const MAX_DESCRIPTION_LENGTH: usize = 500;

/// HTTP method of a declared endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EndpointMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
    /// `PATCH`
    Patch,
}

impl TryFrom<&str> for EndpointMethod {
    type Error = ParseSkillEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "PATCH" => Ok(Self::Patch),
            _ => Err(ParseSkillEnumError::new("endpoint method", value)),
        }
    }
}

/// One callable endpoint of a skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEndpoint {
    id: EndpointId,
    path: String,
    method: EndpointMethod,
    description: Option<String>,
    parameters: Option<String>,
}

impl SkillEndpoint {
    /// Creates a validated endpoint declaration.
    ///
    /// `parameters` is an opaque JSON schema string.
    ///
    /// # Errors
    ///
    /// Returns [`SkillDomainError::InvalidEndpointPath`] or
    /// [`SkillDomainError::EndpointDescriptionTooLong`].
    pub fn new(
        path: &str,
        method: EndpointMethod,
        description: Option<String>,
        parameters: Option<String>,
    ) -> Result<Self, SkillDomainError> {
        let trimmed = path.trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_PATH_LENGTH {
            return Err(SkillDomainError::InvalidEndpointPath);
        }
        if description
            .as_ref()
            .is_some_and(|text| text.chars().count() > MAX_DESCRIPTION_LENGTH)
        {
            return Err(SkillDomainError::EndpointDescriptionTooLong);
        }
        Ok(Self {
            id: EndpointId::new(),
            path: trimmed.to_owned(),
            method,
            description,
            parameters,
        })
    }

    /// Returns the endpoint identifier.
    #[must_use]
    pub const fn id(&self) -> EndpointId {
        self.id
    }

    /// Returns the path relative to the skill's API endpoint.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> EndpointMethod {
        self.method
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the parameter schema.
    #[must_use]
    pub fn parameters(&self) -> Option<&str> {
        self.parameters.as_deref()
    }
}

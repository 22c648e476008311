//! Mapping of service errors onto HTTP responses.

use crate::activity::services::ActivityServiceError;
use crate::agent::{
    ports::AgentRepositoryError,
    services::{AgentServiceError, WalletServiceError},
};
use crate::chat::{ports::ChatRepositoryError, services::ChatServiceError};
use crate::forecast::ForecastError;
use crate::job::{
    domain::JobTransitionError, ports::JobRepositoryError, services::JobServiceError,
};
use crate::marketplace::{
    ports::{PurchaseRepositoryError, ReviewRepositoryError},
    services::MarketplaceServiceError,
};
use crate::skill::{ports::SkillRepositoryError, services::SkillServiceError};
use crate::skill_runtime::{
    domain::{InvalidAnalysisText, TransformError},
    services::{ScrapeServiceError, SlackServiceError, TxServiceError},
};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{Value, json};
use thiserror::Error;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Error returned by every handler.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Input failed validation (400).
    #[error("{message}")]
    Validation {
        /// Short description.
        message: String,
        /// Underlying cause, when more specific than `message`.
        details: Option<String>,
    },
    /// Missing or unknown API key (401).
    #[error("{0}")]
    Unauthorized(&'static str),
    /// Caller may not perform the operation (403).
    #[error("{0}")]
    Forbidden(String),
    /// Resource does not exist (404).
    #[error("{0}")]
    NotFound(String),
    /// Uniqueness rule violated (409).
    #[error("{0}")]
    Conflict(String),
    /// Caller exceeded a rate limit (429).
    #[error("{0}")]
    RateLimited(String),
    /// A third party answered with an error status that is relayed.
    #[error("{message}")]
    Upstream {
        /// Status to relay.
        status: StatusCode,
        /// Description of the upstream failure.
        message: String,
    },
    /// Unexpected failure; the cause is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Creates a 400 error with a generic message and `details`.
    #[must_use]
    pub fn invalid_input(details: impl ToString) -> Self {
        Self::Validation {
            message: "Invalid input".to_owned(),
            details: Some(details.to_string()),
        }
    }

    /// Creates a 400 error carrying only `message`.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: None,
        }
    }

    /// Creates a 500 error from any displayable cause.
    #[must_use]
    pub fn internal(cause: impl ToString) -> Self {
        Self::Internal(cause.to_string())
    }

    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::Upstream { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Value {
        match self {
            Self::Validation {
                message,
                details: Some(details),
            } => json!({ "success": false, "error": message, "details": details }),
            Self::Internal(_) => json!({ "success": false, "error": INTERNAL_MESSAGE }),
            other => json!({ "success": false, "error": other.to_string() }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(cause) = &self {
            tracing::error!(error = %cause, "request failed");
        }
        (self.status(), Json(self.body())).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_input(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::invalid_input(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::invalid_input(rejection.body_text())
    }
}

impl From<AgentRepositoryError> for ApiError {
    fn from(err: AgentRepositoryError) -> Self {
        match err {
            AgentRepositoryError::DuplicateName(_) => {
                Self::Conflict("Agent name already taken".to_owned())
            }
            AgentRepositoryError::DuplicateAgent(_) | AgentRepositoryError::DuplicateCredential => {
                Self::Conflict(err.to_string())
            }
            AgentRepositoryError::WalletInUse(_) => {
                Self::Conflict("Wallet already connected to another agent".to_owned())
            }
            AgentRepositoryError::NotFound(_) => Self::NotFound("Agent not found".to_owned()),
            AgentRepositoryError::InvalidPersistedData(_) | AgentRepositoryError::Persistence(_) => {
                Self::internal(err)
            }
        }
    }
}

impl From<AgentServiceError> for ApiError {
    fn from(err: AgentServiceError) -> Self {
        match err {
            AgentServiceError::Domain(domain) => Self::invalid_input(domain),
            AgentServiceError::Repository(repository) => repository.into(),
            AgentServiceError::UnknownClaimToken => {
                Self::NotFound("Invalid claim token".to_owned())
            }
            AgentServiceError::Unauthenticated => Self::Unauthorized("Invalid API key"),
        }
    }
}

impl From<WalletServiceError> for ApiError {
    fn from(err: WalletServiceError) -> Self {
        match err {
            WalletServiceError::Domain(domain) => Self::invalid_input(domain),
            WalletServiceError::Repository(repository) => repository.into(),
            WalletServiceError::NoWallet => Self::NotFound("No wallet connected".to_owned()),
        }
    }
}

impl From<SkillRepositoryError> for ApiError {
    fn from(err: SkillRepositoryError) -> Self {
        match err {
            SkillRepositoryError::DuplicateName { .. } => {
                Self::Conflict("You already have a skill with this name".to_owned())
            }
            SkillRepositoryError::DuplicateSkill(_) => Self::Conflict(err.to_string()),
            SkillRepositoryError::NotFound(_) => Self::NotFound("Skill not found".to_owned()),
            SkillRepositoryError::InvalidPersistedData(_) | SkillRepositoryError::Persistence(_) => {
                Self::internal(err)
            }
        }
    }
}

impl From<SkillServiceError> for ApiError {
    fn from(err: SkillServiceError) -> Self {
        match err {
            SkillServiceError::Domain(domain) => Self::invalid_input(domain),
            SkillServiceError::Repository(repository) => repository.into(),
            SkillServiceError::Agents(agents) => agents.into(),
            SkillServiceError::NotOwned(_) => {
                Self::NotFound("Skill not found or not owned by you".to_owned())
            }
        }
    }
}

impl From<JobServiceError> for ApiError {
    fn from(err: JobServiceError) -> Self {
        match err {
            JobServiceError::Domain(domain) => Self::invalid_input(domain),
            JobServiceError::Transition(transition) => match transition {
                JobTransitionError::NotParticipant | JobTransitionError::NotPoster => {
                    Self::Forbidden(transition.to_string())
                }
                JobTransitionError::NotOpen(_)
                | JobTransitionError::OwnJob
                | JobTransitionError::Finished(_) => Self::bad_request(transition.to_string()),
            },
            JobServiceError::Repository(repository) => match repository {
                JobRepositoryError::NotFound(_) => Self::NotFound("Job not found".to_owned()),
                JobRepositoryError::DuplicateJob(_) => Self::Conflict(repository.to_string()),
                JobRepositoryError::InvalidPersistedData(_) | JobRepositoryError::Persistence(_) => {
                    Self::internal(repository)
                }
            },
            JobServiceError::Agents(agents) => agents.into(),
        }
    }
}

impl From<ChatServiceError> for ApiError {
    fn from(err: ChatServiceError) -> Self {
        match err {
            ChatServiceError::Domain(domain) => Self::invalid_input(domain),
            ChatServiceError::Repository(ChatRepositoryError::ReplyTargetMissing(_)) => {
                Self::NotFound("Reply target not found".to_owned())
            }
            ChatServiceError::Repository(repository) => Self::internal(repository),
        }
    }
}

impl From<ActivityServiceError> for ApiError {
    fn from(err: ActivityServiceError) -> Self {
        match err {
            ActivityServiceError::Domain(domain) => Self::invalid_input(domain),
            ActivityServiceError::Repository(repository) => Self::internal(repository),
        }
    }
}

impl From<MarketplaceServiceError> for ApiError {
    fn from(err: MarketplaceServiceError) -> Self {
        match err {
            MarketplaceServiceError::Domain(domain) => Self::invalid_input(domain),
            MarketplaceServiceError::Purchases(PurchaseRepositoryError::DuplicateTxHash(_)) => {
                Self::Conflict("Transaction already processed".to_owned())
            }
            MarketplaceServiceError::Purchases(PurchaseRepositoryError::NotFound(_)) => {
                Self::NotFound("Purchase not found".to_owned())
            }
            MarketplaceServiceError::Purchases(purchases) => Self::internal(purchases),
            MarketplaceServiceError::Reviews(ReviewRepositoryError::DuplicateReview { .. }) => {
                Self::Conflict("You have already reviewed this skill".to_owned())
            }
            MarketplaceServiceError::Reviews(reviews) => Self::internal(reviews),
            MarketplaceServiceError::Skills(skills) => skills.into(),
            MarketplaceServiceError::Agents(agents) => agents.into(),
            MarketplaceServiceError::SkillNotFound(_) => {
                Self::NotFound("Skill not found".to_owned())
            }
            MarketplaceServiceError::OwnSkill => {
                Self::bad_request("Cannot purchase your own skill")
            }
            MarketplaceServiceError::AlreadyOwned(_) => {
                Self::Conflict("You already own this skill".to_owned())
            }
            MarketplaceServiceError::PurchaseRequired(_) => {
                Self::Forbidden("Must purchase skill before reviewing".to_owned())
            }
        }
    }
}

impl From<InvalidAnalysisText> for ApiError {
    fn from(err: InvalidAnalysisText) -> Self {
        Self::invalid_input(err)
    }
}

impl From<TransformError> for ApiError {
    fn from(err: TransformError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        Self::invalid_input(err)
    }
}

impl From<ScrapeServiceError> for ApiError {
    fn from(err: ScrapeServiceError) -> Self {
        match err {
            ScrapeServiceError::Input(input) => Self::bad_request(input.to_string()),
            ScrapeServiceError::RateLimited => Self::RateLimited(err.to_string()),
            ScrapeServiceError::Upstream { status, .. } => Self::Upstream {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message: err.to_string(),
            },
            ScrapeServiceError::Outbound(outbound) => Self::internal(outbound),
        }
    }
}

impl From<SlackServiceError> for ApiError {
    fn from(err: SlackServiceError) -> Self {
        match err {
            SlackServiceError::Input(input) => Self::bad_request(input.to_string()),
            SlackServiceError::Rejected { .. } => Self::bad_request(err.to_string()),
            SlackServiceError::Outbound(outbound) => Self::internal(outbound),
        }
    }
}

impl From<TxServiceError> for ApiError {
    fn from(err: TxServiceError) -> Self {
        match err {
            TxServiceError::Input(input) => Self::bad_request(input.to_string()),
            TxServiceError::NotFound { .. } => Self::NotFound(err.to_string()),
            TxServiceError::Outbound(outbound) => Self::internal(outbound),
        }
    }
}

//! HTTP fetch and webhook ports.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// Result type for outbound calls.
pub type OutboundResult<T> = Result<T, OutboundError>;

/// Failure talking to a remote service.
#[derive(Debug, Clone, Error)]
pub enum OutboundError {
    /// Connection, timeout or protocol failure.
    #[error("outbound request failed: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
    /// The remote answered with something unusable.
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

impl OutboundError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Describes an unusable response.
    pub fn invalid_response(reason: impl ToString) -> Self {
        Self::InvalidResponse(reason.to_string())
    }
}

/// Downloaded page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// HTTP status code.
    pub status: u16,
    /// Canonical reason phrase.
    pub reason: String,
    /// Response body.
    pub body: String,
}

impl FetchedPage {
    /// Returns `true` for a 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fetches web pages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Issues a GET for `url`, following redirects. `headers` override the
    /// adapter's browser-like defaults.
    async fn fetch(
        &self,
        url: &Url,
        headers: &BTreeMap<String, String>,
    ) -> OutboundResult<FetchedPage>;
}

/// Webhook answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookReply {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

/// Posts JSON to webhooks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebhookPoster: Send + Sync {
    /// POSTs `payload` as JSON.
    async fn post_json(&self, url: &Url, payload: &Value) -> OutboundResult<WebhookReply>;
}

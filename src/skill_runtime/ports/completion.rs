//! Language-model completion port.

use super::OutboundResult;
use crate::skill_runtime::domain::Entity;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// Analysis returned by a completion backend. Every field is optional on
/// the wire.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoteAnalysis {
    /// Sentiment label.
    #[serde(default)]
    pub sentiment: Option<String>,
    /// Entities.
    #[serde(default)]
    pub entities: Vec<Entity>,
    /// Summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Token accounting.
    #[serde(skip)]
    pub usage: Option<Value>,
}

/// Analyses text with a remote model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Requests sentiment, entities and a summary for `text`.
    async fn analyze(&self, text: &str) -> OutboundResult<RemoteAnalysis>;
}

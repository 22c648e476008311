//! Slack webhook delivery.

use crate::skill_runtime::{
    domain::{SlackInputError, SlackNotification, SlackRequest},
    ports::{OutboundError, WebhookPoster},
};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Delivery failures.
#[derive(Debug, Clone, Error)]
pub enum SlackServiceError {
    /// Request failed validation.
    #[error(transparent)]
    Input(#[from] SlackInputError),
    /// Slack answered with anything other than `200 ok`.
    #[error("Slack API error: {body}")]
    Rejected {
        /// Status code returned by Slack.
        status: u16,
        /// Response body.
        body: String,
    },
    /// The webhook could not be reached.
    #[error(transparent)]
    Outbound(#[from] OutboundError),
}

/// Successful delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlackDelivery {
    /// Local identifier of the delivery.
    pub message_id: String,
    /// Thread replied to.
    pub thread_ts: Option<String>,
}

/// Posts notifications to Slack incoming webhooks.
pub struct SlackNotifier<W, C>
where
    W: WebhookPoster + ?Sized,
    C: Clock + Send + Sync,
{
    poster: Arc<W>,
    clock: Arc<C>,
}

impl<W, C> Clone for SlackNotifier<W, C>
where
    W: WebhookPoster + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            poster: Arc::clone(&self.poster),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<W, C> SlackNotifier<W, C>
where
    W: WebhookPoster + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a notifier.
    #[must_use]
    pub const fn new(poster: Arc<W>, clock: Arc<C>) -> Self {
        Self { poster, clock }
    }

    /// Validates and sends a notification.
    ///
    /// # Errors
    ///
    /// Returns [`SlackServiceError::Input`] for invalid requests,
    /// [`SlackServiceError::Rejected`] when Slack refuses the payload and
    /// [`SlackServiceError::Outbound`] when the webhook is unreachable.
    pub async fn notify(&self, request: SlackRequest) -> Result<SlackDelivery, SlackServiceError> {
        let notification = SlackNotification::new(request)?;
        let reply = self
            .poster
            .post_json(notification.webhook(), notification.payload())
            .await?;
        if reply.status != 200 || reply.body != "ok" {
            tracing::warn!(status = reply.status, "slack webhook rejected notification");
            return Err(SlackServiceError::Rejected {
                status: reply.status,
                body: reply.body,
            });
        }
        Ok(SlackDelivery {
            message_id: format!("slack_{}", self.clock.utc().timestamp_millis()),
            thread_ts: notification.thread_ts().map(str::to_owned),
        })
    }
}

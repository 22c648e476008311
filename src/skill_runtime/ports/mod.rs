//! Outbound ports used by the skill runtime.

mod chain;
mod completion;
mod outbound;

pub use chain::ChainRpc;
pub use completion::{CompletionClient, RemoteAnalysis};
pub use outbound::{
    FetchedPage, OutboundError, OutboundResult, PageFetcher, WebhookPoster, WebhookReply,
};

#[cfg(test)]
pub(crate) use chain::MockChainRpc;
#[cfg(test)]
pub(crate) use completion::MockCompletionClient;
#[cfg(test)]
pub(crate) use outbound::{MockPageFetcher, MockWebhookPoster};

//! Domain model for chat messages.

mod message;

pub use message::{ChatDomainError, ChatMessage, ChatMessageId, PersistedChatMessageData};

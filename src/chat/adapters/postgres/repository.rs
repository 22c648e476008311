//! `PostgreSQL` repository implementation for chat messages.

use super::{models::ChatMessageRow, schema::chat_messages};
use crate::agent::domain::AgentId;
use crate::chat::{
    domain::{ChatMessage, ChatMessageId, PersistedChatMessageData},
    ports::{ChatRepository, ChatRepositoryError, ChatRepositoryResult},
};
use crate::persistence::{PgPool, is_foreign_key_violation, run_blocking};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// `PostgreSQL`-backed chat repository.
#[derive(Debug, Clone)]
pub struct PostgresChatRepository {
    pool: PgPool,
}

impl PostgresChatRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> ChatRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ChatRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(&self.pool, ChatRepositoryError::from_boxed, f).await
    }
}

#[async_trait]
impl ChatRepository for PostgresChatRepository {
    async fn append(&self, message: &ChatMessage) -> ChatRepositoryResult<()> {
        let reply_to = message.reply_to();
        let row = ChatMessageRow {
            id: message.id().into_inner(),
            agent_id: message.agent_id().into_inner(),
            author_name: message.author_name().to_owned(),
            content: message.content().to_owned(),
            reply_to: reply_to.map(ChatMessageId::into_inner),
            created_at: message.created_at(),
        };
        self.run(move |connection| {
            diesel::insert_into(chat_messages::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match reply_to {
                    Some(target) if is_foreign_key_violation(&err) => {
                        ChatRepositoryError::ReplyTargetMissing(target)
                    }
                    _ => ChatRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ChatMessageId) -> ChatRepositoryResult<Option<ChatMessage>> {
        self.run(move |connection| {
            let row = chat_messages::table
                .filter(chat_messages::id.eq(id.into_inner()))
                .select(ChatMessageRow::as_select())
                .first::<ChatMessageRow>(connection)
                .optional()
                .map_err(ChatRepositoryError::persistence)?;
            Ok(row.map(row_to_message))
        })
        .await
    }

    async fn history(
        &self,
        before: Option<DateTime<Utc>>,
        limit: u32,
    ) -> ChatRepositoryResult<Vec<ChatMessage>> {
        self.run(move |connection| {
            let mut query = chat_messages::table.into_boxed();
            if let Some(cutoff) = before {
                query = query.filter(chat_messages::created_at.lt(cutoff));
            }
            let rows = query
                .order(chat_messages::created_at.desc())
                .limit(i64::from(limit))
                .select(ChatMessageRow::as_select())
                .load::<ChatMessageRow>(connection)
                .map_err(ChatRepositoryError::persistence)?;
            Ok(rows.into_iter().rev().map(row_to_message).collect())
        })
        .await
    }

    async fn recent(
        &self,
        after: Option<DateTime<Utc>>,
        limit: u32,
    ) -> ChatRepositoryResult<Vec<ChatMessage>> {
        self.run(move |connection| {
            let mut query = chat_messages::table.into_boxed();
            if let Some(cutoff) = after {
                query = query.filter(chat_messages::created_at.gt(cutoff));
            }
            let rows = query
                .order(chat_messages::created_at.asc())
                .limit(i64::from(limit))
                .select(ChatMessageRow::as_select())
                .load::<ChatMessageRow>(connection)
                .map_err(ChatRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_message).collect())
        })
        .await
    }
}

fn row_to_message(row: ChatMessageRow) -> ChatMessage {
    ChatMessage::from_persisted(PersistedChatMessageData {
        id: ChatMessageId::from_uuid(row.id),
        agent_id: AgentId::from_uuid(row.agent_id),
        author_name: row.author_name,
        content: row.content,
        reply_to: row.reply_to.map(ChatMessageId::from_uuid),
        created_at: row.created_at,
    })
}

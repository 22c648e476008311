//! Diesel schema for chat persistence.

diesel::table! {
    /// Chat room messages.
    chat_messages (id) {
        /// Internal message identifier.
        id -> Uuid,
        /// Authoring agent.
        agent_id -> Uuid,
        /// Author name at posting time.
        #[max_length = 50]
        author_name -> Varchar,
        /// Message body.
        content -> Text,
        /// Message replied to.
        reply_to -> Nullable<Uuid>,
        /// Posting timestamp.
        created_at -> Timestamptz,
    }
}

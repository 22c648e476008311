//! Diesel schema for activity log persistence.

diesel::table! {
    /// Append-only activity log.
    activity_logs (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Severity level.
        #[max_length = 10]
        level -> Varchar,
        /// Log message.
        message -> Text,
        /// Source label.
        #[max_length = 100]
        source -> Varchar,
        /// Authoring agent.
        agent_id -> Nullable<Uuid>,
        /// Opaque metadata string.
        metadata -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

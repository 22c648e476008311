//! Diesel schema for job persistence.

diesel::table! {
    /// Jobs posted on the board.
    jobs (id) {
        /// Internal job identifier.
        id -> Uuid,
        /// Posting agent.
        posted_by -> Uuid,
        /// Taking agent, once accepted.
        taken_by -> Nullable<Uuid>,
        /// Title.
        #[max_length = 200]
        title -> Varchar,
        /// Description.
        description -> Text,
        /// Job type.
        #[max_length = 20]
        job_type -> Varchar,
        /// Catalogue category.
        #[max_length = 20]
        category -> Varchar,
        /// Requirements.
        requirements -> Nullable<Text>,
        /// Budget label.
        #[max_length = 100]
        budget -> Nullable<Varchar>,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Acceptance timestamp.
        started_at -> Nullable<Timestamptz>,
        /// Completion timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

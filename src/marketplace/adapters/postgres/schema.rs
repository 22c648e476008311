//! Diesel schema for marketplace persistence.

diesel::table! {
    /// Skill purchases.
    purchases (id) {
        /// Internal purchase identifier.
        id -> Uuid,
        /// Buying agent.
        buyer_id -> Uuid,
        /// Purchased skill.
        skill_id -> Uuid,
        /// Granted licence.
        #[max_length = 20]
        license_type -> Varchar,
        /// Price paid in hundredths of the currency unit.
        amount_cents -> Int8,
        /// Currency code.
        #[max_length = 10]
        currency -> Varchar,
        /// Settling transaction hash, unique.
        #[max_length = 128]
        tx_hash -> Varchar,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Subscription expiry.
        expires_at -> Nullable<Timestamptz>,
        /// Call allowance.
        usage_limit -> Nullable<Int4>,
        /// Calls consumed.
        current_usage -> Int4,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Skill reviews, one per reviewer and skill.
    reviews (id) {
        /// Internal review identifier.
        id -> Uuid,
        /// Reviewing agent.
        reviewer_id -> Uuid,
        /// Reviewer name at posting time.
        #[max_length = 50]
        reviewer_name -> Varchar,
        /// Reviewed skill.
        skill_id -> Uuid,
        /// Star rating from 1 to 5.
        rating -> Int4,
        /// Free-text comment.
        comment -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

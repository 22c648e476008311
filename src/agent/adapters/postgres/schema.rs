//! Diesel schema for agent persistence.

diesel::table! {
    /// Registered marketplace agents.
    agents (id) {
        /// Internal agent identifier.
        id -> Uuid,
        /// Display name as registered.
        #[max_length = 50]
        name -> Varchar,
        /// Lowercase name carrying the unique index.
        #[max_length = 50]
        name_key -> Varchar,
        /// Free-text description, empty when unset.
        description -> Text,
        /// Contact email.
        #[max_length = 255]
        email -> Nullable<Varchar>,
        /// Avatar image URL.
        avatar_url -> Nullable<Text>,
        /// Website URL.
        website_url -> Nullable<Text>,
        /// Lifecycle status (pending_claim or claimed).
        #[max_length = 20]
        status -> Varchar,
        /// SHA-256 hex digest of the bearer key.
        #[max_length = 64]
        api_key_hash -> Varchar,
        /// Public claim token.
        #[max_length = 64]
        claim_token -> Varchar,
        /// Verification code shown to the owner.
        #[max_length = 32]
        verification_code -> Varchar,
        /// Owner X handle once claimed.
        #[max_length = 50]
        owner_x_handle -> Nullable<Varchar>,
        /// Verification tweet URL.
        owner_tweet_url -> Nullable<Text>,
        /// Claim timestamp.
        claimed_at -> Nullable<Timestamptz>,
        /// Connected EVM wallet, lowercase.
        #[max_length = 42]
        wallet_address -> Nullable<Varchar>,
        /// EVM chain of the connected wallet.
        wallet_chain_id -> Nullable<Int8>,
        /// When the wallet was connected.
        wallet_connected_at -> Nullable<Timestamptz>,
        /// Reputation score.
        reputation -> Int4,
        /// Owned skill count.
        skill_count -> Int4,
        /// Completed job count.
        completed_jobs -> Int4,
        /// Sales count.
        total_sales -> Int4,
        /// Purchase count.
        total_purchases -> Int4,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

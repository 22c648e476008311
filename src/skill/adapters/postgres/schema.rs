//! Diesel schema for skill persistence.

diesel::table! {
    /// Published skills with embedded endpoint declarations.
    skills (id) {
        /// Internal skill identifier.
        id -> Uuid,
        /// Owning agent.
        agent_id -> Uuid,
        /// Skill name, unique per owner.
        #[max_length = 100]
        name -> Varchar,
        /// Version label.
        #[max_length = 20]
        version -> Varchar,
        /// Long-form description.
        description -> Text,
        /// Catalogue category.
        #[max_length = 20]
        category -> Varchar,
        /// Tag list as a JSONB array of strings.
        tags -> Jsonb,
        /// API endpoint URL.
        api_endpoint -> Nullable<Text>,
        /// Source repository URL.
        repo_url -> Nullable<Text>,
        /// Documentation body.
        documentation -> Nullable<Text>,
        /// Price in hundredths of the currency unit.
        price_cents -> Int8,
        /// Currency code.
        #[max_length = 10]
        currency -> Varchar,
        /// Pricing model as JSONB.
        pricing_model -> Jsonb,
        /// Endpoint declarations as a JSONB array.
        endpoints -> Jsonb,
        /// Catalogue visibility.
        is_published -> Bool,
        /// Mean review rating.
        rating -> Float8,
        /// Review count.
        review_count -> Int4,
        /// Invocation count.
        use_count -> Int4,
        /// Purchase count.
        download_count -> Int4,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

//! Domain model for published skills.
//!
//! Skills carry catalogue metadata, pricing and declared endpoints. Counters
//! are denormalised onto the aggregate and adjusted by repositories.

mod category;
mod endpoint;
mod error;
mod ids;
mod pricing;
mod skill;
mod text;

pub use category::SkillCategory;
pub use endpoint::{EndpointMethod, SkillEndpoint};
pub use error::{ParseSkillEnumError, SkillDomainError};
pub use ids::{EndpointId, SkillId};
pub use pricing::{BillingInterval, DEFAULT_USAGE_LIMIT, Pricing, PricingModel};
pub use skill::{
    PersistedSkillData, Skill, SkillChanges, SkillCounter, SkillDraft, SkillFilter, SkillMetrics,
};
pub use text::{SkillDescription, SkillName, SkillTags, SkillVersion};

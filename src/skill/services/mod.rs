//! Application services for skill publishing and browsing.

mod catalog;

pub use catalog::{
    EndpointRequest, PricingRequest, PublishSkillRequest, SkillCatalogService, SkillServiceError,
    SkillServiceResult, UpdateSkillRequest,
};

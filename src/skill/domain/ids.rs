//! Identifier types for the skill domain.

use crate::ids::uuid_identifier;

uuid_identifier!(
    /// Unique identifier for a published skill.
    SkillId
);

uuid_identifier!(
    /// Unique identifier for an endpoint declared on a skill.
    EndpointId
);

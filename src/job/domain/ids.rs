//! Identifier types for the job domain.

use crate::ids::uuid_identifier;

uuid_identifier!(
    /// Unique identifier for a posted job.
    JobId
);

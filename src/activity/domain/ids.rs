//! Identifier types for the activity domain.

use crate::ids::uuid_identifier;

uuid_identifier!(
    /// Unique identifier for an activity log entry.
    LogEntryId
);

//! Unit tests for the activity log context.

mod journal_tests;

//! Unit tests for the skill context.

mod domain_tests;

//! Unit tests for the marketplace context.

mod domain_tests;
mod exchange_tests;

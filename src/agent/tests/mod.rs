//! Unit tests for the agent context.

mod domain_tests;
mod service_tests;
mod wallet_tests;

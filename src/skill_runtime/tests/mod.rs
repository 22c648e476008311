//! Unit tests for the skill runtime.

mod analysis_tests;
mod scrape_tests;
mod slack_tests;
mod tx_risk_tests;

//! Executable skills offered by the platform.
//!
//! Each skill is a stateless request handler: text analysis, document
//! format conversion, page scraping, Slack notification and on-chain
//! transaction risk scoring. The pure logic lives in [`domain`]; calls to
//! OpenAI, web pages, Slack and chain nodes go through the [`ports`] so
//! services can be exercised with mocks. Forecasting lives in
//! [`crate::forecast`].

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

//! Skill publishing and catalogue browsing.
//!
//! A skill is a capability an agent offers for sale, with pricing, optional
//! callable endpoints and usage counters. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

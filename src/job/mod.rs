//! Job board for work posted by one agent and taken by another.
//!
//! Jobs move from open to in progress when accepted, and end completed or
//! cancelled. The module follows the same hexagonal layout as the other
//! contexts:
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

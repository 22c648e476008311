//! Agent registration, claiming and authentication.
//!
//! Agents are the accounts of the marketplace. Registration hands out a
//! bearer API key exactly once; only its SHA-256 digest is stored. A human
//! owner later claims the agent with a verification tweet. The module
//! follows hexagonal architecture:
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

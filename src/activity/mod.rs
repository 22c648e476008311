//! Activity log shared by agents and the platform itself.
//!
//! Agents append entries describing what they did; services append entries
//! for notable marketplace events. Entries are immutable once written.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

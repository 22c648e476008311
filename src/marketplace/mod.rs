//! Skill purchases, licence verification and reviews.
//!
//! A purchase grants a buyer access to another agent's skill under a
//! licence. Subscriptions expire and usage-priced purchases carry a call
//! allowance. Only buyers with an active purchase may review a skill.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

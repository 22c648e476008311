//! Shared chat room for registered agents.
//!
//! Messages are append-only and may reply to an earlier message. Readers
//! page backwards through history or poll forwards for new messages.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

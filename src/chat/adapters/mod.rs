//! Adapter implementations of the chat ports.

pub mod memory;
pub mod postgres;

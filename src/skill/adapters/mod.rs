//! Adapter implementations of the skill ports.

pub mod memory;
pub mod postgres;

//! Adapter implementations of the activity log port.

pub mod memory;
pub mod postgres;

//! Step definitions for agent registration scenarios.

mod given;
mod then;
mod when;
pub mod world;

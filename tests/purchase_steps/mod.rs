//! Step definitions for purchase scenarios.

mod given;
mod then;
mod when;
pub mod world;

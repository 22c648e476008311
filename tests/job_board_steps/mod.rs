//! Step definitions for job board scenarios.

mod given;
mod then;
mod when;
pub mod world;

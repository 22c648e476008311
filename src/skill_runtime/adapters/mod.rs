//! Adapters for the skill runtime's outbound ports.

pub mod chain_rpc;
pub mod http;
pub mod openai;

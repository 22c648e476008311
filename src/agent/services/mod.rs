//! Application services for agent registration, identity and wallets.

mod registry;
mod wallet;

pub use registry::{
    AgentRegistryService, AgentServiceError, AgentServiceResult, ProfileUpdate,
    RegisterAgentRequest, RegisteredAgent,
};
pub use wallet::{
    ConnectWalletRequest, WalletChallenge, WalletOverview, WalletService, WalletServiceError,
    WalletServiceResult,
};

//! Domain model for marketplace agents.
//!
//! Covers naming rules, credential minting and the claim lifecycle. All
//! infrastructure concerns are kept outside the domain boundary.

mod agent;
mod claim;
mod credentials;
mod error;
mod ids;
mod name;
mod profile;
mod stats;
mod status;
mod wallet;

pub use agent::{Agent, AgentCredentials, PersistedAgentData};
pub use claim::OwnerClaim;
pub use credentials::{ApiKey, ApiKeyHash, ClaimToken, VerificationCode};
pub use error::{AgentDomainError, ParseAgentStatusError};
pub use ids::AgentId;
pub use name::AgentName;
pub use profile::AgentProfile;
pub use stats::{AgentStat, AgentStats};
pub use status::AgentStatus;
pub use wallet::{ConnectedWallet, DEFAULT_CHAIN_ID, WalletAddress, format_units};

//! Agent aggregate root.

use super::{
    AgentDomainError, AgentId, AgentName, AgentProfile, AgentStats, AgentStatus,
    ApiKey, ApiKeyHash, ClaimToken, ConnectedWallet, OwnerClaim, VerificationCode,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Credentials minted for a new agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentCredentials {
    /// Digest of the bearer key.
    pub api_key_hash: ApiKeyHash,
    /// Token embedded in the claim URL.
    pub claim_token: ClaimToken,
    /// Code the owner posts when claiming.
    pub verification_code: VerificationCode,
}

impl AgentCredentials {
    /// Mints a new key, claim token and verification code.
    ///
    /// The clear key is returned alongside so it can be shown exactly once.
    #[must_use]
    pub fn issue() -> (ApiKey, Self) {
        let api_key = ApiKey::generate();
        let credentials = Self {
            api_key_hash: api_key.digest(),
            claim_token: ClaimToken::generate(),
            verification_code: VerificationCode::generate(),
        };
        (api_key, credentials)
    }
}

/// A registered marketplace account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    name: AgentName,
    profile: AgentProfile,
    status: AgentStatus,
    api_key_hash: ApiKeyHash,
    claim_token: ClaimToken,
    verification_code: VerificationCode,
    claim: Option<OwnerClaim>,
    wallet: Option<ConnectedWallet>,
    stats: AgentStats,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAgentData {
    /// Persisted identifier.
    pub id: AgentId,
    /// Persisted name.
    pub name: AgentName,
    /// Persisted profile fields.
    pub profile: AgentProfile,
    /// Persisted lifecycle status.
    pub status: AgentStatus,
    /// Persisted key digest.
    pub api_key_hash: ApiKeyHash,
    /// Persisted claim token.
    pub claim_token: ClaimToken,
    /// Persisted verification code.
    pub verification_code: VerificationCode,
    /// Persisted owner claim, if claimed.
    pub claim: Option<OwnerClaim>,
    /// Persisted wallet link, if any.
    pub wallet: Option<ConnectedWallet>,
    /// Persisted counters.
    pub stats: AgentStats,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Agent {
    /// Registers a new agent in [`AgentStatus::PendingClaim`].
    #[must_use]
    pub fn register(
        name: AgentName,
        profile: AgentProfile,
        credentials: AgentCredentials,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        let AgentCredentials {
            api_key_hash,
            claim_token,
            verification_code,
        } = credentials;
        Self {
            id: AgentId::new(),
            name,
            profile,
            status: AgentStatus::PendingClaim,
            api_key_hash,
            claim_token,
            verification_code,
            claim: None,
            wallet: None,
            stats: AgentStats::default(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an agent from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAgentData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            profile: data.profile,
            status: data.status,
            api_key_hash: data.api_key_hash,
            claim_token: data.claim_token,
            verification_code: data.verification_code,
            claim: data.claim,
            wallet: data.wallet,
            stats: data.stats,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the agent identifier.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Returns the agent name.
    #[must_use]
    pub const fn name(&self) -> &AgentName {
        &self.name
    }

    /// Returns the profile fields.
    #[must_use]
    pub const fn profile(&self) -> &AgentProfile {
        &self.profile
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> AgentStatus {
        self.status
    }

    /// Returns the key digest.
    #[must_use]
    pub const fn api_key_hash(&self) -> &ApiKeyHash {
        &self.api_key_hash
    }

    /// Returns the claim token.
    #[must_use]
    pub const fn claim_token(&self) -> &ClaimToken {
        &self.claim_token
    }

    /// Returns the verification code.
    #[must_use]
    pub const fn verification_code(&self) -> &VerificationCode {
        &self.verification_code
    }

    /// Returns the owner claim once the agent has been claimed.
    #[must_use]
    pub const fn claim(&self) -> Option<&OwnerClaim> {
        self.claim.as_ref()
    }

    /// Returns the connected wallet, if any.
    #[must_use]
    pub const fn wallet(&self) -> Option<&ConnectedWallet> {
        self.wallet.as_ref()
    }

    /// Returns the activity counters.
    #[must_use]
    pub const fn stats(&self) -> &AgentStats {
        &self.stats
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` once a human owner has claimed the agent.
    #[must_use]
    pub const fn is_claimed(&self) -> bool {
        matches!(self.status, AgentStatus::Claimed)
    }

    /// Records the owner's claim.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::AlreadyClaimed`] when the agent is already
    /// claimed, or a handle validation error.
    pub fn claim_by(
        &mut self,
        x_handle: &str,
        tweet_url: Option<String>,
        clock: &impl Clock,
    ) -> Result<(), AgentDomainError> {
        if self.is_claimed() {
            return Err(AgentDomainError::AlreadyClaimed);
        }
        let claim = OwnerClaim::new(x_handle, tweet_url, clock.utc())?;
        self.claim = Some(claim);
        self.status = AgentStatus::Claimed;
        self.touch(clock);
        Ok(())
    }

    /// Replaces the profile fields.
    pub fn update_profile(&mut self, profile: AgentProfile, clock: &impl Clock) {
        self.profile = profile;
        self.touch(clock);
    }

    /// Links `wallet`, replacing any previous one.
    pub fn connect_wallet(&mut self, wallet: ConnectedWallet, clock: &impl Clock) {
        self.wallet = Some(wallet);
        self.touch(clock);
    }

    /// Unlinks the wallet, returning it when one was connected.
    pub fn disconnect_wallet(&mut self, clock: &impl Clock) -> Option<ConnectedWallet> {
        let previous = self.wallet.take();
        if previous.is_some() {
            self.touch(clock);
        }
        previous
    }

    /// Returns the counters for in-place adjustment by repositories.
    pub(crate) const fn stats_mut(&mut self) -> &mut AgentStats {
        &mut self.stats
    }

    /// Returns `true` when the name or description contains `needle`,
    /// ignoring case.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        let lowered = needle.to_lowercase();
        self.name.as_str().to_lowercase().contains(&lowered)
            || self
                .profile
                .description()
                .is_some_and(|text| text.to_lowercase().contains(&lowered))
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

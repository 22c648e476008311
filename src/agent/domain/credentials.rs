//! Bearer API keys, claim tokens and verification codes.
//!
//! Clear API keys exist only between generation and the registration
//! response. Everything persisted is either a digest or a public token.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use super::AgentDomainError;

const API_KEY_PREFIX: &str = "clawos_";
const CLAIM_TOKEN_PREFIX: &str = "clawos_claim_";
const API_KEY_BYTES: usize = 32;
const CLAIM_TOKEN_BYTES: usize = 16;
const SHA256_HEX_LENGTH: usize = 64;

const ADJECTIVES: [&str; 8] = [
    "swift", "bright", "bold", "cool", "sharp", "keen", "wise", "wild",
];
const NOUNS: [&str; 8] = [
    "crab", "claw", "pincer", "shell", "wave", "reef", "coral", "tide",
];

fn random_hex(byte_count: usize) -> String {
    let mut bytes = vec![0_u8; byte_count];
    rand::thread_rng().fill(bytes.as_mut_slice());
    hex::encode(bytes)
}

/// Clear-text bearer key handed to an agent once at registration.
///
/// The key is deliberately not `Serialize`; callers expose it explicitly via
/// [`ApiKey::expose`].
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Generates a fresh key of the form `clawos_<64 hex chars>`.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("{API_KEY_PREFIX}{}", random_hex(API_KEY_BYTES)))
    }

    /// Wraps a key presented by a client.
    #[must_use]
    pub fn from_presented(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the clear key.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns the SHA-256 digest stored in place of the key.
    #[must_use]
    pub fn digest(&self) -> ApiKeyHash {
        ApiKeyHash(hex::encode(Sha256::digest(self.0.as_bytes())))
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(**redacted**)")
    }
}

/// Lowercase hex SHA-256 digest of an [`ApiKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKeyHash(String);

impl ApiKeyHash {
    /// Restores a digest read from storage.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::MalformedCredential`] when the value is not
    /// 64 hexadecimal characters.
    pub fn from_persisted(value: impl Into<String>) -> Result<Self, AgentDomainError> {
        let digest = value.into();
        let is_hex = digest.len() == SHA256_HEX_LENGTH
            && digest.chars().all(|c| c.is_ascii_hexdigit());
        if !is_hex {
            return Err(AgentDomainError::MalformedCredential);
        }
        Ok(Self(digest.to_ascii_lowercase()))
    }

    /// Returns the digest as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Public token embedded in an agent's claim URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimToken(String);

impl ClaimToken {
    /// Generates a fresh token of the form `clawos_claim_<32 hex chars>`.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("{CLAIM_TOKEN_PREFIX}{}", random_hex(CLAIM_TOKEN_BYTES)))
    }

    /// Wraps a token taken from a claim URL or storage.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::MalformedCredential`] for blank input.
    pub fn parse(value: impl Into<String>) -> Result<Self, AgentDomainError> {
        let token = value.into();
        if token.trim().is_empty() {
            return Err(AgentDomainError::MalformedCredential);
        }
        Ok(Self(token))
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the public claim URL under `app_url`.
    #[must_use]
    pub fn claim_url(&self, app_url: &str) -> String {
        format!("{}/claim/{}", app_url.trim_end_matches('/'), self.0)
    }
}

/// Human-friendly code the owner posts publicly, e.g. `swift-reef-4821`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Generates an `adjective-noun-NNNN` code.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let adjective = ADJECTIVES.choose(&mut rng).copied().unwrap_or("swift");
        let noun = NOUNS.choose(&mut rng).copied().unwrap_or("crab");
        let number: u16 = rng.gen_range(1000..10000);
        Self(format!("{adjective}-{noun}-{number}"))
    }

    /// Restores a code read from storage.
    #[must_use]
    pub fn from_persisted(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

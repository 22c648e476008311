//! Optional JSON file describing what a runner publishes and which jobs it
//! looks at.
//!
//! ```json
//! {
//!   "name": "scout",
//!   "description": "Finds work",
//!   "skills": [{ "name": "Digest", "description": "...", "category": "ANALYSIS" }],
//!   "jobPreferences": { "category": "ANALYSIS", "type": "TASK" }
//! }
//! ```

use super::api::JobPreferences;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Description used when neither the flags nor the file give one.
pub const DEFAULT_DESCRIPTION: &str = "Auto-registered agent";

/// Failure reading a runner profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The file could not be read.
    #[error("cannot read runner config {path}: {source}")]
    Read {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The file is not a valid runner config.
    #[error("invalid runner config {path}: {source}")]
    Parse {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}

/// Contents of a `--config` file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerProfile {
    /// Name used on first registration.
    #[serde(default)]
    pub name: Option<String>,
    /// Description used on first registration.
    #[serde(default)]
    pub description: Option<String>,
    /// Skill listings published at startup, each a `POST /skills` body.
    #[serde(default)]
    pub skills: Vec<Value>,
    /// Filter for the job scan.
    #[serde(default)]
    pub job_preferences: JobPreferences,
}

impl RunnerProfile {
    /// Reads a profile from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError`] when the file is unreadable or malformed.
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let text = std::fs::read_to_string(path).map_err(|source| ProfileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ProfileError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the registration description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION)
    }
}

//! Credentials saved between runner starts.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const QUALIFIER: &str = "";
const ORGANIZATION: &str = "ClawOS";
const APPLICATION: &str = "clawos";
const STATE_FILE: &str = "config.json";

/// Agent credentials kept on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerState {
    /// Clear API key.
    pub api_key: String,
    /// Agent identifier.
    pub agent_id: String,
    /// Agent name.
    pub name: String,
    /// When the agent was registered.
    pub registered_at: DateTime<Utc>,
}

/// Failure reading or writing the state file.
#[derive(Debug, Error)]
pub enum StateError {
    /// The platform has no home directory to derive a default path from.
    #[error("no config directory available; pass --state-file")]
    NoConfigDir,
    /// Filesystem failure.
    #[error("cannot access {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The file exists but is not valid state JSON.
    #[error("cannot parse {path}: {source}")]
    Malformed {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// JSON file holding a [`RunnerState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Uses an explicit file path.
    #[must_use]
    pub const fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Uses `config.json` under the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::NoConfigDir`] when no home directory is known.
    pub fn default_location() -> Result<Self, StateError> {
        let dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or(StateError::NoConfigDir)?;
        Ok(Self::at(dirs.config_dir().join(STATE_FILE)))
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the saved state, `None` when the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] when the file cannot be read or parsed.
    pub fn load(&self) -> Result<Option<RunnerState>, StateError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StateError::Malformed {
                path: self.path.clone(),
                source,
            })
    }

    /// Writes `state`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Io`] when the file cannot be written.
    pub fn save(&self, state: &RunnerState) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let json = serde_json::to_vec_pretty(state).map_err(|source| StateError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: io::Error) -> StateError {
        StateError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

//! Error types for discovery and registry synchronization.

use std::path::PathBuf;
use thiserror::Error;

use crate::discovery::DiscoverySnapshot;

/// A `groupVersion` string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseGroupVersionError {
    #[error("unexpected GroupVersion string \"{input}\": too many '/' separators")]
    TooManySegments { input: String },

    #[error("unexpected GroupVersion string \"{input}\": missing version")]
    MissingVersion { input: String },

    #[error("unexpected GroupVersion string \"{input}\": invalid version \"{version}\"")]
    InvalidVersion { input: String, version: String },

    #[error("unexpected GroupVersion string \"{input}\": invalid group \"{group}\"")]
    InvalidGroup { input: String, group: String },
}

/// Errors reported by a discovery client.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Some groups could not be read. The rest of discovery is in `snapshot`.
    #[error("unable to retrieve the complete list of server APIs: failed groups [{}]", groups.join(", "))]
    GroupDiscoveryFailed {
        groups: Vec<String>,
        snapshot: Box<DiscoverySnapshot>,
    },

    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid server URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

impl DiscoveryError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            DiscoveryError::FileNotFound { .. } | DiscoveryError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            DiscoveryError::NetworkError { .. } => 3,
            DiscoveryError::GroupDiscoveryFailed { .. } => 1,
            _ => 2,
        }
    }
}

/// Errors from a synchronization pass.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Discovery failed outright; nothing was merged.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// Every list was processed, but these could not be parsed.
    #[error("{} resource list(s) skipped: {}", errors.len(), join_errors(errors))]
    Invalid { errors: Vec<ParseGroupVersionError> },
}

impl SyncError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            SyncError::Discovery(e) => e.exit_code(),
            SyncError::Invalid { .. } => 1,
        }
    }

    /// Combine collected errors; `None` when there are none.
    pub fn from_errors(errors: Vec<ParseGroupVersionError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(SyncError::Invalid { errors })
        }
    }
}

fn join_errors(errors: &[ParseGroupVersionError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

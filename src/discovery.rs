//! Discovery clients.
//!
//! A client returns every API group the server knows about together with the
//! resource list of each group version. Snapshots can come from a JSON file,
//! a string, or a live API server over HTTP.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DiscoveryError;
use crate::types::{APIGroup, APIResourceList};

#[cfg(feature = "remote")]
use std::time::Duration;

#[cfg(feature = "remote")]
use tracing::{debug, warn};

#[cfg(feature = "remote")]
use crate::types::{APIGroupList, APIVersions};

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Groups and resource lists returned by one discovery fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverySnapshot {
    #[serde(default)]
    pub groups: Vec<APIGroup>,
    #[serde(default)]
    pub resources: Vec<APIResourceList>,
}

/// Source of discovery information.
pub trait DiscoveryClient {
    /// Fetch all groups and their resource lists.
    ///
    /// # Errors
    ///
    /// `DiscoveryError::GroupDiscoveryFailed` when only some groups could be
    /// read; it carries what was fetched. Any other error means nothing usable
    /// was returned.
    fn server_groups_and_resources(&self) -> Result<DiscoverySnapshot, DiscoveryError>;
}

/// Serves a fixed snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    snapshot: DiscoverySnapshot,
    failed_groups: Vec<String>,
}

impl StaticDiscovery {
    pub fn new(snapshot: DiscoverySnapshot) -> Self {
        Self {
            snapshot,
            failed_groups: Vec::new(),
        }
    }

    /// Load a snapshot from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::InvalidJson` if the string isn't a valid snapshot.
    pub fn from_json(content: &str) -> Result<Self, DiscoveryError> {
        serde_json::from_str(content)
            .map(Self::new)
            .map_err(|source| DiscoveryError::InvalidJson { source })
    }

    /// Load a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::FileNotFound` if the file doesn't exist,
    /// or `DiscoveryError::InvalidJson` if the file isn't a valid snapshot.
    pub fn from_path(path: &Path) -> Result<Self, DiscoveryError> {
        if !path.exists() {
            return Err(DiscoveryError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let read_error = |source: std::io::Error| DiscoveryError::ReadError {
            path: path.to_path_buf(),
            source,
        };
        let content = std::fs::read_to_string(path).map_err(read_error)?;

        Self::from_json(&content)
    }

    /// Report these groups as unreachable on every fetch.
    pub fn with_failed_groups(mut self, groups: Vec<String>) -> Self {
        self.failed_groups = groups;
        self
    }

    pub fn snapshot(&self) -> &DiscoverySnapshot {
        &self.snapshot
    }
}

impl DiscoveryClient for StaticDiscovery {
    fn server_groups_and_resources(&self) -> Result<DiscoverySnapshot, DiscoveryError> {
        if self.failed_groups.is_empty() {
            Ok(self.snapshot.clone())
        } else {
            Err(DiscoveryError::GroupDiscoveryFailed {
                groups: self.failed_groups.clone(),
                snapshot: Box::new(self.snapshot.clone()),
            })
        }
    }
}

/// Connection settings for `HttpDiscovery`.
#[cfg(feature = "remote")]
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// API server base URL, e.g. `https://127.0.0.1:6443`.
    pub server: String,
    /// Bearer token sent with every request.
    pub token: Option<String>,
    pub timeout: Duration,
}

#[cfg(feature = "remote")]
impl HttpConfig {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            token: None,
            timeout: HTTP_TIMEOUT,
        }
    }

    pub fn token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Discovery against a live API server.
///
/// Requires the `remote` feature (enabled by default).
#[cfg(feature = "remote")]
#[derive(Debug)]
pub struct HttpDiscovery {
    base: String,
    token: Option<String>,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "remote")]
impl HttpDiscovery {
    /// # Errors
    ///
    /// Returns `DiscoveryError::InvalidUrl` for a malformed server URL, or
    /// `DiscoveryError::NetworkError` if the HTTP client can't be built.
    pub fn new(config: HttpConfig) -> Result<Self, DiscoveryError> {
        let url = reqwest::Url::parse(&config.server).map_err(|e| DiscoveryError::InvalidUrl {
            url: config.server.clone(),
            message: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DiscoveryError::InvalidUrl {
                url: config.server,
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| DiscoveryError::NetworkError {
                url: config.server.clone(),
                source,
            })?;

        Ok(Self {
            base: config.server.trim_end_matches('/').to_string(),
            token: config.token,
            client,
        })
    }

    fn get_json<T>(&self, path: &str) -> Result<T, DiscoveryError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base, path);
        debug!(url = %url, "fetching discovery document");

        let mut request = self.client.get(&url).header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let network_error = |source: reqwest::Error| DiscoveryError::NetworkError {
            url: url.clone(),
            source,
        };

        request
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(network_error)?
            .json()
            .map_err(network_error)
    }

    /// The core group, synthesized from `/api`.
    fn core_group(&self) -> Result<Option<APIGroup>, DiscoveryError> {
        let core: APIVersions = self.get_json("/api")?;
        let versions: Vec<&str> = core.versions.iter().map(String::as_str).collect();
        Ok(versions
            .first()
            .map(|preferred| APIGroup::new("", preferred, &versions)))
    }
}

#[cfg(feature = "remote")]
impl DiscoveryClient for HttpDiscovery {
    fn server_groups_and_resources(&self) -> Result<DiscoverySnapshot, DiscoveryError> {
        let mut snapshot = DiscoverySnapshot::default();
        snapshot.groups.extend(self.core_group()?);
        let named: APIGroupList = self.get_json("/apis")?;
        snapshot.groups.extend(named.groups);

        let mut failed: Vec<String> = Vec::new();
        for group in &snapshot.groups {
            for version in &group.versions {
                let path = if group.name.is_empty() {
                    format!("/api/{}", version.version)
                } else {
                    format!("/apis/{}/{}", group.name, version.version)
                };

                match self.get_json::<APIResourceList>(&path) {
                    Ok(mut list) => {
                        if list.group_version.is_empty() {
                            list.group_version = version.group_version.clone();
                        }
                        snapshot.resources.push(list);
                    }
                    Err(e) => {
                        warn!(
                            group_version = %version.group_version,
                            error = %e,
                            "failed to read resource list"
                        );
                        if !failed.contains(&group.name) {
                            failed.push(group.name.clone());
                        }
                    }
                }
            }
        }

        if failed.is_empty() {
            Ok(snapshot)
        } else {
            Err(DiscoveryError::GroupDiscoveryFailed {
                groups: failed,
                snapshot: Box::new(snapshot),
            })
        }
    }
}

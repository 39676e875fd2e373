//! Core types for Kubernetes API discovery.
//!
//! The identity triples (`GroupVersion`, `GroupVersionKind`,
//! `GroupVersionResource`) and the discovery documents served by an API
//! server under `/api` and `/apis`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ParseGroupVersionError;

/// A group and version pair, e.g. `apps/v1`. The core group is `""`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GroupVersion {
    pub group: String,
    pub version: String,
}

impl GroupVersion {
    pub fn new(group: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
        }
    }

    /// Parse a `groupVersion` string as reported by discovery.
    ///
    /// `"v1"` is the core group, `"apps/v1"` is group `apps` version `v1`.
    ///
    /// # Errors
    ///
    /// Returns `ParseGroupVersionError` for strings with more than one `/`,
    /// an empty version, or characters outside the Kubernetes name alphabet.
    pub fn parse(s: &str) -> Result<Self, ParseGroupVersionError> {
        let (group, version) = match s.split_once('/') {
            None => ("", s),
            Some((_, rest)) if rest.contains('/') => {
                return Err(ParseGroupVersionError::TooManySegments {
                    input: s.to_string(),
                })
            }
            Some((group, version)) => (group, version),
        };

        if version.is_empty() {
            return Err(ParseGroupVersionError::MissingVersion {
                input: s.to_string(),
            });
        }
        if !is_valid_version(version) {
            return Err(ParseGroupVersionError::InvalidVersion {
                input: s.to_string(),
                version: version.to_string(),
            });
        }
        if !is_valid_group(group) {
            return Err(ParseGroupVersionError::InvalidGroup {
                input: s.to_string(),
                group: group.to_string(),
            });
        }

        Ok(Self::new(group, version))
    }

    pub fn with_kind(&self, kind: impl Into<String>) -> GroupVersionKind {
        GroupVersionKind {
            group: self.group.clone(),
            version: self.version.clone(),
            kind: kind.into(),
        }
    }

    pub fn with_resource(&self, resource: impl Into<String>) -> GroupVersionResource {
        GroupVersionResource {
            group: self.group.clone(),
            version: self.version.clone(),
            resource: resource.into(),
        }
    }
}

impl fmt::Display for GroupVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.version)
        } else {
            write!(f, "{}/{}", self.group, self.version)
        }
    }
}

/// Versions are DNS labels: lowercase alphanumerics and `-`, not at the ends.
fn is_valid_version(s: &str) -> bool {
    !s.starts_with('-')
        && !s.ends_with('-')
        && s.bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Groups are empty (core) or DNS subdomains.
fn is_valid_group(s: &str) -> bool {
    let valid_label = |label: &str| !label.is_empty() && is_valid_version(label);
    s.is_empty() || s.split('.').all(valid_label)
}

/// Type identity of a resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    pub fn group_version(&self) -> GroupVersion {
        GroupVersion::new(self.group.clone(), self.version.clone())
    }
}

/// REST identity of a resource: the plural path segment under a group version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GroupVersionResource {
    pub group: String,
    pub version: String,
    pub resource: String,
}

/// A version entry in an `APIGroup`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupVersionForDiscovery {
    /// `group/version`, or just `version` for the core group.
    pub group_version: String,
    pub version: String,
}

impl GroupVersionForDiscovery {
    pub fn new(group: &str, version: &str) -> Self {
        Self {
            group_version: GroupVersion::new(group, version).to_string(),
            version: version.to_string(),
        }
    }
}

/// An API group as listed by `/apis`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct APIGroup {
    pub name: String,
    #[serde(default)]
    pub versions: Vec<GroupVersionForDiscovery>,
    #[serde(default)]
    pub preferred_version: GroupVersionForDiscovery,
}

impl APIGroup {
    /// Build a group from its name, preferred version and all served versions.
    pub fn new(name: &str, preferred: &str, versions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            versions: versions
                .iter()
                .map(|v| GroupVersionForDiscovery::new(name, v))
                .collect(),
            preferred_version: if preferred.is_empty() {
                GroupVersionForDiscovery::default()
            } else {
                GroupVersionForDiscovery::new(name, preferred)
            },
        }
    }
}

/// Response body of `/apis`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct APIGroupList {
    #[serde(default)]
    pub groups: Vec<APIGroup>,
}

/// Response body of `/api`: the versions of the core group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct APIVersions {
    #[serde(default)]
    pub versions: Vec<String>,
}

/// A resource as reported by discovery for a single group version.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct APIResource {
    /// Plural resource name, or `resource/subresource` for subresources.
    pub name: String,
    #[serde(default)]
    pub singular_name: String,
    #[serde(default)]
    pub namespaced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub kind: String,
    #[serde(default)]
    pub verbs: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub short_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

impl APIResource {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Subresources (`pods/status`) are not tracked as schemas of their own.
    pub fn is_subresource(&self) -> bool {
        self.name.contains('/')
    }
}

/// All resources served under one group version.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct APIResourceList {
    pub group_version: String,
    #[serde(default)]
    pub resources: Vec<APIResource>,
}

impl APIResourceList {
    pub fn new(group_version: impl Into<String>, resources: Vec<APIResource>) -> Self {
        Self {
            group_version: group_version.into(),
            resources,
        }
    }
}

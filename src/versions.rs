//! Preferred version index.
//!
//! Servers declare a preferred version per group. A few of those choices are
//! overridden here, and deprecated groups are pointed at their successors.

use std::collections::HashMap;

use crate::types::APIGroup;

/// Group name to effective preferred version. Empty means no preference.
pub type VersionIndex = HashMap<String, String>;

/// Preferred version overrides keyed by `group/declared-version`.
pub const PREFERRED_VERSION_OVERRIDES: &[(&str, &str)] = &[("autoscaling/v1", "v2beta2")];

/// Deprecated groups and the group clients should use instead.
pub const PREFERRED_GROUPS: &[(&str, &str)] = &[("extensions", "apps")];

/// Returns the override for a group's declared preferred version, if any.
pub fn preferred_version_override(group: &str, version: &str) -> Option<&'static str> {
    PREFERRED_VERSION_OVERRIDES
        .iter()
        .find(|(key, _)| {
            key.split_once('/')
                .is_some_and(|(g, v)| g == group && v == version)
        })
        .map(|(_, target)| *target)
}

/// Returns the group that replaces `group`, if it is deprecated.
pub fn preferred_group(group: &str) -> Option<&'static str> {
    PREFERRED_GROUPS
        .iter()
        .find(|(from, _)| *from == group)
        .map(|(_, to)| *to)
}

/// Build the effective preferred version for every group.
///
/// Overrides only apply when the server actually serves the target version.
pub fn index_versions(groups: &[APIGroup]) -> VersionIndex {
    let mut result = VersionIndex::with_capacity(groups.len());
    for group in groups {
        let declared = group.preferred_version.version.as_str();
        let effective = match preferred_version_override(&group.name, declared) {
            Some(target) if group.versions.iter().any(|v| v.version == target) => target,
            _ => declared,
        };
        result.insert(group.name.clone(), effective.to_string());
    }
    result
}

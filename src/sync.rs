//! Discovery-to-registry synchronization.

use tracing::{debug, warn};

use crate::discovery::{DiscoveryClient, DiscoverySnapshot};
use crate::error::{DiscoveryError, SyncError};
use crate::merge::refresh;
use crate::schema::SchemaRegistry;
use crate::types::GroupVersion;
use crate::versions::index_versions;

/// Fetch discovery once, proceeding past unreachable groups.
///
/// A partial failure is logged and the groups that were read are returned.
///
/// # Errors
///
/// Any discovery error other than `DiscoveryError::GroupDiscoveryFailed`.
pub fn fetch_snapshot<C>(client: &C) -> Result<DiscoverySnapshot, DiscoveryError>
where
    C: DiscoveryClient + ?Sized,
{
    match client.server_groups_and_resources() {
        Ok(snapshot) => Ok(snapshot),
        Err(DiscoveryError::GroupDiscoveryFailed { groups, snapshot }) => {
            warn!(groups = ?groups, "Failed to read API for groups");
            Ok(*snapshot)
        }
        Err(e) => Err(e),
    }
}

/// Run one synchronization pass.
///
/// Fetches discovery once, indexes preferred versions, then merges every
/// resource list into `schemas`. Unreachable groups are logged and the pass
/// continues with what was returned.
///
/// # Errors
///
/// `SyncError::Discovery` if the fetch failed outright; nothing is merged.
/// `SyncError::Invalid` if some resource lists had an unparsable
/// `groupVersion`; those lists were skipped and all others were merged.
pub fn add_discovery<C, R>(client: &C, schemas: &mut R) -> Result<(), SyncError>
where
    C: DiscoveryClient + ?Sized,
    R: SchemaRegistry,
{
    let snapshot = fetch_snapshot(client)?;
    let versions = index_versions(&snapshot.groups);

    let mut errs = Vec::new();
    for resource_list in &snapshot.resources {
        let gv = match GroupVersion::parse(&resource_list.group_version) {
            Ok(gv) => gv,
            Err(e) => {
                warn!(
                    group_version = %resource_list.group_version,
                    error = %e,
                    "skipping resource list"
                );
                errs.push(e);
                continue;
            }
        };

        debug!(
            group_version = %gv,
            resources = resource_list.resources.len(),
            "merging resource list"
        );
        refresh(&gv, &versions, resource_list, schemas);
    }

    match SyncError::from_errors(errs) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

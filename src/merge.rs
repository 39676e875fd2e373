//! Merge a discovery resource list into the schema registry.

use tracing::{debug, trace};

use crate::schema::{gvk_to_versioned_schema_id, gvr_to_plural_name, SchemaRecord, SchemaRegistry};
use crate::types::{APIResourceList, GroupVersion};
use crate::versions::{preferred_group, VersionIndex};

/// Update the registry with every top-level resource in `resources`.
///
/// Records are created on first sight and refreshed in place afterwards.
/// Subresources are skipped. Entries not mentioned in `resources` are left
/// untouched.
pub fn refresh<R>(
    gv: &GroupVersion,
    group_to_preferred_version: &VersionIndex,
    resources: &APIResourceList,
    schemas: &mut R,
) where
    R: SchemaRegistry,
{
    let preferred_version = group_to_preferred_version
        .get(&gv.group)
        .filter(|v| !v.is_empty() && **v != gv.version);
    let preferred_group = preferred_group(&gv.group);

    for resource in &resources.resources {
        if resource.is_subresource() {
            continue;
        }

        let gvk = gv.with_kind(resource.kind.clone());
        let gvr = gv.with_resource(resource.name.clone());
        let id = gvk_to_versioned_schema_id(&gvk);
        if schemas.contains(&id) {
            trace!(id = %id, "refreshing schema");
        } else {
            debug!(id = %id, "new schema");
        }

        let schema = schemas.upsert_with(&id, || SchemaRecord::new(&gvk));
        schema.plural_name = gvr_to_plural_name(&gvr);
        schema.set_api_resource(resource.clone());
        schema.set_preferred_version(preferred_version.cloned());
        schema.set_preferred_group(preferred_group.map(str::to_string));
    }
}

//! Schema records and the registry they live in.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::types::{APIResource, GroupVersionKind, GroupVersionResource};

/// Registry keyed by versioned schema ID.
pub type SchemaMap = HashMap<String, SchemaRecord>;

/// Discovery-derived attributes of a schema record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gvk: Option<GroupVersionKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_resource: Option<APIResource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_group: Option<String>,
}

/// A resource type known to the registry.
///
/// The `id` is fixed at creation; everything else is refreshed from discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaRecord {
    id: String,
    #[serde(default)]
    pub plural_name: String,
    #[serde(default)]
    pub attributes: SchemaAttributes,
}

impl SchemaRecord {
    /// A bare record carrying only its ID and GVK.
    pub fn new(gvk: &GroupVersionKind) -> Self {
        let mut record = Self {
            id: gvk_to_versioned_schema_id(gvk),
            plural_name: String::new(),
            attributes: SchemaAttributes::default(),
        };
        record.set_gvk(gvk.clone());
        record
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn gvk(&self) -> Option<&GroupVersionKind> {
        self.attributes.gvk.as_ref()
    }

    pub fn set_gvk(&mut self, gvk: GroupVersionKind) {
        self.attributes.gvk = Some(gvk);
    }

    pub fn api_resource(&self) -> Option<&APIResource> {
        self.attributes.api_resource.as_ref()
    }

    pub fn set_api_resource(&mut self, resource: APIResource) {
        self.attributes.api_resource = Some(resource);
    }

    pub fn preferred_version(&self) -> Option<&str> {
        self.attributes.preferred_version.as_deref()
    }

    pub fn set_preferred_version(&mut self, version: Option<String>) {
        self.attributes.preferred_version = version;
    }

    pub fn preferred_group(&self) -> Option<&str> {
        self.attributes.preferred_group.as_deref()
    }

    pub fn set_preferred_group(&mut self, group: Option<String>) {
        self.attributes.preferred_group = group;
    }
}

/// Versioned schema ID: `<version>.<group>.<kind>`, lowercased.
///
/// The group segment is dropped for the core group (`v1.pod`). Versions and
/// kinds never contain `.`, so the mapping is injective.
pub fn gvk_to_versioned_schema_id(gvk: &GroupVersionKind) -> String {
    let id = if gvk.group.is_empty() {
        format!("{}.{}", gvk.version, gvk.kind)
    } else {
        format!("{}.{}.{}", gvk.version, gvk.group, gvk.kind)
    };
    id.to_lowercase()
}

/// Plural name of a resource: the discovery-reported name as served.
pub fn gvr_to_plural_name(gvr: &GroupVersionResource) -> String {
    gvr.resource.clone()
}

/// Storage for schema records.
///
/// Callers own the registry and provide any locking; synchronization only
/// checks for and upserts entries, it never enumerates or removes them.
pub trait SchemaRegistry {
    fn contains(&self, id: &str) -> bool;

    /// Return the record for `id`, inserting `create()` first if absent.
    fn upsert_with<F>(&mut self, id: &str, create: F) -> &mut SchemaRecord
    where
        F: FnOnce() -> SchemaRecord;
}

impl SchemaRegistry for HashMap<String, SchemaRecord> {
    fn contains(&self, id: &str) -> bool {
        self.contains_key(id)
    }

    fn upsert_with<F>(&mut self, id: &str, create: F) -> &mut SchemaRecord
    where
        F: FnOnce() -> SchemaRecord,
    {
        self.entry(id.to_string()).or_insert_with(create)
    }
}

impl SchemaRegistry for BTreeMap<String, SchemaRecord> {
    fn contains(&self, id: &str) -> bool {
        self.contains_key(id)
    }

    fn upsert_with<F>(&mut self, id: &str, create: F) -> &mut SchemaRecord
    where
        F: FnOnce() -> SchemaRecord,
    {
        self.entry(id.to_string()).or_insert_with(create)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_id_named_group() {
        let gvk = GroupVersionKind::new("apps", "v1", "Deployment");
        assert_eq!(gvk_to_versioned_schema_id(&gvk), "v1.apps.deployment");
    }

    #[test]
    fn schema_id_core_group() {
        let gvk = GroupVersionKind::new("", "v1", "Pod");
        assert_eq!(gvk_to_versioned_schema_id(&gvk), "v1.pod");
    }

    #[test]
    fn schema_id_dotted_group() {
        let gvk = GroupVersionKind::new("networking.k8s.io", "v1", "NetworkPolicy");
        assert_eq!(
            gvk_to_versioned_schema_id(&gvk),
            "v1.networking.k8s.io.networkpolicy"
        );
    }

    #[test]
    fn plural_name_is_resource_verbatim() {
        let gvr = GroupVersionResource {
            group: "apps".into(),
            version: "v1".into(),
            resource: "deployments".into(),
        };
        assert_eq!(gvr_to_plural_name(&gvr), "deployments");
    }

    #[test]
    fn new_record_is_bare() {
        let gvk = GroupVersionKind::new("apps", "v1", "Deployment");
        let record = SchemaRecord::new(&gvk);
        assert_eq!(record.id(), "v1.apps.deployment");
        assert_eq!(record.gvk(), Some(&gvk));
        assert!(record.plural_name.is_empty());
        assert!(record.api_resource().is_none());
        assert!(record.preferred_version().is_none());
        assert!(record.preferred_group().is_none());
    }

    #[test]
    fn upsert_keeps_existing_record() {
        let gvk = GroupVersionKind::new("", "v1", "Pod");
        let mut map = SchemaMap::new();

        let created = map.upsert_with("v1.pod", || SchemaRecord::new(&gvk));
        created.plural_name = "pods".into();
        let record = map.upsert_with("v1.pod", || panic!("record already exists"));
        assert_eq!(record.plural_name, "pods");
        assert!(map.contains("v1.pod"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn btree_registry_upserts() {
        let gvk = GroupVersionKind::new("", "v1", "Pod");
        let mut map: BTreeMap<String, SchemaRecord> = BTreeMap::new();
        assert!(!map.contains("v1.pod"));
        map.upsert_with("v1.pod", || SchemaRecord::new(&gvk));
        assert!(map.contains("v1.pod"));
    }

    #[test]
    fn record_serializes_camel_case() {
        let gvk = GroupVersionKind::new("extensions", "v1beta1", "Deployment");
        let mut record = SchemaRecord::new(&gvk);
        record.set_preferred_group(Some("apps".into()));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], "v1beta1.extensions.deployment");
        assert_eq!(value["attributes"]["preferredGroup"], "apps");
        assert!(value["attributes"].get("preferredVersion").is_none());
    }
}

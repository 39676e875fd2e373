//! Discovery Schema Sync
//!
//! Keeps an in-memory schema registry in step with the resource types an API
//! server exposes through discovery.
//!
//! A pass fetches the server's groups and per-group-version resource lists,
//! works out each group's effective preferred version, and upserts one
//! [`SchemaRecord`] per kind. Records are keyed by a stable versioned ID and
//! are never removed.
//!
//! # Example
//!
//! ```
//! use discovery_schema::{
//!     add_discovery, APIGroup, APIResource, APIResourceList, DiscoverySnapshot, SchemaMap,
//!     StaticDiscovery,
//! };
//!
//! let snapshot = DiscoverySnapshot {
//!     groups: vec![APIGroup::new("autoscaling", "v1", &["v1", "v2beta2"])],
//!     resources: vec![APIResourceList::new(
//!         "autoscaling/v1",
//!         vec![APIResource::new("horizontalpodautoscalers", "HorizontalPodAutoscaler")],
//!     )],
//! };
//!
//! let mut schemas = SchemaMap::new();
//! add_discovery(&StaticDiscovery::new(snapshot), &mut schemas).unwrap();
//!
//! let hpa = &schemas["v1.autoscaling.horizontalpodautoscaler"];
//! assert_eq!(hpa.plural_name, "horizontalpodautoscalers");
//! assert_eq!(hpa.preferred_version(), Some("v2beta2"));
//! ```
//!
//! # Hints
//!
//! | Attribute | Set when |
//! |-----------|----------|
//! | `preferredVersion` | the group's effective preferred version is non-empty and differs from the record's version |
//! | `preferredGroup` | the group is deprecated in favour of another (`extensions` → `apps`) |

mod discovery;
mod error;
mod merge;
mod schema;
mod sync;
mod types;
mod versions;

pub use discovery::{DiscoveryClient, DiscoverySnapshot, StaticDiscovery};
pub use error::{DiscoveryError, ParseGroupVersionError, SyncError};
pub use merge::refresh;
pub use schema::{
    gvk_to_versioned_schema_id, gvr_to_plural_name, SchemaAttributes, SchemaMap, SchemaRecord,
    SchemaRegistry,
};
pub use sync::{add_discovery, fetch_snapshot};
pub use types::{
    APIGroup, APIGroupList, APIResource, APIResourceList, APIVersions, GroupVersion,
    GroupVersionForDiscovery, GroupVersionKind, GroupVersionResource,
};
pub use versions::{
    index_versions, preferred_group, preferred_version_override, VersionIndex, PREFERRED_GROUPS,
    PREFERRED_VERSION_OVERRIDES,
};

#[cfg(feature = "remote")]
pub use discovery::{HttpConfig, HttpDiscovery, HTTP_TIMEOUT};

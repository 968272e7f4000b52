//! Resource - a bookable physical placement.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{RegionId, ResourceId};

/// Address shown for resources that are selected but missing from the catalog.
pub const PLACEHOLDER_ADDRESS: &str = "—";

/// Immutable reference data for a single placement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: ResourceId,
    pub region_id: RegionId,
    pub label: String,
    pub address: String,
}

impl Resource {
    pub fn new(
        id: ResourceId,
        region_id: RegionId,
        label: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id,
            region_id,
            label: label.into(),
            address: address.into(),
        }
    }

    /// Degraded record for an id that has no catalog entry.
    ///
    /// Keeps the selection count visible when the catalog is stale or partial.
    pub fn placeholder(id: ResourceId) -> Self {
        let label = id.to_string();
        Self {
            region_id: RegionId::unknown(),
            label,
            address: PLACEHOLDER_ADDRESS.to_string(),
            id,
        }
    }
}

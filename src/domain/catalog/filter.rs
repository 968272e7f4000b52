//! ResourceFilter - region and free-text narrowing of the catalog.

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::domain::foundation::RegionId;

/// Filter applied to both the remote availability query and the local catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceFilter {
    pub region: Option<RegionId>,
    pub text: Option<String>,
}

impl ResourceFilter {
    pub fn new(region: Option<RegionId>, text: Option<String>) -> Self {
        Self { region, text }.normalized()
    }

    /// Blank text is treated as no text filter.
    pub fn normalized(mut self) -> Self {
        self.text = self
            .text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        self
    }

    /// Returns true if `resource` passes both the region and text filters.
    ///
    /// Text matching is a case-insensitive substring match against the label
    /// or the address.
    pub fn matches(&self, resource: &Resource) -> bool {
        if let Some(region) = &self.region {
            if &resource.region_id != region {
                return false;
            }
        }
        match self.text.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(text) => {
                let needle = text.to_lowercase();
                resource.label.to_lowercase().contains(&needle)
                    || resource.address.to_lowercase().contains(&needle)
            }
        }
    }
}

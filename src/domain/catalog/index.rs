//! Catalog - the full, ordered inventory of resources with id lookup.

use std::collections::HashMap;

use super::{Resource, ResourceFilter};
use crate::domain::foundation::ResourceId;

/// Snapshot of the resource catalog.
///
/// Iteration follows the order the catalog collaborator returned.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    resources: Vec<Resource>,
    index: HashMap<ResourceId, usize>,
}

impl Catalog {
    /// Builds a catalog, keeping the first entry for duplicated ids.
    pub fn new(resources: impl IntoIterator<Item = Resource>) -> Self {
        let mut catalog = Self::default();
        for resource in resources {
            if catalog.index.contains_key(&resource.id) {
                continue;
            }
            catalog
                .index
                .insert(resource.id.clone(), catalog.resources.len());
            catalog.resources.push(resource);
        }
        catalog
    }

    pub fn get(&self, id: &ResourceId) -> Option<&Resource> {
        self.index.get(id).map(|&i| &self.resources[i])
    }

    pub fn contains(&self, id: &ResourceId) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    /// Resources passing `filter`, in catalog order.
    pub fn matching<'a>(
        &'a self,
        filter: &'a ResourceFilter,
    ) -> impl Iterator<Item = &'a Resource> {
        self.resources.iter().filter(move |r| filter.matches(r))
    }

    /// Looks an id up, falling back to a placeholder record.
    pub fn resolve_or_placeholder(&self, id: &ResourceId) -> Resource {
        self.get(id)
            .cloned()
            .unwrap_or_else(|| Resource::placeholder(id.clone()))
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::PLACEHOLDER_ADDRESS;
    use crate::domain::foundation::RegionId;

    fn resource(id: &str, label: &str) -> Resource {
        Resource::new(
            ResourceId::new(id).unwrap(),
            RegionId::new("north").unwrap(),
            label,
            "Main St",
        )
    }

    #[test]
    fn keeps_first_entry_for_duplicate_ids() {
        let catalog = Catalog::new(vec![resource("R1", "first"), resource("R1", "second")]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(&ResourceId::new("R1").unwrap()).unwrap().label, "first");
    }

    #[test]
    fn preserves_source_order() {
        let catalog = Catalog::new(vec![resource("R3", "c"), resource("R1", "a")]);
        let ids: Vec<&str> = catalog.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["R3", "R1"]);
    }

    #[test]
    fn unknown_ids_resolve_to_placeholders() {
        let catalog = Catalog::new(vec![resource("R1", "a")]);
        let ghost = catalog.resolve_or_placeholder(&ResourceId::new("R9").unwrap());
        assert_eq!(ghost.label, "R9");
        assert_eq!(ghost.address, PLACEHOLDER_ADDRESS);
    }
}

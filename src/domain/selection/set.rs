//! SelectionSet - ordered, duplicate-free set of chosen resources.

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::catalog::{Catalog, Resource};
use crate::domain::foundation::ResourceId;

/// Resources chosen for the booking, in the order they were picked.
///
/// Mutated only through [`SelectionSet::add`] and [`SelectionSet::remove`]
/// (and their bulk forms); both are idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionSet {
    ids: Vec<ResourceId>,
    #[serde(skip)]
    members: HashSet<ResourceId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeds the set, e.g. from a booking being edited. Duplicates are dropped.
    pub fn with_ids(ids: impl IntoIterator<Item = ResourceId>) -> Self {
        let mut set = Self::new();
        set.add_all(ids);
        set
    }

    /// Inserts `id`. Returns `false` if it was already selected.
    pub fn add(&mut self, id: ResourceId) -> bool {
        if !self.members.insert(id.clone()) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Inserts every id, returning how many were new.
    pub fn add_all(&mut self, ids: impl IntoIterator<Item = ResourceId>) -> usize {
        ids.into_iter().filter(|id| self.add(id.clone())).count()
    }

    /// Deletes `id`. Returns `false` if it was not selected.
    pub fn remove(&mut self, id: &ResourceId) -> bool {
        if !self.members.remove(id) {
            return false;
        }
        self.ids.retain(|existing| existing != id);
        true
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.members.clear();
    }

    pub fn contains(&self, id: &ResourceId) -> bool {
        self.members.contains(id)
    }

    /// Selected ids in selection order.
    pub fn ids(&self) -> &[ResourceId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Resolves every selected id against the catalog.
    ///
    /// Ids without a catalog entry are kept as placeholder records so the
    /// visible count always matches the selection.
    pub fn to_list(&self, catalog: &Catalog) -> Vec<Resource> {
        self.ids
            .iter()
            .map(|id| catalog.resolve_or_placeholder(id))
            .collect()
    }
}

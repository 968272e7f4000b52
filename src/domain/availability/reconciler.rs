//! AvailabilityReconciler - partitions the catalog for a query.
//!
//! The reconciler owns a per-signature cache of the last non-empty
//! availability answer. An empty answer for a signature that previously had
//! results is treated as a transient upstream race: the cached list is used
//! instead and the cache entry is left untouched. A genuinely empty window
//! and a raced empty page look identical on the wire, so this is a deliberate
//! trade-off until the server can confirm emptiness explicitly.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::{AvailabilityQuery, QuerySignature};
use crate::domain::catalog::{Catalog, Resource};
use crate::domain::foundation::ResourceId;
use crate::domain::selection::SelectionSet;

/// Last non-empty availability answer for one signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub signature: QuerySignature,
    pub resources: Vec<Resource>,
}

/// Where the resources used for a partition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOrigin {
    /// A non-empty answer that was just fetched.
    Fresh,
    /// An empty answer replaced by the cached non-empty one.
    StaleCache,
    /// An empty answer with nothing cached for the signature.
    Empty,
    /// The query had no window, so nothing was fetched.
    NoWindow,
}

/// Catalog partition for one query.
///
/// `available`, `unavailable` and `selected` never share an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub available: Vec<Resource>,
    pub unavailable: Vec<Resource>,
    pub selected: Vec<Resource>,
    pub origin: SourceOrigin,
}

impl Reconciliation {
    /// Partition shown before any availability answer has arrived.
    pub fn empty() -> Self {
        Self {
            available: Vec::new(),
            unavailable: Vec::new(),
            selected: Vec::new(),
            origin: SourceOrigin::NoWindow,
        }
    }
}

/// Signature-keyed availability cache plus the partition algorithm.
#[derive(Debug, Default)]
pub struct AvailabilityReconciler {
    cache: HashMap<QuerySignature, CacheEntry>,
}

impl AvailabilityReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciles a completed fetch against the catalog and the selection.
    ///
    /// `fetched` is `None` when the query had no window and no fetch was made.
    pub fn reconcile(
        &mut self,
        query: &AvailabilityQuery,
        fetched: Option<Vec<Resource>>,
        catalog: &Catalog,
        selection: &SelectionSet,
    ) -> Reconciliation {
        let (source, origin) = match fetched {
            Some(resources) if query.has_window() => {
                self.resolve_source(&query.signature(), resources)
            }
            _ => (Vec::new(), SourceOrigin::NoWindow),
        };
        Self::partition(&source, origin, query, catalog, selection)
    }

    /// Applies the cache policy to a fetch result for `signature`.
    ///
    /// Non-empty results overwrite the cache entry. Empty results never do;
    /// they fall back to the cached entry when one exists.
    pub fn resolve_source(
        &mut self,
        signature: &QuerySignature,
        fetched: Vec<Resource>,
    ) -> (Vec<Resource>, SourceOrigin) {
        if !fetched.is_empty() {
            self.cache.insert(
                signature.clone(),
                CacheEntry {
                    signature: signature.clone(),
                    resources: fetched.clone(),
                },
            );
            return (fetched, SourceOrigin::Fresh);
        }
        match self.cache.get(signature) {
            Some(entry) => {
                tracing::debug!(
                    signature = %signature,
                    cached = entry.resources.len(),
                    "empty availability answer, keeping cached resources"
                );
                (entry.resources.clone(), SourceOrigin::StaleCache)
            }
            None => (fetched, SourceOrigin::Empty),
        }
    }

    /// Splits the catalog into available, unavailable and selected resources.
    ///
    /// Available and unavailable entries are resolved against the catalog and
    /// keep catalog order; ids unknown to the catalog are never shown there.
    pub fn partition(
        source: &[Resource],
        origin: SourceOrigin,
        query: &AvailabilityQuery,
        catalog: &Catalog,
        selection: &SelectionSet,
    ) -> Reconciliation {
        let available_ids: HashSet<&ResourceId> = source
            .iter()
            .map(|r| &r.id)
            .filter(|id| !selection.contains(id))
            .collect();

        let available: Vec<Resource> = catalog
            .iter()
            .filter(|r| available_ids.contains(&r.id))
            .cloned()
            .collect();

        let filter = query.filter();
        let unavailable: Vec<Resource> = catalog
            .matching(&filter)
            .filter(|r| !available_ids.contains(&r.id) && !selection.contains(&r.id))
            .cloned()
            .collect();

        Reconciliation {
            available,
            unavailable,
            selected: selection.to_list(catalog),
            origin,
        }
    }

    pub fn cached(&self, signature: &QuerySignature) -> Option<&CacheEntry> {
        self.cache.get(signature)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

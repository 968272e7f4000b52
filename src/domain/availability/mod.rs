//! Availability - remote availability queries reconciled against the catalog.

mod query;
mod reconciler;

pub use query::{AvailabilityQuery, QuerySignature};
pub use reconciler::{AvailabilityReconciler, CacheEntry, Reconciliation, SourceOrigin};

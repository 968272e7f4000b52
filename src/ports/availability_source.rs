//! Availability source port.

use async_trait::async_trait;

use super::FetchError;
use crate::domain::availability::AvailabilityQuery;
use crate::domain::catalog::Resource;

/// Remote answer to "which resources are free in this window?".
///
/// Callers only invoke this for queries that carry both window dates.
/// An empty list is a valid answer, not an error.
#[async_trait]
pub trait AvailabilitySource: Send + Sync {
    async fn fetch_available(&self, query: &AvailabilityQuery) -> Result<Vec<Resource>, FetchError>;
}

//! Catalog source port.

use async_trait::async_trait;

use super::FetchError;
use crate::domain::catalog::{Resource, ResourceFilter};

/// Read access to the resource catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches catalog entries matching `filter`. An empty filter returns all.
    async fn fetch_catalog(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, FetchError>;
}

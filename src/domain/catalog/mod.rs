//! Catalog - resource reference data and filtering.

mod filter;
mod index;
mod resource;

pub use filter::ResourceFilter;
pub use index::Catalog;
pub use resource::{Resource, PLACEHOLDER_ADDRESS};

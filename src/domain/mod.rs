//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, status, errors)
//! - `period` - Booking windows, bi-week slots, legacy conversion
//! - `catalog` - Resource reference data and filtering
//! - `selection` - The set of chosen resources
//! - `availability` - Availability queries, cache, and catalog partitioning
//! - `wizard` - Step navigation, draft validation, submission payload

pub mod availability;
pub mod catalog;
pub mod foundation;
pub mod period;
pub mod selection;
pub mod wizard;

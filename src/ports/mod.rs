//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Remote Data
//!
//! - `AvailabilitySource` - Free resources for a window and filter set
//! - `CatalogSource` - Resource reference data
//! - `BiWeekCalendarProvider` - Canonical slot table per year
//!
//! ## Output
//!
//! - `BookingSubmitter` - Stores the submitted booking payload
//! - `Notifier` - Non-blocking user notifications

mod availability_source;
mod booking_submitter;
mod calendar_provider;
mod catalog_source;
mod fetch_error;
mod notifier;

pub use availability_source::AvailabilitySource;
pub use booking_submitter::{BookingReceipt, BookingSubmitter};
pub use calendar_provider::BiWeekCalendarProvider;
pub use catalog_source::CatalogSource;
pub use fetch_error::{FetchError, SubmitError};
pub use notifier::{Notice, NoticeLevel, Notifier};

//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `rest` - Booking backend over HTTP (reqwest)
//! - `memory` - In-memory inventory, calendar, and booking store
//! - `notify` - Notification sinks (tracing, recording)

pub mod memory;
pub mod notify;
pub mod rest;

pub use memory::{BookedWindow, GeneratedBiWeekCalendar, InMemoryBookingStore, InMemoryInventory};
pub use notify::{RecordingNotifier, TracingNotifier};
pub use rest::{RestApiConfig, RestBookingApi};

//! In-memory adapters for tests and offline development.

mod calendar;
mod inventory;
mod store;

pub use calendar::GeneratedBiWeekCalendar;
pub use inventory::{BookedWindow, InMemoryInventory};
pub use store::InMemoryBookingStore;

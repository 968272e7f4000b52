//! Bi-week calendar provider port.

use async_trait::async_trait;

use super::FetchError;
use crate::domain::period::Slot;

/// Supplies the canonical table of 14-day slots for a year.
///
/// The table is reference data: consumers never mutate it.
#[async_trait]
pub trait BiWeekCalendarProvider: Send + Sync {
    async fn slots_for_year(&self, year: i32) -> Result<Vec<Slot>, FetchError>;
}

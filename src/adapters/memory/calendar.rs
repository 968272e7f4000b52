//! Locally computed bi-week calendar.
//!
//! Slot `2k` of a year starts on January 1st plus `14 * (k - 1)` days. The
//! 26 slots cover days 1..=364; the last day or two of the year belong to no
//! slot.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};

use crate::domain::period::{Slot, SlotId, FIRST_SEQUENCE, LAST_SEQUENCE, SLOT_LENGTH_DAYS};
use crate::ports::{BiWeekCalendarProvider, FetchError};

/// Calendar provider that needs no backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratedBiWeekCalendar;

impl GeneratedBiWeekCalendar {
    pub fn new() -> Self {
        Self
    }

    /// Canonical slot table for `year`.
    pub fn generate(year: i32) -> Result<Vec<Slot>, FetchError> {
        let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| FetchError::Decode(format!("year {} out of range", year)))?;

        (FIRST_SEQUENCE..=LAST_SEQUENCE)
            .step_by(2)
            .map(|sequence| {
                let k = i64::from(sequence / 2);
                let start = jan1 + Duration::days(SLOT_LENGTH_DAYS * (k - 1));
                let end = start + Duration::days(SLOT_LENGTH_DAYS - 1);
                let id = SlotId::new(year, sequence)
                    .map_err(|e| FetchError::Decode(e.to_string()))?;
                Slot::new(id, start, end).map_err(|e| FetchError::Decode(e.to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl BiWeekCalendarProvider for GeneratedBiWeekCalendar {
    async fn slots_for_year(&self, year: i32) -> Result<Vec<Slot>, FetchError> {
        Self::generate(year)
    }
}

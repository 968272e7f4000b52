//! SlotCalendar - read-only lookup table of bi-week slots.
//!
//! The table is filled from the calendar collaborator one year at a time and
//! is only ever consulted, never edited, by period logic.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use super::{Slot, SlotId};
use crate::domain::foundation::ValidationError;

/// Slots known to the session, keyed and ordered by id.
#[derive(Debug, Clone, Default)]
pub struct SlotCalendar {
    slots: BTreeMap<SlotId, Slot>,
    years: BTreeSet<i32>,
}

impl SlotCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a calendar from the slots of one or more years.
    pub fn from_slots(slots: impl IntoIterator<Item = Slot>) -> Self {
        let mut calendar = Self::new();
        calendar.merge(slots);
        calendar
    }

    /// Adds slots to the table. Later entries replace earlier ones with the same id.
    pub fn merge(&mut self, slots: impl IntoIterator<Item = Slot>) {
        for slot in slots {
            self.years.insert(slot.year());
            self.slots.insert(slot.id(), slot);
        }
    }

    pub fn get(&self, id: &SlotId) -> Option<&Slot> {
        self.slots.get(id)
    }

    pub fn contains_year(&self, year: i32) -> bool {
        self.years.contains(&year)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Looks up every id, failing on the first one that is not loaded.
    pub fn resolve(&self, ids: &[SlotId]) -> Result<Vec<Slot>, ValidationError> {
        ids.iter()
            .map(|id| {
                self.slots
                    .get(id)
                    .cloned()
                    .ok_or_else(|| ValidationError::unknown_slot(id))
            })
            .collect()
    }

    /// Slots of a single year, in calendar order.
    pub fn slots_in_year(&self, year: i32) -> Vec<&Slot> {
        self.slots.values().filter(|s| s.year() == year).collect()
    }

    /// Slots sharing at least one day with `[start, end]`.
    pub fn slots_overlapping(&self, start: NaiveDate, end: NaiveDate) -> Vec<&Slot> {
        self.slots
            .values()
            .filter(|s| s.overlaps(start, end))
            .collect()
    }
}

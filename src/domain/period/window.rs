//! Period - the canonical booking window.
//!
//! A period is either a set of bi-week slots or a free date range. For
//! slot-based periods the dates are always derived from the selected slots
//! and are recomputed on every slot mutation; they are never set directly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Slot, SlotCalendar, SlotId};
use crate::domain::foundation::ValidationError;

/// How a booking window is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PeriodKind {
    #[serde(rename = "bi-week")]
    SlotBased,
    #[default]
    #[serde(rename = "custom")]
    RangeBased,
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PeriodKind::SlotBased => "bi-week",
            PeriodKind::RangeBased => "custom",
        };
        write!(f, "{}", s)
    }
}

/// A booking window.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    kind: PeriodKind,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    slot_ids: Vec<SlotId>,
}

/// Returns the first start and last end among `slots`, ordered by start date.
///
/// Returns `None` for an empty selection.
pub fn derive_range_from_slots(slots: &[Slot]) -> Option<(NaiveDate, NaiveDate)> {
    let mut ordered: Vec<&Slot> = slots.iter().collect();
    ordered.sort_by_key(|s| s.start_date());
    let first = ordered.first()?;
    let last = ordered.last()?;
    Some((first.start_date(), last.end_date()))
}

impl Period {
    /// An empty range-based period (no dates chosen yet).
    pub fn empty_range() -> Self {
        Self::default()
    }

    /// An empty slot-based period (no bi-weeks chosen yet).
    pub fn empty_slots() -> Self {
        Self {
            kind: PeriodKind::SlotBased,
            ..Self::default()
        }
    }

    /// A range-based period. Not validated; call [`Period::validate`].
    pub fn range(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            kind: PeriodKind::RangeBased,
            start_date: Some(start_date),
            end_date: Some(end_date),
            slot_ids: Vec::new(),
        }
    }

    /// A slot-based period over `slots`, with dates derived from them.
    pub fn from_slots(slots: &[Slot]) -> Self {
        let mut slot_ids: Vec<SlotId> = Vec::with_capacity(slots.len());
        for slot in slots {
            if !slot_ids.contains(&slot.id()) {
                slot_ids.push(slot.id());
            }
        }
        let range = derive_range_from_slots(slots);
        Self {
            kind: PeriodKind::SlotBased,
            start_date: range.map(|(start, _)| start),
            end_date: range.map(|(_, end)| end),
            slot_ids,
        }
    }

    /// Rebuilds a slot-based period from stored parts without a calendar.
    ///
    /// Only used when restoring a previously saved booking; the dates are the
    /// ones that were derived when it was saved.
    pub(crate) fn restored_slots(
        slot_ids: Vec<SlotId>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            kind: PeriodKind::SlotBased,
            start_date,
            end_date,
            slot_ids,
        }
    }

    pub fn kind(&self) -> PeriodKind {
        self.kind
    }

    pub fn is_slot_based(&self) -> bool {
        self.kind == PeriodKind::SlotBased
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// Selected slot ids, in selection order. Always empty for range-based periods.
    pub fn slot_ids(&self) -> &[SlotId] {
        &self.slot_ids
    }

    /// Both boundary dates, if both are known.
    pub fn window(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.start_date?, self.end_date?))
    }

    /// Sets a free date range, turning the period range-based.
    pub fn set_range(&mut self, start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) {
        self.kind = PeriodKind::RangeBased;
        self.slot_ids.clear();
        self.start_date = start_date;
        self.end_date = end_date;
    }

    /// Turns the period range-based, keeping the current dates as the range.
    pub fn switch_to_range(&mut self) {
        self.kind = PeriodKind::RangeBased;
        self.slot_ids.clear();
    }

    /// Turns the period slot-based with an empty selection.
    pub fn switch_to_slots(&mut self) {
        if self.is_slot_based() {
            return;
        }
        self.kind = PeriodKind::SlotBased;
        self.slot_ids.clear();
        self.start_date = None;
        self.end_date = None;
    }

    /// Drops every chosen date and slot, keeping the kind.
    pub fn clear(&mut self) {
        self.slot_ids.clear();
        self.start_date = None;
        self.end_date = None;
    }

    /// Adds a slot to the selection and re-derives the dates.
    ///
    /// A range-based period becomes slot-based. Returns `false` when the slot
    /// was already selected.
    pub fn add_slot(
        &mut self,
        id: SlotId,
        calendar: &SlotCalendar,
    ) -> Result<bool, ValidationError> {
        if calendar.get(&id).is_none() {
            return Err(ValidationError::unknown_slot(id));
        }
        if self.is_slot_based() && self.slot_ids.contains(&id) {
            return Ok(false);
        }
        let mut ids = if self.is_slot_based() {
            self.slot_ids.clone()
        } else {
            Vec::new()
        };
        ids.push(id);
        self.commit_slots(ids, calendar)?;
        Ok(true)
    }

    /// Removes a slot from the selection and re-derives the dates.
    ///
    /// Returns `false` when the slot was not selected. On error the period is
    /// left untouched.
    pub fn remove_slot(
        &mut self,
        id: SlotId,
        calendar: &SlotCalendar,
    ) -> Result<bool, ValidationError> {
        if !self.slot_ids.contains(&id) {
            return Ok(false);
        }
        let ids = self.slot_ids.iter().copied().filter(|s| *s != id).collect();
        self.commit_slots(ids, calendar)?;
        Ok(true)
    }

    /// Replaces the slot selection and re-derives the dates.
    pub fn set_slots(
        &mut self,
        ids: &[SlotId],
        calendar: &SlotCalendar,
    ) -> Result<(), ValidationError> {
        let mut unique: Vec<SlotId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(id) {
                unique.push(*id);
            }
        }
        self.commit_slots(unique, calendar)
    }

    /// Recomputes derived dates from the selected slots.
    ///
    /// No-op for range-based periods. On error the period is left untouched.
    pub fn rederive(&mut self, calendar: &SlotCalendar) -> Result<(), ValidationError> {
        if !self.is_slot_based() {
            return Ok(());
        }
        let ids = self.slot_ids.clone();
        self.commit_slots(ids, calendar)
    }

    /// Resolves `ids` first, then stores them with their derived dates.
    fn commit_slots(
        &mut self,
        ids: Vec<SlotId>,
        calendar: &SlotCalendar,
    ) -> Result<(), ValidationError> {
        let slots = calendar.resolve(&ids)?;
        let range = derive_range_from_slots(&slots);
        self.kind = PeriodKind::SlotBased;
        self.slot_ids = ids;
        self.start_date = range.map(|(start, _)| start);
        self.end_date = range.map(|(_, end)| end);
        Ok(())
    }

    /// Checks the period is complete and well-formed.
    ///
    /// An empty slot-based selection reports `EmptySlotSelection` rather than
    /// the missing dates it implies.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_slot_based() && self.slot_ids.is_empty() {
            return Err(ValidationError::EmptySlotSelection);
        }
        let start = self
            .start_date
            .ok_or_else(|| ValidationError::missing_field("start_date"))?;
        let end = self
            .end_date
            .ok_or_else(|| ValidationError::missing_field("end_date"))?;
        if end <= start {
            return Err(ValidationError::InvalidRange { start, end });
        }
        Ok(())
    }

    /// Number of calendar days covered, both boundary days included.
    pub fn duration_in_days(&self) -> Option<i64> {
        let (start, end) = self.window()?;
        Some((end - start).num_days() + 1)
    }

    /// Returns true if `date` falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.window()
            .is_some_and(|(start, end)| start <= date && date <= end)
    }
}

//! Bi-week slots: fixed, year-anchored 14-day booking windows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Number of calendar days a slot covers, both boundary days included.
pub const SLOT_LENGTH_DAYS: i64 = 14;

/// Smallest sequence number of a slot within its year.
pub const FIRST_SEQUENCE: u8 = 2;

/// Largest sequence number of a slot within its year.
pub const LAST_SEQUENCE: u8 = 52;

/// Identifier of a bi-week slot: the year plus an even sequence number.
///
/// The textual form is `YYYY-NN`, e.g. `2026-04` for the second bi-week
/// of 2026.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotId {
    year: i32,
    sequence: u8,
}

impl SlotId {
    /// Creates a slot id, rejecting odd or out-of-range sequence numbers.
    pub fn new(year: i32, sequence: u8) -> Result<Self, ValidationError> {
        if sequence % 2 != 0 || !(FIRST_SEQUENCE..=LAST_SEQUENCE).contains(&sequence) {
            return Err(ValidationError::invalid_format(
                "bi_week_id",
                format!(
                    "sequence must be even and within {}..={}, got {}",
                    FIRST_SEQUENCE, LAST_SEQUENCE, sequence
                ),
            ));
        }
        Ok(Self { year, sequence })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    /// Zero-based position of the slot within its year.
    pub fn ordinal(&self) -> u8 {
        self.sequence / 2 - 1
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.sequence)
    }
}

impl FromStr for SlotId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, sequence) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| ValidationError::invalid_format("bi_week_id", "expected YYYY-NN"))?;
        let year = year
            .parse::<i32>()
            .map_err(|_| ValidationError::invalid_format("bi_week_id", "year is not a number"))?;
        let sequence = sequence.parse::<u8>().map_err(|_| {
            ValidationError::invalid_format("bi_week_id", "sequence is not a number")
        })?;
        Self::new(year, sequence)
    }
}

impl TryFrom<String> for SlotId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SlotId> for String {
    fn from(id: SlotId) -> Self {
        id.to_string()
    }
}

/// A single bi-week as published by the calendar collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    id: SlotId,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl Slot {
    /// Creates a slot, enforcing the fixed 14-day inclusive length.
    pub fn new(
        id: SlotId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let span = (end_date - start_date).num_days() + 1;
        if span != SLOT_LENGTH_DAYS {
            return Err(ValidationError::invalid_format(
                "bi_week",
                format!("{} spans {} days, expected {}", id, span, SLOT_LENGTH_DAYS),
            ));
        }
        Ok(Self {
            id,
            start_date,
            end_date,
        })
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn year(&self) -> i32 {
        self.id.year()
    }

    pub fn sequence_number(&self) -> u8 {
        self.id.sequence()
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Returns true if the slot shares at least one day with `[start, end]`.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && start <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn slot_id_parses_and_displays() {
        let id: SlotId = "2026-04".parse().unwrap();
        assert_eq!(id.year(), 2026);
        assert_eq!(id.sequence(), 4);
        assert_eq!(id.to_string(), "2026-04");
    }

    #[test]
    fn slot_id_rejects_odd_sequence() {
        assert!(SlotId::new(2026, 3).is_err());
        assert!("2026-03".parse::<SlotId>().is_err());
    }

    #[test]
    fn slot_id_rejects_out_of_range_sequence() {
        assert!(SlotId::new(2026, 0).is_err());
        assert!(SlotId::new(2026, 54).is_err());
        assert!(SlotId::new(2026, 52).is_ok());
    }

    #[test]
    fn slot_id_rejects_garbage() {
        assert!("twenty-two".parse::<SlotId>().is_err());
        assert!("202604".parse::<SlotId>().is_err());
    }

    #[test]
    fn slot_ids_order_chronologically() {
        let a: SlotId = "2025-52".parse().unwrap();
        let b: SlotId = "2026-02".parse().unwrap();
        let c: SlotId = "2026-10".parse().unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn slot_id_serializes_as_string() {
        let id = SlotId::new(2026, 2).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"2026-02\"");
        let back: SlotId = serde_json::from_str("\"2026-02\"").unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<SlotId>("\"2026-05\"").is_err());
    }

    #[test]
    fn ordinal_counts_from_zero() {
        assert_eq!(SlotId::new(2026, 2).unwrap().ordinal(), 0);
        assert_eq!(SlotId::new(2026, 52).unwrap().ordinal(), 25);
    }

    #[test]
    fn slot_requires_fourteen_days() {
        let id = SlotId::new(2026, 2).unwrap();
        assert!(Slot::new(id, date(2026, 1, 1), date(2026, 1, 14)).is_ok());
        assert!(Slot::new(id, date(2026, 1, 1), date(2026, 1, 15)).is_err());
        assert!(Slot::new(id, date(2026, 1, 1), date(2026, 1, 1)).is_err());
    }

    #[test]
    fn overlap_includes_boundary_days() {
        let slot = Slot::new(
            SlotId::new(2026, 2).unwrap(),
            date(2026, 1, 1),
            date(2026, 1, 14),
        )
        .unwrap();
        assert!(slot.overlaps(date(2026, 1, 14), date(2026, 1, 20)));
        assert!(slot.overlaps(date(2025, 12, 20), date(2026, 1, 1)));
        assert!(!slot.overlaps(date(2026, 1, 15), date(2026, 1, 20)));
    }
}

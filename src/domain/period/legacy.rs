//! Legacy period shape still expected by older booking consumers.
//!
//! The legacy form always carries a date pair plus a (possibly empty) list of
//! bi-week ids. Conversion from [`Period`] is total; conversion back decides
//! the kind purely from whether any bi-week ids are present.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Period, PeriodKind, SlotId};

/// Period type tag in the legacy shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegacyPeriodKind {
    #[serde(rename = "quinzenal")]
    BiWeekly,
    #[serde(rename = "customizado")]
    Custom,
}

/// Date-pair representation of a booking window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyPeriod {
    #[serde(rename = "periodType")]
    pub kind: LegacyPeriodKind,
    #[serde(rename = "dataInicio")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "dataFim")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "bi_week_ids", default)]
    pub slot_ids: Vec<SlotId>,
}

impl Period {
    /// Maps this period onto the legacy shape.
    pub fn to_legacy(&self) -> LegacyPeriod {
        match self.kind() {
            PeriodKind::SlotBased => LegacyPeriod {
                kind: LegacyPeriodKind::BiWeekly,
                start_date: self.start_date(),
                end_date: self.end_date(),
                slot_ids: self.slot_ids().to_vec(),
            },
            PeriodKind::RangeBased => LegacyPeriod {
                kind: LegacyPeriodKind::Custom,
                start_date: self.start_date(),
                end_date: self.end_date(),
                slot_ids: Vec::new(),
            },
        }
    }

    /// Restores a period from the legacy shape.
    ///
    /// Any bi-week ids make the period slot-based, regardless of the type tag.
    pub fn from_legacy(legacy: &LegacyPeriod) -> Period {
        if legacy.slot_ids.is_empty() {
            let mut period = Period::empty_range();
            period.set_range(legacy.start_date, legacy.end_date);
            period
        } else {
            Period::restored_slots(legacy.slot_ids.clone(), legacy.start_date, legacy.end_date)
        }
    }
}

impl From<&Period> for LegacyPeriod {
    fn from(period: &Period) -> Self {
        period.to_legacy()
    }
}

impl From<&LegacyPeriod> for Period {
    fn from(legacy: &LegacyPeriod) -> Self {
        Period::from_legacy(legacy)
    }
}

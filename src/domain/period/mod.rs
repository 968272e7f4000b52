//! Period model - booking windows and the bi-week calendar.
//!
//! - `slot` - Bi-week slot ids and slots
//! - `calendar` - Lookup table of slots loaded from the calendar collaborator
//! - `window` - The canonical [`Period`] and its validation rules
//! - `legacy` - Conversion to and from the date-pair shape

mod calendar;
mod legacy;
mod slot;
mod window;

pub use calendar::SlotCalendar;
pub use legacy::{LegacyPeriod, LegacyPeriodKind};
pub use slot::{Slot, SlotId, FIRST_SEQUENCE, LAST_SEQUENCE, SLOT_LENGTH_DAYS};
pub use window::{derive_range_from_slots, Period, PeriodKind};

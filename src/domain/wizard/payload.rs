//! BookingPayload - the submission contract.
//!
//! Both the current period fields and their legacy mirrors are always
//! populated so that consumers on either side of the migration can read it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ClientFields, ValueFields};
use crate::domain::foundation::{ResourceId, ValidationError};
use crate::domain::period::{LegacyPeriodKind, Period, PeriodKind, SlotId};
use crate::domain::selection::SelectionSet;

/// Payload handed to the persistence collaborator on submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub period_type: PeriodKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub bi_week_ids: Vec<SlotId>,

    #[serde(rename = "dataInicio")]
    pub legacy_start_date: NaiveDate,
    #[serde(rename = "dataFim")]
    pub legacy_end_date: NaiveDate,
    #[serde(rename = "tipoPeriodo")]
    pub legacy_period_type: LegacyPeriodKind,

    pub resource_ids: Vec<ResourceId>,

    #[serde(flatten)]
    pub client: ClientFields,
    #[serde(flatten)]
    pub values: ValueFields,
}

impl BookingPayload {
    /// Builds the payload from a validated period and the collected fields.
    pub fn assemble(
        period: &Period,
        selection: &SelectionSet,
        client: &ClientFields,
        values: &ValueFields,
    ) -> Result<Self, ValidationError> {
        period.validate()?;
        if selection.is_empty() {
            return Err(ValidationError::EmptySelection);
        }
        let legacy = period.to_legacy();
        let (start_date, end_date) = period
            .window()
            .ok_or_else(|| ValidationError::missing_field("start_date"))?;

        Ok(Self {
            period_type: period.kind(),
            start_date,
            end_date,
            bi_week_ids: period.slot_ids().to_vec(),
            legacy_start_date: legacy.start_date.unwrap_or(start_date),
            legacy_end_date: legacy.end_date.unwrap_or(end_date),
            legacy_period_type: legacy.kind,
            resource_ids: selection.ids().to_vec(),
            client: client.clone(),
            values: values.clone(),
        })
    }
}

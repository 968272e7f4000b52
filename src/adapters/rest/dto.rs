//! Wire types of the booking REST API and their mapping to domain types.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::catalog::{Resource, PLACEHOLDER_ADDRESS};
use crate::domain::foundation::{RegionId, ResourceId};
use crate::domain::period::{Slot, SlotId};
use crate::ports::FetchError;

/// Resource as returned by `/availability` and `/resources`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResourceDto {
    pub id: String,
    pub region_id: Option<String>,
    pub label: Option<String>,
    pub address: Option<String>,
}

impl TryFrom<ResourceDto> for Resource {
    type Error = FetchError;

    fn try_from(dto: ResourceDto) -> Result<Self, Self::Error> {
        let id = ResourceId::new(dto.id).map_err(|e| FetchError::Decode(e.to_string()))?;
        let region_id = match dto.region_id.filter(|r| !r.trim().is_empty()) {
            Some(region) => RegionId::new(region).map_err(|e| FetchError::Decode(e.to_string()))?,
            None => RegionId::unknown(),
        };
        let label = dto.label.unwrap_or_else(|| id.to_string());
        let address = dto
            .address
            .unwrap_or_else(|| PLACEHOLDER_ADDRESS.to_string());
        Ok(Resource::new(id, region_id, label, address))
    }
}

/// Slot as returned by `/calendar/bi-weeks/{year}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SlotDto {
    pub id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl TryFrom<SlotDto> for Slot {
    type Error = FetchError;

    fn try_from(dto: SlotDto) -> Result<Self, Self::Error> {
        let id: SlotId = dto
            .id
            .parse()
            .map_err(|e: crate::domain::foundation::ValidationError| {
                FetchError::Decode(e.to_string())
            })?;
        Slot::new(id, dto.start_date, dto.end_date).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Body returned by `POST /bookings`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BookingCreatedDto {
    pub id: String,
}

/// Maps a list of wire items, failing on the first bad one.
pub(crate) fn map_all<D, T>(items: Vec<D>) -> Result<Vec<T>, FetchError>
where
    T: TryFrom<D, Error = FetchError>,
{
    items.into_iter().map(T::try_from).collect()
}

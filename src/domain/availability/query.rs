//! AvailabilityQuery and its cache signature.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::catalog::ResourceFilter;
use crate::domain::foundation::{BookingId, RegionId};
use crate::domain::period::Period;

/// Parameters of one availability request.
///
/// A query is a pure function of these five fields, so its serialization is
/// used as the cache key and as the tag for in-flight fetches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub region_filter: Option<RegionId>,
    pub text_filter: Option<String>,
    pub exclude_booking_id: Option<BookingId>,
}

impl AvailabilityQuery {
    /// Builds the query for a period and filter set.
    pub fn new(
        period: &Period,
        filter: &ResourceFilter,
        exclude_booking_id: Option<BookingId>,
    ) -> Self {
        let filter = filter.clone().normalized();
        Self {
            start_date: period.start_date(),
            end_date: period.end_date(),
            region_filter: filter.region,
            text_filter: filter.text,
            exclude_booking_id,
        }
    }

    /// Returns true when both window dates are present.
    ///
    /// Queries without a window are never sent to the server.
    pub fn has_window(&self) -> bool {
        self.start_date.is_some() && self.end_date.is_some()
    }

    /// The catalog filter part of the query.
    pub fn filter(&self) -> ResourceFilter {
        ResourceFilter {
            region: self.region_filter.clone(),
            text: self.text_filter.clone(),
        }
    }

    /// Serialized form of the query, used as the cache key.
    pub fn signature(&self) -> QuerySignature {
        let serialized = serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self));
        QuerySignature(serialized)
    }
}

/// Cache key and fetch tag derived from an [`AvailabilityQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuerySignature(String);

impl QuerySignature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuerySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn query(text: Option<&str>) -> AvailabilityQuery {
        AvailabilityQuery::new(
            &Period::range(date(2026, 1, 1), date(2026, 1, 28)),
            &ResourceFilter::new(None, text.map(str::to_string)),
            None,
        )
    }

    #[test]
    fn equal_queries_share_a_signature() {
        assert_eq!(query(Some("main")).signature(), query(Some("main")).signature());
    }

    #[test]
    fn any_field_change_changes_the_signature() {
        let base = query(None);
        let mut other = base.clone();
        other.exclude_booking_id = Some(BookingId::new("B-1").unwrap());
        assert_ne!(base.signature(), other.signature());

        assert_ne!(base.signature(), query(Some("main")).signature());
    }

    #[test]
    fn surrounding_whitespace_does_not_change_the_signature() {
        assert_eq!(query(Some(" main ")).signature(), query(Some("main")).signature());
        assert_eq!(query(Some("  ")).signature(), query(None).signature());
    }

    #[test]
    fn window_requires_both_dates() {
        assert!(query(None).has_window());
        let open = AvailabilityQuery::new(&Period::empty_slots(), &ResourceFilter::default(), None);
        assert!(!open.has_window());
    }

    #[test]
    fn signature_is_the_json_form() {
        let sig = query(None).signature();
        assert!(sig.as_str().contains("\"startDate\":\"2026-01-01\""));
        assert!(sig.as_str().contains("\"endDate\":\"2026-01-28\""));
    }
}

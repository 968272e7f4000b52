//! In-memory inventory for testing and offline development.
//!
//! Holds a catalog plus a table of booked windows. A resource is available
//! for a query when it matches the query's filter and none of its bookings
//! overlap the window, ignoring the booking named by `exclude_booking_id`.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::availability::AvailabilityQuery;
use crate::domain::catalog::{Resource, ResourceFilter};
use crate::domain::foundation::{BookingId, ResourceId};
use crate::ports::{AvailabilitySource, CatalogSource, FetchError};

/// One booked window for one resource. Both dates are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookedWindow {
    pub booking_id: BookingId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl BookedWindow {
    fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && start <= self.end_date
    }
}

/// In-memory catalog and availability source.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventory {
    resources: Arc<RwLock<Vec<Resource>>>,
    bookings: Arc<RwLock<HashMap<ResourceId, Vec<BookedWindow>>>>,
    failure: Arc<RwLock<Option<FetchError>>>,
    availability_calls: Arc<AtomicUsize>,
}

impl InMemoryInventory {
    pub fn new(resources: impl IntoIterator<Item = Resource>) -> Self {
        Self {
            resources: Arc::new(RwLock::new(resources.into_iter().collect())),
            ..Self::default()
        }
    }

    /// Records a booking of `resource_ids` over `[start_date, end_date]`.
    ///
    /// Replaces any previous windows of the same booking.
    pub async fn book(
        &self,
        booking_id: &BookingId,
        resource_ids: &[ResourceId],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) {
        let mut bookings = self.bookings.write().await;
        for windows in bookings.values_mut() {
            windows.retain(|w| &w.booking_id != booking_id);
        }
        for id in resource_ids {
            bookings.entry(id.clone()).or_default().push(BookedWindow {
                booking_id: booking_id.clone(),
                start_date,
                end_date,
            });
        }
    }

    /// Makes every following fetch fail with `error` until cleared with `None`.
    pub async fn fail_with(&self, error: Option<FetchError>) {
        *self.failure.write().await = error;
    }

    /// Number of availability requests served, including failed ones.
    pub fn availability_calls(&self) -> usize {
        self.availability_calls.load(Ordering::SeqCst)
    }

    async fn check_failure(&self) -> Result<(), FetchError> {
        match self.failure.read().await.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn is_free(
        windows: Option<&Vec<BookedWindow>>,
        start: NaiveDate,
        end: NaiveDate,
        exclude: Option<&BookingId>,
    ) -> bool {
        windows.map_or(true, |windows| {
            windows
                .iter()
                .filter(|w| Some(&w.booking_id) != exclude)
                .all(|w| !w.overlaps(start, end))
        })
    }
}

#[async_trait]
impl AvailabilitySource for InMemoryInventory {
    async fn fetch_available(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<Vec<Resource>, FetchError> {
        self.availability_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure().await?;

        let (Some(start), Some(end)) = (query.start_date, query.end_date) else {
            return Ok(Vec::new());
        };
        let filter = query.filter();
        let resources = self.resources.read().await;
        let bookings = self.bookings.read().await;

        Ok(resources
            .iter()
            .filter(|r| filter.matches(r))
            .filter(|r| {
                Self::is_free(
                    bookings.get(&r.id),
                    start,
                    end,
                    query.exclude_booking_id.as_ref(),
                )
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CatalogSource for InMemoryInventory {
    async fn fetch_catalog(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, FetchError> {
        self.check_failure().await?;
        let resources = self.resources.read().await;
        Ok(resources.iter().filter(|r| filter.matches(r)).cloned().collect())
    }
}

//! In-memory booking store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::InMemoryInventory;
use crate::domain::foundation::BookingId;
use crate::domain::wizard::BookingPayload;
use crate::ports::{BookingReceipt, BookingSubmitter, SubmitError};

/// Records submitted payloads by booking id.
///
/// When linked to an [`InMemoryInventory`], every stored booking also blocks
/// its resources there for the booked window.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookingStore {
    bookings: Arc<RwLock<HashMap<BookingId, BookingPayload>>>,
    next_id: Arc<AtomicU64>,
    inventory: Option<InMemoryInventory>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reflects stored bookings into `inventory`.
    pub fn linked_to(mut self, inventory: InMemoryInventory) -> Self {
        self.inventory = Some(inventory);
        self
    }

    pub async fn get(&self, id: &BookingId) -> Option<BookingPayload> {
        self.bookings.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.bookings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.bookings.read().await.is_empty()
    }

    fn allocate_id(&self) -> Result<BookingId, SubmitError> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        BookingId::new(format!("BK-{:06}", n)).map_err(|e| SubmitError::Rejected {
            status: 500,
            body: e.to_string(),
        })
    }
}

#[async_trait]
impl BookingSubmitter for InMemoryBookingStore {
    async fn submit(
        &self,
        editing: Option<&BookingId>,
        payload: &BookingPayload,
    ) -> Result<BookingReceipt, SubmitError> {
        let booking_id = match editing {
            Some(id) => {
                if !self.bookings.read().await.contains_key(id) {
                    return Err(SubmitError::Rejected {
                        status: 404,
                        body: format!("booking {} not found", id),
                    });
                }
                id.clone()
            }
            None => self.allocate_id()?,
        };

        self.bookings
            .write()
            .await
            .insert(booking_id.clone(), payload.clone());

        if let Some(inventory) = &self.inventory {
            inventory
                .book(
                    &booking_id,
                    &payload.resource_ids,
                    payload.start_date,
                    payload.end_date,
                )
                .await;
        }

        tracing::info!(
            booking_id = %booking_id,
            resources = payload.resource_ids.len(),
            "booking stored"
        );
        Ok(BookingReceipt { booking_id })
    }
}

//! Booking persistence port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::SubmitError;
use crate::domain::foundation::BookingId;
use crate::domain::wizard::BookingPayload;

/// Acknowledgement returned after a booking was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReceipt {
    pub booking_id: BookingId,
}

/// Stores a submitted booking.
#[async_trait]
pub trait BookingSubmitter: Send + Sync {
    /// Creates a booking, or replaces `editing` when it is set.
    async fn submit(
        &self,
        editing: Option<&BookingId>,
        payload: &BookingPayload,
    ) -> Result<BookingReceipt, SubmitError>;
}

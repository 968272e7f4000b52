//! REST adapter for the booking backend.

mod client;
mod dto;

pub use client::{RestApiConfig, RestBookingApi};

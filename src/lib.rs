//! Placement Booking - booking wizard core for fixed advertising placements
//!
//! This crate implements the period model (bi-week slots or free date
//! ranges), availability reconciliation against the resource catalog with a
//! signature-keyed stale cache, and a step-gated wizard that assembles a
//! booking payload carrying both the current and the legacy period fields.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;

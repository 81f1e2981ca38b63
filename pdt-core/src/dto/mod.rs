//! Data Transfer Objects (DTOs)
//!
//! Payloads exchanged with the analytics API.
//! DTOs are separate from domain types to keep the wire format out of the
//! controller's vocabulary.

pub mod build;

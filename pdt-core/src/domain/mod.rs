//! Core domain types
//!
//! These types describe a remote materialization job as seen from the
//! controller: an opaque handle, the status the service reports for it, and
//! the outcome of waiting on it. They are shared between the HTTP client
//! (decoding) and the controller (classification and polling).

pub mod build;
pub mod outcome;

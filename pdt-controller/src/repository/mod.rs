//! Repository layer
//!
//! The remote operations the controller needs, behind a trait so the
//! controller can run against the real service or an in-memory fake.
//! Repositories hold no job state and contain no polling logic.

mod builds;
#[cfg(test)]
pub(crate) mod fake;

pub use builds::{BuildRepository, HttpBuildRepository};

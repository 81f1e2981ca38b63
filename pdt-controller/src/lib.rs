//! PDT Controller
//!
//! Drives remote PDT materialization jobs through their lifecycle: start a
//! build, stop it, read its status, and wait until it reaches a terminal
//! state.
//!
//! Architecture:
//! - Repository: the remote operations behind a small trait, with an HTTP
//!   implementation on top of [`pdt_client::LookerClient`]
//! - Controller: start/stop/status wrappers and the polling loop
//! - Configuration: wait settings loaded from the environment or defaults
//!
//! The controller keeps no state between calls. All job state lives in the
//! remote service, so one controller can wait on many jobs concurrently.

pub mod config;
pub mod controller;
pub mod error;
pub mod repository;
mod version;

pub use config::WaitConfig;
pub use controller::{JobController, default_source};
pub use error::{ControllerError, PollOutcomeExt, Result};
pub use repository::{BuildRepository, HttpBuildRepository};

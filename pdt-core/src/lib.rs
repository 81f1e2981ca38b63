//! PDT Core
//!
//! Core types for controlling remote PDT (persistent derived table)
//! materialization jobs.
//!
//! This crate contains:
//! - Domain types: job handles, status vocabulary and classification, poll outcomes
//! - DTOs: wire payloads exchanged with the analytics API

pub mod domain;
pub mod dto;

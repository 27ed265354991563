//! Sport Prognosis API
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod error;
pub mod stats;
pub mod store;
pub mod digest;
pub mod api;

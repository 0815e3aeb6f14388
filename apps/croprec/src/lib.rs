//! # croprec Library
//!
//! This library exposes the croprec modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod api;
pub mod cli;
pub mod config;
pub mod logging;
pub mod report;

// Re-export croprec_core for convenience
pub use croprec_core;

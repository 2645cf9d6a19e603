//! Autoframe Common Utilities
//!
//! Shared infrastructure for all Autoframe crates:
//! - Error types and result aliases
//! - Clock utilities for tracking sessions
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;

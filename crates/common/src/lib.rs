//! Lectern Common Utilities
//!
//! Shared infrastructure for all Lectern crates:
//! - Error types and result aliases
//! - Tracing/logging initialization
//! - Configuration loading (chunking, cleaning, upload, and notes defaults)

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;

//! Utilities for SchemaSync
//!
//! This module provides utility functions used across the library.

pub mod naming;
pub mod logging;

// Re-export key utility functions
pub use logging::{flatten_statement, init_logging, TracingReporter};
pub use naming::quote_identifier;

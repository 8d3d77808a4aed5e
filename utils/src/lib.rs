//! Shared utilities for the civic workspace.

pub mod logging;

pub use logging::{init_tracing, LogFormat, LoggingError};

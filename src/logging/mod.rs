//! Logging for the dataset preparation tool
//!
//! This module provides:
//! - Custom log formatting with bracketed output
//! - Dual logging (file + stderr)
//! - Log file management with timestamps

mod formatter;
mod setup;

pub use setup::setup_logging;

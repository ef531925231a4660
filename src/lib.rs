//! Preparation tooling for a labeled digit image dataset.
//!
//! Every operation is driven by CSV manifests mapping an image path to a
//! digit label:
//! - per-label counts, printed or saved as CSV ([`crate::core::stats`])
//! - random previews of labeled images ([`crate::core::sample`])
//! - copying images into `<root>/<split>/<digit>/` trees ([`crate::core::reorganize`])
//!
//! Rows that cannot be used are skipped and reported; only file-level
//! problems such as a missing or empty manifest abort an operation.

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod logging;
pub mod ui;

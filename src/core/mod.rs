pub mod error;
pub mod manifest;
pub mod reorganize;
pub mod sample;
pub mod stats;

pub use error::{DatasetError, Result};

//! Error types for rustrack-core.

use thiserror::Error;

/// Result type alias for rustrack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for rustrack operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown subdetector code.
    #[error("invalid subdetector code: {0}")]
    InvalidSubdetector(u32),
}

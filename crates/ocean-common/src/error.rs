//! Error types for ocean-track crates.

use thiserror::Error;

/// Result type alias using OceanError.
pub type OceanResult<T> = Result<T, OceanError>;

/// Primary error type for query-engine operations.
///
/// Zero rows is never an error: every query mode reports an empty result as
/// `Ok(None)` or an empty collection. Errors are reserved for invalid
/// requests and infrastructure failures.
#[derive(Debug, Error)]
pub enum OceanError {
    // === Request Errors ===
    #[error("Coordinate out of range: {what} = {value}")]
    OutOfRange { what: &'static str, value: f64 },

    #[error("Invalid search window: {0}")]
    InvalidWindow(String),

    #[error("Batch inputs misaligned: {0}")]
    InvalidBatch(String),

    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    // === Load Errors ===
    #[error("Failed to load basin mask: {0}")]
    MaskLoad(String),

    #[error("Failed to load basin connectivity: {0}")]
    GraphLoad(String),

    // === Store Errors ===
    #[error("Observation store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Eddy trajectory corrupt: {0}")]
    CorruptTrajectory(String),

    #[error("Query deadline exceeded")]
    Timeout,
}

impl From<std::io::Error> for OceanError {
    fn from(err: std::io::Error) -> Self {
        OceanError::StoreUnavailable(err.to_string())
    }
}

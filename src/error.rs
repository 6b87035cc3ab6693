//! Error types for the I/O-facing edges of the game.
//!
//! The simulation itself never fails; invalid requests are ignored. Errors
//! only come from parsing configuration and talking to the host storage.

/// Main error type for the crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),
}

pub type Result<T> = std::result::Result<T, Error>;

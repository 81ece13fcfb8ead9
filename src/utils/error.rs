//! Error types for the entire crate.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors reported by the profiler's start/stop lifecycle
///
/// These are the only failures of the sampling core. Recording and
/// profile building are infallible.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilerError {
    #[error("profiler already started")]
    AlreadyRunning,

    #[error("profiler not started")]
    NotRunning,
}

/// Errors that can occur while encoding, writing or reading profiles
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("Failed to read file: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Failed to decode profile: {0}")]
    DecodeFailed(#[from] prost::DecodeError),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while fetching a profile from a control endpoint
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid profile payload: {0}")]
    Decode(#[from] OutputError),
}

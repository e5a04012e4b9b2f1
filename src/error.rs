//! Error types.

/// Errors that can occur while configuring or running the tracking pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Detection source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Frame unavailable")]
    FrameUnavailable,

    #[error("Unknown tracker kind: {0} (available: mil, goturn, correlation)")]
    UnknownTrackerKind(String),

    #[error("Action sink error: {0}")]
    Sink(String),
}

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

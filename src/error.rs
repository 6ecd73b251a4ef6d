//! Crate-wide error types, one `thiserror` enum per concern rather than a
//! single catch-all error type.

use thiserror::Error;

/// Raised by a [`crate::source::Source`] when no further image is, or will
/// become, available.
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    #[error("no image available from source")]
    NoImageAvailable,
    #[error("source shut down")]
    ShutDown,
}

#[derive(Error, Debug, Clone)]
pub enum ImageDownloadError {
    #[error("http status {status}")]
    HttpStatus { status: u16 },
    #[error("network error: {0}")]
    Network(String),
    #[error("could not locate image element on gallery page")]
    NoImageElement,
    #[error("download timed out")]
    Timeout,
    #[error("request cancelled")]
    Cancelled,
}

/// Errors absorbed inside a [`crate::sink::ResultSink`]; never propagated to
/// the hunting stage, only logged.
#[derive(Error, Debug, Clone)]
pub enum SinkError {
    #[error("failed to write image to disk: {0}")]
    ImageWrite(String),
    #[error("failed to write csv row: {0}")]
    CsvWrite(String),
    #[error("failed to create output directory: {0}")]
    DirCreate(String),
}

/// Errors surfaced by the [`crate::scavenger::Scavenger`] orchestrator to
/// its caller. Everything recoverable is absorbed at a lower layer; this
/// enum only carries client-programming-error-shaped conditions plus
/// construction-time validation failures.
#[derive(Error, Debug, Clone)]
pub enum ScavengerError {
    #[error("loadNextResult called with no result available; call hasNextResult first")]
    NoResultAvailable,
    #[error("builder configuration error: {0}")]
    Config(String),
}

pub type ScavengerResult<T> = std::result::Result<T, ScavengerError>;

//! Source error types.

use thiserror::Error;

/// Errors raised while loading, fetching or decoding catalog data.
///
/// Messages from underlying I/O and HTTP errors are captured as strings so a
/// failure can be shared between the per-make tasks that observe it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// A local snapshot is missing or unreadable.
    #[error("snapshot resource '{resource}' not found: {reason}")]
    ResourceNotFound { resource: String, reason: String },

    /// The input is not parseable markup.
    #[error("decode error: {0}")]
    Decode(String),

    /// The markup is well-formed but lacks an expected element.
    #[error("missing field: {path}")]
    MissingField { path: String },

    /// The request never produced a response (connect, timeout, body read).
    #[error("remote call to {url} failed: {message}")]
    RemoteCall { url: String, message: String },

    /// The upstream answered with a non-success status.
    #[error("remote call to {url} returned HTTP {status} after {attempts} attempt(s)")]
    RemoteStatus {
        url: String,
        status: u16,
        attempts: u32,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl SourceError {
    pub(crate) fn missing(path: impl Into<String>) -> Self {
        Self::MissingField { path: path.into() }
    }
}

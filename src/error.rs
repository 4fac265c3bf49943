//! Error types used by event sources.
//!
//! This module defines one main error enum:
//!
//! - [`SourceError`] — errors raised while connecting to or reading from
//!   an event feed.
//!
//! The type provides helper methods (`as_label`, `as_message`) for logging
//! and [`SourceError::is_retryable`] for reconnect decisions.

use thiserror::Error;

/// # Errors produced by event sources.
///
/// These represent failures of the push connection feeding a notifier.
/// Most are transient (`Connect`, `Stream`, `Closed`) and safe to retry;
/// a malformed endpoint is not.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SourceError {
    /// The configured endpoint is unusable (bad URL, unsupported scheme).
    #[error("invalid endpoint (no retry): {error}")]
    Endpoint {
        /// The underlying error message.
        error: String,
    },

    /// Establishing the connection failed before the handshake completed.
    #[error("connect failed: {error}")]
    Connect {
        /// The underlying error message.
        error: String,
    },

    /// An established connection broke mid-stream.
    #[error("stream failed: {error}")]
    Stream {
        /// The underlying error message.
        error: String,
    },

    /// The remote side closed the connection.
    #[error("connection closed: {reason}")]
    Closed {
        /// Close reason reported by the remote side (may be empty).
        reason: String,
    },
}

impl SourceError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use salert::SourceError;
    ///
    /// let err = SourceError::Connect { error: "refused".into() };
    /// assert_eq!(err.as_label(), "source_connect");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SourceError::Endpoint { .. } => "source_endpoint",
            SourceError::Connect { .. } => "source_connect",
            SourceError::Stream { .. } => "source_stream",
            SourceError::Closed { .. } => "source_closed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SourceError::Endpoint { error } => format!("endpoint: {error}"),
            SourceError::Connect { error } => format!("connect: {error}"),
            SourceError::Stream { error } => format!("stream: {error}"),
            SourceError::Closed { reason } => format!("closed: {reason}"),
        }
    }

    /// Indicates whether reconnecting makes sense after this error.
    ///
    /// Returns `false` only for [`SourceError::Endpoint`]; retrying a
    /// malformed endpoint cannot succeed.
    ///
    /// # Example
    /// ```
    /// use salert::SourceError;
    ///
    /// let transient = SourceError::Stream { error: "reset".into() };
    /// assert!(transient.is_retryable());
    ///
    /// let fatal = SourceError::Endpoint { error: "bad scheme".into() };
    /// assert!(!fatal.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        !matches!(self, SourceError::Endpoint { .. })
    }
}

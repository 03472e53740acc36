//! Error types for asset-dl
//!
//! Only faults outside the per-descriptor boundary surface as [`Error`]:
//! configuration problems, an unreadable index, or a save root that cannot be
//! prepared. Per-transfer faults are classified into [`TransferError`] and
//! contained by the transfer executor; per-file decompression faults are
//! classified into [`DecompressError`] and contained by the post-download pass.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for asset-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for asset-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "base_url")
        key: Option<String>,
    },

    /// The descriptor index could not be opened or read
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// SQLx database error
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to build the shared HTTP client
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a configuration error tied to a specific key
    pub fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }
}

/// Index-related errors
#[derive(Debug, Error)]
pub enum IndexError {
    /// The index file does not exist
    #[error("index file not found at {0}")]
    NotFound(PathBuf),

    /// Failed to open a connection to the index
    #[error("failed to open index: {0}")]
    ConnectionFailed(String),

    /// The descriptor query failed
    #[error("query failed: {0}")]
    QueryFailed(String),
}

/// Why a single transfer failed
///
/// Classified at the HTTP-client boundary so diagnostics never depend on
/// error message text.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The request exceeded the configured per-transfer timeout
    #[error("request timed out after {timeout:?}")]
    Timeout {
        /// The timeout that was exceeded
        timeout: Duration,
    },

    /// The connection ended before the full body arrived
    #[error("connection ended before the response completed: {0}")]
    ConnectionClosed(String),

    /// The server answered with a non-success status code
    #[error("server returned status {code}")]
    Status {
        /// HTTP status code
        code: u16,
    },

    /// The connection could not be established
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other request failure
    #[error("request failed: {0}")]
    Request(String),

    /// Writing the downloaded bytes failed
    #[error("failed to write {path}: {source}")]
    Write {
        /// Destination that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl TransferError {
    /// Classify a reqwest error into a transfer failure reason
    pub fn from_reqwest(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            TransferError::Timeout { timeout }
        } else if let Some(status) = err.status() {
            TransferError::Status {
                code: status.as_u16(),
            }
        } else if err.is_connect() {
            TransferError::Connect(err.to_string())
        } else if err.is_body() || err.is_decode() || is_connection_reset(err) {
            TransferError::ConnectionClosed(err.to_string())
        } else {
            TransferError::Request(err.to_string())
        }
    }

    /// Whether this failure usually means the CDN cut the download short
    /// (typically a 403 that kills the connection early)
    pub fn is_blocked(&self) -> bool {
        matches!(
            self,
            TransferError::ConnectionClosed(_) | TransferError::Status { code: 403 }
        )
    }

    /// Short machine-readable code used in events and summaries
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::Timeout { .. } => "timeout",
            TransferError::ConnectionClosed(_) => "connection_closed",
            TransferError::Status { .. } => "http_status",
            TransferError::Connect(_) => "connect",
            TransferError::Request(_) => "request",
            TransferError::Write { .. } => "write",
        }
    }
}

/// Walk the source chain looking for an I/O error that signals a dropped connection.
fn is_connection_reset(err: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        if let Some(io) = inner.downcast_ref::<std::io::Error>() {
            return matches!(
                io.kind(),
                std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::UnexpectedEof
                    | std::io::ErrorKind::BrokenPipe
            );
        }
        source = inner.source();
    }
    false
}

/// Per-file decompression errors
#[derive(Debug, Error)]
pub enum DecompressError {
    /// The downloaded archive is not on disk
    #[error("source file not found: {0}")]
    SourceMissing(PathBuf),

    /// The path has no `.lz4` suffix to strip
    #[error("not an lz4 file: {0}")]
    NotCompressed(PathBuf),

    /// Decoding or writing failed
    #[error("failed to decode {source_path} into {target_path}: {reason}")]
    DecodeFailed {
        /// The compressed input
        source_path: PathBuf,
        /// The output being written
        target_path: PathBuf,
        /// The reason decoding failed
        reason: String,
    },
}

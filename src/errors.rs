//! Scan error types
//!
//! Error codes:
//! - SCAN_READ_FAILED (cursor read or final cursor error)
//! - SCAN_FETCH_FAILED (batch, key-list or by-key retrieval)
//! - SCAN_DECODE_FAILED (malformed encoded record)
//! - SCAN_UNPACK_FAILED (unpack / unnest expansion)
//! - SCAN_CONSUMER_FAILED (raised by a consumer)
//!
//! Every error aborts the call that produced it; no partial results are
//! returned. A missing key is reported as "not found", never as an error.

use std::fmt;

use thiserror::Error;

/// Boxed error carried by every `ScanError` variant.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Stable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanErrorCode {
    ReadFailed,
    FetchFailed,
    DecodeFailed,
    UnpackFailed,
    ConsumerFailed,
}

impl ScanErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ScanErrorCode::ReadFailed => "SCAN_READ_FAILED",
            ScanErrorCode::FetchFailed => "SCAN_FETCH_FAILED",
            ScanErrorCode::DecodeFailed => "SCAN_DECODE_FAILED",
            ScanErrorCode::UnpackFailed => "SCAN_UNPACK_FAILED",
            ScanErrorCode::ConsumerFailed => "SCAN_CONSUMER_FAILED",
        }
    }

    /// True for errors raised by a collaborator doing I/O
    pub fn is_transport(&self) -> bool {
        matches!(self, ScanErrorCode::ReadFailed | ScanErrorCode::FetchFailed)
    }
}

impl fmt::Display for ScanErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised while driving a scan pipeline
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("read failed: {0}")]
    Read(#[source] BoxError),

    #[error("fetch failed: {0}")]
    Fetch(#[source] BoxError),

    #[error("decode failed: {0}")]
    Decode(#[source] BoxError),

    #[error("unpack failed: {0}")]
    Unpack(#[source] BoxError),

    #[error("consumer failed: {0}")]
    Consumer(#[source] BoxError),
}

impl ScanError {
    /// Cursor read or final cursor error
    pub fn read(err: impl Into<BoxError>) -> Self {
        ScanError::Read(err.into())
    }

    /// Retrieval error from a batch, key-list or by-key collaborator
    pub fn fetch(err: impl Into<BoxError>) -> Self {
        ScanError::Fetch(err.into())
    }

    /// Malformed encoded record
    pub fn decode(err: impl Into<BoxError>) -> Self {
        ScanError::Decode(err.into())
    }

    /// Unpack or unnest failure
    pub fn unpack(err: impl Into<BoxError>) -> Self {
        ScanError::Unpack(err.into())
    }

    /// Error raised by a consumer
    pub fn consumer(err: impl Into<BoxError>) -> Self {
        ScanError::Consumer(err.into())
    }

    /// Returns the error code
    pub fn code(&self) -> ScanErrorCode {
        match self {
            ScanError::Read(_) => ScanErrorCode::ReadFailed,
            ScanError::Fetch(_) => ScanErrorCode::FetchFailed,
            ScanError::Decode(_) => ScanErrorCode::DecodeFailed,
            ScanError::Unpack(_) => ScanErrorCode::UnpackFailed,
            ScanError::Consumer(_) => ScanErrorCode::ConsumerFailed,
        }
    }
}

//! Error types for diffrakt.

use std::io;
use thiserror::Error;

/// Result alias for diffrakt operations.
pub type DiffraktResult<T> = std::result::Result<T, DiffraktError>;

/// Errors that can occur while decoding or transforming detector frames.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiffraktError {
    /// Underlying I/O failure, including a header stream that ends before
    /// the closing delimiter (`ErrorKind::UnexpectedEof`).
    #[error("i/o error ({kind:?}): {reason}")]
    Io { kind: io::ErrorKind, reason: String },
    /// A required header key was absent.
    #[error("missing header key: {key}")]
    MissingHeaderKey { key: &'static str },
    /// A header value could not be interpreted.
    #[error("malformed header: {reason}")]
    MalformedHeader { reason: String },
    /// A row read returned fewer bytes than the declared geometry demands.
    #[error("truncated payload at row {row}: expected {expected} bytes, got {got}")]
    TruncatedPayload {
        row: usize,
        expected: usize,
        got: usize,
    },
    /// Decode requested for an element type with no supported byte layout.
    #[error("unsupported element type: {name}")]
    UnsupportedElementType { name: &'static str },
    /// The file extension matches no known decode path.
    #[error("unsupported format: .{extension}")]
    UnsupportedFormat { extension: String },
    /// Width or height is zero or overflows the addressable range.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// A view stride smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// A backing buffer shorter than the declared geometry requires.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A caller-supplied parameter violates a precondition.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
    /// Failure reported by the external TIFF decoder.
    #[error("tiff decode failed: {reason}")]
    TiffIo { reason: String },
}

impl From<io::Error> for DiffraktError {
    fn from(err: io::Error) -> Self {
        DiffraktError::Io {
            kind: err.kind(),
            reason: err.to_string(),
        }
    }
}

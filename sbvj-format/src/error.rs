//! Error types for the SBVJ format

use thiserror::Error;

/// SBVJ error types
#[derive(Debug, Error)]
pub enum SbvjError {
    /// A negative number was handed to the unsigned VLQ encoder.
    #[error("Unsigned value cannot be negative: {0}")]
    NegativeValue(i64),
    /// String could not be encoded under the active string policy.
    #[error("String encoding error: {0}")]
    EncodingError(String),
    /// Byte sequence could not be decoded under the active string policy.
    #[error("Decoding error at offset {offset}: {message}")]
    DecodingError {
        /// Offset of the field that failed to decode.
        offset: usize,
        /// Description of the failure.
        message: String,
    },
    /// Type tag or value outside the seven recognized variants.
    #[error("Unsupported value type: {0}")]
    UnsupportedType(String),
    /// Buffer ended before a field was complete.
    #[error("Truncated input at offset {offset}: needed {needed} more byte(s)")]
    TruncatedInput {
        /// Offset at which the missing field starts.
        offset: usize,
        /// Minimum number of bytes still required.
        needed: usize,
    },
    /// Nesting went deeper than the configured limit.
    #[error("Maximum nesting depth {0} exceeded")]
    DepthExceeded(usize),
    /// A configured limit was exceeded.
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),
    /// A decoded envelope did not consume the whole buffer.
    #[error("Trailing bytes: decoded {consumed} of {len} bytes")]
    TrailingBytes {
        /// Bytes consumed by the decoder.
        consumed: usize,
        /// Total buffer length.
        len: usize,
    },
    /// I/O operation failed while reading or writing data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SbvjError {
    /// Shorthand for a truncation error at `offset`.
    pub(crate) fn truncated(offset: usize, needed: usize) -> Self {
        SbvjError::TruncatedInput { offset, needed }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SbvjError>;

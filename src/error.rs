//! Error types for spkctl
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using SpkError
pub type Result<T> = std::result::Result<T, SpkError>;

/// Unified error type for spkctl operations
#[derive(Debug, Error)]
pub enum SpkError {
    // -------------------------------------------------------------------------
    // Argument / Resource Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Out of memory: {0}")]
    OutOfMemory(String),

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection closed by peer")]
    ConnectionClosed,

    #[error("Address resolution failed: {0}")]
    AddressResolution(String),

    // -------------------------------------------------------------------------
    // Framing Errors
    // -------------------------------------------------------------------------
    #[error("Buffer too small: need {required} bytes, have {capacity}")]
    BufferTooSmall { required: usize, capacity: usize },

    #[error("Receive buffer of {capacity} bytes exhausted without a complete frame")]
    FrameTooLarge { capacity: usize },

    #[error("Response of {required} bytes exceeds the {capacity} byte limit")]
    ResponseTooLarge { required: usize, capacity: usize },

    // -------------------------------------------------------------------------
    // Payload Errors
    // -------------------------------------------------------------------------
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    // -------------------------------------------------------------------------
    // Envelope Errors
    // -------------------------------------------------------------------------
    #[error("Response rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a decoded response envelope is not accepted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("envelope is not a JSON object")]
    NotAnObject,

    #[error("missing or non-string \"msg\" field")]
    MissingKind,

    #[error("expected msg {expected:?}, got {actual:?}")]
    KindMismatch { expected: String, actual: String },

    #[error("result is {0}")]
    Unsuccessful(String),

    #[error("missing \"data\" field")]
    MissingData,

    #[error("\"data\" is not an object")]
    DataNotObject,
}

impl SpkError {
    /// Whether this error ends the whole session rather than a single request.
    ///
    /// Envelope rejections and unparsable JSON only affect the request that
    /// produced them; everything else means the connection or the framing
    /// can no longer be trusted.
    pub fn is_transport(&self) -> bool {
        !matches!(self, SpkError::Rejected(_) | SpkError::Json(_))
    }
}

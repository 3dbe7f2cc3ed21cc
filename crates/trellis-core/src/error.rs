//! Error types for Trellis

use thiserror::Error;

/// Result type alias for Trellis operations
pub type Result<T> = std::result::Result<T, Error>;

/// Trellis protocol error types
#[derive(Error, Debug)]
pub enum Error {
    /// Address pattern too short, or trailing method token malformed
    #[error("bad method: {0}")]
    BadMethod(String),

    /// Role path lookup matched no object
    #[error("no object at role path: {0}")]
    NotFound(String),

    /// Request could not be processed by the device
    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    /// A value has no defined parameter encoding, or the request is
    /// otherwise unusable
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Internal signal from a value bridge hook: this method is not
    /// handled, fall through to generic translation. Never surfaced.
    #[error("method not bridged")]
    MethodNotBridged,

    /// Parameter encoding error
    #[error("encode error: {0}")]
    Encode(String),

    /// Parameter decoding error
    #[error("decode error: {0}")]
    Decode(String),
}

//! Bridge error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BridgeError>;

#[derive(Error, Debug)]
pub enum BridgeError {
    /// Inbound payload is not a valid OSC packet
    #[error("packet decode error: {0}")]
    Decode(String),

    /// Resolution, translation, or encoding failed
    #[error("protocol error: {0}")]
    Protocol(#[from] trellis_core::Error),

    /// Transport-level failure; fatal to the receive loop
    #[error("transport error: {0}")]
    Transport(#[from] trellis_transport::TransportError),

    /// The receive-loop task died abnormally
    #[error("bridge task failed: {0}")]
    Task(String),
}

//! Trellis Core
//!
//! Core types and protocol primitives for the Trellis device-control
//! gateway.
//!
//! This crate provides:
//! - Object handles and method identifiers ([`ObjectHandle`], [`MethodId`])
//! - Command and parameter types ([`Command`], [`Params`])
//! - The binary parameter codec ([`codec`], [`Value`])
//! - Execution status codes ([`Status`])

pub mod codec;
pub mod error;
pub mod types;

pub use codec::{Value, ValueKind};
pub use error::{Error, Result};
pub use types::{Command, MethodId, ObjectHandle, Params, Status};

/// Default UDP port for the OSC gateway
pub const DEFAULT_OSC_PORT: u16 = 8000;

/// Maximum number of values in one parameter list (count is a u8 on the wire)
pub const MAX_PARAM_COUNT: usize = u8::MAX as usize;

//! Protocol types: handles, method identifiers, commands, status codes

use crate::{Error, Result};
use bytes::Bytes;
use std::fmt;
use std::str::FromStr;

/// Numeric handle of an object in the control tree.
///
/// Handles are device-scoped and stable for the lifetime of the object.
/// Handle `1` is conventionally the root block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle(pub u32);

impl ObjectHandle {
    /// The root block of a control tree
    pub const ROOT: ObjectHandle = ObjectHandle(1);
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for ObjectHandle {
    fn from(raw: u32) -> Self {
        ObjectHandle(raw)
    }
}

/// Structured identifier of an invocable method: a (group, index) pair.
///
/// The textual form is `"<group>.<index>"` with non-negative decimal
/// integers, e.g. `"4.2"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodId {
    pub group: u16,
    pub index: u16,
}

impl MethodId {
    pub const fn new(group: u16, index: u16) -> Self {
        Self { group, index }
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group, self.index)
    }
}

impl FromStr for MethodId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (group, index) = s
            .split_once('.')
            .ok_or_else(|| Error::BadMethod(format!("missing '.' in method token: {s:?}")))?;

        let group = group
            .parse::<u16>()
            .map_err(|_| Error::BadMethod(format!("invalid method group: {group:?}")))?;
        let index = index
            .parse::<u16>()
            .map_err(|_| Error::BadMethod(format!("invalid method index: {index:?}")))?;

        Ok(Self { group, index })
    }
}

/// Execution status codes returned by the command executor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0,
    BadFormat = 1,
    BadMethod = 2,
    NotFound = 3,
    InvalidRequest = 4,
    ParameterError = 5,
    NotImplemented = 6,
    ProcessingFailed = 7,
    DeviceError = 8,
}

impl Status {
    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            0 => Some(Status::Ok),
            1 => Some(Status::BadFormat),
            2 => Some(Status::BadMethod),
            3 => Some(Status::NotFound),
            4 => Some(Status::InvalidRequest),
            5 => Some(Status::ParameterError),
            6 => Some(Status::NotImplemented),
            7 => Some(Status::ProcessingFailed),
            8 => Some(Status::DeviceError),
            _ => None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }
}

/// Encoded method parameters: a count and the concatenated encodings
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    /// Number of encoded values
    pub count: u8,
    /// Concatenated value encodings, in original order
    pub data: Bytes,
}

impl Params {
    pub fn new(count: u8, data: impl Into<Bytes>) -> Self {
        Self {
            count,
            data: data.into(),
        }
    }

    /// Zero parameters, empty blob
    pub fn empty() -> Self {
        Self::default()
    }
}

/// A command addressed to one object in the control tree.
///
/// Immutable once built; ownership moves into the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Correlation handle. `0` for fire-and-forget submissions that
    /// expect no response.
    pub handle: u32,
    /// Target object
    pub target: ObjectHandle,
    /// Method to invoke on the target
    pub method: MethodId,
    /// Encoded parameters
    pub params: Params,
}

impl Command {
    /// Build a fire-and-forget command (correlation handle 0)
    pub fn new(target: ObjectHandle, method: MethodId, params: Params) -> Self {
        Self {
            handle: 0,
            target,
            method,
            params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_id_parse() {
        let id: MethodId = "4.2".parse().unwrap();
        assert_eq!(id, MethodId::new(4, 2));

        let id: MethodId = "0.0".parse().unwrap();
        assert_eq!(id, MethodId::new(0, 0));
    }

    #[test]
    fn test_method_id_parse_invalid() {
        assert!("4".parse::<MethodId>().is_err());
        assert!("4.".parse::<MethodId>().is_err());
        assert!(".2".parse::<MethodId>().is_err());
        assert!("a.b".parse::<MethodId>().is_err());
        assert!("-1.2".parse::<MethodId>().is_err());
        assert!("4.2.1".parse::<MethodId>().is_err());
        assert!("70000.1".parse::<MethodId>().is_err());
    }

    #[test]
    fn test_method_id_display() {
        assert_eq!(MethodId::new(5, 2).to_string(), "5.2");
    }

    #[test]
    fn test_status_roundtrip() {
        for code in 0..=8u8 {
            let status = Status::from_u8(code).unwrap();
            assert_eq!(status as u8, code);
        }
        assert!(Status::from_u8(200).is_none());
    }

    #[test]
    fn test_command_handle_sentinel() {
        let cmd = Command::new(ObjectHandle(7), MethodId::new(4, 2), Params::empty());
        assert_eq!(cmd.handle, 0);
        assert_eq!(cmd.params.count, 0);
        assert!(cmd.params.data.is_empty());
    }
}

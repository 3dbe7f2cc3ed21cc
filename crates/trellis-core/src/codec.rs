//! Binary parameter codec
//!
//! Values are encoded big-endian with no per-value type tag; the method
//! contract fixes the expected types on both sides:
//!
//! ```text
//! Bool            1 byte   (0x00 = false, 0x01 = true)
//! Uint8           1 byte
//! Uint16          2 bytes  BE
//! Uint32          4 bytes  BE
//! Int32           4 bytes  BE
//! Int64           8 bytes  BE
//! Float32         4 bytes  IEEE 754 BE
//! Float64         8 bytes  IEEE 754 BE
//! String          uint16 BE byte length + UTF-8 bytes
//! Blob            uint16 BE byte length + raw bytes
//! ```
//!
//! A parameter blob is the in-order concatenation of value encodings; the
//! count travels separately (see [`Params`](crate::Params)).

use crate::{Error, Result};
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Maximum byte length of an encoded string or blob
pub const MAX_LENGTH_PREFIXED: usize = u16::MAX as usize;

/// A typed parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    Blob(Vec<u8>),
}

impl Value {
    /// The kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Uint8(_) => ValueKind::Uint8,
            Value::Uint16(_) => ValueKind::Uint16,
            Value::Uint32(_) => ValueKind::Uint32,
            Value::Int32(_) => ValueKind::Int32,
            Value::Int64(_) => ValueKind::Int64,
            Value::Float32(_) => ValueKind::Float32,
            Value::Float64(_) => ValueKind::Float64,
            Value::String(_) => ValueKind::String,
            Value::Blob(_) => ValueKind::Blob,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> Option<u8> {
        match self {
            Value::Uint8(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u16(&self) -> Option<u16> {
        match self {
            Value::Uint16(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float32(v) => Some(*v),
            _ => None,
        }
    }
}

/// Value kinds, used to drive decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Uint8,
    Uint16,
    Uint32,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Blob,
}

/// Encode a single value to its parameter bytes
pub fn encode(value: &Value) -> Result<Bytes> {
    let mut buf = BytesMut::new();
    encode_into(value, &mut buf)?;
    Ok(buf.freeze())
}

/// Encode a single value, appending to `buf`
pub fn encode_into(value: &Value, buf: &mut BytesMut) -> Result<()> {
    match value {
        Value::Bool(b) => buf.put_u8(*b as u8),
        Value::Uint8(v) => buf.put_u8(*v),
        Value::Uint16(v) => buf.put_u16(*v),
        Value::Uint32(v) => buf.put_u32(*v),
        Value::Int32(v) => buf.put_i32(*v),
        Value::Int64(v) => buf.put_i64(*v),
        Value::Float32(v) => buf.put_f32(*v),
        Value::Float64(v) => buf.put_f64(*v),
        Value::String(s) => {
            if s.len() > MAX_LENGTH_PREFIXED {
                return Err(Error::Encode(format!("string too long: {} bytes", s.len())));
            }
            buf.put_u16(s.len() as u16);
            buf.extend_from_slice(s.as_bytes());
        }
        Value::Blob(b) => {
            if b.len() > MAX_LENGTH_PREFIXED {
                return Err(Error::Encode(format!("blob too long: {} bytes", b.len())));
            }
            buf.put_u16(b.len() as u16);
            buf.extend_from_slice(b);
        }
    }
    Ok(())
}

fn need(have: usize, n: usize) -> Result<()> {
    if have < n {
        Err(Error::Decode(format!(
            "buffer too small: need {n} bytes, have {have}"
        )))
    } else {
        Ok(())
    }
}

/// Decode a single value of the expected kind from `buf`
pub fn decode(kind: ValueKind, buf: &mut impl Buf) -> Result<Value> {
    let value = match kind {
        ValueKind::Bool => {
            need(buf.remaining(), 1)?;
            match buf.get_u8() {
                0 => Value::Bool(false),
                1 => Value::Bool(true),
                other => return Err(Error::Decode(format!("invalid bool byte: 0x{other:02x}"))),
            }
        }
        ValueKind::Uint8 => {
            need(buf.remaining(), 1)?;
            Value::Uint8(buf.get_u8())
        }
        ValueKind::Uint16 => {
            need(buf.remaining(), 2)?;
            Value::Uint16(buf.get_u16())
        }
        ValueKind::Uint32 => {
            need(buf.remaining(), 4)?;
            Value::Uint32(buf.get_u32())
        }
        ValueKind::Int32 => {
            need(buf.remaining(), 4)?;
            Value::Int32(buf.get_i32())
        }
        ValueKind::Int64 => {
            need(buf.remaining(), 8)?;
            Value::Int64(buf.get_i64())
        }
        ValueKind::Float32 => {
            need(buf.remaining(), 4)?;
            Value::Float32(buf.get_f32())
        }
        ValueKind::Float64 => {
            need(buf.remaining(), 8)?;
            Value::Float64(buf.get_f64())
        }
        ValueKind::String => {
            need(buf.remaining(), 2)?;
            let len = buf.get_u16() as usize;
            need(buf.remaining(), len)?;
            let raw = buf.copy_to_bytes(len);
            let s = String::from_utf8(raw.to_vec())
                .map_err(|e| Error::Decode(format!("invalid utf-8 in string: {e}")))?;
            Value::String(s)
        }
        ValueKind::Blob => {
            need(buf.remaining(), 2)?;
            let len = buf.get_u16() as usize;
            need(buf.remaining(), len)?;
            Value::Blob(buf.copy_to_bytes(len).to_vec())
        }
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_encodings() {
        assert_eq!(encode(&Value::Bool(true)).unwrap().as_ref(), &[0x01]);
        assert_eq!(encode(&Value::Bool(false)).unwrap().as_ref(), &[0x00]);
        assert_eq!(encode(&Value::Uint8(0xab)).unwrap().as_ref(), &[0xab]);
        assert_eq!(
            encode(&Value::Uint16(0x0102)).unwrap().as_ref(),
            &[0x01, 0x02]
        );
        assert_eq!(
            encode(&Value::Int32(-2)).unwrap().as_ref(),
            &[0xff, 0xff, 0xff, 0xfe]
        );
        assert_eq!(
            encode(&Value::Float32(1.0)).unwrap().as_ref(),
            &[0x3f, 0x80, 0x00, 0x00]
        );
    }

    #[test]
    fn test_string_length_prefix() {
        let encoded = encode(&Value::String("hi".to_string())).unwrap();
        assert_eq!(encoded.as_ref(), &[0x00, 0x02, b'h', b'i']);
    }

    #[test]
    fn test_blob_length_prefix() {
        let encoded = encode(&Value::Blob(vec![0xde, 0xad])).unwrap();
        assert_eq!(encoded.as_ref(), &[0x00, 0x02, 0xde, 0xad]);
    }

    #[test]
    fn test_roundtrip() {
        let values = vec![
            Value::Bool(true),
            Value::Uint8(7),
            Value::Uint16(512),
            Value::Uint32(100_000),
            Value::Int32(-42),
            Value::Int64(i64::MIN),
            Value::Float32(0.5),
            Value::Float64(std::f64::consts::PI),
            Value::String("mixer".to_string()),
            Value::Blob(vec![1, 2, 3]),
        ];

        for value in values {
            let encoded = encode(&value).unwrap();
            let decoded = decode(value.kind(), &mut encoded.as_ref()).unwrap();
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn test_decode_short_buffer() {
        let err = decode(ValueKind::Int32, &mut [0u8, 1].as_ref());
        assert!(err.is_err());
    }

    #[test]
    fn test_decode_invalid_bool() {
        let err = decode(ValueKind::Bool, &mut [2u8].as_ref());
        assert!(err.is_err());
    }
}

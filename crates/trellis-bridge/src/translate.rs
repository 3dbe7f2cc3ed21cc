//! Value translation and parameter encoding
//!
//! The generic path maps each source value onto the target codec
//! type-for-type. Methods whose parameters are not a plain value copy
//! (enum remaps, packed fields) register a [`ValueBridge`] for their
//! class; the hook's output replaces the message values entirely.

use bytes::BytesMut;
use rosc::{OscMessage, OscType};
use std::collections::HashMap;
use std::sync::Arc;
use trellis_core::{codec, Error, MethodId, Params, Result, Value, MAX_PARAM_COUNT};
use trellis_device::MuteState;

/// Per-class value bridging hook.
///
/// Returning `Err(Error::MethodNotBridged)` means "not handled here" and
/// falls through to generic translation; it is never surfaced.
pub trait ValueBridge: Send + Sync {
    fn bridge_values(&self, message: &OscMessage, method: MethodId) -> Result<Vec<Value>>;
}

/// Class-keyed registry of value bridges, fixed before the bridge runs
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: HashMap<&'static str, Arc<dyn ValueBridge>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the bridge for a class, replacing any previous one
    pub fn register(&mut self, class_id: &'static str, hook: Arc<dyn ValueBridge>) {
        self.hooks.insert(class_id, hook);
    }

    pub fn get(&self, class_id: &str) -> Option<&Arc<dyn ValueBridge>> {
        self.hooks.get(class_id)
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

/// Generic translation of one source value.
///
/// Source types with no parameter encoding (nil, impulse, timetags, midi,
/// arrays, colors) fail with `InvalidRequest`.
pub fn source_to_value(arg: &OscType) -> Result<Value> {
    match arg {
        OscType::Bool(b) => Ok(Value::Bool(*b)),
        OscType::Int(i) => Ok(Value::Int32(*i)),
        OscType::Long(l) => Ok(Value::Int64(*l)),
        OscType::Float(f) => Ok(Value::Float32(*f)),
        OscType::Double(d) => Ok(Value::Float64(*d)),
        OscType::String(s) => Ok(Value::String(s.clone())),
        OscType::Char(c) => Ok(Value::String(c.to_string())),
        OscType::Blob(b) => Ok(Value::Blob(b.clone())),
        other => Err(Error::InvalidRequest(format!(
            "no parameter encoding for {other:?}"
        ))),
    }
}

/// Encode a value list into a count-prefixed parameter blob.
///
/// Order is preserved exactly; failure discards the whole list (no
/// partial encodings). Empty lists are legal.
pub fn encode_params(values: &[Value]) -> Result<Params> {
    if values.len() > MAX_PARAM_COUNT {
        return Err(Error::InvalidRequest(format!(
            "too many parameters: {}",
            values.len()
        )));
    }

    let mut buf = BytesMut::new();
    for value in values {
        codec::encode_into(value, &mut buf)?;
    }

    Ok(Params::new(values.len() as u8, buf.freeze()))
}

/// Translate a message's values for the resolved target.
///
/// When `hook` is present and handles the method, its output — and only
/// its output — is encoded, whatever its relation to the message values.
pub fn translate(
    message: &OscMessage,
    method: MethodId,
    hook: Option<&Arc<dyn ValueBridge>>,
) -> Result<Params> {
    if let Some(hook) = hook {
        match hook.bridge_values(message, method) {
            Ok(values) => return encode_params(&values),
            Err(Error::MethodNotBridged) => {}
            Err(e) => return Err(e),
        }
    }

    let values = message
        .args
        .iter()
        .map(source_to_value)
        .collect::<Result<Vec<_>>>()?;
    encode_params(&values)
}

/// Bridges raw booleans onto the mute actuator's state enum.
///
/// Control surfaces send `T`/`F` (or 1/0) for mute buttons; the target
/// method takes the two-valued state enum instead.
pub struct MuteValueBridge;

impl ValueBridge for MuteValueBridge {
    fn bridge_values(&self, message: &OscMessage, method: MethodId) -> Result<Vec<Value>> {
        if method != MethodId::new(4, 2) {
            return Err(Error::MethodNotBridged);
        }

        let muted = match message.args.as_slice() {
            [OscType::Bool(b)] => *b,
            [OscType::Int(i)] => *i != 0,
            [OscType::Float(f)] => *f != 0.0,
            _ => return Err(Error::MethodNotBridged),
        };

        let state = if muted {
            MuteState::Muted
        } else {
            MuteState::Unmuted
        };
        Ok(vec![Value::Uint8(state as u8)])
    }
}

//! Standard object classes
//!
//! A small set of classes sufficient for mixers and routers: structural
//! blocks, gain and mute actuators, and an n-position switch. Each class
//! exposes its settable property as method `(4,2)`; method `(4,1)` is the
//! matching getter, unimplemented until a reply path exists.

use parking_lot::RwLock;
use tracing::debug;
use trellis_core::codec::{self, ValueKind};
use trellis_core::{MethodId, Params, Status};

use crate::tree::Behavior;

const METHOD_GET: MethodId = MethodId::new(4, 1);
const METHOD_SET: MethodId = MethodId::new(4, 2);

/// Decode exactly `kinds.len()` parameters, rejecting count mismatches and
/// trailing bytes.
fn decode_params(params: &Params, kinds: &[ValueKind]) -> Option<Vec<codec::Value>> {
    if params.count as usize != kinds.len() {
        return None;
    }

    let mut cursor = params.data.as_ref();
    let mut values = Vec::with_capacity(kinds.len());
    for kind in kinds {
        values.push(codec::decode(*kind, &mut cursor).ok()?);
    }

    if !cursor.is_empty() {
        return None;
    }
    Some(values)
}

/// A structural block: groups children, executes nothing
pub struct Block;

impl Block {
    pub const CLASS_ID: &'static str = "block";
}

impl Behavior for Block {
    fn class_id(&self) -> &'static str {
        Self::CLASS_ID
    }

    fn execute(&self, _method: MethodId, _params: &Params) -> Status {
        Status::NotImplemented
    }
}

/// A gain stage with a dB level clamped to a fixed range
pub struct GainActuator {
    level_db: RwLock<f32>,
    min_db: f32,
    max_db: f32,
}

impl GainActuator {
    pub const CLASS_ID: &'static str = "gain";

    pub fn new(min_db: f32, max_db: f32) -> Self {
        Self {
            level_db: RwLock::new(0.0),
            min_db,
            max_db,
        }
    }

    pub fn level_db(&self) -> f32 {
        *self.level_db.read()
    }
}

impl Behavior for GainActuator {
    fn class_id(&self) -> &'static str {
        Self::CLASS_ID
    }

    fn execute(&self, method: MethodId, params: &Params) -> Status {
        match method {
            METHOD_SET => {
                let Some(values) = decode_params(params, &[ValueKind::Float32]) else {
                    return Status::ParameterError;
                };
                let level = values[0].as_f32().unwrap_or_default();
                let clamped = level.clamp(self.min_db, self.max_db);
                *self.level_db.write() = clamped;
                debug!(level = clamped, "gain set");
                Status::Ok
            }
            METHOD_GET => Status::NotImplemented,
            _ => Status::BadMethod,
        }
    }
}

/// Mute state, encoded as a Uint8 on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MuteState {
    Muted = 1,
    Unmuted = 2,
}

impl MuteState {
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(MuteState::Muted),
            2 => Some(MuteState::Unmuted),
            _ => None,
        }
    }
}

/// A mute switch
pub struct MuteActuator {
    state: RwLock<MuteState>,
}

impl MuteActuator {
    pub const CLASS_ID: &'static str = "mute";

    pub fn new() -> Self {
        Self {
            state: RwLock::new(MuteState::Unmuted),
        }
    }

    pub fn state(&self) -> MuteState {
        *self.state.read()
    }
}

impl Default for MuteActuator {
    fn default() -> Self {
        Self::new()
    }
}

impl Behavior for MuteActuator {
    fn class_id(&self) -> &'static str {
        Self::CLASS_ID
    }

    fn execute(&self, method: MethodId, params: &Params) -> Status {
        match method {
            METHOD_SET => {
                let Some(values) = decode_params(params, &[ValueKind::Uint8]) else {
                    return Status::ParameterError;
                };
                let raw = values[0].as_u8().unwrap_or_default();
                let Some(state) = MuteState::from_u8(raw) else {
                    return Status::ParameterError;
                };
                *self.state.write() = state;
                debug!(?state, "mute set");
                Status::Ok
            }
            METHOD_GET => Status::NotImplemented,
            _ => Status::BadMethod,
        }
    }
}

/// An n-position selector switch
pub struct SwitchActuator {
    position: RwLock<u16>,
    num_positions: u16,
}

impl SwitchActuator {
    pub const CLASS_ID: &'static str = "switch";

    pub fn new(num_positions: u16) -> Self {
        Self {
            position: RwLock::new(0),
            num_positions,
        }
    }

    pub fn position(&self) -> u16 {
        *self.position.read()
    }
}

impl Behavior for SwitchActuator {
    fn class_id(&self) -> &'static str {
        Self::CLASS_ID
    }

    fn execute(&self, method: MethodId, params: &Params) -> Status {
        match method {
            METHOD_SET => {
                let Some(values) = decode_params(params, &[ValueKind::Uint16]) else {
                    return Status::ParameterError;
                };
                let position = values[0].as_u16().unwrap_or_default();
                if position >= self.num_positions {
                    return Status::ParameterError;
                }
                *self.position.write() = position;
                debug!(position, "switch set");
                Status::Ok
            }
            METHOD_GET => Status::NotImplemented,
            _ => Status::BadMethod,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;
    use trellis_core::codec::Value;

    fn params(values: &[Value]) -> Params {
        let mut buf = BytesMut::new();
        for value in values {
            codec::encode_into(value, &mut buf).unwrap();
        }
        Params::new(values.len() as u8, buf.freeze())
    }

    #[test]
    fn test_gain_set() {
        let gain = GainActuator::new(-120.0, 12.0);
        let status = gain.execute(METHOD_SET, &params(&[Value::Float32(-6.5)]));
        assert_eq!(status, Status::Ok);
        assert_eq!(gain.level_db(), -6.5);
    }

    #[test]
    fn test_gain_set_clamps() {
        let gain = GainActuator::new(-120.0, 12.0);
        gain.execute(METHOD_SET, &params(&[Value::Float32(40.0)]));
        assert_eq!(gain.level_db(), 12.0);
    }

    #[test]
    fn test_gain_wrong_param_count() {
        let gain = GainActuator::new(-120.0, 12.0);
        let status = gain.execute(
            METHOD_SET,
            &params(&[Value::Float32(0.0), Value::Float32(1.0)]),
        );
        assert_eq!(status, Status::ParameterError);
        assert_eq!(gain.level_db(), 0.0);
    }

    #[test]
    fn test_gain_trailing_bytes_rejected() {
        let gain = GainActuator::new(-120.0, 12.0);
        let mut p = params(&[Value::Float32(1.0)]);
        let mut data = p.data.to_vec();
        data.push(0xff);
        p.data = data.into();
        assert_eq!(gain.execute(METHOD_SET, &p), Status::ParameterError);
    }

    #[test]
    fn test_mute_set() {
        let mute = MuteActuator::new();
        assert_eq!(mute.state(), MuteState::Unmuted);

        let status = mute.execute(METHOD_SET, &params(&[Value::Uint8(1)]));
        assert_eq!(status, Status::Ok);
        assert_eq!(mute.state(), MuteState::Muted);
    }

    #[test]
    fn test_mute_rejects_unknown_state() {
        let mute = MuteActuator::new();
        let status = mute.execute(METHOD_SET, &params(&[Value::Uint8(9)]));
        assert_eq!(status, Status::ParameterError);
        assert_eq!(mute.state(), MuteState::Unmuted);
    }

    #[test]
    fn test_switch_bounds() {
        let switch = SwitchActuator::new(4);
        assert_eq!(
            switch.execute(METHOD_SET, &params(&[Value::Uint16(3)])),
            Status::Ok
        );
        assert_eq!(switch.position(), 3);
        assert_eq!(
            switch.execute(METHOD_SET, &params(&[Value::Uint16(4)])),
            Status::ParameterError
        );
        assert_eq!(switch.position(), 3);
    }

    #[test]
    fn test_unknown_method() {
        let gain = GainActuator::new(-120.0, 12.0);
        assert_eq!(
            gain.execute(MethodId::new(9, 9), &Params::empty()),
            Status::BadMethod
        );
    }

    #[test]
    fn test_getter_is_stubbed() {
        let mute = MuteActuator::new();
        assert_eq!(
            mute.execute(METHOD_GET, &Params::empty()),
            Status::NotImplemented
        );
    }
}

//! Trellis Device Framework
//!
//! An in-memory control tree plus the capability seams protocol gateways
//! consume:
//! - [`DeviceTree`]: insertion-ordered object tree with role-path lookup
//! - [`Device`] / [`Controller`]: the execution and controller contracts
//! - Standard classes ([`actuators`]): blocks, gain, mute, switch

pub mod actuators;
pub mod traits;
pub mod tree;

pub use actuators::{Block, GainActuator, MuteActuator, MuteState, SwitchActuator};
pub use traits::{Controller, Device, EventId, Notification, ResolvedObject, Subscription};
pub use tree::{Behavior, DeviceTree};

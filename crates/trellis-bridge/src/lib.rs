//! Trellis OSC Bridge
//!
//! Bridges OSC control messages onto a tree-structured device-control
//! protocol: datagrams are decoded, bundles flattened in document order,
//! addresses resolved against the device tree by role path, values
//! translated (generically or through a per-class hook), and the result
//! dispatched as a fire-and-forget command.
//!
//! ```no_run
//! use std::sync::Arc;
//! use trellis_bridge::{BridgeConfig, MuteValueBridge, OscBridge};
//! use trellis_device::{DeviceTree, MuteActuator};
//!
//! # async fn example() -> trellis_core::Result<()> {
//! let tree = Arc::new(DeviceTree::new());
//! tree.add(tree.root(), "Mute", Arc::new(MuteActuator::new()))?;
//!
//! let mut bridge = OscBridge::new(BridgeConfig::default(), tree);
//! bridge.register_hook(MuteActuator::CLASS_ID, Arc::new(MuteValueBridge));
//! bridge.run();
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod error;
pub mod flatten;
pub mod resolve;
pub mod translate;

pub use bridge::{BridgeConfig, BridgeController, OscBridge};
pub use error::{BridgeError, Result};
pub use flatten::{flatten, FlattenedMessages};
pub use resolve::{resolve, split_address};
pub use translate::{
    encode_params, source_to_value, translate, HookRegistry, MuteValueBridge, ValueBridge,
};

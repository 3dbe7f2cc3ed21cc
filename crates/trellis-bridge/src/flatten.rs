//! Bundle flattening
//!
//! Expands a packet into its messages in document order. Bundles nest
//! arbitrarily and depth is sender-controlled, so the walk uses an
//! explicit work stack instead of native recursion.

use rosc::{OscMessage, OscPacket};

/// Flatten a packet into a lazy, order-preserving message sequence
pub fn flatten(packet: OscPacket) -> FlattenedMessages {
    FlattenedMessages {
        stack: vec![packet],
    }
}

/// Iterator over the messages of a packet, in document order
pub struct FlattenedMessages {
    /// Work stack; the next packet to visit is on top, so bundle contents
    /// are pushed in reverse
    stack: Vec<OscPacket>,
}

impl Iterator for FlattenedMessages {
    type Item = OscMessage;

    fn next(&mut self) -> Option<OscMessage> {
        while let Some(packet) = self.stack.pop() {
            match packet {
                OscPacket::Message(msg) => return Some(msg),
                OscPacket::Bundle(bundle) => {
                    self.stack.extend(bundle.content.into_iter().rev());
                }
            }
        }
        None
    }
}

//! Device capability trait definitions

use async_trait::async_trait;
use trellis_core::{Command, MethodId, ObjectHandle, Params, Result, Status};

/// A resolved object reference: its handle plus the class it belongs to.
///
/// The class id lets gateways select per-class behavior (such as value
/// bridging) without inspecting the object itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedObject {
    pub handle: ObjectHandle,
    pub class_id: &'static str,
}

/// Identifier of an event emitted by a tree object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId {
    /// Object emitting the event
    pub emitter: ObjectHandle,
    /// Event index within the emitter's class
    pub index: u16,
}

/// A controller's standing interest in an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub event: EventId,
    /// Method invoked on the subscriber when the event fires
    pub subscriber: MethodId,
}

/// An event notification pushed to a subscribed controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub event: EventId,
    pub params: Params,
}

/// The capability surface a protocol controller presents to the device.
///
/// Controllers that drive a one-way protocol implement all three
/// operations as no-ops.
#[async_trait]
pub trait Controller: Send + Sync {
    async fn add_subscription(&self, subscription: Subscription) -> Result<()>;

    async fn remove_subscription(&self, subscription: Subscription) -> Result<()>;

    /// Push an event notification to the controller's remote peer
    async fn send_notification(&self, notification: Notification) -> Result<()>;
}

/// The device capability surface consumed by protocol gateways
#[async_trait]
pub trait Device: Send + Sync {
    /// Find the first object whose role path matches, in tree order.
    ///
    /// Role paths are relative to the root block. Ambiguity is not an
    /// error: with duplicate roles, the first match wins.
    async fn find_by_role_path(&self, path: &[String]) -> Option<ResolvedObject>;

    /// Execute a command on behalf of `controller`
    async fn execute(&self, command: Command, controller: &dyn Controller) -> Status;
}

//! The OSC gateway session
//!
//! One session owns one bound datagram endpoint and at most one receive
//! loop task. `run()` restarts the loop (cancelling any previous task),
//! `stop()` cancels it. Everything below the loop level is
//! fire-and-forget: bad datagrams and unresolvable messages are logged
//! and dropped, never answered.

use async_trait::async_trait;
use parking_lot::Mutex;
use rosc::OscMessage;
use std::marker::PhantomData;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use trellis_core::{Command, DEFAULT_OSC_PORT};
use trellis_device::{Controller, Device, Notification, Subscription};
use trellis_transport::{Datagram, UdpTransport};

use crate::error::{BridgeError, Result};
use crate::flatten::flatten;
use crate::resolve::resolve;
use crate::translate::{translate, HookRegistry, ValueBridge};

/// Bridge configuration
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Local address to bind, e.g. `"0.0.0.0:8000"`
    pub bind_addr: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            bind_addr: format!("0.0.0.0:{DEFAULT_OSC_PORT}"),
        }
    }
}

/// OSC → device-control gateway session.
///
/// Generic over the datagram transport; UDP by default.
pub struct OscBridge<T: Datagram = UdpTransport> {
    config: BridgeConfig,
    device: Arc<dyn Device>,
    hooks: HookRegistry,
    task: Mutex<Option<JoinHandle<Result<()>>>>,
    _transport: PhantomData<fn() -> T>,
}

impl OscBridge<UdpTransport> {
    /// Create a UDP-backed bridge for `device`
    pub fn new(config: BridgeConfig, device: Arc<dyn Device>) -> Self {
        Self::with_transport(config, device)
    }
}

impl<T: Datagram> OscBridge<T> {
    /// Create a bridge over a specific transport backend
    pub fn with_transport(config: BridgeConfig, device: Arc<dyn Device>) -> Self {
        Self {
            config,
            device,
            hooks: HookRegistry::new(),
            task: Mutex::new(None),
            _transport: PhantomData,
        }
    }

    /// Register a value bridge for a class. Call before `run()`; a running
    /// loop keeps the registry it started with.
    pub fn register_hook(&mut self, class_id: &'static str, hook: Arc<dyn ValueBridge>) {
        self.hooks.register(class_id, hook);
    }

    /// Start (or restart) the receive loop.
    ///
    /// Idempotent: an already-running loop is cancelled first, never
    /// duplicated. Bind and receive failures are fatal to the loop task
    /// and surface through [`take_result`](Self::take_result).
    pub fn run(&self) {
        let mut task = self.task.lock();
        if let Some(old) = task.take() {
            old.abort();
        }

        let bind_addr = self.config.bind_addr.clone();
        let device = self.device.clone();
        let hooks = Arc::new(self.hooks.clone());

        *task = Some(tokio::spawn(async move {
            let result = run_loop::<T>(&bind_addr, device, hooks).await;
            if let Err(ref e) = result {
                error!("bridge loop failed: {e}");
            }
            result
        }));
    }

    /// Cancel the receive loop and release the bound endpoint
    pub fn stop(&self) {
        if let Some(task) = self.task.lock().take() {
            task.abort();
            info!("OSC bridge stopped");
        }
    }

    /// Whether a receive loop task is alive
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }

    /// Await the loop task's exit and surface its fatal error, if any.
    ///
    /// Returns `None` when no loop was started. Cancellation is a clean
    /// exit, not an error.
    pub async fn take_result(&self) -> Option<Result<()>> {
        let task = self.task.lock().take()?;
        match task.await {
            Ok(result) => Some(result),
            Err(e) if e.is_cancelled() => Some(Ok(())),
            Err(e) => Some(Err(BridgeError::Task(e.to_string()))),
        }
    }
}

impl<T: Datagram> Drop for OscBridge<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.abort();
        }
    }
}

/// The controller identity under which the bridge submits commands.
///
/// The source protocol is one-way, so the subscription and notification
/// surface is a no-op stub.
pub struct BridgeController;

#[async_trait]
impl Controller for BridgeController {
    async fn add_subscription(&self, _subscription: Subscription) -> trellis_core::Result<()> {
        Ok(())
    }

    async fn remove_subscription(&self, _subscription: Subscription) -> trellis_core::Result<()> {
        Ok(())
    }

    async fn send_notification(&self, _notification: Notification) -> trellis_core::Result<()> {
        Ok(())
    }
}

async fn run_loop<T: Datagram>(
    bind_addr: &str,
    device: Arc<dyn Device>,
    hooks: Arc<HookRegistry>,
) -> Result<()> {
    let mut transport = T::bind(bind_addr).await?;
    if let Ok(local) = transport.local_addr() {
        info!("OSC bridge listening on {}", local);
    }

    let controller = BridgeController;

    loop {
        let (payload, from) = transport.recv_from().await?;
        if let Err(e) = handle_datagram(&*device, &hooks, &controller, &payload, from).await {
            debug!("dropping datagram from {from}: {e}");
        }
    }
}

/// Decode one datagram and bridge each of its messages independently.
///
/// Per-message failures are dropped here so one bad message cannot shadow
/// the rest of a bundle.
async fn handle_datagram(
    device: &dyn Device,
    hooks: &HookRegistry,
    controller: &dyn Controller,
    payload: &[u8],
    from: SocketAddr,
) -> Result<()> {
    let (_, packet) = rosc::decoder::decode_udp(payload)
        .map_err(|e| BridgeError::Decode(format!("{e:?}")))?;

    for message in flatten(packet) {
        if let Err(e) = handle_message(device, hooks, controller, &message).await {
            debug!("dropping message {:?} from {from}: {e}", message.addr);
        }
    }

    Ok(())
}

/// Bridge one message: resolve, translate, dispatch.
///
/// The execution status is not awaited for correctness; the source
/// protocol has no reply path.
async fn handle_message(
    device: &dyn Device,
    hooks: &HookRegistry,
    controller: &dyn Controller,
    message: &OscMessage,
) -> Result<()> {
    let (target, method) = resolve(device, &message.addr).await?;
    let params = translate(message, method, hooks.get(target.class_id))?;

    let command = Command::new(target.handle, method, params);
    let status = device.execute(command, controller).await;
    debug!(
        addr = %message.addr,
        target = %target.handle,
        method = %method,
        ?status,
        "dispatched"
    );

    Ok(())
}

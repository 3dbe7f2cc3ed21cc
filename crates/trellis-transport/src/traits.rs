//! Transport trait definitions

use async_trait::async_trait;
use bytes::Bytes;
use std::net::SocketAddr;

use crate::error::Result;

/// A bound, connectionless datagram endpoint.
///
/// Gateways depend only on this capability; concrete backends (UDP today)
/// are selected by the caller. Dropping the endpoint closes it.
#[async_trait]
pub trait Datagram: Send + Sized + 'static {
    /// Bind a local endpoint
    async fn bind(addr: &str) -> Result<Self>;

    /// Receive the next datagram with its sender address
    async fn recv_from(&mut self) -> Result<(Bytes, SocketAddr)>;

    /// Send a datagram to `target`
    async fn send_to(&self, data: &[u8], target: SocketAddr) -> Result<()>;

    /// The bound local address
    fn local_addr(&self) -> Result<SocketAddr>;
}

pub mod packet_conn;
pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use hickory_proto::op::Message;
use linkrelay_domain::DomainError;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;

pub use packet_conn::serve_packet_conn;
pub use tcp::{serve_tcp, TcpResponseWriter};
pub use udp::{serve_udp, UdpResponseWriter};

/// Sends the reply for one request back to its sender.
#[async_trait]
pub trait ResponseWriter: Send {
    fn remote_addr(&self) -> SocketAddr;

    fn local_addr(&self) -> SocketAddr;

    async fn write_msg(&mut self, message: &Message) -> Result<(), DomainError>;

    /// Drops the exchange without replying. Stream transports close the
    /// connection; datagram transports have nothing to release.
    async fn close(&mut self) -> io::Result<()>;
}

/// A datagram endpoint the reply dispatcher can serve on directly.
#[async_trait]
pub trait PacketConn: Send + Sync {
    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)>;

    async fn write_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize>;

    fn local_addr(&self) -> io::Result<SocketAddr>;
}

#[async_trait]
impl PacketConn for UdpSocket {
    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        UdpSocket::recv_from(self, buf).await
    }

    async fn write_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize> {
        self.send_to(buf, target).await
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        UdpSocket::local_addr(self)
    }
}

#[async_trait]
impl<T: PacketConn + ?Sized> PacketConn for Arc<T> {
    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        (**self).recv_from(buf).await
    }

    async fn write_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize> {
        (**self).write_to(buf, target).await
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        (**self).local_addr()
    }
}

/// Errors a listener survives; anything else stops it.
pub(crate) fn is_transient(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionRefused
    )
}

pub(crate) fn unspecified_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 0))
}

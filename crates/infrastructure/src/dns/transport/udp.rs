use super::{is_transient, ResponseWriter};
use crate::dns::server::RelayHandler;
use crate::dns::message_mapper::MessageMapper;
use async_trait::async_trait;
use hickory_proto::op::Message;
use linkrelay_domain::DomainError;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub const MAX_UDP_MESSAGE_SIZE: usize = 4096;

pub struct UdpResponseWriter {
    socket: Arc<UdpSocket>,
    peer: SocketAddr,
    local: SocketAddr,
}

impl UdpResponseWriter {
    pub fn new(socket: Arc<UdpSocket>, peer: SocketAddr, local: SocketAddr) -> Self {
        Self {
            socket,
            peer,
            local,
        }
    }
}

#[async_trait]
impl ResponseWriter for UdpResponseWriter {
    fn remote_addr(&self) -> SocketAddr {
        self.peer
    }

    fn local_addr(&self) -> SocketAddr {
        self.local
    }

    async fn write_msg(&mut self, message: &Message) -> Result<(), DomainError> {
        let bytes = MessageMapper::serialize(message)?;
        self.socket
            .send_to(&bytes, self.peer)
            .await
            .map_err(|e| DomainError::WriteFailed(format!("UDP to {}: {}", self.peer, e)))?;
        Ok(())
    }

    async fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Answers datagrams on `socket` until `shutdown` fires.
///
/// Requests are handled inline, one at a time. Undecodable datagrams and
/// transient receive errors are skipped; any other receive error ends the
/// loop with [`DomainError::ReceiveFailed`].
pub async fn serve_udp(
    socket: UdpSocket,
    handler: Arc<RelayHandler>,
    shutdown: CancellationToken,
) -> Result<(), DomainError> {
    let socket = Arc::new(socket);
    let local = socket
        .local_addr()
        .map_err(|e| DomainError::ReceiveFailed(e.to_string()))?;
    let mut recv_buf = vec![0u8; MAX_UDP_MESSAGE_SIZE];

    loop {
        let (len, peer) = tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                info!(address = %local, "UDP listener shutting down");
                return Ok(());
            }
            received = socket.recv_from(&mut recv_buf) => match received {
                Ok(received) => received,
                Err(e) if is_transient(&e) => {
                    debug!(address = %local, error = %e, "Transient UDP receive error");
                    continue;
                }
                Err(e) => {
                    return Err(DomainError::ReceiveFailed(format!("UDP {}: {}", local, e)));
                }
            }
        };

        let request = match MessageMapper::parse(&recv_buf[..len]) {
            Ok(request) => request,
            Err(e) => {
                debug!(peer = %peer, error = %e, "Dropping undecodable datagram");
                continue;
            }
        };

        let mut writer = UdpResponseWriter::new(socket.clone(), peer, local);
        handler.serve(&mut writer, &request).await;
    }
}

use super::{is_transient, unspecified_addr, ResponseWriter};
use crate::dns::server::RelayHandler;
use crate::dns::message_mapper::MessageMapper;
use async_trait::async_trait;
use hickory_proto::op::Message;
use linkrelay_domain::DomainError;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub const TCP_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Writes length-prefixed replies on one accepted connection.
pub struct TcpResponseWriter {
    stream: OwnedWriteHalf,
    peer: SocketAddr,
    local: SocketAddr,
    closed: bool,
}

impl TcpResponseWriter {
    pub fn new(stream: OwnedWriteHalf, peer: SocketAddr, local: SocketAddr) -> Self {
        Self {
            stream,
            peer,
            local,
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[async_trait]
impl ResponseWriter for TcpResponseWriter {
    fn remote_addr(&self) -> SocketAddr {
        self.peer
    }

    fn local_addr(&self) -> SocketAddr {
        self.local
    }

    async fn write_msg(&mut self, message: &Message) -> Result<(), DomainError> {
        let bytes = MessageMapper::serialize(message)?;
        let len = u16::try_from(bytes.len()).map_err(|_| {
            DomainError::SerializationFailed(format!(
                "{} bytes exceeds the TCP message limit",
                bytes.len()
            ))
        })?;

        let peer = self.peer;
        let write_err = |e: io::Error| DomainError::WriteFailed(format!("TCP to {}: {}", peer, e));
        let mut frame = Vec::with_capacity(bytes.len() + 2);
        frame.extend_from_slice(&len.to_be_bytes());
        frame.extend_from_slice(&bytes);

        self.stream.write_all(&frame).await.map_err(write_err)?;
        self.stream.flush().await.map_err(write_err)?;
        Ok(())
    }

    async fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        self.stream.shutdown().await
    }
}

/// Accepts connections on `listener` until `shutdown` fires.
///
/// Each connection is served on its own task and may carry several
/// requests. A request that produces no reply closes its connection.
pub async fn serve_tcp(
    listener: TcpListener,
    handler: Arc<RelayHandler>,
    shutdown: CancellationToken,
) -> Result<(), DomainError> {
    let local = listener
        .local_addr()
        .map_err(|e| DomainError::AcceptFailed(e.to_string()))?;

    loop {
        let (stream, peer) = tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                info!(address = %local, "TCP listener shutting down");
                return Ok(());
            }
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(e) if is_transient(&e) => {
                    debug!(address = %local, error = %e, "Transient TCP accept error");
                    continue;
                }
                Err(e) => {
                    return Err(DomainError::AcceptFailed(format!("TCP {}: {}", local, e)));
                }
            }
        };

        let handler = handler.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            serve_connection(stream, peer, handler, shutdown).await;
        });
    }
}

async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    handler: Arc<RelayHandler>,
    shutdown: CancellationToken,
) {
    if let Err(e) = stream.set_nodelay(true) {
        debug!(peer = %peer, error = %e, "Failed to set TCP_NODELAY");
    }
    let local = stream.local_addr().unwrap_or_else(|_| unspecified_addr());
    let (mut reader, writer) = stream.into_split();
    let mut writer = TcpResponseWriter::new(writer, peer, local);

    loop {
        let frame = tokio::select! {
            _ = shutdown.cancelled() => break,
            frame = tokio::time::timeout(TCP_IDLE_TIMEOUT, read_frame(&mut reader)) => frame,
        };

        let bytes = match frame {
            Ok(Ok(Some(bytes))) => bytes,
            Ok(Ok(None)) => break,
            Ok(Err(e)) => {
                debug!(peer = %peer, error = %e, "TCP read failed");
                break;
            }
            Err(_) => {
                debug!(peer = %peer, "TCP connection idle, closing");
                break;
            }
        };

        let request = match MessageMapper::parse(&bytes) {
            Ok(request) => request,
            Err(e) => {
                debug!(peer = %peer, error = %e, "Dropping undecodable TCP message");
                break;
            }
        };

        handler.serve(&mut writer, &request).await;
        if writer.is_closed() {
            return;
        }
    }

    let _ = writer.close().await;
}

/// Reads one length-prefixed message; `None` on a clean end of stream.
async fn read_frame(reader: &mut OwnedReadHalf) -> io::Result<Option<Vec<u8>>> {
    let mut len_buf = [0u8; 2];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    }

    let mut buf = vec![0u8; u16::from_be_bytes(len_buf) as usize];
    reader.read_exact(&mut buf).await?;
    Ok(Some(buf))
}

use super::{is_transient, PacketConn};
use crate::dns::server::RelayHandler;
use crate::dns::message_mapper::MessageMapper;
use crate::dns::transport::udp::MAX_UDP_MESSAGE_SIZE;
use linkrelay_domain::DomainError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Serves requests read from an arbitrary packet connection.
///
/// Replies are written straight back to the sender with
/// [`PacketConn::write_to`]; requests without a reply are silently dropped.
pub async fn serve_packet_conn<C>(
    conn: Arc<C>,
    handler: Arc<RelayHandler>,
    shutdown: CancellationToken,
) -> Result<(), DomainError>
where
    C: PacketConn + ?Sized,
{
    let local = conn.local_addr().ok();
    let mut recv_buf = vec![0u8; MAX_UDP_MESSAGE_SIZE];

    loop {
        let (len, peer) = tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                info!(address = ?local, "Packet connection handler shutting down");
                return Ok(());
            }
            received = conn.recv_from(&mut recv_buf) => match received {
                Ok(received) => received,
                Err(e) if is_transient(&e) => {
                    debug!(error = %e, "Transient packet connection receive error");
                    continue;
                }
                Err(e) => {
                    return Err(DomainError::ReceiveFailed(format!("packet connection: {}", e)));
                }
            }
        };

        let request = match MessageMapper::parse(&recv_buf[..len]) {
            Ok(request) => request,
            Err(e) => {
                debug!(peer = %peer, error = %e, "Dropping undecodable packet");
                continue;
            }
        };

        handler.serve_on_conn(&*conn, &request, peer).await;
    }
}

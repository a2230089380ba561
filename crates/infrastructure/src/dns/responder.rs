use crate::dns::server::RelayHandler;
use crate::dns::transport::{serve_packet_conn, serve_tcp, serve_udp, PacketConn};
use crate::system::sockets::{create_tcp_listener, create_udp_socket};
use linkrelay_domain::DomainError;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Runs the UDP and TCP listeners for one address as a unit.
///
/// Both listeners share a child of the caller's token. The first one to
/// fail cancels the other, and its error is what [`DnsResponder::run`]
/// returns once both have stopped.
pub struct DnsResponder {
    listen_addr: SocketAddr,
    handler: Arc<RelayHandler>,
}

impl DnsResponder {
    pub fn new(listen_addr: SocketAddr, handler: Arc<RelayHandler>) -> Self {
        Self {
            listen_addr,
            handler,
        }
    }

    pub async fn run(&self, shutdown: CancellationToken) -> Result<(), DomainError> {
        let group = shutdown.child_token();
        let addr = self.listen_addr;
        let mut listeners: JoinSet<Result<(), DomainError>> = JoinSet::new();

        let handler = self.handler.clone();
        let token = group.clone();
        listeners.spawn(async move {
            let socket = create_udp_socket(addr).map_err(|e| bind_failed(addr, e))?;
            info!(address = %addr, "DNS responder listening via UDP");
            serve_udp(socket, handler, token).await
        });

        let handler = self.handler.clone();
        let token = group.clone();
        listeners.spawn(async move {
            let listener = create_tcp_listener(addr).map_err(|e| bind_failed(addr, e))?;
            info!(address = %addr, "DNS responder listening via TCP");
            serve_tcp(listener, handler, token).await
        });

        let mut first_error = None;
        while let Some(joined) = listeners.join_next().await {
            let result = joined.unwrap_or_else(|e| Err(DomainError::TaskFailed(e.to_string())));

            if let Err(e) = result {
                error!(address = %addr, error = %e, "DNS listener stopped");
                group.cancel();
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                info!(address = %addr, "DNS responder stopped");
                Ok(())
            }
        }
    }
}

fn bind_failed(addr: SocketAddr, e: std::io::Error) -> DomainError {
    DomainError::BindFailed {
        addr: addr.to_string(),
        reason: e.to_string(),
    }
}

/// Serves UDP and TCP on `listen_addr` until `shutdown` fires or a
/// listener fails.
pub async fn run_dns_responder(
    listen_addr: SocketAddr,
    handler: Arc<RelayHandler>,
    shutdown: CancellationToken,
) -> Result<(), DomainError> {
    DnsResponder::new(listen_addr, handler).run(shutdown).await
}

/// Serves requests arriving on a caller-supplied packet connection.
pub async fn run_handler_on_packet_conn<C>(
    conn: Arc<C>,
    handler: Arc<RelayHandler>,
    shutdown: CancellationToken,
) -> Result<(), DomainError>
where
    C: PacketConn + ?Sized,
{
    if let Ok(local) = conn.local_addr() {
        info!(address = %local, "Serving on packet connection");
    }
    serve_packet_conn(conn, handler, shutdown).await
}

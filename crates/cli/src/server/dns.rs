use linkrelay_domain::Config;
use linkrelay_infrastructure::dns::{run_dns_responder, RelayHandler};
use linkrelay_infrastructure::system::{interface_index, listen_address};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Serves DNS on `[local_ipv6%interface]:dns_port` over UDP and TCP.
pub async fn start_dns_server(
    config: Config,
    handler: Arc<RelayHandler>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let scope_id = interface_index(&config.server.interface)?;
    let addr = listen_address(config.server.local_ipv6, scope_id, config.server.dns_port);

    info!(
        interface = %config.server.interface,
        scope_id,
        address = %addr,
        "Starting DNS responder"
    );

    run_dns_responder(addr, handler, shutdown).await?;
    Ok(())
}

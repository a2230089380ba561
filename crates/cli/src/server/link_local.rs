use linkrelay_domain::Config;
use linkrelay_infrastructure::dns::{run_handler_on_packet_conn, RelayHandler};
use linkrelay_infrastructure::system::{bind_llmnr, bind_mdns, bind_netbios, interface_index};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Serves the enabled link-local protocols until shutdown or the first
/// failure.
pub async fn start_link_local(
    config: Config,
    handler: Arc<RelayHandler>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let settings = &config.link_local;
    let scope_id = interface_index(&config.server.interface)?;
    let group = shutdown.child_token();
    let mut listeners = JoinSet::new();

    if settings.llmnr {
        let socket = Arc::new(bind_llmnr(scope_id)?);
        info!(interface = %config.server.interface, "LLMNR responder enabled");
        listeners.spawn(run_handler_on_packet_conn(socket, handler.clone(), group.clone()));
    }
    if settings.mdns {
        let socket = Arc::new(bind_mdns(scope_id)?);
        info!(interface = %config.server.interface, "mDNS responder enabled");
        listeners.spawn(run_handler_on_packet_conn(socket, handler.clone(), group.clone()));
    }
    if settings.netbios {
        let socket = Arc::new(bind_netbios()?);
        info!("NetBIOS name service responder enabled");
        listeners.spawn(run_handler_on_packet_conn(socket, handler.clone(), group.clone()));
    }

    let mut first_error: Option<anyhow::Error> = None;
    while let Some(joined) = listeners.join_next().await {
        let result = match joined {
            Ok(result) => result.map_err(anyhow::Error::from),
            Err(e) => Err(anyhow::anyhow!("link-local listener task failed: {}", e)),
        };

        if let Err(e) = result {
            error!(error = %e, "Link-local listener stopped");
            group.cancel();
            first_error.get_or_insert(e);
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

use clap::Parser;
use linkrelay_domain::CliOverrides;
use std::net::{Ipv4Addr, Ipv6Addr};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "linkrelay")]
#[command(version)]
#[command(about = "linkrelay - answers name queries on a link with relay gateway addresses")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Network interface to serve on
    #[arg(short = 'i', long)]
    interface: Option<String>,

    /// Local IPv6 address to bind on the interface
    #[arg(long)]
    local_ipv6: Option<Ipv6Addr>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// IPv4 relay gateway returned in A answers
    #[arg(long)]
    relay_ipv4: Option<Ipv4Addr>,

    /// IPv6 relay gateway returned in AAAA answers
    #[arg(long)]
    relay_ipv6: Option<Ipv6Addr>,

    /// Answer TTL in seconds
    #[arg(long)]
    ttl: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        interface: cli.interface,
        local_ipv6: cli.local_ipv6,
        dns_port: cli.dns_port,
        relay_ipv4: cli.relay_ipv4,
        relay_ipv6: cli.relay_ipv6,
        ttl_secs: cli.ttl,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);

    info!("Starting linkrelay v{}", env!("CARGO_PKG_VERSION"));

    let services = di::RelayServices::new(&config)?;
    let shutdown = CancellationToken::new();

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        info!("Shutdown signal received");
        signal_token.cancel();
    });

    let mut servers = JoinSet::new();
    servers.spawn(server::start_dns_server(
        config.clone(),
        services.handler.clone(),
        shutdown.clone(),
    ));
    if config.link_local.any_enabled() {
        servers.spawn(server::start_link_local(
            config.clone(),
            services.handler.clone(),
            shutdown.clone(),
        ));
    }

    let mut first_error = None;
    while let Some(joined) = servers.join_next().await {
        let result = match joined {
            Ok(result) => result,
            Err(e) => Err(anyhow::anyhow!("server task failed: {}", e)),
        };

        if let Err(e) = result {
            error!(error = %e, "Server stopped");
            shutdown.cancel();
            first_error.get_or_insert(e);
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }

    info!("Server shutdown complete");
    Ok(())
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(e) => {
            error!(error = %e, "Failed to install SIGTERM handler");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

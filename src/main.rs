//! CORS forwarding relay.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │                 CORS RELAY                   │
//!   GET /?url=<u>     │  ┌────────┐   ┌──────────┐   ┌───────────┐   │
//!  ───────────────────┼─▶│ layers │──▶│ handlers │──▶│ upstream  │───┼──▶ origin <u>
//!                     │  │req-id, │   │ GET/OPT/ │   │ client    │   │
//!                     │  │trace,  │   │ 405      │   │ (10s max) │   │
//!   bytes | {"error"} │  │ CORS   │◀──│          │◀──│           │◀──┼───
//!  ◀──────────────────┼──│        │   └──────────┘   └───────────┘   │
//!                     │  └────────┘                                  │
//!                     │   config · lifecycle · observability         │
//!                     └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use cors_relay::config::{load_config, validate_config, ConfigError, RelayConfig};
use cors_relay::lifecycle::{wait_for_termination, Shutdown};
use cors_relay::observability::{logging, metrics};
use cors_relay::RelayServer;

#[derive(Parser)]
#[command(name = "cors-relay")]
#[command(about = "Relay GET requests to third-party origins with permissive CORS headers", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

fn resolve_config(cli: &Cli) -> Result<RelayConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };

    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    logging::init(&config.observability);

    tracing::info!("cors-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        timeout_secs = config.upstream.timeout_secs,
        user_agent = %config.upstream.user_agent,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        if let Err(e) = metrics::init_metrics(addr) {
            tracing::error!(error = %e, "Failed to start metrics exporter");
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Proxy server running on http://{}", local_addr);
    tracing::info!("Usage: http://{}/?url=<encoded_url>", local_addr);

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_termination().await;
        shutdown.trigger();
    });

    let server = RelayServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

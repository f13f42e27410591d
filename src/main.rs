//! Entity Router
//!
//! Serves a schema of entity collections over HTTP using routes synthesized
//! from handler naming conventions.
//!
//! # Architecture Overview
//!
//! ```text
//!     Startup:
//!         config ──▶ model::Schema ──┐
//!                                    ├──▶ routing::synthesizer ──▶ routing::RouteTable
//!         dispatch::HandlerRegistry ─┘
//!
//!     Client Request
//!         ──▶ http server ──▶ RouteTable::match_path ──▶ Resolver::resolve
//!                                                            │
//!     Client Response                                        ▼
//!         ◀── http response ◀──────────────── HandlerRegistry::dispatch
//!
//!     Cross-cutting: observability (tracing, metrics), lifecycle (signals, shutdown)
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use entity_router::config::{load_config, ServiceConfig};
use entity_router::lifecycle::{signals, StartupError};
use entity_router::observability::{logging, metrics};
use entity_router::{build_application, sample, HttpServer, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "entity-router", version, about = "Convention-based entity routing service")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the synthesized route templates and exit.
    #[arg(long)]
    print_routes: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "entity-router starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        config_file = ?cli.config,
        "Configuration loaded"
    );

    let app = build_application(config, sample::sample_registry())?;

    if cli.print_routes {
        for route in app.routes.routes() {
            println!("{:<48} {}", route.template, route.handler);
        }
        return Ok(());
    }

    if app.config.observability.metrics_enabled {
        match app.config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %app.config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let address = app.config.listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_signal_handler(shutdown.clone());

    HttpServer::new(&app).run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

//! Module Dispatcher
//!
//! Serves every module declared by the registered namespaces.
//!
//! # Architecture Overview
//!
//! ```text
//!   registration fns ─┐                        ┌─────────────────┐
//!                     ├─▶ namespace index ─┬──▶│ listing (menu)  │
//!   manifest dir ─────┘   (Aggregator)     │   └─────────────────┘
//!                                          │   ┌─────────────────┐     ┌────────────┐
//!                                          └──▶│  route table    │────▶│ axum Router│
//!                                              │ (bound ctrls)   │     └─────┬──────┘
//!                                              └─────────────────┘           │
//!   Client ──▶ request id / trailing slash / cors ──▶ dispatch ──▶ controller ─┘
//!                                                       │
//!   Client ◀── 302 / HTML / JSON / diagnostic / 500 ◀───┘
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use module_dispatcher::config::{load_config, AppConfig};
use module_dispatcher::http::HttpServer;
use module_dispatcher::lifecycle::{bootstrap, Bootstrap, Shutdown};
use module_dispatcher::listing::enumerate_modules;
use module_dispatcher::observability::{logging, metrics};
use module_dispatcher::routing::RouteTable;

#[derive(Parser)]
#[command(name = "module-dispatcher")]
#[command(about = "Serve HTTP routes declared by module namespaces", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Print the module listing as JSON
    Modules,
    /// Print every registered route
    Routes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "module-dispatcher starting");

    let Bootstrap { aggregator, controllers } = bootstrap(&config)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Modules => {
            let listing = enumerate_modules(aggregator.as_ref(), &config.dispatcher.display_module);
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        Commands::Routes => {
            let table = RouteTable::build(aggregator.as_ref(), &controllers);
            for route in table.routes() {
                let controller = if route.controller.is_bound() { "ok" } else { "missing" };
                println!(
                    "{:<6} {:<40} {}::{} (controller {})",
                    route.verb, route.path, route.namespace, route.module_key, controller
                );
            }
        }
        Commands::Serve => {
            if config.observability.metrics_enabled {
                match config.observability.metrics_address.parse() {
                    Ok(addr) => metrics::init_metrics(addr)?,
                    Err(e) => tracing::error!(
                        metrics_address = %config.observability.metrics_address,
                        error = %e,
                        "Failed to parse metrics address"
                    ),
                }
            }

            let listener = TcpListener::bind(&config.listener.bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");

            let shutdown = Shutdown::new();
            let server = HttpServer::new(config, aggregator.as_ref(), &controllers);
            server.run(listener, shutdown.subscribe()).await?;
            tracing::info!("Shutdown complete");
        }
    }

    Ok(())
}

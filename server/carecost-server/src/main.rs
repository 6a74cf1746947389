use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use config_engine::{LogFormat, Settings};
use error_common::{log_error, CareCostError, Result};
use tracing::info;

use carecost_server::{create_app, CareCostServer};

/// CareCost Engine HTTP Server
#[derive(Parser, Debug)]
#[command(name = "carecost-server")]
#[command(about = "Out-of-pocket cost estimate HTTP API server")]
struct Args {
    /// Server bind address (overrides configuration)
    #[arg(long)]
    host: Option<String>,

    /// Server port (overrides configuration)
    #[arg(short, long)]
    port: Option<u16>,

    /// Configuration file path (YAML or TOML)
    #[arg(short, long, env = "CARECOST_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let result = run(args).await;
    if let Err(err) = &result {
        log_error("carecost-server", err);
    }
    result
}

async fn run(args: Args) -> Result<()> {
    let mut settings = Settings::load(args.config.as_deref())
        .map_err(|e| CareCostError::Config(e.to_string()))?;
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }

    telemetry::init_tracing(&settings.logging, args.verbose)
        .map_err(|e| CareCostError::Config(e.to_string()))?;

    if settings.logging.format == LogFormat::Pretty {
        print_startup_banner();
    }

    info!("Starting CareCost Engine HTTP Server v{}", env!("CARGO_PKG_VERSION"));

    let server = CareCostServer::new(settings.clone())
        .map_err(|e| CareCostError::Config(format!("Failed to load catalog: {e}")))?;

    let catalog = &server.catalog;
    info!(
        procedures = catalog.procedures().len(),
        providers = catalog.providers().len(),
        plans = catalog.plans().len(),
        rates = catalog.rate_count(),
        reporting_period = %catalog.provenance().reporting_period,
        "Catalog ready"
    );

    let app = create_app(server);

    let bind = (settings.server.host.as_str(), settings.server.port);
    let listener = tokio::net::TcpListener::bind(bind).await.map_err(|e| {
        CareCostError::Network(format!(
            "Failed to bind to {}:{}: {e}",
            settings.server.host, settings.server.port
        ))
    })?;
    let addr: SocketAddr = listener
        .local_addr()
        .map_err(|e| CareCostError::Network(e.to_string()))?;

    info!("{}", format!("CareCost server running on http://{addr}").bright_green());
    info!("{}", format!("Health check available at: http://{addr}/health").bright_blue());
    info!("{}", format!("API v1 available at: http://{addr}/api/v1").bright_blue());
    info!("{}", format!("OpenAPI document at: http://{addr}/api-docs/openapi.json").bright_blue());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CareCostError::Server(format!("HTTP server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, draining connections"),
        Err(err) => {
            tracing::error!(error = %err, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

fn print_startup_banner() {
    println!("{}", "╔══════════════════════════════════════════════════════════════╗".bright_cyan());
    println!("{}", "║                      CARECOST ENGINE                         ║".bright_cyan());
    println!("{}", "║            Out-of-pocket cost estimates, to the cent         ║".bright_cyan());
    println!("{}", "╚══════════════════════════════════════════════════════════════╝".bright_cyan());
    println!();
}

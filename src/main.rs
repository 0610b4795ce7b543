//! Roster Engine HTTP server.

use std::net::SocketAddr;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use roster_engine::api::{AppState, create_router};
use roster_engine::config::ConfigLoader;
use roster_engine::engine::Engine;

/// Serves the roster engine over HTTP.
#[derive(Debug, Parser)]
#[command(name = "roster-engine", version, about)]
struct Args {
    /// Directory holding scheduling.yaml, leave.yaml and employees.yaml.
    #[arg(long, default_value = "./config")]
    config: String,

    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind.
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(log_level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level)?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| err as Box<dyn std::error::Error>)
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(&args.log_level)?;

    let loader = ConfigLoader::load(&args.config)?;
    let engine = Engine::from_loader(loader)?;
    info!(
        config = %args.config,
        employees = engine.directory().list().len(),
        horizon_months = engine.config().recurrence_horizon_months(),
        max_rule_span_months = engine.config().max_rule_span_months(),
        balance_policy = ?engine.ledger().policy(),
        "Engine ready"
    );

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");
    axum::serve(listener, create_router(AppState::new(engine))).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run(Args::parse()).await {
        eprintln!("roster-engine: {err}");
        std::process::exit(1);
    }
}

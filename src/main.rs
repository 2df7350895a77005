//! Command line entry point for the salary structure engine.

use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::info;

use salary_engine::api::{AppState, PreviewRequest, create_router};
use salary_engine::calculation::PreviewService;
use salary_engine::config::ConfigLoader;
use salary_engine::error::EngineError;
use salary_engine::telemetry::{self, TelemetryError};

#[derive(Parser, Debug)]
#[command(
    name = "salary-engine",
    about = "Validate salary structures and preview monthly breakdowns",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Compute a single preview from a JSON request file and print it
    Preview(PreviewArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Directory holding catalog.yaml, engine.yaml and structures/
    #[arg(long, default_value = "./config/default")]
    config_dir: PathBuf,
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 3000)]
    port: u16,
}

impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("./config/default"),
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// Directory holding catalog.yaml, engine.yaml and structures/
    #[arg(long, default_value = "./config/default")]
    config_dir: PathBuf,
    /// Path to a JSON file shaped like the POST /preview body
    #[arg(long)]
    request: PathBuf,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("invalid listen address '{0}'")]
    Address(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid request file: {0}")]
    Json(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Preview(args) => run_preview(args),
    }
}

async fn run_server(args: ServeArgs) -> Result<(), CliError> {
    let loader = ConfigLoader::load(&args.config_dir)?;
    telemetry::init(&loader.settings().log_level)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|_| CliError::Address(format!("{}:{}", args.host, args.port)))?;

    info!(
        catalog = %loader.catalog().metadata().code,
        components = loader.catalog().len(),
        structures = loader.config().structures().len(),
        gross_basis = ?loader.settings().gross_basis,
        "Configuration loaded"
    );

    let app = create_router(AppState::new(loader));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Salary engine listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn run_preview(args: PreviewArgs) -> Result<(), CliError> {
    let loader = ConfigLoader::load(&args.config_dir)?;
    telemetry::init(&loader.settings().log_level)?;

    let request: PreviewRequest = serde_json::from_str(&fs::read_to_string(&args.request)?)?;
    let preview = PreviewService::new(loader.config()).compute_preview(
        request.source()?,
        request.ctc_annual,
        request.attendance_factor,
    )?;

    println!("{}", serde_json::to_string_pretty(&preview)?);
    Ok(())
}

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tunedeck_admin_server::catalog::{seed_repository, MetadataRepository};
use tunedeck_admin_server::config::{AppConfig, CliConfig, FileConfig};
use tunedeck_admin_server::server::{self, RequestsLoggingLevel, ServerConfig};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to an optional TOML config file; its values override the CLI.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 8000)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to the dashboard frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// Probability (0.0-1.0) of the simulated pre-start fault on fix
    /// operations. Leave at 0 unless exercising the dashboard's error
    /// display paths.
    #[clap(long, default_value_t = 0.0)]
    pub fault_probability: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let cli_config = CliConfig {
        port: cli_args.port,
        metrics_port: cli_args.metrics_port,
        logging_level: cli_args.logging_level,
        frontend_dir_path: cli_args.frontend_dir_path,
        fault_probability: cli_args.fault_probability,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Seeding in-memory metadata catalog...");
    let repository: Arc<dyn MetadataRepository> = Arc::new(seed_repository());

    info!("Initializing metrics...");
    server::metrics::init_metrics();
    server::metrics::init_catalog_metrics(
        repository.get_songs_count(),
        repository.get_artists_count(),
    );

    let metrics_port = config.metrics_port;
    tokio::spawn(async move {
        if let Err(e) = server::metrics::run_metrics_server(metrics_port).await {
            tracing::error!("Metrics server failed: {}", e);
        }
    });

    let server_config = ServerConfig {
        port: config.port,
        requests_logging_level: config.logging_level,
        frontend_dir_path: config.frontend_dir_path,
        fix_fault_probability: config.fault_probability,
    };

    info!("Ready to serve at port {}!", server_config.port);
    info!("Metrics available at port {}!", metrics_port);
    server::run_server(server_config, repository).await
}

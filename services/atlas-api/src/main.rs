//! Atlas print API service.
//!
//! HTTP server exposing atlas layout exports from map projects over an
//! OWS style endpoint.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use atlas_api::app::build_router;
use atlas_api::config::ServiceConfig;
use atlas_api::state::AppState;
use atlas_api::sweeper::{ExportSweeper, SweeperConfig};
use atlas_protocol::PkPolicy;
use layout_engine::MemoryEngine;

#[derive(Parser, Debug)]
#[command(name = "atlas-api")]
#[command(about = "Atlas print API server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080", env = "ATLAS_LISTEN")]
    listen: String,

    /// Directory scanned for project definition files
    #[arg(long, default_value = "projects", env = "ATLAS_PROJECTS_DIR")]
    projects_dir: PathBuf,

    /// Project served when requests omit MAP
    #[arg(long, env = "ATLAS_DEFAULT_PROJECT")]
    default_project: Option<String>,

    /// Directory for in-flight export artifacts (default: a subdirectory
    /// of the OS temp dir)
    #[arg(long, env = "ATLAS_EXPORT_DIR")]
    export_dir: Option<PathBuf>,

    /// Primary key types eligible for the $id rewrite: integer-only,
    /// numeric, or any
    #[arg(long, default_value = "numeric", env = "ATLAS_PK_POLICY")]
    pk_policy: PkPolicy,

    /// Enable debug logging
    #[arg(long, env = "ATLAS_DEBUG")]
    debug: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Number of tokio worker threads (default: number of CPU cores)
    #[arg(long)]
    worker_threads: Option<usize>,

    /// Seconds between stale artifact sweeps (0 disables the sweeper)
    #[arg(long, default_value = "300", env = "ATLAS_SWEEP_INTERVAL_SECS")]
    sweep_interval_secs: u64,

    /// Age in seconds before an abandoned artifact is swept
    #[arg(long, default_value = "600", env = "ATLAS_SWEEP_MAX_AGE_SECS")]
    sweep_max_age_secs: u64,
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build tokio runtime with configurable worker threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        info!("Configuring tokio runtime with {} worker threads", threads);
        runtime_builder.worker_threads(threads);
    } else {
        // Use environment variable if CLI arg not provided
        if let Ok(threads_str) = env::var("TOKIO_WORKER_THREADS") {
            if let Ok(threads) = threads_str.parse::<usize>() {
                info!(
                    "Configuring tokio runtime with {} worker threads (from env)",
                    threads
                );
                runtime_builder.worker_threads(threads);
            }
        }
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(args))?;
    Ok(())
}

async fn async_main(args: Args) -> Result<()> {
    // Initialize tracing
    let level = if args.debug {
        Level::DEBUG
    } else {
        match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Initialize Prometheus metrics exporter
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    info!("Starting atlas print API server");

    let config = ServiceConfig {
        listen: args.listen.clone(),
        projects_dir: args.projects_dir,
        default_project: args.default_project,
        export_dir: args
            .export_dir
            .unwrap_or_else(ServiceConfig::default_export_dir),
        pk_policy: args.pk_policy,
        debug: args.debug,
    };

    // Initialize application state
    let engine = MemoryEngine::new();
    let state = Arc::new(AppState::new(&engine, config)?);
    info!(projects = state.projects.len(), "Application state ready");

    // Start the stale artifact sweeper
    let sweeper = ExportSweeper::new(
        state.config.export_dir.clone(),
        SweeperConfig {
            enabled: args.sweep_interval_secs > 0,
            interval_secs: args.sweep_interval_secs.max(1),
            max_age: Duration::from_secs(args.sweep_max_age_secs),
        },
    );
    tokio::spawn(sweeper.run_forever());

    // Build router
    let app = build_router(state);

    // Parse listen address
    let addr: SocketAddr = args.listen.parse()?;
    info!(address = %addr, "Listening");

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

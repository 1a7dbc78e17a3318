use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use dotenv::dotenv;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{error, info};
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use keepalive_worker::version::VERSION;
use keepalive_worker::worker::config::WorkerConfig;
use keepalive_worker::worker::scheduler::Scheduler;
use keepalive_worker::worker::store::DbTargetStore;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,
}

fn init_logging(log_dir: &str) {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily(log_dir, "worker.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    // Log to stdout: human-readable format
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    // Default to `info` with quiet database internals if RUST_LOG is not set.
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sea_orm=warn,sqlx::query=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Manually check for --version before full parsing to keep the output simple.
    if std::env::args().any(|arg| arg == "--version") {
        println!("Worker version: {VERSION}");
        return Ok(());
    }

    let args = Args::parse();
    dotenv().ok();

    let config = match WorkerConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load worker configuration: {e}");
            return Err(e.into());
        }
    };

    init_logging(&config.log_dir);
    info!("Starting keepalive worker, version: {}", VERSION);

    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(config.max_db_connections);

    let db: DatabaseConnection = Database::connect(opt).await?;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.probe_timeout_ms))
        .build()?;

    let store = Arc::new(DbTargetStore::new(db.clone()));
    let scheduler = Arc::new(Scheduler::new(
        store,
        http,
        Duration::from_secs(config.tick_seconds),
    ));

    let scheduler_handle = tokio::spawn(scheduler.run());

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, stopping dispatch loop.");
        }
        _ = scheduler_handle => {
            error!("Dispatch loop exited unexpectedly.");
        }
    }

    // In-flight probes are abandoned with the runtime; log appends are
    // single inserts, so no partial entries can result.
    db.close().await?;

    Ok(())
}

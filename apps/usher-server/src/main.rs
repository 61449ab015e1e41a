mod api;
mod backend;
mod config;
mod handlers;
mod http;
mod metrics;
mod query;
mod server;
mod sweep;

#[cfg(test)]
mod tests;

use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use backend::StoreBackend;
use config::ServerConfig;
use server::UsherServer;
use usher_storage::Store;
use usher_store_memory::MemoryStore;
use usher_store_sqlite::SqliteStore;

// ────────────────────────────────────── CLI Types ──────────────────────────────────────

#[derive(Parser)]
#[command(name = "usher-server")]
#[command(about = "Invitation lifecycle service: HTTP API plus expiry sweep")]
struct Cli {
    /// Database URL (sqlite://path/to/db.db?mode=rwc, or memory: for the in-process store)
    #[arg(long, global = true, env = "USHER_DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server and the periodic expiry sweep
    Serve {
        /// Listen address
        #[arg(long, default_value = "0.0.0.0:8080")]
        addr: String,
    },
    /// Run one expiry sweep and exit
    Sweep,
}

// ────────────────────────────────────── Commands ──────────────────────────────────────

async fn open_backend(db_url: &str) -> Result<StoreBackend, Box<dyn std::error::Error>> {
    if db_url == "memory:" {
        return Ok(StoreBackend::Memory(Arc::new(MemoryStore::new())));
    }
    let store = SqliteStore::open(db_url).await?;
    Ok(StoreBackend::Sqlite(Arc::new(store)))
}

async fn cmd_serve(db_url: &str, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let addr: std::net::SocketAddr = addr.parse()?;
    let config = ServerConfig::from_env()?;
    let backend = open_backend(db_url).await?;
    let server = UsherServer::new(backend, config.clone());

    let metrics_handle = metrics::init_metrics();
    let app = http::router(server.clone(), metrics_handle);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "usher-server listening");

    let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(1);

    let sweeper = config.sweep_interval().map(|interval| {
        info!(interval_secs = interval.as_secs(), "periodic sweep enabled");
        let store: Arc<dyn Store> = Arc::new(server.store.clone());
        tokio::spawn(sweep::run_periodic(store, interval, shutdown_tx.subscribe()))
    });
    if sweeper.is_none() {
        info!("periodic sweep disabled");
    }

    let signal_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = signal_tx.send(());
    });

    let mut shutdown_rx = shutdown_tx.subscribe();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await?;

    if let Some(handle) = sweeper {
        handle.await?;
    }

    Ok(())
}

async fn cmd_sweep(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let backend = open_backend(db_url).await?;
    let store: Arc<dyn Store> = Arc::new(backend);
    let report = sweep::run(store).await;

    // Best-effort semantics: update failures are reported, not fatal.
    println!(
        "swept {} pages: examined {}, transitioned {}, skipped missing {}, update errors {}",
        report.pages,
        report.examined,
        report.transitioned,
        report.skipped_missing,
        report.update_errors
    );
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");

    tokio::select! {
        _ = sigterm.recv() => {
            info!("received SIGTERM, shutting down gracefully");
        }
        _ = sigint.recv() => {
            info!("received SIGINT, shutting down gracefully");
        }
    }
}

// ────────────────────────────────────── Main ──────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let db_url = cli
        .database_url
        .unwrap_or_else(|| "sqlite://usher.db?mode=rwc".to_string());

    match cli.command {
        Command::Serve { addr } => cmd_serve(&db_url, &addr).await?,
        Command::Sweep => cmd_sweep(&db_url).await?,
    }

    Ok(())
}

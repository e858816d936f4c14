//! `conan-revisions-server` binary — thin CLI shell over the
//! `conan_revisions_server` library crate.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use conan_index_core::adapters::fs_store::FsStore;
use conan_index_core::adapters::mem_lock::InMemoryLock;
use conan_index_core::{RevisionsApi, Store};
use conan_revisions_server::config::ServerConfig;
use conan_revisions_server::router::build_router;
use tracing::{error, info};

/// Conan package repository revisions index server.
#[derive(Parser)]
#[command(name = "conan-revisions-server", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML config file (default: none, built-in defaults apply)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Root directory of the filesystem-backed object store (default: CWD)
    #[arg(long, global = true)]
    store_root: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server until a shutdown signal is received.
    Serve {
        /// Address to bind (default: from config, else 127.0.0.1:8080)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Trigger one full index rebuild and exit.
    Index {
        /// Package coordinate to rebuild (name/version/user/channel).
        /// If omitted, every recipe coordinate found under the store root.
        #[arg(long)]
        pkg: Option<String>,
    },
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to register SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("received SIGINT, shutting down"),
            _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.expect("failed to listen for Ctrl+C");
        info!("received Ctrl+C, shutting down");
    }
}

/// Finds recipe coordinates under the store root by looking for the
/// `/0/export/` marker that every recipe revision directory contains.
async fn discover_packages(store: &FsStore) -> conan_index_core::Result<Vec<String>> {
    let keys = store.list("").await?;
    let mut coords = BTreeSet::new();
    for key in keys {
        if let Some(idx) = key.find("/0/export/") {
            coords.insert(key[..idx].to_string());
        }
    }
    Ok(coords.into_iter().collect())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = match ServerConfig::load(cli.config.as_deref()) {
        Ok(c) => c.with_store_root(cli.store_root.clone()),
        Err(e) => {
            eprintln!("failed to load config: {e}");
            std::process::exit(1);
        }
    };

    // RUST_LOG overrides the config file when set, matching the
    // teacher's `from_default_env()` precedence.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|v| tracing_subscriber::EnvFilter::try_new(v).ok())
        .or_else(|| tracing_subscriber::EnvFilter::try_new(&config.log_filter).ok())
        .unwrap_or_else(|| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let store_root = match config.store_root_or_cwd() {
        Ok(root) => root,
        Err(e) => {
            error!(error = %e, "failed to resolve store root");
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Serve { bind } => {
            let config = config.with_bind(bind);
            let store: Arc<dyn Store> = Arc::new(FsStore::new(store_root));
            let app = build_router(store);

            let listener = match tokio::net::TcpListener::bind(&config.bind).await {
                Ok(l) => l,
                Err(e) => {
                    error!(error = %e, addr = %config.bind, "failed to bind");
                    std::process::exit(1);
                }
            };
            info!(addr = %config.bind, "listening");
            if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
                error!(error = %e, "server error");
                std::process::exit(1);
            }
        }
        Commands::Index { pkg } => {
            let store = FsStore::new(store_root);
            let lock = InMemoryLock::new();

            let coords = match pkg {
                Some(p) => vec![p],
                None => match discover_packages(&store).await {
                    Ok(c) => c,
                    Err(e) => {
                        error!(error = %e, "failed to discover packages under store root");
                        std::process::exit(1);
                    }
                },
            };

            let mut failed = false;
            for coord in coords {
                let api = RevisionsApi::new(&store, &lock, coord.as_str());
                match api.full_index_update_with_concurrency(config.full_index_concurrency).await {
                    Ok(result) => info!(
                        pkg = %coord,
                        recipe_revisions = ?result.recipe_revisions,
                        binaries = result.binaries.len(),
                        "rebuilt"
                    ),
                    Err(e) => {
                        error!(pkg = %coord, error = %e, "full index update failed");
                        failed = true;
                    }
                }
            }
            if failed {
                std::process::exit(1);
            }
        }
    }
}

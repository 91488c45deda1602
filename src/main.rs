use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use warden::config::{Config, Overrides};
use warden::server::Server;

#[derive(Parser)]
#[command(name = "warden", version)]
#[command(about = "Serve static files from a confined document root", long_about = None)]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// Document root directory
    #[arg(short = 'd', long)]
    root: Option<PathBuf>,

    /// Address to bind
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<i64>,

    /// Number of worker threads
    #[arg(short = 't', long = "threads")]
    workers: Option<i64>,

    /// Connections allowed to wait for a worker
    #[arg(short = 'b', long = "queue")]
    queue_capacity: Option<i64>,

    /// Document served for "/"
    #[arg(short, long)]
    index: Option<String>,

    /// YAML config file (defaults to $WARDEN_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            root: self.root.clone(),
            host: self.host.clone(),
            port: self.port,
            workers: self.workers,
            queue_capacity: self.queue_capacity,
            index: self.index.clone(),
            max_line_len: None,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let cfg = Config::load_with(cli.config.as_deref(), cli.overrides())?;

    let server = Server::bind(&cfg)?;
    let shutdown = server.shutdown_handle();

    // accept() blocks, so the acceptor gets its own thread
    let mut accept_loop = tokio::task::spawn_blocking(move || server.run());

    tokio::select! {
        res = &mut accept_loop => {
            return res?;
        }

        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            shutdown.trigger();
        }
    }

    accept_loop.await?
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

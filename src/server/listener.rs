use anyhow::Context;
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::docroot::DocumentRoot;
use crate::http::connection::{Connection, ServeContext};
use crate::server::pool::WorkerPool;
use crate::server::shutdown::ShutdownHandle;

/// The acceptor: owns the listening socket and feeds the worker pool.
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    pool: WorkerPool<(TcpStream, SocketAddr)>,
    shutdown: ShutdownHandle,
}

impl Server {
    /// Canonicalize the document root, bind the listener and start the
    /// workers. Any failure here is fatal for the process.
    pub fn bind(cfg: &Config) -> anyhow::Result<Self> {
        let root = DocumentRoot::new(&cfg.root, cfg.index.clone())
            .with_context(|| format!("invalid document root {}", cfg.root.display()))?;

        let listen_addr = cfg.listen_addr();
        let listener = TcpListener::bind(&listen_addr)
            .with_context(|| format!("failed to bind {}", listen_addr))?;
        let local_addr = listener.local_addr()?;

        info!(
            address = %local_addr,
            root = %root.path().display(),
            workers = cfg.workers,
            queue = cfg.queue_capacity,
            "Listening"
        );

        let ctx = Arc::new(ServeContext {
            root,
            max_line_len: cfg.max_line_len,
        });

        let pool = WorkerPool::spawn(cfg.workers, cfg.queue_capacity, move |(stream, peer): (TcpStream, SocketAddr)| {
            let mut conn = Connection::new(stream, peer, Arc::clone(&ctx));
            if let Err(e) = conn.serve() {
                tracing::debug!(peer = %peer, error = %e, "Connection closed after a failed transfer");
            }
        })
        .context("failed to start worker threads")?;

        Ok(Self {
            listener,
            local_addr,
            pool,
            shutdown: ShutdownHandle::new(local_addr),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle that stops [`Server::run`] from another thread.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Accept connections until shutdown is triggered or `accept` fails.
    ///
    /// Either way the listener is closed, every connection already queued
    /// is served, and all workers have exited before this returns.
    pub fn run(self) -> anyhow::Result<()> {
        let Self {
            listener,
            local_addr,
            pool,
            shutdown,
        } = self;

        let result = accept_loop(&listener, &pool, &shutdown);

        drop(listener);
        info!(address = %local_addr, queued = pool.queued(), "Listener closed, draining workers");

        pool.shutdown();
        info!("All workers finished");

        result.context("accept failed")
    }
}

fn accept_loop(
    listener: &TcpListener,
    pool: &WorkerPool<(TcpStream, SocketAddr)>,
    shutdown: &ShutdownHandle,
) -> io::Result<()> {
    while !shutdown.is_triggered() {
        match listener.accept() {
            Ok((stream, peer)) => {
                if shutdown.is_triggered() {
                    // The wake-up connection, or a client that arrived too late
                    break;
                }
                tracing::debug!(peer = %peer, "Accepted connection");
                pool.submit((stream, peer));
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::error!(error = %e, "Accept failed, stopping");
                return Err(e);
            }
        }
    }

    Ok(())
}

//! Cooperative shutdown signalling for the accept loop

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const WAKE_TIMEOUT: Duration = Duration::from_secs(1);

/// Shared shutdown flag for one listener.
///
/// Set once by whoever observes the termination request and read only by
/// the accept loop. Because `accept` blocks, triggering also opens a
/// throwaway loopback connection to the listener so the loop wakes up and
/// sees the flag.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    wake_addr: SocketAddr,
}

impl ShutdownHandle {
    /// Create a handle for a listener bound to `local_addr`.
    pub fn new(local_addr: SocketAddr) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            wake_addr: wake_address(local_addr),
        }
    }

    /// Request shutdown. Only the first call has any effect.
    pub fn trigger(&self) {
        if self.flag.swap(true, Ordering::SeqCst) {
            return;
        }

        tracing::info!("Shutdown requested, no longer accepting connections");

        // The accept loop discards this connection once it sees the flag
        if let Err(e) = TcpStream::connect_timeout(&self.wake_addr, WAKE_TIMEOUT) {
            tracing::debug!(error = %e, "Wake connection failed, listener already closed");
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// A listener on the unspecified address is reached through loopback.
fn wake_address(local_addr: SocketAddr) -> SocketAddr {
    let ip = match local_addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    SocketAddr::new(ip, local_addr.port())
}

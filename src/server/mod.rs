//! Connection dispatch
//!
//! A single acceptor thread pushes accepted connections into a bounded
//! queue drained by a fixed pool of worker threads. When the queue is
//! full the acceptor blocks, which throttles accepting to the speed of
//! the workers.
//!
//! ```text
//!   accept ──► BoundedQueue<Job> ──► worker-0 ──► Connection::serve
//!                               ├──► worker-1 ──► Connection::serve
//!                               └──► worker-N ──► Connection::serve
//! ```
//!
//! Shutdown closes the listener, then queues one `Job::Shutdown` per
//! worker behind any pending connections and joins the workers.

pub mod listener;
pub mod pool;
pub mod queue;
pub mod shutdown;

pub use listener::Server;
pub use pool::WorkerPool;
pub use queue::{BoundedQueue, Job};
pub use shutdown::ShutdownHandle;

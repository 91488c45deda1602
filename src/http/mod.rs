//! HTTP protocol handling.
//!
//! Each connection carries exactly one request and is answered with an
//! `HTTP/1.0` response that always ends with `Connection: close`.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection state machine run by a worker
//! - **`parser`**: Bounded line reading and request-line parsing
//! - **`request`**: Method and request-line representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes responses and streams file bodies
//! - **`mime`**: Content type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │ AwaitRequestLine │ ── empty read ─────────────────┐
//!        └────────┬─────────┘                                │
//!                 ▼                                          │
//!        ┌──────────────────┐                                │
//!        │   DrainHeaders   │                                │
//!        └────────┬─────────┘                                │
//!                 ▼                                          │
//!        ┌──────────────────┐                                │
//!        │  ValidateMethod  │ ── not GET ──────► 405 ──┐     │
//!        └────────┬─────────┘                          │     │
//!                 ▼                                    │     │
//!        ┌──────────────────┐                          │     │
//!        │   ResolvePath    │ ── rejected ─────► 404 ──┤     │
//!        └────────┬─────────┘                          │     │
//!                 ▼                                    │     │
//!        ┌──────────────────┐                          │     │
//!        │     StatFile     │ ── not a file ───► 404 ──┤     │
//!        └────────┬─────────┘                          │     │
//!                 ▼                                    ▼     │
//!        ┌──────────────────┐                                │
//!        │    StreamBody    │ ◄──── error responses (400) ───┤
//!        └────────┬─────────┘                                │
//!                 ▼                                          │
//!        ┌──────────────────┐                                │
//!        │      Closed      │ ◄──────────────────────────────┘
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::net::TcpListener;
//! use std::sync::Arc;
//! use warden::docroot::DocumentRoot;
//! use warden::http::connection::{Connection, ServeContext};
//!
//! fn main() -> anyhow::Result<()> {
//!     let ctx = Arc::new(ServeContext {
//!         root: DocumentRoot::new("./public", "index.html")?,
//!         max_line_len: 4096,
//!     });
//!     let listener = TcpListener::bind("127.0.0.1:8080")?;
//!
//!     loop {
//!         let (socket, peer) = listener.accept()?;
//!         let mut conn = Connection::new(socket, peer, Arc::clone(&ctx));
//!         if let Err(e) = conn.serve() {
//!             eprintln!("Connection error: {}", e);
//!         }
//!     }
//! }
//! ```

pub mod request;
pub mod response;
pub mod parser;
pub mod connection;
pub mod writer;
pub mod mime;

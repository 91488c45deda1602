//! Warden - Confined static file server
//!
//! Serves files from a single document root over plain HTTP/1.0 using a
//! fixed pool of worker threads fed by a bounded connection queue.

pub mod config;
pub mod docroot;
pub mod http;
pub mod server;

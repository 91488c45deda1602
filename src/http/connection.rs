use std::io::{BufReader, Read, Write};
use std::mem;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::docroot::{self, DocumentRoot};
use crate::http::mime;
use crate::http::parser::{self, ParseError};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::{ResponseWriter, TransferError};

/// Read-only settings shared by every connection.
#[derive(Debug, Clone)]
pub struct ServeContext {
    pub root: DocumentRoot,
    pub max_line_len: usize,
}

/// Serves exactly one request on a stream, then stops.
///
/// The stream is closed when the `Connection` is dropped, whichever state
/// it ended in.
pub struct Connection<S> {
    reader: BufReader<S>,
    peer: SocketAddr,
    ctx: Arc<ServeContext>,
    state: ConnectionState,
    /// Set once the request line parses; kept for the access log
    request: Option<Request>,
}

pub enum ConnectionState {
    AwaitRequestLine,
    DrainHeaders,
    ValidateMethod,
    ResolvePath,
    StatFile(PathBuf),
    StreamBody(Response),
    Closed,
}

impl<S: Read + Write> Connection<S> {
    pub fn new(stream: S, peer: SocketAddr, ctx: Arc<ServeContext>) -> Self {
        Self {
            reader: BufReader::new(stream),
            peer,
            ctx,
            state: ConnectionState::AwaitRequestLine,
            request: None,
        }
    }

    /// Drive the state machine until the connection is closed.
    ///
    /// Protocol and lookup failures are answered with an error response and
    /// are not errors here; only a failed or short write is returned.
    pub fn serve(&mut self) -> Result<(), TransferError> {
        loop {
            let state = mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::AwaitRequestLine => self.read_request_line(),

                ConnectionState::DrainHeaders => {
                    match parser::drain_headers(&mut self.reader, self.ctx.max_line_len) {
                        Ok(_) => ConnectionState::ValidateMethod,
                        // Headers are never interpreted, a broken read still gets a reply
                        Err(ParseError::Io(e)) => {
                            tracing::debug!(peer = %self.peer, error = %e, "Header read failed");
                            ConnectionState::ValidateMethod
                        }
                        Err(e) => {
                            tracing::debug!(peer = %self.peer, error = %e, "Rejecting headers");
                            ConnectionState::StreamBody(Response::bad_request())
                        }
                    }
                }

                ConnectionState::ValidateMethod => match &self.request {
                    Some(req) if req.method.is_retrieval() => ConnectionState::ResolvePath,
                    Some(_) => ConnectionState::StreamBody(Response::method_not_allowed()),
                    None => ConnectionState::Closed,
                },

                ConnectionState::ResolvePath => match &self.request {
                    Some(req) => match self.ctx.root.resolve(&req.target) {
                        Ok(path) => ConnectionState::StatFile(path),
                        Err(e) => {
                            tracing::debug!(peer = %self.peer, target = %req.target, error = %e, "Path rejected");
                            ConnectionState::StreamBody(Response::not_found())
                        }
                    },
                    None => ConnectionState::Closed,
                },

                ConnectionState::StatFile(path) => match docroot::open_regular(&path) {
                    Ok((file, len)) => {
                        ConnectionState::StreamBody(Response::file(file, len, mime::content_type(&path)))
                    }
                    Err(e) => {
                        tracing::debug!(peer = %self.peer, error = %e, "File not servable");
                        ConnectionState::StreamBody(Response::not_found())
                    }
                },

                ConnectionState::StreamBody(response) => {
                    self.write_response(response)?;
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    /// The underlying stream, for inspecting what was written.
    pub fn into_inner(self) -> S {
        self.reader.into_inner()
    }

    fn read_request_line(&mut self) -> ConnectionState {
        match parser::read_line(&mut self.reader, self.ctx.max_line_len) {
            Ok(None) => {
                tracing::debug!(peer = %self.peer, "Client closed before sending a request");
                ConnectionState::Closed
            }
            Ok(Some(line)) => match parser::parse_request_line(&line) {
                Ok(req) => {
                    self.request = Some(req);
                    ConnectionState::DrainHeaders
                }
                Err(e) => {
                    tracing::debug!(peer = %self.peer, error = %e, "Malformed request line");
                    ConnectionState::StreamBody(Response::bad_request())
                }
            },
            Err(ParseError::Io(e)) => {
                tracing::debug!(peer = %self.peer, error = %e, "Request line read failed");
                ConnectionState::Closed
            }
            Err(e) => {
                tracing::debug!(peer = %self.peer, error = %e, "Malformed request line");
                ConnectionState::StreamBody(Response::bad_request())
            }
        }
    }

    fn write_response(&mut self, response: Response) -> Result<(), TransferError> {
        let status = response.status.as_u16();
        let (method, target) = self
            .request
            .as_ref()
            .map(|req| (req.method.as_str(), req.target.as_str()))
            .unwrap_or(("-", "-"));

        match ResponseWriter::new(response).write_to_stream(self.reader.get_mut()) {
            Ok(bytes) => {
                tracing::info!(peer = %self.peer, method, target, status, bytes, "Request served");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(peer = %self.peer, method, target, status, error = %e, "Response transfer aborted");
                Err(e)
            }
        }
    }
}

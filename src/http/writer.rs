use std::io::{self, Read, Write};
use thiserror::Error;

use crate::http::response::{Body, Response};

const HTTP_VERSION: &str = "HTTP/1.0";

/// Failure while sending a response.
///
/// Nothing more is sent to the client after either variant; it sees a
/// truncated body (or nothing) and the connection closes.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("body truncated after {sent} of {expected} bytes")]
    Truncated { sent: u64, expected: u64 },

    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

/// Serialize the status line and headers, including the blank line.
pub fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128);

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    for (k, v) in &resp.headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

pub struct ResponseWriter {
    head: Vec<u8>,
    body: Body,
}

impl ResponseWriter {
    pub fn new(response: Response) -> Self {
        Self {
            head: serialize_head(&response),
            body: response.body,
        }
    }

    /// Write the head and the whole body, returning the body bytes sent.
    ///
    /// A file body is copied straight from the file to the stream (the
    /// standard library uses `sendfile` for sockets where it can). If the
    /// file yields fewer bytes than announced, the transfer stops there.
    pub fn write_to_stream<W: Write>(self, stream: &mut W) -> Result<u64, TransferError> {
        stream.write_all(&self.head)?;

        match self.body {
            Body::Bytes(bytes) => {
                stream.write_all(&bytes)?;
                stream.flush()?;
                Ok(bytes.len() as u64)
            }
            Body::File { file, len } => {
                let sent = io::copy(&mut file.take(len), stream)?;
                stream.flush()?;

                if sent < len {
                    return Err(TransferError::Truncated {
                        sent,
                        expected: len,
                    });
                }
                Ok(sent)
            }
        }
    }
}

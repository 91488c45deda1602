use crate::http::request::{Method, Request};
use std::io::{self, BufRead};
use thiserror::Error;

/// Default upper bound for a single request or header line.
pub const MAX_LINE_LEN: usize = 4096;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("request line has {0} tokens, expected 3")]
    InvalidRequestLine(usize),

    #[error("line longer than {0} bytes")]
    LineTooLong(usize),

    #[error("request line is not valid UTF-8")]
    InvalidEncoding,

    #[error("read failed: {0}")]
    Io(#[from] io::Error),
}

/// Read one LF-terminated line of at most `max_len` bytes.
///
/// The terminator and a preceding CR are stripped and do not count toward
/// `max_len`. Returns `Ok(None)` when the peer closed the stream before
/// sending any byte; an unterminated final line is returned as is.
pub fn read_line<R: BufRead>(reader: &mut R, max_len: usize) -> Result<Option<Vec<u8>>, ParseError> {
    let mut line = Vec::new();

    loop {
        let available = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ParseError::Io(e)),
        };

        if available.is_empty() {
            if line.is_empty() {
                return Ok(None);
            }
            break;
        }

        let (chunk, consumed, done) = match available.iter().position(|&b| b == b'\n') {
            Some(idx) => (&available[..idx], idx + 1, true),
            None => (available, available.len(), false),
        };

        // One extra byte leaves room for the CR of a CRLF terminator
        if line.len() + chunk.len() > max_len + 1 {
            return Err(ParseError::LineTooLong(max_len));
        }

        line.extend_from_slice(chunk);
        reader.consume(consumed);

        if done {
            break;
        }
    }

    if line.last() == Some(&b'\r') {
        line.pop();
    }

    if line.len() > max_len {
        return Err(ParseError::LineTooLong(max_len));
    }

    Ok(Some(line))
}

/// Split a request line into exactly three whitespace-separated tokens.
pub fn parse_request_line(line: &[u8]) -> Result<Request, ParseError> {
    let line = std::str::from_utf8(line).map_err(|_| ParseError::InvalidEncoding)?;
    let tokens: Vec<&str> = line.split_whitespace().collect();

    let [method, target, version] = tokens.as_slice() else {
        return Err(ParseError::InvalidRequestLine(tokens.len()));
    };

    Ok(Request {
        method: Method::parse(method),
        target: target.to_string(),
        version: version.to_string(),
    })
}

/// Read and discard header lines up to the blank line that ends them.
///
/// Returns the number of header lines skipped. End of stream counts as the
/// end of the headers.
pub fn drain_headers<R: BufRead>(reader: &mut R, max_len: usize) -> Result<usize, ParseError> {
    let mut skipped = 0;

    while let Some(line) = read_line(reader, max_len)? {
        if line.is_empty() {
            break;
        }
        skipped += 1;
    }

    Ok(skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    #[test]
    fn parse_simple_get() {
        let mut reader = Cursor::new(b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n".to_vec());

        let line = read_line(&mut reader, MAX_LINE_LEN).unwrap().unwrap();
        let parsed = parse_request_line(&line).unwrap();

        assert_eq!(parsed.method, Method::GET);
        assert_eq!(parsed.target, "/");
        assert_eq!(drain_headers(&mut reader, MAX_LINE_LEN).unwrap(), 1);
    }

    #[test]
    fn line_spanning_buffer_refills() {
        // A 4-byte buffer forces several fill_buf calls for one line
        let mut reader = BufReader::with_capacity(4, Cursor::new(b"GET /long/path HTTP/1.0\n".to_vec()));

        let line = read_line(&mut reader, MAX_LINE_LEN).unwrap().unwrap();
        assert_eq!(line, b"GET /long/path HTTP/1.0");
    }
}

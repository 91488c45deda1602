use std::fs::File;

/// Value of the `Server` header on every response.
pub const SERVER_NAME: &str = concat!("warden/", env!("CARGO_PKG_VERSION"));

/// Content type of the built-in error bodies.
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// HTTP status codes the server emits.
///
/// - `Ok` (200): File found and streamed
/// - `BadRequest` (400): Malformed or oversized request line
/// - `NotFound` (404): Missing, non-regular or out-of-root path
/// - `MethodNotAllowed` (405): Anything but GET
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use warden::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
        }
    }
}

/// What follows the header block.
#[derive(Debug)]
pub enum Body {
    /// Literal bytes, used for error responses
    Bytes(Vec<u8>),
    /// An open file and the number of bytes to stream from it
    File { file: File, len: u64 },
}

impl Body {
    pub fn len(&self) -> u64 {
        match self {
            Body::Bytes(bytes) => bytes.len() as u64,
            Body::File { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A complete HTTP response ready to be written to a client.
///
/// Headers keep their insertion order on the wire.
#[derive(Debug)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Header name/value pairs in wire order
    pub headers: Vec<(String, String)>,
    /// Response body
    pub body: Body,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// `build` always emits `Server`, `Content-Type` (when set),
/// `Content-Length` and `Connection: close` first, followed by any extra
/// headers in the order they were added.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .content_type("text/css")
///     .body(b"body {}".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    content_type: Option<String>,
    headers: Vec<(String, String)>,
    body: Body,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: None,
            headers: Vec::new(),
            body: Body::Bytes(Vec::new()),
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Adds an extra header, replacing an earlier one with the same name.
    ///
    /// The framing headers are managed by `build` and cannot be set here.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&key));
        self.headers.push((key, value.into()));
        self
    }

    /// Sets a literal response body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Body::Bytes(body.into());
        self
    }

    /// Streams `len` bytes of `file` as the body.
    pub fn file(mut self, file: File, len: u64) -> Self {
        self.body = Body::File { file, len };
        self
    }

    /// Builds the final Response with the framing headers filled in.
    pub fn build(self) -> Response {
        const MANAGED: [&str; 4] = ["Server", "Content-Type", "Content-Length", "Connection"];

        let mut headers = Vec::with_capacity(4 + self.headers.len());
        headers.push(("Server".to_string(), SERVER_NAME.to_string()));
        if let Some(content_type) = self.content_type {
            headers.push(("Content-Type".to_string(), content_type));
        }
        headers.push(("Content-Length".to_string(), self.body.len().to_string()));
        headers.push(("Connection".to_string(), "close".to_string()));

        headers.extend(
            self.headers
                .into_iter()
                .filter(|(k, _)| !MANAGED.iter().any(|m| k.eq_ignore_ascii_case(m))),
        );

        Response {
            status: self.status,
            headers,
            body: self.body,
        }
    }
}

impl Response {
    /// 200 OK streaming an open file.
    pub fn file(file: File, len: u64, content_type: &str) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .content_type(content_type)
            .file(file, len)
            .build()
    }

    /// 400 Bad Request.
    pub fn bad_request() -> Self {
        ResponseBuilder::new(StatusCode::BadRequest)
            .content_type(TEXT_PLAIN)
            .body(b"Bad Request\n".to_vec())
            .build()
    }

    /// 404 Not Found.
    ///
    /// The body is the same for every cause so clients cannot probe the
    /// document root boundary.
    pub fn not_found() -> Self {
        ResponseBuilder::new(StatusCode::NotFound)
            .content_type(TEXT_PLAIN)
            .body(b"Not Found\n".to_vec())
            .build()
    }

    /// 405 Method Not Allowed, listing GET as the only allowed method.
    pub fn method_not_allowed() -> Self {
        ResponseBuilder::new(StatusCode::MethodNotAllowed)
            .content_type(TEXT_PLAIN)
            .header("Allow", "GET")
            .body(b"Only GET supported\n".to_vec())
            .build()
    }

    /// Looks up a header value by name, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

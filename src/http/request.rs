/// HTTP request methods.
///
/// Only GET is served. Every other method, known or not, is answered with
/// 405 Method Not Allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// PATCH - Partial modification of a resource
    PATCH,
    /// Any other token, kept verbatim for logging
    Extension(String),
}

impl Method {
    /// Parses an HTTP method token, ignoring ASCII case.
    ///
    /// Unknown tokens become [`Method::Extension`].
    ///
    /// # Example
    ///
    /// ```
    /// # use warden::http::request::Method;
    /// assert_eq!(Method::parse("GET"), Method::GET);
    /// assert_eq!(Method::parse("get"), Method::GET);
    /// assert_eq!(Method::parse("BREW"), Method::Extension("BREW".to_string()));
    /// ```
    pub fn parse(s: &str) -> Self {
        const KNOWN: [(&str, Method); 7] = [
            ("GET", Method::GET),
            ("POST", Method::POST),
            ("PUT", Method::PUT),
            ("DELETE", Method::DELETE),
            ("HEAD", Method::HEAD),
            ("OPTIONS", Method::OPTIONS),
            ("PATCH", Method::PATCH),
        ];

        KNOWN
            .into_iter()
            .find(|(name, _)| s.eq_ignore_ascii_case(name))
            .map(|(_, method)| method)
            .unwrap_or_else(|| Method::Extension(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
            Method::Extension(s) => s,
        }
    }

    /// Whether this is the file-retrieval method.
    pub fn is_retrieval(&self) -> bool {
        *self == Method::GET
    }
}

/// A parsed request line.
///
/// Headers are read and discarded by the connection handler, so only the
/// three request-line tokens are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The raw request target, query string included (e.g. "/a.html?v=2")
    pub target: String,
    /// Protocol version token as sent (e.g. "HTTP/1.1")
    pub version: String,
}

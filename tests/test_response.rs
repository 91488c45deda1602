use std::io::Write;
use warden::http::response::{Body, Response, ResponseBuilder, SERVER_NAME, StatusCode, TEXT_PLAIN};
use warden::http::writer::{ResponseWriter, TransferError, serialize_head};

fn header_names(response: &Response) -> Vec<&str> {
    response.headers.iter().map(|(k, _)| k.as_str()).collect()
}

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::MethodNotAllowed.reason_phrase(),
        "Method Not Allowed"
    );
}

#[test]
fn test_response_builder_header_order() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .content_type("text/css")
        .header("X-Custom", "value")
        .body(b"body {}".to_vec())
        .build();

    assert_eq!(
        header_names(&response),
        vec!["Server", "Content-Type", "Content-Length", "Connection", "X-Custom"]
    );
    assert_eq!(response.header("Server"), Some(SERVER_NAME));
    assert_eq!(response.header("connection"), Some("close"));
}

#[test]
fn test_response_builder_auto_content_length() {
    let body = b"This is the body".to_vec();
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(body.clone())
        .build();

    assert_eq!(
        response.header("Content-Length"),
        Some(body.len().to_string().as_str())
    );
}

#[test]
fn test_response_builder_ignores_managed_headers() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Length", "999")
        .header("Connection", "keep-alive")
        .body(b"test".to_vec())
        .build();

    assert_eq!(response.header("Content-Length"), Some("4"));
    assert_eq!(response.header("Connection"), Some("close"));
    assert_eq!(response.headers.len(), 3);
}

#[test]
fn test_response_builder_header_replaces_same_name() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("X-Frame-Options", "SAMEORIGIN")
        .header("x-frame-options", "DENY")
        .build();

    assert_eq!(response.header("X-Frame-Options"), Some("DENY"));
    assert_eq!(
        response
            .headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("X-Frame-Options"))
            .count(),
        1
    );
}

#[test]
fn test_response_builder_empty_body() {
    let response = ResponseBuilder::new(StatusCode::Ok).build();

    assert!(response.body.is_empty());
    assert_eq!(response.header("Content-Length"), Some("0"));
    assert_eq!(response.header("Content-Type"), None);
}

#[test]
fn test_response_builder_file_body_uses_given_length() {
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(b"12345").unwrap();

    let response = ResponseBuilder::new(StatusCode::Ok).file(file, 5).build();

    assert!(matches!(response.body, Body::File { len: 5, .. }));
    assert_eq!(response.header("Content-Length"), Some("5"));
}

#[test]
fn test_response_bad_request_helper() {
    let response = Response::bad_request();

    assert_eq!(response.status, StatusCode::BadRequest);
    assert_eq!(response.header("Content-Type"), Some(TEXT_PLAIN));
    assert!(matches!(&response.body, Body::Bytes(b) if b == b"Bad Request\n"));
}

#[test]
fn test_response_not_found_helper() {
    let response = Response::not_found();

    assert_eq!(response.status, StatusCode::NotFound);
    assert!(matches!(&response.body, Body::Bytes(b) if b == b"Not Found\n"));
}

#[test]
fn test_response_method_not_allowed_helper() {
    let response = Response::method_not_allowed();

    assert_eq!(response.status, StatusCode::MethodNotAllowed);
    assert_eq!(response.header("Allow"), Some("GET"));
    assert!(matches!(&response.body, Body::Bytes(b) if b == b"Only GET supported\n"));
}

#[test]
fn test_serialize_head_wire_format() {
    let head = serialize_head(&Response::not_found());
    let expected = format!(
        "HTTP/1.0 404 Not Found\r\n\
         Server: {}\r\n\
         Content-Type: text/plain; charset=utf-8\r\n\
         Content-Length: 10\r\n\
         Connection: close\r\n\
         \r\n",
        SERVER_NAME
    );

    assert_eq!(String::from_utf8(head).unwrap(), expected);
}

#[test]
fn test_writer_bytes_body() {
    let mut out = Vec::new();
    let sent = ResponseWriter::new(Response::bad_request())
        .write_to_stream(&mut out)
        .unwrap();

    assert_eq!(sent, 12);
    assert!(out.starts_with(b"HTTP/1.0 400 Bad Request\r\n"));
    assert!(out.ends_with(b"\r\n\r\nBad Request\n"));
}

#[test]
fn test_writer_streams_file_body() {
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(b"hello world\n").unwrap();
    let file = reopen_at_start(file);

    let mut out = Vec::new();
    let sent = ResponseWriter::new(Response::file(file, 12, "text/plain"))
        .write_to_stream(&mut out)
        .unwrap();

    assert_eq!(sent, 12);
    assert!(out.ends_with(b"\r\n\r\nhello world\n"));
}

#[test]
fn test_writer_reports_truncated_file() {
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(b"short").unwrap();
    let file = reopen_at_start(file);

    // Announce more bytes than the file holds, as if it shrank after stat
    let mut out = Vec::new();
    let result = ResponseWriter::new(Response::file(file, 100, "text/plain")).write_to_stream(&mut out);

    assert!(matches!(
        result,
        Err(TransferError::Truncated { sent: 5, expected: 100 })
    ));
    assert!(out.ends_with(b"\r\n\r\nshort"));
}

fn reopen_at_start(mut file: std::fs::File) -> std::fs::File {
    use std::io::{Seek, SeekFrom};
    file.seek(SeekFrom::Start(0)).unwrap();
    file
}

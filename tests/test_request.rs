use warden::http::request::{Method, Request};

fn request(method: Method, target: &str) -> Request {
    Request {
        method,
        target: target.to_string(),
        version: "HTTP/1.1".to_string(),
    }
}

#[test]
fn test_method_parse_known_methods() {
    let methods = vec![
        ("GET", Method::GET),
        ("POST", Method::POST),
        ("PUT", Method::PUT),
        ("DELETE", Method::DELETE),
        ("HEAD", Method::HEAD),
        ("OPTIONS", Method::OPTIONS),
        ("PATCH", Method::PATCH),
    ];

    for (method_str, expected) in methods {
        assert_eq!(Method::parse(method_str), expected);
        assert_eq!(expected.as_str(), method_str);
    }
}

#[test]
fn test_method_parse_is_case_insensitive() {
    assert_eq!(Method::parse("get"), Method::GET);
    assert_eq!(Method::parse("GeT"), Method::GET);
    assert_eq!(Method::parse("post"), Method::POST);
}

#[test]
fn test_method_parse_unknown_token() {
    let method = Method::parse("BREW");

    assert_eq!(method, Method::Extension("BREW".to_string()));
    assert_eq!(method.as_str(), "BREW");
    assert!(!method.is_retrieval());
}

#[test]
fn test_only_get_is_retrieval() {
    assert!(Method::GET.is_retrieval());
    assert!(!Method::HEAD.is_retrieval());
    assert!(!Method::POST.is_retrieval());
    assert!(!Method::DELETE.is_retrieval());
}

#[test]
fn test_request_clone() {
    let req = request(Method::GET, "/img/logo.png");
    let cloned = req.clone();

    assert_eq!(req, cloned);
}

use std::path::Path;

use switchyard::http::request::{Method, Request, RequestBuilder};
use switchyard::http::response::{NOT_FOUND_PAGE, StatusCode};
use switchyard::router::app::{METHOD_NOT_SUPPORTED, SERVICE_UNAVAILABLE};
use switchyard::router::{BodyFraming, Route, Router, StaticFiles};
use switchyard::service::echo::FIELD_NOT_FOUND;
use switchyard::service::{ServiceRegistry, register_defaults};

fn router_for(root: &Path) -> Router {
    let mut registry = ServiceRegistry::new();
    register_defaults(&mut registry).unwrap();
    Router::new("/app", registry, StaticFiles::new(root))
}

fn request(method: Method, target: &str, body: Option<&str>) -> Request {
    let mut builder = RequestBuilder::new().method(method).target(target);
    if let Some(body) = body {
        builder = builder.body(body);
    }
    builder.build().unwrap()
}

fn body(response: &switchyard::http::response::Response) -> String {
    String::from_utf8(response.body_bytes().to_vec()).unwrap()
}

#[test]
fn test_classify_by_prefix() {
    let router = router_for(Path::new("/srv"));

    assert_eq!(router.classify("/app"), Route::App);
    assert_eq!(router.classify("/app/hello?name=x"), Route::App);
    assert_eq!(router.classify("/apple.html"), Route::App);
    assert_eq!(router.classify("/index.html"), Route::Static);
    assert_eq!(router.classify("/"), Route::Static);
}

#[test]
fn test_body_framing_is_asymmetric() {
    let router = router_for(Path::new("/srv"));

    assert_eq!(router.body_framing(&Method::POST, "/app"), BodyFraming::ContentLength);
    assert_eq!(router.body_framing(&Method::POST, "/form"), BodyFraming::UntilBlankLine);
    assert_eq!(router.body_framing(&Method::GET, "/app"), BodyFraming::None);
    assert_eq!(router.body_framing(&Method::GET, "/index.html"), BodyFraming::None);
}

#[test]
fn test_body_framing_method_case() {
    let router = router_for(Path::new("/srv"));
    let lower_post = Method::parse("post");

    assert_eq!(router.body_framing(&lower_post, "/app"), BodyFraming::ContentLength);
    assert_eq!(router.body_framing(&lower_post, "/form"), BodyFraming::None);
}

#[tokio::test]
async fn test_app_methods_ignore_case() {
    let router = router_for(Path::new("/srv"));

    let hello = router
        .route(&request(Method::parse("get"), "/app?name=Ana", None))
        .await;
    assert_eq!(body(&hello), "Hola, Ana");

    let echo = router
        .route(&request(Method::parse("Post"), "/app", Some(r#"{"text":"hi"}"#)))
        .await;
    assert_eq!(body(&echo), "Echo: hi");

    let static_get = router
        .route(&request(Method::parse("get"), "/index.html", None))
        .await;
    assert_eq!(static_get.status, StatusCode::MethodNotAllowed);
}

#[tokio::test]
async fn test_app_get_goes_to_hello() {
    let router = router_for(Path::new("/srv"));

    let response = router
        .route(&request(Method::GET, "/app/hello?name=Ana%20Mar%C3%ADa", None))
        .await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.header("Content-Type"), Some("text/plain"));
    assert_eq!(body(&response), "Hola, Ana María");
}

#[tokio::test]
async fn test_app_post_goes_to_echo() {
    let router = router_for(Path::new("/srv"));

    let ok = router
        .route(&request(Method::POST, "/app", Some(r#"{"text":"ping"}"#)))
        .await;
    assert_eq!(body(&ok), "Echo: ping");

    let missing = router.route(&request(Method::POST, "/app", None)).await;
    assert_eq!(missing.status, StatusCode::Ok);
    assert_eq!(body(&missing), format!("Echo: {}", FIELD_NOT_FOUND));
}

#[tokio::test]
async fn test_app_other_method() {
    let router = router_for(Path::new("/srv"));

    let response = router
        .route(&request(Method::Other("PUT".to_string()), "/app", None))
        .await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(body(&response), METHOD_NOT_SUPPORTED);
}

#[tokio::test]
async fn test_app_missing_service() {
    let router = Router::new("/app", ServiceRegistry::new(), StaticFiles::new("/srv"));

    let response = router.route(&request(Method::GET, "/app?name=x", None)).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(body(&response), SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_static_get_serves_file() {
    let root = tempfile::tempdir().unwrap();
    let page = "<html><body>hi</body></html>";
    std::fs::write(root.path().join("index.html"), page).unwrap();
    let router = router_for(root.path());

    let response = router.route(&request(Method::GET, "/index.html", None)).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.header("Content-Type"), Some("text/html"));
    assert_eq!(response.header("Content-Length"), Some(page.len().to_string().as_str()));
    assert_eq!(response.body_bytes(), page.as_bytes());
}

#[tokio::test]
async fn test_static_directory_serves_index() {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir(root.path().join("docs")).unwrap();
    std::fs::write(root.path().join("index.html"), "root").unwrap();
    std::fs::write(root.path().join("docs").join("index.html"), "docs").unwrap();
    let router = router_for(root.path());

    let top = router.route(&request(Method::GET, "/", None)).await;
    assert_eq!(top.body_bytes(), b"root");

    let nested = router.route(&request(Method::GET, "/docs?page=2", None)).await;
    assert_eq!(nested.body_bytes(), b"docs");
}

#[tokio::test]
async fn test_static_binary_file_is_byte_identical() {
    let root = tempfile::tempdir().unwrap();
    let png: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];
    std::fs::write(root.path().join("logo.png"), &png).unwrap();
    let router = router_for(root.path());

    let response = router.route(&request(Method::GET, "/logo.png", None)).await;

    assert_eq!(response.header("Content-Type"), Some("image/png"));
    assert_eq!(response.body_bytes(), png.as_slice());
}

#[tokio::test]
async fn test_static_missing_file_is_404() {
    let root = tempfile::tempdir().unwrap();
    let router = router_for(root.path());

    let response = router.route(&request(Method::GET, "/nope.html", None)).await;

    assert_eq!(response.status, StatusCode::NotFound);
    assert_eq!(response.header("Content-Type"), Some("text/html"));
    assert_eq!(response.header("Content-Length"), None);
    assert_eq!(body(&response), NOT_FOUND_PAGE);
}

#[tokio::test]
async fn test_static_traversal_is_404() {
    let outer = tempfile::tempdir().unwrap();
    let root = outer.path().join("www");
    std::fs::create_dir(&root).unwrap();
    std::fs::write(outer.path().join("secret.txt"), "top secret").unwrap();
    let router = router_for(&root);

    let response = router.route(&request(Method::GET, "/../secret.txt", None)).await;

    assert_eq!(response.status, StatusCode::NotFound);
    assert!(!body(&response).contains("top secret"));
}

#[tokio::test]
async fn test_static_post_acknowledges_payload() {
    let router = router_for(Path::new("/srv"));

    let response = router
        .route(&request(Method::POST, "/form", Some("name=<b>x</b>")))
        .await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.header("Content-Type"), Some("text/html"));
    let html = body(&response);
    assert!(html.contains("<h1>POST data received:</h1>"));
    assert!(html.contains("<p>name=&lt;b&gt;x&lt;/b&gt;</p>"));
}

#[tokio::test]
async fn test_static_other_method_not_allowed() {
    let router = router_for(Path::new("/srv"));

    let response = router
        .route(&request(Method::Other("DELETE".to_string()), "/index.html", None))
        .await;

    assert_eq!(response.status, StatusCode::MethodNotAllowed);
}

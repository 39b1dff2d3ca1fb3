//! The comic endpoints behind the full middleware stack served by the binary

mod support;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::json;
use support::TestApp;

fn comic_with_image(image: String) -> serde_json::Value {
    json!({
        "title": "Big Panels",
        "description": "Oversized artwork.",
        "author": "Keiko Jansen",
        "date": "2023-08-08",
        "image": image,
    })
}

#[tokio::test]
async fn large_upload_within_configured_limit_is_stored() {
    let app = TestApp::layered();
    let png = vec![0x89u8; 3 * 1024 * 1024];
    let image = format!("data:image/png;base64,{}", STANDARD.encode(&png));

    let response = app.post("/comics", comic_with_image(image)).await;
    assert_eq!(response.status, StatusCode::CREATED);

    let reference = response.json()["image"]
        .as_str()
        .expect("image stored")
        .to_string();
    let stored = std::fs::read(app.assets.path().join(&reference)).expect("asset written");
    assert_eq!(stored.len(), png.len());
}

#[tokio::test]
async fn upload_over_configured_limit_is_refused() {
    let app = TestApp::layered();
    let image = STANDARD.encode(vec![0u8; 9 * 1024 * 1024]);

    let response = app.post("/comics", comic_with_image(image)).await;
    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn preflight_reaches_options_handlers() {
    let app = TestApp::layered();

    for (uri, allow) in [
        ("/comics".to_string(), "GET, POST, OPTIONS"),
        (
            format!("/comics/{}", comics_api::ids::ComicId::new()),
            "GET, PUT, DELETE, OPTIONS",
        ),
    ] {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(&uri)
            .header(header::ORIGIN, "http://client.test")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();

        let response = app.send(request).await;
        assert_eq!(response.status, StatusCode::NO_CONTENT, "{uri}");
        assert_eq!(response.header(header::ALLOW), Some(allow));
        assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_METHODS), Some(allow));
        assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
    }
}

#[tokio::test]
async fn plain_options_lists_methods() {
    let app = TestApp::layered();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/comics")
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_eq!(response.header(header::ALLOW), Some("GET, POST, OPTIONS"));
}

#[tokio::test]
async fn cross_origin_get_carries_cors_and_request_id() {
    let app = TestApp::layered();
    let request = Request::builder()
        .uri("/comics")
        .header(header::ACCEPT, "application/json")
        .header(header::ORIGIN, "http://client.test")
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
    assert!(response
        .header(header::HeaderName::from_static("x-request-id"))
        .is_some_and(|id| id.starts_with("req_")));
}

#[tokio::test]
async fn non_json_accept_is_refused() {
    let app = TestApp::layered();
    let request = Request::builder()
        .uri("/comics")
        .header(header::ACCEPT, "text/html")
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status, StatusCode::NOT_ACCEPTABLE);
    assert_eq!(response.json()["error"], "Webservice only supports json.");
}

#[tokio::test]
async fn seed_path_is_not_a_comic() {
    let app = TestApp::layered();

    for method in [Method::GET, Method::PUT, Method::DELETE] {
        let response = app
            .send(support::json_request(method.clone(), "/comics/seed", None))
            .await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{method}");
        assert_eq!(response.json()["error"], "Comic not found");
    }
}

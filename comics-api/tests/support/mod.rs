//! Shared helpers for driving the router in-process

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use comics_api::prelude::*;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const HOST: &str = "comics.test";
pub const ROOT: &str = "http://comics.test/comics";

/// A router over a fresh store with assets in a temporary directory
pub struct TestApp {
    pub router: Router,
    pub assets: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
}

impl TestResponse {
    /// Parsed JSON body; `Null` when the body is empty
    pub fn json(&self) -> Value {
        if self.bytes.is_empty() {
            return Value::Null;
        }
        serde_json::from_slice(&self.bytes).expect("response body is JSON")
    }

    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub fn test_config(assets: &TempDir) -> Config {
    let mut config = Config::default();
    config.comics.assets_dir = assets.path().to_path_buf();
    config
}

impl TestApp {
    pub fn new() -> Self {
        let assets = TempDir::new().expect("temp dir");
        let router = router(AppState::in_memory(test_config(&assets)));
        Self { router, assets }
    }

    /// Router wrapped in the full middleware stack the binary serves
    pub fn layered() -> Self {
        let assets = TempDir::new().expect("temp dir");
        let config = test_config(&assets);
        let app = router(AppState::in_memory(config.clone()));
        Self {
            router: Server::new(config).layered(app),
            assets,
        }
    }

    /// Router over a caller-supplied store
    pub fn with_store<R: ComicRepository>(store: R) -> Self {
        let assets = TempDir::new().expect("temp dir");
        let state = AppState::<R>::builder()
            .config(test_config(&assets))
            .comics(store)
            .build()
            .expect("state builds");
        Self {
            router: router(state),
            assets,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body collects")
            .to_vec();

        TestResponse {
            status,
            headers,
            bytes,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(json_request(Method::GET, uri, None)).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(json_request(Method::POST, uri, Some(body))).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.send(json_request(Method::PUT, uri, Some(body))).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(json_request(Method::DELETE, uri, None)).await
    }

    pub async fn seed(&self, amount: u32) -> Vec<Value> {
        let response = self
            .post("/comics/seed", serde_json::json!({ "amount": amount }))
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.json().as_array().cloned().expect("seed returns a list")
    }

    /// Create a comic and return its JSON representation
    pub async fn create(&self, title: &str, author: &str, date: &str) -> Value {
        let response = self
            .post(
                "/comics",
                serde_json::json!({
                    "title": title,
                    "description": format!("{title} in print"),
                    "author": author,
                    "date": date,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.json()
    }
}

/// Request accepted by the JSON gate, addressed to [`HOST`]
pub fn json_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, HOST)
        .header(header::ACCEPT, "application/json");

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds"),
        None => builder.body(Body::empty()).expect("request builds"),
    }
}

/// Strip [`ROOT`]'s origin so an absolute href can be replayed in-process
pub fn path_of(href: &str) -> &str {
    href.strip_prefix("http://comics.test").unwrap_or(href)
}

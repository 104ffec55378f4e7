//! Shared fixtures for the HTTP integration tests

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use http_body_util::BodyExt;
use reel_core::seed::load_catalog;
use reel_core::{MovieCatalog, ReelConfig};
use reel_web::{AppState, CorsPolicy, build_router};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const ALLOWED_ORIGIN: &str = "http://localhost:53761";
pub const GODFATHER_ID: &str = "7ccfca79-08fd-4942-839c-2e60eaadd2e6";

/// Router plus a handle on its catalog for out-of-band assertions.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn seeded() -> Self {
        Self::with_catalog(load_catalog(None).unwrap())
    }

    pub fn empty() -> Self {
        Self::with_catalog(MovieCatalog::new())
    }

    fn with_catalog(catalog: MovieCatalog) -> Self {
        let config = ReelConfig::for_testing();
        let cors = CorsPolicy::from_config(&config.cors).unwrap();
        let state = AppState::new(catalog, cors);
        Self {
            router: build_router(state.clone()),
            state,
        }
    }

    pub fn movie_count(&self) -> usize {
        self.state.catalog.read().len()
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(request(Method::GET, uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str) -> Response<Body> {
        self.send(request(Method::DELETE, uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, payload: &Value) -> Response<Body> {
        self.send(json_request(Method::POST, uri, payload)).await
    }

    pub async fn patch_json(&self, uri: &str, payload: &Value) -> Response<Body> {
        self.send(json_request(Method::PATCH, uri, payload)).await
    }
}

pub fn request(method: Method, uri: &str) -> axum::http::request::Builder {
    Request::builder().method(method).uri(uri)
}

pub fn json_request(method: Method, uri: &str, payload: &Value) -> Request<Body> {
    request(method, uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub fn inception_payload() -> Value {
    json!({
        "title": "Inception",
        "year": 2010,
        "director": "Christopher Nolan",
        "duration": 148,
        "poster": "https://example.com/inception.jpg",
        "genre": ["Action", "Thriller"],
        "rate": 8.8
    })
}

pub fn titles(movies: &Value) -> Vec<String> {
    movies
        .as_array()
        .unwrap()
        .iter()
        .map(|movie| movie["title"].as_str().unwrap().to_string())
        .collect()
}

//! Origin gating across every route

use axum::body::Body;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ORIGIN,
};
use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::support::{
    ALLOWED_ORIGIN, GODFATHER_ID, TestApp, body_bytes, body_json, inception_payload,
    json_request, request,
};

const EVIL_ORIGIN: &str = "http://evil.example";

#[tokio::test]
async fn request_without_origin_passes() {
    let app = TestApp::seeded();

    let response = app.get("/movies").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn allowed_origin_gets_permission_header() {
    let app = TestApp::seeded();

    let response = app
        .send(
            request(Method::GET, "/movies")
                .header(ORIGIN, ALLOWED_ORIGIN)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        ALLOWED_ORIGIN
    );
    assert_eq!(response.headers().get("vary").unwrap(), "Origin");
}

#[tokio::test]
async fn allowed_origin_header_on_error_responses() {
    let app = TestApp::seeded();

    let response = app
        .send(
            request(Method::GET, "/movies/not-a-uuid")
                .header(ORIGIN, ALLOWED_ORIGIN)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        ALLOWED_ORIGIN
    );
}

#[tokio::test]
async fn disallowed_origin_is_forbidden() {
    let app = TestApp::seeded();

    let response = app
        .send(
            request(Method::GET, "/movies")
                .header(ORIGIN, EVIL_ORIGIN)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    assert_eq!(
        body_json(response).await,
        json!({ "message": "Not allowed by CORS" })
    );
}

#[tokio::test]
async fn disallowed_origin_never_reaches_handler() {
    let app = TestApp::seeded();

    let mut create = json_request(Method::POST, "/movies", &inception_payload());
    create
        .headers_mut()
        .insert(ORIGIN, EVIL_ORIGIN.parse().unwrap());
    assert_eq!(app.send(create).await.status(), StatusCode::FORBIDDEN);

    let delete = request(Method::DELETE, &format!("/movies/{GODFATHER_ID}"))
        .header(ORIGIN, EVIL_ORIGIN)
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.send(delete).await.status(), StatusCode::FORBIDDEN);

    assert_eq!(app.movie_count(), 10);
}

#[tokio::test]
async fn origin_match_is_exact() {
    let app = TestApp::seeded();

    for origin in ["http://localhost:53761/", "https://localhost:53761", "http://localhost:5376"] {
        let response = app
            .send(
                request(Method::GET, "/movies")
                    .header(ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "origin={origin}");
    }
}

#[tokio::test]
async fn options_echoes_permissions_for_allowed_origin() {
    let app = TestApp::seeded();

    let response = app
        .send(
            request(Method::OPTIONS, &format!("/movies/{GODFATHER_ID}"))
                .header(ORIGIN, ALLOWED_ORIGIN)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), ALLOWED_ORIGIN);
    let methods = headers
        .get(ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap();
    for method in ["GET", "POST", "PUT", "DELETE", "PATCH"] {
        assert!(methods.contains(method), "missing {method} in {methods}");
    }
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn options_without_origin_has_no_permissions() {
    let app = TestApp::seeded();

    let response = app
        .send(
            request(Method::OPTIONS, &format!("/movies/{GODFATHER_ID}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    assert!(response.headers().get(ACCESS_CONTROL_ALLOW_METHODS).is_none());
}

#[tokio::test]
async fn browser_preflight_is_answered_for_any_path() {
    let app = TestApp::seeded();

    let response = app
        .send(
            request(Method::OPTIONS, "/movies")
                .header(ORIGIN, ALLOWED_ORIGIN)
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let headers = response.headers();
    assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), ALLOWED_ORIGIN);
    assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_HEADERS).unwrap(), "content-type");
}

#[tokio::test]
async fn preflight_from_disallowed_origin_is_forbidden() {
    let app = TestApp::seeded();

    let response = app
        .send(
            request(Method::OPTIONS, "/movies")
                .header(ORIGIN, EVIL_ORIGIN)
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

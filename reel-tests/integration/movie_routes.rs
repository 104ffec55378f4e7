//! Movie collection and single-record routes

use axum::body::Body;
use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use crate::support::{
    GODFATHER_ID, TestApp, body_bytes, body_json, inception_payload, request, titles,
};

// ── GET / ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn root_says_hello() {
    let app = TestApp::empty();

    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "message": "Hello World!" }));
}

#[tokio::test]
async fn responses_do_not_advertise_framework() {
    let app = TestApp::seeded();

    let response = app.get("/movies").await;
    assert!(response.headers().get("x-powered-by").is_none());
    assert!(
        response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("application/json")
    );
}

// ── GET /movies ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_returns_seed_in_order() {
    let app = TestApp::seeded();

    let response = app.get("/movies").await;
    assert_eq!(response.status(), StatusCode::OK);

    let movies = body_json(response).await;
    let titles = titles(&movies);
    assert_eq!(titles.len(), 10);
    assert_eq!(titles[0], "The Godfather");
    assert_eq!(titles[9], "The Shining");
    assert_eq!(movies[0]["id"], GODFATHER_ID);
}

#[tokio::test]
async fn list_on_empty_catalog_is_empty_array() {
    let app = TestApp::empty();

    let response = app.get("/movies").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn genre_filter_ignores_case() {
    let app = TestApp::seeded();

    for query in ["drama", "Drama", "DRAMA"] {
        let movies = body_json(app.get(&format!("/movies?genre={query}")).await).await;
        let movies = movies.as_array().unwrap();
        assert_eq!(movies.len(), 8, "genre={query}");
        assert!(
            movies
                .iter()
                .all(|movie| movie["genre"].as_array().unwrap().contains(&json!("Drama")))
        );
    }
}

#[tokio::test]
async fn genre_filter_keeps_catalog_order() {
    let app = TestApp::seeded();

    let movies = body_json(app.get("/movies?genre=crime").await).await;
    assert_eq!(
        titles(&movies),
        vec!["The Godfather", "The Dark Knight", "Pulp Fiction"]
    );
}

#[tokio::test]
async fn repeated_genre_uses_first_value() {
    let app = TestApp::seeded();

    let response = app.get("/movies?genre=horror&genre=drama").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(titles(&body_json(response).await), vec!["The Shining"]);

    let response = app.get("/movies?genre=mystery&sort=year").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(titles(&body_json(response).await), vec!["Shutter Island"]);
}

#[tokio::test]
async fn unknown_or_empty_genre_filter() {
    let app = TestApp::seeded();

    let response = app.get("/movies?genre=western").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));

    let movies = body_json(app.get("/movies?genre=").await).await;
    assert_eq!(movies.as_array().unwrap().len(), 10);
}

// ── GET /movies/{id} ──────────────────────────────────────────────────────────

#[tokio::test]
async fn get_existing_movie() {
    let app = TestApp::seeded();

    let response = app.get(&format!("/movies/{GODFATHER_ID}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let movie = body_json(response).await;
    assert_eq!(movie["title"], "The Godfather");
    assert_eq!(movie["year"], 1972);
    assert_eq!(movie["genre"], json!(["Crime", "Drama"]));
}

#[tokio::test]
async fn get_unknown_movie_is_not_found() {
    let app = TestApp::seeded();

    let response = app.get(&format!("/movies/{}", Uuid::new_v4())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({ "message": "Movie not found" })
    );
}

#[tokio::test]
async fn get_malformed_id_is_not_found() {
    let app = TestApp::seeded();

    for id in ["not-a-uuid", "7CCFCA79-08FD-4942-839C-2E60EAADD2E6"] {
        let response = app.get(&format!("/movies/{id}")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "id={id}");
    }
}

// ── POST /movies ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_fetch_and_list() {
    let app = TestApp::seeded();

    let response = app.post_json("/movies", &inception_payload()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert!(Uuid::parse_str(&id).is_ok());
    assert_eq!(created["title"], "Inception");
    assert_eq!(created["rate"], 8.8);

    let fetched = body_json(app.get(&format!("/movies/{id}")).await).await;
    assert_eq!(fetched, created);

    let movies = body_json(app.get("/movies").await).await;
    let movies = movies.as_array().unwrap();
    assert_eq!(movies.len(), 11);
    assert_eq!(movies.last().unwrap(), &created);
}

#[tokio::test]
async fn create_defaults_rate_and_drops_unknown_fields() {
    let app = TestApp::empty();
    let mut payload = inception_payload();
    payload.as_object_mut().unwrap().remove("rate");
    payload["id"] = json!("00000000-0000-4000-8000-000000000000");
    payload["studio"] = json!("Warner Bros.");

    let created = body_json(app.post_json("/movies", &payload).await).await;
    assert_eq!(created["rate"], 0.0);
    assert!(created.get("studio").is_none());
    assert_ne!(created["id"], "00000000-0000-4000-8000-000000000000");
}

#[tokio::test]
async fn create_echoes_whole_rating_as_integer() {
    let app = TestApp::empty();
    let mut payload = inception_payload();
    payload["rate"] = json!(8);

    let response = app.post_json("/movies", &payload).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains(r#""rate":8}"#), "{body}");
}

#[tokio::test]
async fn create_without_title_is_unprocessable() {
    let app = TestApp::seeded();
    let mut payload = inception_payload();
    payload.as_object_mut().unwrap().remove("title");

    let response = app.post_json("/movies", &payload).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let report = body_json(response).await;
    assert_eq!(report["name"], "ValidationError");
    let issues = report["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["path"], json!(["title"]));
    assert_eq!(issues[0]["message"], "Title is required");

    assert_eq!(app.movie_count(), 10);
}

#[tokio::test]
async fn create_reports_every_violation() {
    let app = TestApp::empty();
    let payload = json!({
        "title": "",
        "year": 1850,
        "director": "Nobody",
        "duration": -5,
        "poster": "not a url",
        "genre": ["Drama", "Western"],
        "rate": 11
    });

    let response = app.post_json("/movies", &payload).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let report = body_json(response).await;
    let paths: Vec<_> = report["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|issue| issue["path"][0].as_str().unwrap().to_string())
        .collect();
    for field in ["title", "year", "duration", "poster", "genre", "rate"] {
        assert!(paths.iter().any(|path| path == field), "missing {field}");
    }
    assert_eq!(app.movie_count(), 0);
}

#[tokio::test]
async fn create_with_malformed_json_is_bad_request() {
    let app = TestApp::seeded();

    let response = app
        .send(
            request(Method::POST, "/movies")
                .header("content-type", "application/json")
                .body(Body::from("{\"title\": "))
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["message"].is_string());
    assert_eq!(app.movie_count(), 10);
}

// ── DELETE /movies/{id} ───────────────────────────────────────────────────────

#[tokio::test]
async fn delete_then_not_found() {
    let app = TestApp::seeded();
    let uri = format!("/movies/{GODFATHER_ID}");

    let response = app.delete(&uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(response).await.is_empty());

    assert_eq!(app.get(&uri).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.delete(&uri).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.movie_count(), 9);
}

#[tokio::test]
async fn delete_keeps_order_of_remaining_movies() {
    let app = TestApp::seeded();
    let before = titles(&body_json(app.get("/movies").await).await);

    let dark_knight = body_json(app.get("/movies").await).await[2]["id"]
        .as_str()
        .unwrap()
        .to_string();
    app.delete(&format!("/movies/{dark_knight}")).await;

    let after = titles(&body_json(app.get("/movies").await).await);
    let mut expected = before.clone();
    expected.remove(2);
    assert_eq!(after, expected);

    // Positions after the removed record must still resolve.
    let last = body_json(app.get("/movies").await).await[8]["id"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(
        app.get(&format!("/movies/{last}")).await.status(),
        StatusCode::OK
    );
}

// ── PATCH /movies/{id} ────────────────────────────────────────────────────────

#[tokio::test]
async fn patch_merges_over_existing_record() {
    let app = TestApp::seeded();
    let uri = format!("/movies/{GODFATHER_ID}");

    let response = app.patch_json(&uri, &json!({ "rate": 9.5 })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await;
    assert_eq!(updated["rate"], 9.5);
    assert_eq!(updated["title"], "The Godfather");
    assert_eq!(updated["id"], GODFATHER_ID);

    assert_eq!(body_json(app.get(&uri).await).await, updated);
}

#[tokio::test]
async fn patch_with_empty_object_returns_record_unchanged() {
    let app = TestApp::seeded();
    let uri = format!("/movies/{GODFATHER_ID}");
    let before = body_json(app.get(&uri).await).await;

    let response = app.patch_json(&uri, &json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, before);
}

#[tokio::test]
async fn patch_cannot_change_id() {
    let app = TestApp::seeded();
    let uri = format!("/movies/{GODFATHER_ID}");

    let response = app
        .patch_json(&uri, &json!({ "id": Uuid::new_v4().to_string() }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], GODFATHER_ID);
}

#[tokio::test]
async fn patch_with_invalid_year_is_bad_request() {
    let app = TestApp::seeded();
    let uri = format!("/movies/{GODFATHER_ID}");
    let before = body_json(app.get(&uri).await).await;

    let response = app.patch_json(&uri, &json!({ "year": 1899 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let report = body_json(response).await;
    assert_eq!(report["issues"][0]["path"], json!(["year"]));
    assert_eq!(report["issues"][0]["code"], "too_small");
    assert_eq!(
        report["issues"][0]["message"],
        "Number must be greater than or equal to 1900"
    );

    assert_eq!(body_json(app.get(&uri).await).await, before);
}

#[tokio::test]
async fn patch_validates_before_lookup() {
    let app = TestApp::seeded();
    let uri = format!("/movies/{}", Uuid::new_v4());

    let invalid = app.patch_json(&uri, &json!({ "rate": 12 })).await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let valid = app.patch_json(&uri, &json!({ "rate": 5 })).await;
    assert_eq!(valid.status(), StatusCode::NOT_FOUND);
}

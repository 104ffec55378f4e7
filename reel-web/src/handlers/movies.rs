//! Movie collection and single-record handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::header::ORIGIN;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use reel_core::validation::{validate_movie, validate_partial_movie};
use reel_core::{MovieId, MovieRecord};
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::server::AppState;

/// `GET /movies`
///
/// Filters on the first `genre` parameter, ignoring case. An empty value
/// means no filter, and any other query parameters are ignored.
pub async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Vec<MovieRecord>> {
    let genre = genre_filter(&params);
    let movies = state.catalog.read().list(genre);
    Json(movies)
}

/// `GET /movies/{id}`
///
/// # Errors
///
/// - `ApiError::MovieNotFound` - If no record has the identifier
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MovieRecord>, ApiError> {
    let id = parse_id(&id)?;
    let movie = state.catalog.read().get(id).cloned();
    movie.map(Json).ok_or(ApiError::MovieNotFound)
}

/// `POST /movies`
///
/// # Errors
///
/// - `ApiError::MalformedBody` - If the body is not JSON
/// - `ApiError::UnprocessableMovie` - If the payload fails full-schema validation
pub async fn create_movie(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<MovieRecord>), ApiError> {
    let Json(payload) = payload?;
    let draft = validate_movie(&payload).map_err(|report| {
        debug!(%report, "Rejected movie payload");
        ApiError::UnprocessableMovie(report)
    })?;

    let movie = state.catalog.write().create(draft);
    Ok((StatusCode::CREATED, Json(movie)))
}

/// `DELETE /movies/{id}`
///
/// # Errors
///
/// - `ApiError::MovieNotFound` - If no record has the identifier
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let removed = state.catalog.write().delete(id);
    removed
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(ApiError::MovieNotFound)
}

/// `PATCH /movies/{id}`
///
/// The payload is validated before the lookup, so an invalid payload is a
/// bad request even when the identifier is unknown.
///
/// # Errors
///
/// - `ApiError::MalformedBody` - If the body is not JSON
/// - `ApiError::InvalidUpdate` - If a present field violates its rule
/// - `ApiError::MovieNotFound` - If no record has the identifier
pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MovieRecord>, ApiError> {
    let Json(payload) = payload?;
    let patch = validate_partial_movie(&payload).map_err(|report| {
        debug!(%report, "Rejected movie update");
        ApiError::InvalidUpdate(report)
    })?;

    let id = parse_id(&id)?;
    let updated = state.catalog.write().update(id, patch);
    updated.map(Json).ok_or(ApiError::MovieNotFound)
}

/// `OPTIONS /movies/{id}`
///
/// Echoes permission headers for an allowed origin. The body is always empty.
pub async fn movie_options(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    (
        StatusCode::OK,
        state.cors.permission_headers(headers.get(ORIGIN)),
    )
}

fn genre_filter(params: &[(String, String)]) -> Option<&str> {
    params
        .iter()
        .find(|(key, _)| key == "genre")
        .map(|(_, genre)| genre.as_str())
        .filter(|genre| !genre.is_empty())
}

fn parse_id(id: &str) -> Result<MovieId, ApiError> {
    MovieId::parse(id).ok_or(ApiError::MovieNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_genre_filter_takes_first_value() {
        let query = params(&[("genre", "drama"), ("genre", "crime")]);
        assert_eq!(genre_filter(&query), Some("drama"));
    }

    #[test]
    fn test_genre_filter_ignores_other_and_empty_params() {
        assert_eq!(genre_filter(&params(&[("sort", "year")])), None);
        assert_eq!(genre_filter(&params(&[("genre", "")])), None);
        assert_eq!(genre_filter(&[]), None);
    }
}

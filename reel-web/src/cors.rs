//! Cross-origin request gating
//!
//! Requests without an `Origin` header pass through untouched. Requests
//! whose origin is on the allow-list get permission headers on the way out;
//! every other origin is rejected before routing. Browser preflights from
//! allowed origins are answered here for any path.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN, VARY,
};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use reel_core::config::CorsConfig;
use reel_core::{ReelError, Result};
use tracing::{debug, warn};

use crate::error::ApiError;

/// Methods advertised to allowed origins.
pub const PERMITTED_METHODS: &str = "GET, POST, PUT, DELETE, PATCH";

/// Exact-match origin allow-list.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origins: Vec<HeaderValue>,
}

impl CorsPolicy {
    /// Builds a policy from origin strings.
    ///
    /// # Errors
    ///
    /// - `ReelError::Configuration` - If an origin is a wildcard or not a valid header value
    pub fn new<I, S>(origins: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed_origins = origins
            .into_iter()
            .map(|origin| {
                let origin = origin.as_ref().trim();
                if origin == "*" {
                    return Err(ReelError::Configuration {
                        reason: "wildcard origin is not supported, list origins explicitly"
                            .to_string(),
                    });
                }
                HeaderValue::from_str(origin).map_err(|e| ReelError::Configuration {
                    reason: format!("invalid allowed origin '{origin}': {e}"),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { allowed_origins })
    }

    /// Builds a policy from the configured allow-list.
    ///
    /// # Errors
    ///
    /// - `ReelError::Configuration` - If a configured origin is unusable
    pub fn from_config(config: &CorsConfig) -> Result<Self> {
        Self::new(&config.allowed_origins)
    }

    /// Checks `origin` against the allow-list. Comparison is exact.
    pub fn is_allowed(&self, origin: &HeaderValue) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }

    /// Permission headers for `origin`, empty when the origin is not allowed.
    pub fn permission_headers(&self, origin: Option<&HeaderValue>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(origin) = origin
            && self.is_allowed(origin)
        {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
            headers.insert(
                ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(PERMITTED_METHODS),
            );
        }
        headers
    }

    fn preflight_response(&self, origin: &HeaderValue, request: &Request) -> Response {
        let mut headers = self.permission_headers(Some(origin));
        headers.insert(VARY, HeaderValue::from_static("Origin"));
        if let Some(requested) = request.headers().get(ACCESS_CONTROL_REQUEST_HEADERS) {
            headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
        }
        (StatusCode::NO_CONTENT, headers).into_response()
    }
}

/// Middleware enforcing a [`CorsPolicy`] ahead of routing.
pub async fn cors_gate(
    State(policy): State<Arc<CorsPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(origin) = request.headers().get(ORIGIN).cloned() else {
        return next.run(request).await;
    };

    if !policy.is_allowed(&origin) {
        warn!(
            origin = ?origin,
            method = %request.method(),
            path = %request.uri().path(),
            "Rejected cross-origin request"
        );
        return ApiError::OriginRejected.into_response();
    }

    if is_preflight(&request) {
        debug!(origin = ?origin, path = %request.uri().path(), "Answering preflight");
        return policy.preflight_response(&origin, &request);
    }

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.append(VARY, HeaderValue::from_static("Origin"));
    response
}

fn is_preflight(request: &Request) -> bool {
    request.method() == Method::OPTIONS
        && request.headers().contains_key(ACCESS_CONTROL_REQUEST_METHOD)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> CorsPolicy {
        CorsPolicy::new(["http://localhost:53761"]).unwrap()
    }

    #[test]
    fn test_origin_match_is_exact() {
        let policy = policy();

        assert!(policy.is_allowed(&HeaderValue::from_static("http://localhost:53761")));
        assert!(!policy.is_allowed(&HeaderValue::from_static("http://localhost:53761/")));
        assert!(!policy.is_allowed(&HeaderValue::from_static("http://LOCALHOST:53761")));
        assert!(!policy.is_allowed(&HeaderValue::from_static("http://evil.example")));
    }

    #[test]
    fn test_permission_headers_only_for_allowed_origin() {
        let policy = policy();
        let allowed = HeaderValue::from_static("http://localhost:53761");

        let headers = policy.permission_headers(Some(&allowed));
        assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_ORIGIN), Some(&allowed));
        assert_eq!(
            headers.get(ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            PERMITTED_METHODS
        );

        let denied = HeaderValue::from_static("http://evil.example");
        assert!(policy.permission_headers(Some(&denied)).is_empty());
        assert!(policy.permission_headers(None).is_empty());
    }

    #[test]
    fn test_wildcard_and_invalid_origins_are_configuration_errors() {
        assert!(matches!(
            CorsPolicy::new(["*"]),
            Err(ReelError::Configuration { .. })
        ));
        assert!(matches!(
            CorsPolicy::new(["http://bad\norigin"]),
            Err(ReelError::Configuration { .. })
        ));
    }

    #[test]
    fn test_policy_from_default_config() {
        let policy = CorsPolicy::from_config(&CorsConfig::default()).unwrap();
        assert!(policy.is_allowed(&HeaderValue::from_static("http://localhost:53761")));
    }
}

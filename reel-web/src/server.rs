//! JSON API server for the Reel movie catalog
//!
//! Builds the router, wires shared state, and runs the listener until
//! Ctrl+C.

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::get;
use reel_core::{MovieCatalog, ReelConfig, Result, SharedCatalog};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::cors::{CorsPolicy, cors_gate};
use crate::handlers::{
    create_movie, delete_movie, get_movie, hello, list_movies, movie_options, update_movie,
};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// The movie catalog, behind a single read/write lock
    pub catalog: SharedCatalog,
    /// Origin allow-list
    pub cors: Arc<CorsPolicy>,
}

impl AppState {
    /// Wraps a catalog and CORS policy for sharing across handlers.
    pub fn new(catalog: MovieCatalog, cors: CorsPolicy) -> Self {
        Self {
            catalog: catalog.into_shared(),
            cors: Arc::new(cors),
        }
    }
}

/// Builds the application router with CORS gating and request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/movies", get(list_movies).post(create_movie))
        .route(
            "/movies/{id}",
            get(get_movie)
                .delete(delete_movie)
                .patch(update_movie)
                .options(movie_options),
        )
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn_with_state(state.cors.clone(), cors_gate))
        .with_state(state)
}

/// Runs the API server until Ctrl+C.
///
/// # Errors
///
/// - `ReelError::Configuration` - If the CORS allow-list is unusable
/// - `ReelError::Io` - If the listener cannot bind or the server fails
pub async fn run_server(config: ReelConfig, catalog: MovieCatalog) -> Result<()> {
    let cors = CorsPolicy::from_config(&config.cors)?;
    let movie_count = catalog.len();
    let app = build_router(AppState::new(catalog, cors));

    let listener = tokio::net::TcpListener::bind(config.server.bind_address()).await?;
    let address = listener.local_addr()?;

    info!(
        movies = movie_count,
        allowed_origins = ?config.cors.allowed_origins,
        "Server is running on http://localhost:{}",
        address.port()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {e}");
        return;
    }
    info!("Shutdown requested");
}

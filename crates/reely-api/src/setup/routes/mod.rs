//! Route configuration and setup.
//!
//! Public routes (health, docs, assets) are merged with the protected API
//! routes, which sit behind the bearer-auth middleware. Body limits are
//! enforced twice: a global cap sized to the largest allowed upload, and
//! per-route caps on the two upload endpoints.

mod health;

use crate::auth::{auth_middleware, AuthState};
use crate::handlers;
use crate::state::AppState;
use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Headroom for the multipart envelope around the file bytes.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

const HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Setup all application routes
pub fn setup_routes(state: AppState) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(&state.config)?;

    let auth_state = Arc::new(AuthState {
        jwt_secret: state.config.jwt_secret().to_string(),
    });

    let max_thumbnail = state.config.max_thumbnail_size_bytes() + MULTIPART_OVERHEAD;
    let max_video = state.config.max_video_size_bytes() + MULTIPART_OVERHEAD;

    let public_routes = public_routes();
    let protected_routes = protected_routes(max_thumbnail, max_video).layer(
        axum::middleware::from_fn_with_state(auth_state, auth_middleware),
    );

    let app = public_routes
        .merge(protected_routes)
        .merge(
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json")
                .path("/docs"),
        )
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(RequestBodyLimitLayer::new(max_video))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &reely_core::Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins().iter().map(|o| o.parse()).collect();
        CorsLayer::new()
            .allow_origin(origins.context("Invalid CORS origin")?)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .route("/assets/{*path}", get(handlers::assets::get_asset))
}

fn protected_routes(max_thumbnail: usize, max_video: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v0/videos",
            post(handlers::video_create::create_video).get(handlers::video_get::list_videos),
        )
        .route("/api/v0/videos/{id}", get(handlers::video_get::get_video))
        .route(
            "/api/v0/videos/{id}/thumbnail",
            post(handlers::thumbnail_upload::upload_thumbnail)
                .layer(DefaultBodyLimit::max(max_thumbnail)),
        )
        .route(
            "/api/v0/videos/{id}/media",
            post(handlers::video_upload::upload_video).layer(DefaultBodyLimit::max(max_video)),
        )
}

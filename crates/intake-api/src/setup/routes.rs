//! Route configuration and setup

use crate::constants::{
    BODY_LIMIT_MARGIN_BYTES, HEALTH_PATH, OPENAPI_PATH, SUBMIT_FORM_PATH, UPLOAD_PATH,
};
use crate::handlers;
use crate::handlers::method::method_not_allowed;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use intake_core::Config;
use intake_infra::request_id_middleware;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let app = Router::new()
        .route(
            SUBMIT_FORM_PATH,
            post(handlers::submit_form::submit_form)
                .fallback(method_not_allowed),
        )
        .route(
            UPLOAD_PATH,
            post(handlers::upload::upload_asset)
                .fallback(method_not_allowed),
        )
        .route(HEALTH_PATH, get(handlers::health::liveness_check))
        .route(
            OPENAPI_PATH,
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        // Size ceilings are enforced by the services; the transport limit only
        // stops bodies far beyond them.
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(
            config.max_store_bytes() + BODY_LIMIT_MARGIN_BYTES,
        ))
        // Answers every OPTIONS request with 200 before routing.
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

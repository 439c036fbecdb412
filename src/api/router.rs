//! Assessment router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! HTML pages live at the root, JSON endpoints under `/api/`.
//!
//! Layers (outermost → innermost): Cache-Control header → audit logger.

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the assessment router.
pub fn assessment_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/assess", post(endpoints::assess::evaluate));

    Router::new()
        .route("/", get(endpoints::form::show))
        .route("/assess", post(endpoints::form::submit))
        .nest("/api", api)
        .fallback(endpoints::not_found)
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        // Results contain health data; never let a browser or proxy cache them.
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

//! Route configuration.

use crate::handlers;
use crate::metrics::{metrics_handler, register_metrics};
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let body_limit = match state.config.server.max_upload_bytes {
        Some(max) => DefaultBodyLimit::max(usize::try_from(max).unwrap_or(usize::MAX)),
        None => DefaultBodyLimit::disable(),
    };

    let file_routes = Router::new()
        .route("/upload", post(handlers::upload_file).layer(body_limit))
        .route("/files", get(handlers::list_files))
        .route(
            "/files/{id}",
            get(handlers::download_file).delete(handlers::delete_file),
        );

    let admin_routes = Router::new()
        // Unauthenticated, keep off public networks
        .route("/admin/reconcile", post(handlers::reconcile))
        .route("/health", get(handlers::health_check));

    let mut router = Router::new().merge(file_routes).merge(admin_routes);

    if state.config.server.metrics_enabled {
        register_metrics();
        router = router.route("/metrics", get(metrics_handler));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

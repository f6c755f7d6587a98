use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router<AppState> {
    let system_config = &state.config.system_config;

    Router::new()
        // Input page
        .route("/", get(handlers::home))

        // Prediction API; any other method gets the JSON 405
        .route(
            "/predict/",
            post(handlers::predict).fallback(handlers::method_not_allowed),
        )
        .route(
            "/predict",
            post(handlers::predict).fallback(handlers::method_not_allowed),
        )

        // Health check
        .route("/api/health", get(handlers::health_check))

        // Static file serving
        .nest_service("/static", ServeDir::new(&system_config.static_dir))
}

/// Full application with tracing and CORS layers applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

//! Router configuration for the HTTP API.
//!
//! Sets up all routes and middleware (CORS, compression, tracing).

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Read-only API; any origin may fetch it.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route("/stars", get(handlers::list_stars))
        .route("/stars/{id}", get(handlers::get_star))
        .route("/exoplanets", get(handlers::list_exoplanets))
        .route("/exoplanets/{id}", get(handlers::get_exoplanet))
        .route("/constellations", get(handlers::list_constellations))
        .route("/constellations/{id}", get(handlers::get_constellation))
        .route("/publications", get(handlers::list_publications))
        .route("/publications/{id}", get(handlers::get_publication));

    Router::new()
        .route("/", get(handlers::landing_page))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_v1)
        .fallback(handlers::not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::FullRepository;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn router() -> Router {
        let repo = Arc::new(LocalRepository::new()) as Arc<dyn FullRepository>;
        create_router(AppState::new(repo))
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = router()
            .oneshot(Request::get("/api/v1/comets").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

use std::path::Path;

use axum::http::{header, Method};
use axum::{middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::{handlers, system};

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // DIRECTORY API
        // ========================================
        .route("/api/businesses", get(handlers::a001_business::list))
        .route(
            "/api/businesses/:slug",
            get(handlers::a001_business::get_by_slug),
        )
        .route("/api/categories", get(handlers::a001_business::categories))
}

/// API + статический сайт как fallback, логирование запросов и CORS
pub fn build_app(site_root: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    configure_routes()
        .fallback_service(ServeDir::new(site_root))
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors)
}

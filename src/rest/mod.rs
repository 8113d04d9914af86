// rest/mod.rs — Public REST API server.
//
// Axum HTTP server, local only by default. Thin dispatch onto the storage
// layers held by AppContext.
//
// Endpoints:
//   GET    /
//   GET    /health
//   POST   /api/friction-items
//   GET    /api/friction-items
//   GET    /api/friction-items/{id}
//   PUT    /api/friction-items/{id}
//   DELETE /api/friction-items/{id}
//   POST   /api/friction-items/{id}/encounter
//   GET    /api/analytics/score
//   GET    /api/analytics/trend
//   GET    /api/analytics/by-category
//   GET    /api/settings/global-daily-limit
//   PUT    /api/settings/global-daily-limit

pub mod error;
pub mod routes;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::AppContext;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("REST API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        // Health
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health))
        // Friction items
        .route(
            "/api/friction-items",
            get(routes::items::list_items).post(routes::items::create_item),
        )
        .route(
            "/api/friction-items/{id}",
            get(routes::items::get_item)
                .put(routes::items::update_item)
                .delete(routes::items::delete_item),
        )
        .route(
            "/api/friction-items/{id}/encounter",
            post(routes::items::record_encounter),
        )
        // Analytics
        .route("/api/analytics/score", get(routes::analytics::current_score))
        .route("/api/analytics/trend", get(routes::analytics::trend))
        .route(
            "/api/analytics/by-category",
            get(routes::analytics::by_category),
        )
        // Settings
        .route(
            "/api/settings/global-daily-limit",
            get(routes::settings::get_global_daily_limit)
                .put(routes::settings::set_global_daily_limit),
        )
        // Local desktop client — allow any origin.
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

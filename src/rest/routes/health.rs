use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::AppContext;

pub async fn health(State(ctx): State<Arc<AppContext>>) -> Json<Value> {
    let uptime = ctx.started_at.elapsed().as_secs();
    let database = match ctx.storage.ping().await {
        Ok(()) => "ok",
        Err(_) => "unavailable",
    };
    Json(json!({
        "status": "ok",
        "database": database,
        "uptime_secs": uptime,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Friction Log API",
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/health",
    }))
}

//! Settings routes — the global daily encounter limit.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::rest::error::ApiError;
use crate::AppContext;

pub async fn get_global_daily_limit(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Value>, ApiError> {
    let limit = ctx.settings.global_daily_limit().await?;
    Ok(Json(json!({ "limit": limit })))
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

/// Set the limit via `?limit=n`; omitting the parameter clears it.
pub async fn set_global_daily_limit(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Value>, ApiError> {
    if let Some(limit) = query.limit {
        if limit < 1 {
            return Err(ApiError::Validation(
                "global daily limit must be at least 1".to_string(),
            ));
        }
    }
    ctx.settings.set_global_daily_limit(query.limit).await?;
    Ok(Json(json!({ "limit": query.limit })))
}

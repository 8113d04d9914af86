//! Analytics read routes.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use crate::analytics::model::{CategoryBreakdown, CurrentScore, TrendPoint};
use crate::rest::error::ApiError;
use crate::AppContext;

const TREND_DEFAULT_DAYS: i64 = 30;
const TREND_MAX_DAYS: i64 = 365;

pub async fn current_score(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<CurrentScore>, ApiError> {
    let today = Utc::now().date_naive();
    Ok(Json(ctx.analytics.current_score(today).await?))
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub days: Option<i64>,
}

pub async fn trend(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<Vec<TrendPoint>>, ApiError> {
    let days = query.days.unwrap_or(TREND_DEFAULT_DAYS);
    if days < 1 {
        return Err(ApiError::Validation("days must be at least 1".to_string()));
    }
    if days > TREND_MAX_DAYS {
        return Err(ApiError::Validation(format!(
            "days must not exceed {TREND_MAX_DAYS}"
        )));
    }

    let today = Utc::now().date_naive();
    Ok(Json(ctx.analytics.trend(days, today).await?))
}

pub async fn by_category(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<CategoryBreakdown>, ApiError> {
    Ok(Json(ctx.analytics.category_breakdown().await?))
}

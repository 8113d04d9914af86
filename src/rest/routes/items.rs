//! Friction item CRUD routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use crate::items::model::{
    Category, EncounterResponse, FrictionItem, FrictionItemPatch, NewFrictionItem, Status,
};
use crate::rest::error::ApiError;
use crate::AppContext;

const ITEM_NOT_FOUND: &str = "friction item not found";

pub async fn create_item(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<NewFrictionItem>,
) -> Result<(StatusCode, Json<FrictionItem>), ApiError> {
    body.validate().map_err(ApiError::Validation)?;
    let row = ctx.items.create(&body).await?;
    Ok((StatusCode::CREATED, Json(row.into_item()?)))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub category: Option<String>,
}

pub async fn list_items(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<FrictionItem>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(|s| {
            Status::parse(s).ok_or_else(|| ApiError::Validation(format!("unknown status '{s}'")))
        })
        .transpose()?;
    let category = query
        .category
        .as_deref()
        .map(|c| {
            Category::parse(c)
                .ok_or_else(|| ApiError::Validation(format!("unknown category '{c}'")))
        })
        .transpose()?;

    let rows = ctx.items.list(status, category).await?;
    let items = rows
        .into_iter()
        .map(|row| row.into_item())
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Json(items))
}

pub async fn get_item(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
) -> Result<Json<FrictionItem>, ApiError> {
    match ctx.items.get(id).await? {
        Some(row) => Ok(Json(row.into_item()?)),
        None => Err(ApiError::NotFound(ITEM_NOT_FOUND)),
    }
}

pub async fn update_item(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
    Json(body): Json<FrictionItemPatch>,
) -> Result<Json<FrictionItem>, ApiError> {
    body.validate().map_err(ApiError::Validation)?;
    match ctx.items.update(id, &body).await? {
        Some(row) => Ok(Json(row.into_item()?)),
        None => Err(ApiError::NotFound(ITEM_NOT_FOUND)),
    }
}

pub async fn delete_item(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if ctx.items.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(ITEM_NOT_FOUND))
    }
}

pub async fn record_encounter(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
) -> Result<Json<EncounterResponse>, ApiError> {
    let today = Utc::now().date_naive();
    match ctx.items.record_encounter(id, today).await? {
        Some((row, is_limit_exceeded)) => Ok(Json(EncounterResponse {
            item: row.into_item()?,
            is_limit_exceeded,
        })),
        None => Err(ApiError::NotFound(ITEM_NOT_FOUND)),
    }
}

//! 超市处理器

use axum::{extract::State, http::StatusCode, response::Json};
use validator::Validate;

use super::model::{
    CreateSupermarketRequest, ListSupermarketsQuery, NearbyQuery, NearbySupermarket, Supermarket,
};
use crate::app::AppState;
use crate::core::error::AppResult;
use crate::core::extract::{AppJson, AppPath, AppQuery};

pub async fn create_supermarket(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSupermarketRequest>,
) -> AppResult<(StatusCode, Json<Supermarket>)> {
    payload.validate()?;

    let supermarket = state.supermarkets.create(payload).await?;
    Ok((StatusCode::CREATED, Json(supermarket)))
}

pub async fn list_supermarkets(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListSupermarketsQuery>,
) -> AppResult<Json<Vec<Supermarket>>> {
    let supermarkets = state.supermarkets.list(query.page()).await?;
    Ok(Json(supermarkets))
}

pub async fn get_supermarket(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<Supermarket>> {
    let supermarket = state.supermarkets.get(id).await?;
    Ok(Json(supermarket))
}

pub async fn nearby_supermarkets(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<NearbyQuery>,
) -> AppResult<Json<Vec<NearbySupermarket>>> {
    query.check()?;

    let supermarkets = state
        .supermarkets
        .nearby(query.latitude, query.longitude, query.radius)
        .await?;
    Ok(Json(supermarkets))
}

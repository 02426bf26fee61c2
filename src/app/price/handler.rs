//! 价格处理器

use axum::{extract::State, http::StatusCode, response::Json};
use validator::Validate;

use super::model::{CreatePriceRequest, ListPricesQuery, PriceComparison, PriceDetail};
use crate::app::AppState;
use crate::core::error::AppResult;
use crate::core::extract::{AppJson, AppPath, AppQuery};

pub async fn create_price(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePriceRequest>,
) -> AppResult<(StatusCode, Json<PriceDetail>)> {
    payload.validate()?;

    let price = state.prices.create(payload).await?;
    Ok((StatusCode::CREATED, Json(price)))
}

pub async fn list_prices(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListPricesQuery>,
) -> AppResult<Json<Vec<PriceDetail>>> {
    let prices = state
        .prices
        .list(query.page(), query.product_id, query.supermarket_id)
        .await?;
    Ok(Json(prices))
}

pub async fn get_price(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<PriceDetail>> {
    let price = state.prices.get(id).await?;
    Ok(Json(price))
}

pub async fn compare_prices(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<i64>,
) -> AppResult<Json<PriceComparison>> {
    let comparison = state.prices.compare(product_id).await?;
    Ok(Json(comparison))
}

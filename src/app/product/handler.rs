//! 商品处理器

use axum::{extract::State, http::StatusCode, response::Json};
use validator::Validate;

use super::model::{CreateProductRequest, ListProductsQuery, Product, SearchProductsQuery};
use crate::app::AppState;
use crate::core::error::AppResult;
use crate::core::extract::{AppJson, AppPath, AppQuery};

pub async fn create_product(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<Product>)> {
    payload.validate()?;

    let product = state.products.create(payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn list_products(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListProductsQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let products = state
        .products
        .list(query.page(), query.category.as_deref())
        .await?;
    Ok(Json(products))
}

pub async fn search_products(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SearchProductsQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let products = state.products.search(&query.q).await?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<Product>> {
    let product = state.products.get(id).await?;
    Ok(Json(product))
}

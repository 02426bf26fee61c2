//! 应用层：路由与各业务模块

pub mod price;
pub mod product;
pub mod supermarket;

use axum::{extract::State, middleware, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::core::error::AppResult;
use crate::core::middleware::request_logging_middleware;
use crate::infrastructure::database::Database;
use price::{handler as prices, service::PriceService};
use product::{handler as products, service::ProductService};
use supermarket::{handler as supermarkets, service::SupermarketService};

/// 服务标识
pub const SERVICE_NAME: &str = "スーパーマーケット価格比較API";

/// 路由共享状态，每个服务持有同一个连接池的句柄
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub supermarkets: SupermarketService,
    pub products: ProductService,
    pub prices: PriceService,
}

impl AppState {
    pub fn new(database: Database) -> Self {
        let pool = database.pool().clone();
        Self {
            supermarkets: SupermarketService::new(pool.clone()),
            products: ProductService::new(pool.clone()),
            prices: PriceService::new(pool),
            database,
        }
    }
}

async fn root() -> Json<Value> {
    Json(json!({ "message": SERVICE_NAME }))
}

async fn health_check(State(state): State<AppState>) -> AppResult<Json<Value>> {
    state.database.ping().await?;

    Ok(Json(json!({
        "status": "healthy",
        "database": "connected",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

/// 创建路由；集合路由同时接受带和不带结尾斜杠的路径
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        // 超市
        .route(
            "/supermarkets/",
            get(supermarkets::list_supermarkets).post(supermarkets::create_supermarket),
        )
        .route(
            "/supermarkets",
            get(supermarkets::list_supermarkets).post(supermarkets::create_supermarket),
        )
        .route("/supermarkets-nearby", get(supermarkets::nearby_supermarkets))
        .route("/supermarkets/:id", get(supermarkets::get_supermarket))
        // 商品
        .route(
            "/products/",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/products/search", get(products::search_products))
        .route("/products/:id", get(products::get_product))
        // 价格
        .route("/prices/", get(prices::list_prices).post(prices::create_price))
        .route("/prices", get(prices::list_prices).post(prices::create_price))
        .route("/prices/compare/:product_id", get(prices::compare_prices))
        .route("/prices/:id", get(prices::get_price))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}

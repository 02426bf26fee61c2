//! 价格数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::product::model::Product;
use crate::app::supermarket::model::Supermarket;
use crate::core::pagination::{default_limit, Page};

/// 未指定单位时使用的默认值
pub const DEFAULT_UNIT: &str = "each";

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Price {
    pub id: i64,
    pub product_id: i64,
    pub supermarket_id: i64,
    pub price: f64,
    pub unit: String,
    pub recorded_by: String,
    pub recorded_at: DateTime<Utc>,
}

/// 带商品与超市详情的价格记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceDetail {
    #[serde(flatten)]
    pub price: Price,
    pub product: Product,
    pub supermarket: Supermarket,
}

/// 价格、商品、超市三表联查的一行
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PriceDetailRow {
    pub id: i64,
    pub product_id: i64,
    pub supermarket_id: i64,
    pub price: f64,
    pub unit: String,
    pub recorded_by: String,
    pub recorded_at: DateTime<Utc>,
    pub product_name: String,
    pub product_category: String,
    pub product_brand: Option<String>,
    pub product_created_at: DateTime<Utc>,
    pub supermarket_name: String,
    pub supermarket_address: String,
    pub supermarket_latitude: f64,
    pub supermarket_longitude: f64,
    pub supermarket_phone: Option<String>,
    pub supermarket_created_at: DateTime<Utc>,
}

impl From<PriceDetailRow> for PriceDetail {
    fn from(row: PriceDetailRow) -> Self {
        Self {
            product: Product {
                id: row.product_id,
                name: row.product_name,
                category: row.product_category,
                brand: row.product_brand,
                created_at: row.product_created_at,
            },
            supermarket: Supermarket {
                id: row.supermarket_id,
                name: row.supermarket_name,
                address: row.supermarket_address,
                latitude: row.supermarket_latitude,
                longitude: row.supermarket_longitude,
                phone: row.supermarket_phone,
                created_at: row.supermarket_created_at,
            },
            price: Price {
                id: row.id,
                product_id: row.product_id,
                supermarket_id: row.supermarket_id,
                price: row.price,
                unit: row.unit,
                recorded_by: row.recorded_by,
                recorded_at: row.recorded_at,
            },
        }
    }
}

/// 登记价格请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePriceRequest {
    pub product_id: i64,

    pub supermarket_id: i64,

    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub price: f64,

    #[serde(default = "default_unit")]
    #[validate(length(min = 1, max = 20, message = "must be between 1 and 20 characters"))]
    pub unit: String,

    #[validate(length(min = 1, max = 50, message = "must be between 1 and 50 characters"))]
    pub recorded_by: String,
}

#[derive(Debug, Deserialize)]
pub struct ListPricesQuery {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub product_id: Option<i64>,
    pub supermarket_id: Option<i64>,
}

impl ListPricesQuery {
    pub fn page(&self) -> Page {
        Page::new(self.skip, self.limit)
    }
}

/// 比价结果中的一条
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ComparedPrice {
    pub supermarket_id: i64,
    pub supermarket: String,
    pub address: String,
    pub price: f64,
    pub unit: String,
    pub recorded_at: DateTime<Utc>,
}

/// 某商品在各超市的价格，按价格升序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceComparison {
    pub product: String,
    pub prices: Vec<ComparedPrice>,
}

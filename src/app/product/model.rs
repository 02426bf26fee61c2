//! 商品数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::pagination::{default_limit, Page};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub brand: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 创建商品请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 50, message = "must be between 1 and 50 characters"))]
    pub category: String,

    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub brand: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub category: Option<String>,
}

impl ListProductsQuery {
    pub fn page(&self) -> Page {
        Page::new(self.skip, self.limit)
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchProductsQuery {
    pub q: String,
}

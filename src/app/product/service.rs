//! 商品业务服务

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use super::model::{CreateProductRequest, Product};
use crate::core::error::{AppError, AppResult};
use crate::core::pagination::Page;

#[derive(Clone)]
pub struct ProductService {
    pool: SqlitePool,
}

impl ProductService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: CreateProductRequest) -> AppResult<Product> {
        let product = sqlx::query_as::<_, Product>(
            "INSERT INTO products (name, category, brand, created_at) VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(&request.name)
        .bind(&request.category)
        .bind(&request.brand)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        info!("Created product: {} ({})", product.name, product.id);
        Ok(product)
    }

    /// 分页列出商品，`category` 为精确匹配
    pub async fn list(&self, page: Page, category: Option<&str>) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE (?1 IS NULL OR category = ?1)
            ORDER BY id
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(category)
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    pub async fn get(&self, id: i64) -> AppResult<Product> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("product"))
    }

    /// 按名称子串搜索（ASCII 不区分大小写）
    pub async fn search(&self, term: &str) -> AppResult<Vec<Product>> {
        let pattern = format!("%{}%", escape_like(term));

        let products = sqlx::query_as::<_, Product>(
            r"SELECT * FROM products WHERE name LIKE ? ESCAPE '\' ORDER BY id",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}

/// 转义 LIKE 通配符，让 `%` 和 `_` 按字面匹配
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

//! 价格业务服务

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use super::comparison::compare;
use super::model::{
    ComparedPrice, CreatePriceRequest, PriceComparison, PriceDetail, PriceDetailRow,
};
use crate::core::error::{AppError, AppResult};
use crate::core::pagination::Page;

const SELECT_DETAIL: &str = r#"
    SELECT
        p.id, p.product_id, p.supermarket_id, p.price, p.unit, p.recorded_by, p.recorded_at,
        pr.name AS product_name,
        pr.category AS product_category,
        pr.brand AS product_brand,
        pr.created_at AS product_created_at,
        s.name AS supermarket_name,
        s.address AS supermarket_address,
        s.latitude AS supermarket_latitude,
        s.longitude AS supermarket_longitude,
        s.phone AS supermarket_phone,
        s.created_at AS supermarket_created_at
    FROM prices p
    JOIN products pr ON pr.id = p.product_id
    JOIN supermarkets s ON s.id = p.supermarket_id
"#;

#[derive(Clone)]
pub struct PriceService {
    pool: SqlitePool,
}

impl PriceService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 登记一条价格
    ///
    /// 先确认商品、再确认超市存在，缺哪一方就返回对应的 not found。
    /// 整个请求只借用一个连接，返回时无论成功与否都会归还连接池。
    pub async fn create(&self, request: CreatePriceRequest) -> AppResult<PriceDetail> {
        let mut conn = self.pool.acquire().await?;

        if !exists(&mut *conn, "products", request.product_id).await? {
            return Err(AppError::not_found("product"));
        }
        if !exists(&mut *conn, "supermarkets", request.supermarket_id).await? {
            return Err(AppError::not_found("supermarket"));
        }

        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO prices (product_id, supermarket_id, price, unit, recorded_by, recorded_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(request.product_id)
        .bind(request.supermarket_id)
        .bind(request.price)
        .bind(&request.unit)
        .bind(&request.recorded_by)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        info!(
            "Recorded price {} for product {} at supermarket {} ({})",
            request.price, request.product_id, request.supermarket_id, id
        );

        fetch_detail(&mut *conn, id)
            .await?
            .ok_or_else(|| AppError::not_found("price"))
    }

    /// 分页列出价格，可按商品、超市过滤
    pub async fn list(
        &self,
        page: Page,
        product_id: Option<i64>,
        supermarket_id: Option<i64>,
    ) -> AppResult<Vec<PriceDetail>> {
        let sql = format!(
            "{SELECT_DETAIL}
            WHERE (?1 IS NULL OR p.product_id = ?1)
              AND (?2 IS NULL OR p.supermarket_id = ?2)
            ORDER BY p.id
            LIMIT ?3 OFFSET ?4"
        );

        let rows = sqlx::query_as::<_, PriceDetailRow>(&sql)
            .bind(product_id)
            .bind(supermarket_id)
            .bind(page.limit)
            .bind(page.skip)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(PriceDetail::from).collect())
    }

    pub async fn get(&self, id: i64) -> AppResult<PriceDetail> {
        let mut conn = self.pool.acquire().await?;

        fetch_detail(&mut *conn, id)
            .await?
            .ok_or_else(|| AppError::not_found("price"))
    }

    /// 比较某商品在各超市的价格
    ///
    /// 商品不存在时返回 "product not found"；商品存在但没有任何价格记录时
    /// 同样是 not found，消息为 "no prices recorded for product"。
    pub async fn compare(&self, product_id: i64) -> AppResult<PriceComparison> {
        let mut conn = self.pool.acquire().await?;

        let product: Option<(String,)> = sqlx::query_as("SELECT name FROM products WHERE id = ?")
            .bind(product_id)
            .fetch_optional(&mut *conn)
            .await?;
        let (product_name,) = product.ok_or_else(|| AppError::not_found("product"))?;

        let prices = sqlx::query_as::<_, ComparedPrice>(
            r#"
            SELECT
                p.supermarket_id,
                s.name AS supermarket,
                s.address,
                p.price,
                p.unit,
                p.recorded_at
            FROM prices p
            JOIN supermarkets s ON s.id = p.supermarket_id
            WHERE p.product_id = ?
            ORDER BY p.id
            "#,
        )
        .bind(product_id)
        .fetch_all(&mut *conn)
        .await?;

        if prices.is_empty() {
            return Err(AppError::NotFound(
                "no prices recorded for product".to_string(),
            ));
        }

        Ok(compare(product_name, prices))
    }
}

async fn exists(conn: &mut SqliteConnection, table: &'static str, id: i64) -> AppResult<bool> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?)");
    let (found,): (bool,) = sqlx::query_as(&sql).bind(id).fetch_one(&mut *conn).await?;
    Ok(found)
}

async fn fetch_detail(conn: &mut SqliteConnection, id: i64) -> AppResult<Option<PriceDetail>> {
    let sql = format!("{SELECT_DETAIL} WHERE p.id = ?");

    let row = sqlx::query_as::<_, PriceDetailRow>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row.map(PriceDetail::from))
}

//! 超市业务服务

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use super::model::{CreateSupermarketRequest, NearbySupermarket, Supermarket};
use super::proximity::find_nearby;
use crate::core::error::{AppError, AppResult};
use crate::core::pagination::Page;

#[derive(Clone)]
pub struct SupermarketService {
    pool: SqlitePool,
}

impl SupermarketService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: CreateSupermarketRequest) -> AppResult<Supermarket> {
        let supermarket = sqlx::query_as::<_, Supermarket>(
            r#"
            INSERT INTO supermarkets (name, address, latitude, longitude, phone, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.address)
        .bind(request.latitude)
        .bind(request.longitude)
        .bind(&request.phone)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        info!("Created supermarket: {} ({})", supermarket.name, supermarket.id);
        Ok(supermarket)
    }

    pub async fn list(&self, page: Page) -> AppResult<Vec<Supermarket>> {
        let supermarkets =
            sqlx::query_as::<_, Supermarket>("SELECT * FROM supermarkets ORDER BY id LIMIT ? OFFSET ?")
                .bind(page.limit)
                .bind(page.skip)
                .fetch_all(&self.pool)
                .await?;

        Ok(supermarkets)
    }

    pub async fn get(&self, id: i64) -> AppResult<Supermarket> {
        sqlx::query_as::<_, Supermarket>("SELECT * FROM supermarkets WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("supermarket"))
    }

    pub async fn nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> AppResult<Vec<NearbySupermarket>> {
        let stores = sqlx::query_as::<_, Supermarket>("SELECT * FROM supermarkets")
            .fetch_all(&self.pool)
            .await?;

        Ok(find_nearby(latitude, longitude, radius_km, stores))
    }
}

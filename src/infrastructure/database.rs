//! 数据库基础设施

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Error,
};
use std::{str::FromStr, time::Duration};
use tracing::info;

use crate::config::DatabaseConfig;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS supermarkets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name VARCHAR(100) NOT NULL,
        address VARCHAR(200) NOT NULL,
        latitude REAL NOT NULL,
        longitude REAL NOT NULL,
        phone VARCHAR(20),
        created_at TIMESTAMP NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_supermarkets_name ON supermarkets (name)",
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name VARCHAR(100) NOT NULL,
        category VARCHAR(50) NOT NULL,
        brand VARCHAR(50),
        created_at TIMESTAMP NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_products_name ON products (name)",
    "CREATE INDEX IF NOT EXISTS ix_products_category ON products (category)",
    r#"
    CREATE TABLE IF NOT EXISTS prices (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        product_id INTEGER NOT NULL REFERENCES products (id),
        supermarket_id INTEGER NOT NULL REFERENCES supermarkets (id),
        price REAL NOT NULL,
        unit VARCHAR(20) NOT NULL,
        recorded_by VARCHAR(50) NOT NULL,
        recorded_at TIMESTAMP NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_prices_product_id ON prices (product_id)",
    "CREATE INDEX IF NOT EXISTS ix_prices_supermarket_id ON prices (supermarket_id)",
    "CREATE INDEX IF NOT EXISTS ix_prices_recorded_at ON prices (recorded_at)",
];

/// 数据库句柄，由 `main` 显式创建并注入到各个服务
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// 按配置连接数据库并建表
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, Error> {
        info!("Connecting to database: {}", config.url);

        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let filename = options.clone().get_filename();
        if let Some(dir) = filename.parent() {
            std::fs::create_dir_all(dir).map_err(Error::Io)?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect_with(options)
            .await?;

        let database = Self { pool };
        database.create_tables().await?;
        Ok(database)
    }

    /// 内存数据库，主要用于测试
    ///
    /// 每个连接都有独立的内存库，所以连接池固定为一个永不回收的连接。
    pub async fn in_memory() -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;

        let database = Self { pool };
        database.create_tables().await?;
        Ok(database)
    }

    async fn create_tables(&self) -> Result<(), Error> {
        info!("Creating database tables...");

        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        info!("Database tables ready");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// 连通性探测
    pub async fn ping(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// 关闭连接池，等待所有借出的连接归还
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

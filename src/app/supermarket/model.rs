//! 超市数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::error::AppError;
use crate::core::pagination::{default_limit, Page};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Supermarket {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 创建超市请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupermarketRequest {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub address: String,

    #[validate(range(min = -90.0, max = 90.0, message = "must be between -90 and 90"))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "must be between -180 and 180"))]
    pub longitude: f64,

    #[validate(length(max = 20, message = "must be at most 20 characters"))]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListSupermarketsQuery {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl ListSupermarketsQuery {
    pub fn page(&self) -> Page {
        Page::new(self.skip, self.limit)
    }
}

pub fn default_radius_km() -> f64 {
    5.0
}

/// 附近超市查询参数
#[derive(Debug, Deserialize, Validate)]
pub struct NearbyQuery {
    #[validate(range(min = -90.0, max = 90.0, message = "must be between -90 and 90"))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "must be between -180 and 180"))]
    pub longitude: f64,

    #[serde(default = "default_radius_km")]
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub radius: f64,
}

impl NearbyQuery {
    /// 校验查询参数
    ///
    /// NaN 与任何数比较都为 false，会绕过 `range`，所以先排除非有限值。
    pub fn check(&self) -> Result<(), AppError> {
        let fields = [
            ("latitude", self.latitude),
            ("longitude", self.longitude),
            ("radius", self.radius),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(AppError::Validation(format!(
                "{field}: must be a finite number"
            )));
        }

        self.validate()?;
        Ok(())
    }
}

/// 带距离的超市
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbySupermarket {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: Option<String>,
    pub distance_km: f64,
}

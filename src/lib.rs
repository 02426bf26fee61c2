//! # スーパーマーケット価格比較 API
//!
//! 超市、商品与用户提交价格的存储，以及附近超市检索和比价接口。
//!
//! 分层结构：
//! - `app`：路由与业务模块（超市、商品、价格）
//! - `core`：错误处理、提取器、中间件、分页
//! - `infrastructure`：数据库与日志
//! - `config`：配置加载

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::{create_router, AppState};
pub use config::Config;
pub use infrastructure::database::Database;

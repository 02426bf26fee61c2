//! 自定义提取器：把 axum 的拒绝统一转换为 [`AppError`]

use axum::extract::FromRequest;
use axum::extract::FromRequestParts;

use super::error::AppError;

/// JSON 请求体
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// 查询参数
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// 路径参数
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

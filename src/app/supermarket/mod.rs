//! 超市（店铺登记与附近检索）

pub mod handler;
pub mod model;
pub mod proximity;
pub mod service;

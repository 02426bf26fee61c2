//! 价格登记与比价

pub mod comparison;
pub mod handler;
pub mod model;
pub mod service;

//! 比价：把同一商品的全部价格记录按价格升序排列

use super::model::{ComparedPrice, PriceComparison};

/// 价格升序的稳定排序，价格相同时保持登记顺序
pub fn rank_by_price(mut prices: Vec<ComparedPrice>) -> Vec<ComparedPrice> {
    prices.sort_by(|a, b| a.price.total_cmp(&b.price));
    prices
}

pub fn compare(product_name: String, prices: Vec<ComparedPrice>) -> PriceComparison {
    PriceComparison {
        product: product_name,
        prices: rank_by_price(prices),
    }
}

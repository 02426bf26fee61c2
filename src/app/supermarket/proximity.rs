//! 附近超市检索
//!
//! 对全部超市做线性扫描，按 haversine 距离过滤并升序排列。
//! 店铺数量在几千以内时足够；更大规模时可以换成网格或 R-tree，
//! [`find_nearby`] 的签名不需要变化。

use super::model::{NearbySupermarket, Supermarket};

/// 地球平均半径（千米）
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// 两点间的大圆距离（千米），输入为角度制
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);

    // 浮点误差可能让 a 略大于 1
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

/// 保留两位小数
pub fn round_km(distance: f64) -> f64 {
    (distance * 100.0).round() / 100.0
}

/// 返回距离查询点不超过 `radius_km` 的超市，按距离升序，距离相同时按 id
///
/// 过滤使用未取整的距离，输出的 `distance_km` 取两位小数。
pub fn find_nearby<I>(latitude: f64, longitude: f64, radius_km: f64, stores: I) -> Vec<NearbySupermarket>
where
    I: IntoIterator<Item = Supermarket>,
{
    let mut hits: Vec<(f64, Supermarket)> = stores
        .into_iter()
        .map(|store| {
            let distance = haversine_km(latitude, longitude, store.latitude, store.longitude);
            (distance, store)
        })
        .filter(|(distance, _)| *distance <= radius_km)
        .collect();

    hits.sort_by(|(da, a), (db, b)| da.total_cmp(db).then(a.id.cmp(&b.id)));

    hits.into_iter()
        .map(|(distance, store)| NearbySupermarket {
            id: store.id,
            name: store.name,
            address: store.address,
            latitude: store.latitude,
            longitude: store.longitude,
            phone: store.phone,
            distance_km: round_km(distance),
        })
        .collect()
}

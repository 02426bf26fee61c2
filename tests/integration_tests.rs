use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use supermarket_prices::{create_router, AppState, Database};
use tower::ServiceExt;

async fn test_app() -> Router {
    let database = Database::in_memory()
        .await
        .expect("Failed to create in-memory database");
    create_router(AppState::new(database))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

async fn create_supermarket(app: &Router, name: &str, latitude: f64, longitude: f64) -> i64 {
    let (status, body) = post(
        app,
        "/supermarkets/",
        json!({
            "name": name,
            "address": format!("{name} 住所"),
            "latitude": latitude,
            "longitude": longitude,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

async fn create_product(app: &Router, name: &str, category: &str) -> i64 {
    let (status, body) = post(
        app,
        "/products/",
        json!({ "name": name, "category": category }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

async fn record_price(app: &Router, product_id: i64, supermarket_id: i64, price: f64) -> Value {
    let (status, body) = post(
        app,
        "/prices/",
        json!({
            "product_id": product_id,
            "supermarket_id": supermarket_id,
            "price": price,
            "recorded_by": "tester",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn test_root_and_health() {
    let app = test_app().await;

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "スーパーマーケット価格比較API");

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_create_and_get_supermarket() {
    let app = test_app().await;

    let (status, created) = post(
        &app,
        "/supermarkets/",
        json!({
            "name": "まいばすけっと 市川駅前店",
            "address": "千葉県市川市市川1-1-1",
            "latitude": 35.7227,
            "longitude": 139.9259,
            "phone": "047-000-0000",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "まいばすけっと 市川駅前店");
    assert_eq!(created["phone"], "047-000-0000");
    assert!(created["created_at"].is_string());

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = get(&app, &format!("/supermarkets/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_supermarket_validation() {
    let app = test_app().await;

    let (status, body) = post(
        &app,
        "/supermarkets/",
        json!({ "name": "ライフ", "address": "市川", "longitude": 139.9 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("latitude"), "{body}");

    let (status, body) = post(
        &app,
        "/supermarkets/",
        json!({ "name": "ライフ", "address": "市川", "latitude": 135.0, "longitude": 139.9 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");
    assert!(body["message"].as_str().unwrap().contains("latitude"), "{body}");

    let (status, body) = post(
        &app,
        "/supermarkets/",
        json!({ "name": "", "address": "市川", "latitude": 35.0, "longitude": 139.9 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("name"), "{body}");
}

#[tokio::test]
async fn test_supermarket_not_found_and_bad_id() {
    let app = test_app().await;

    let (status, body) = get(&app, "/supermarkets/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "supermarket not found");
    assert_eq!(body["code"], 404);

    let (status, _) = get(&app, "/supermarkets/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_supermarkets_paginates() {
    let app = test_app().await;
    for i in 0..5 {
        create_supermarket(&app, &format!("store {i}"), 35.0, 139.0 + i as f64 * 0.01).await;
    }

    let (status, body) = get(&app, "/supermarkets/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 5);

    let (_, body) = get(&app, "/supermarkets?skip=1&limit=2").await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["store 1", "store 2"]);

    let (status, _) = get(&app, "/supermarkets/?skip=-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_nearby_supermarkets() {
    let app = test_app().await;
    create_supermarket(&app, "イオン 市川妙典店", 35.6936, 139.9106).await;
    let station = create_supermarket(&app, "まいばすけっと 市川駅前店", 35.7227, 139.9259).await;
    create_supermarket(&app, "ライフ 市川店", 35.7251, 139.9301).await;
    create_supermarket(&app, "西友 新宿店", 35.6938, 139.7034).await;

    let (status, body) = get(
        &app,
        "/supermarkets-nearby?latitude=35.7227&longitude=139.9259&radius=1.0",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let stores = body.as_array().unwrap();
    assert_eq!(stores.len(), 2);
    assert_eq!(stores[0]["id"], station);
    assert_eq!(stores[0]["name"], "まいばすけっと 市川駅前店");
    assert_eq!(stores[0]["distance_km"], 0.0);
    assert_eq!(stores[1]["name"], "ライフ 市川店");
    assert!(stores[1]["distance_km"].as_f64().unwrap() <= 1.0);

    // 默认半径 5 km
    let (_, body) = get(&app, "/supermarkets-nearby?latitude=35.7227&longitude=139.9259").await;
    let distances: Vec<f64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["distance_km"].as_f64().unwrap())
        .collect();
    assert_eq!(distances.len(), 3);
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    assert!(distances.iter().all(|d| *d <= 5.0));
}

#[tokio::test]
async fn test_nearby_requires_coordinates() {
    let app = test_app().await;

    let (status, body) = get(&app, "/supermarkets-nearby?longitude=139.9259").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("latitude"), "{body}");

    let (status, body) = get(
        &app,
        "/supermarkets-nearby?latitude=35.0&longitude=139.0&radius=-1",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("radius"), "{body}");
}

#[tokio::test]
async fn test_nearby_rejects_non_finite_coordinates() {
    let app = test_app().await;
    create_supermarket(&app, "まいばすけっと 市川駅前店", 35.7227, 139.9259).await;

    for (uri, field) in [
        ("/supermarkets-nearby?latitude=NaN&longitude=0", "latitude"),
        ("/supermarkets-nearby?latitude=35.7227&longitude=inf", "longitude"),
        ("/supermarkets-nearby?latitude=35.7227&longitude=139.9259&radius=NaN", "radius"),
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["message"].as_str().unwrap().contains(field), "{body}");
    }
}

#[tokio::test]
async fn test_products_crud_and_search() {
    let app = test_app().await;

    let (status, created) = post(
        &app,
        "/products",
        json!({ "name": "明治おいしい牛乳 1L", "category": "乳製品", "brand": "明治" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["brand"], "明治");

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = get(&app, &format!("/products/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    create_product(&app, "食パン 6枚切", "パン").await;
    create_product(&app, "Coca-Cola 500ml", "飲料").await;
    create_product(&app, "100% Orange", "飲料").await;

    let (_, body) = get(&app, "/products/?category=%E9%A3%B2%E6%96%99").await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    // 牛乳
    let (status, body) = get(&app, "/products/search?q=%E7%89%9B%E4%B9%B3").await;
    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], id);

    let (_, body) = get(&app, "/products/search?q=cola").await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // `%` 按字面匹配
    let (_, body) = get(&app, "/products/search?q=%25").await;
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "100% Orange");

    let (status, _) = get(&app, "/products/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get(&app, "/products/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "product not found");
}

#[tokio::test]
async fn test_create_price_with_nested_records() {
    let app = test_app().await;
    let store = create_supermarket(&app, "ライフ 市川店", 35.7251, 139.9301).await;
    let product = create_product(&app, "卵 10個", "卵").await;

    let created = record_price(&app, product, store, 228.0).await;
    assert_eq!(created["product_id"], product);
    assert_eq!(created["supermarket_id"], store);
    assert_eq!(created["price"], 228.0);
    assert_eq!(created["unit"], "each");
    assert_eq!(created["recorded_by"], "tester");
    assert_eq!(created["product"]["name"], "卵 10個");
    assert_eq!(created["supermarket"]["name"], "ライフ 市川店");

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = get(&app, &format!("/prices/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, body) = post(
        &app,
        "/prices/",
        json!({
            "product_id": product,
            "supermarket_id": store,
            "price": 198,
            "unit": "パック",
            "recorded_by": "tester",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["unit"], "パック");
}

#[tokio::test]
async fn test_create_price_with_missing_references() {
    let app = test_app().await;
    let store = create_supermarket(&app, "ライフ 市川店", 35.7251, 139.9301).await;
    let product = create_product(&app, "卵 10個", "卵").await;

    let (status, body) = post(
        &app,
        "/prices/",
        json!({ "product_id": 999, "supermarket_id": store, "price": 100.0, "recorded_by": "a" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("product"));

    let (status, body) = post(
        &app,
        "/prices/",
        json!({ "product_id": product, "supermarket_id": 999, "price": 100.0, "recorded_by": "a" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("supermarket"));

    let (status, body) = post(
        &app,
        "/prices/",
        json!({ "product_id": product, "supermarket_id": store, "price": 100.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("recorded_by"), "{body}");

    let (_, body) = get(&app, "/prices/").await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_prices_filters() {
    let app = test_app().await;
    let life = create_supermarket(&app, "ライフ", 35.7251, 139.9301).await;
    let aeon = create_supermarket(&app, "イオン", 35.6936, 139.9106).await;
    let eggs = create_product(&app, "卵", "卵").await;
    let milk = create_product(&app, "牛乳", "乳製品").await;

    record_price(&app, eggs, life, 228.0).await;
    record_price(&app, eggs, aeon, 218.0).await;
    record_price(&app, milk, life, 198.0).await;
    record_price(&app, eggs, life, 238.0).await;

    let (_, body) = get(&app, "/prices/").await;
    assert_eq!(body.as_array().unwrap().len(), 4);

    let (_, body) = get(&app, &format!("/prices?product_id={eggs}")).await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, body) = get(&app, &format!("/prices/?product_id={eggs}&supermarket_id={life}")).await;
    let prices: Vec<f64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["price"].as_f64().unwrap())
        .collect();
    assert_eq!(prices, vec![228.0, 238.0]);

    let (_, body) = get(&app, "/prices/?skip=3&limit=10").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_compare_prices_sorted_ascending() {
    let app = test_app().await;
    let a = create_supermarket(&app, "イオン", 35.6936, 139.9106).await;
    let b = create_supermarket(&app, "ライフ", 35.7251, 139.9301).await;
    let c = create_supermarket(&app, "西友", 35.6938, 139.7034).await;
    let product = create_product(&app, "食パン", "パン").await;

    record_price(&app, product, a, 320.0).await;
    record_price(&app, product, b, 180.0).await;
    record_price(&app, product, c, 250.0).await;

    let (status, body) = get(&app, &format!("/prices/compare/{product}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product"], "食パン");

    let prices = body["prices"].as_array().unwrap();
    let values: Vec<f64> = prices.iter().map(|p| p["price"].as_f64().unwrap()).collect();
    assert_eq!(values, vec![180.0, 250.0, 320.0]);
    assert_eq!(prices[0]["supermarket"], "ライフ");
    assert_eq!(prices[0]["address"], "ライフ 住所");
    assert_eq!(prices[0]["unit"], "each");
    assert!(prices[0]["recorded_at"].is_string());
}

#[tokio::test]
async fn test_compare_prices_not_found() {
    let app = test_app().await;
    let product = create_product(&app, "バター", "乳製品").await;

    let (status, body) = get(&app, &format!("/prices/compare/{product}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "no prices recorded for product");

    let (status, body) = get(&app, "/prices/compare/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "product not found");
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = test_app().await;

    let request = Request::builder()
        .uri("/supermarkets/")
        .header(header::ORIGIN, "http://localhost:19006")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

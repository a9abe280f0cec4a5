//! End-to-end HTTP flows through the real router, session identity and
//! password hashing, backed by the in-memory store.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use marketplace_api::config::Config;
use marketplace_api::domain::ordering::TransitionPolicy;
use marketplace_api::infrastructure::config::Container;
use marketplace_api::infrastructure::http::create_router;
use marketplace_api::infrastructure::persistence::InMemoryStore;

fn app_with(policy: TransitionPolicy) -> Router {
    let mut config = Config::default();
    config.auth.hash_memory_kib = 8;
    config.auth.hash_iterations = 1;
    config.orders.transition_policy = policy;
    let container = Container::new(Arc::new(InMemoryStore::new()), &config).unwrap();
    create_router(container.app_state())
}

fn app() -> Router {
    app_with(TransitionPolicy::Permissive)
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn register(app: &Router, email: &str, role: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": "correct-horse",
            "name": "Test User",
            "phone": "555-0101",
            "role": role,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["token"].as_str().unwrap().to_string()
}

/// Register a merchant with one shop and one product; returns
/// `(merchant_token, shop_id, product_id)`.
async fn stocked_shop(app: &Router, stock: i64) -> (String, i64, i64) {
    let merchant = register(app, "baker@example.com", "shop").await;

    let (status, shop) = call(
        app,
        Method::POST,
        "/shops",
        Some(&merchant),
        Some(json!({ "name": "Corner Bakery", "address": "1 Main St" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{shop}");
    let shop_id = shop["id"].as_i64().unwrap();

    let (status, product) = call(
        app,
        Method::POST,
        "/products",
        Some(&merchant),
        Some(json!({ "name": "Sourdough", "price": "4.50", "stock": stock })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{product}");
    (merchant, shop_id, product["id"].as_i64().unwrap())
}

#[tokio::test]
async fn register_login_me_logout() {
    let app = app();
    register(&app, "Ada@Example.com", "customer").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "correct-horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, me) = call(&app, Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "ada@example.com");
    assert_eq!(me["role"], "customer");
    assert!(me.get("password_hash").is_none());

    let (status, _) = call(&app, Method::POST, "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(&app, Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn wrong_password_and_duplicate_email() {
    let app = app();
    register(&app, "kim@example.com", "customer").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "kim@example.com", "password": "nope-nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");

    let (status, body) = call(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": "kim@example.com", "password": "another-one", "name": "Kim" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "EMAIL_TAKEN");
}

#[tokio::test]
async fn admin_self_registration_is_refused() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "email": "root@example.com",
            "password": "correct-horse",
            "name": "Root",
            "role": "admin",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn place_order_and_drive_it_to_delivery() {
    let app = app();
    let (merchant, shop_id, product_id) = stocked_shop(&app, 5).await;
    let customer = register(&app, "eve@example.com", "customer").await;

    let (status, order) = call(
        &app,
        Method::POST,
        "/orders",
        Some(&customer),
        Some(json!({
            "shop_id": shop_id,
            "items": [{ "product_id": product_id, "quantity": 2 }],
            "note": "ring twice",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{order}");
    assert_eq!(order["status"], "pending");
    assert_eq!(order["total_amount"], "9.00");
    assert_eq!(order["items"][0]["price"], "4.50");
    assert_eq!(order["shop"]["name"], "Corner Bakery");
    let order_id = order["id"].as_i64().unwrap();

    let (_, product) = call(&app, Method::GET, &format!("/products/{product_id}"), None, None).await;
    assert_eq!(product["stock"], 3);

    let (status, listed) = call(&app, Method::GET, "/orders", Some(&merchant), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["orders"].as_array().unwrap().len(), 1);

    for next in ["confirmed", "preparing", "ready", "delivered"] {
        let (status, updated) = call(
            &app,
            Method::PUT,
            &format!("/orders/{order_id}/status"),
            Some(&merchant),
            Some(json!({ "status": next })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{updated}");
        assert_eq!(updated["status"], next);
    }

    let (status, fetched) = call(
        &app,
        Method::GET,
        &format!("/orders/{order_id}"),
        Some(&customer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["status"], "delivered");
}

#[tokio::test]
async fn insufficient_stock_reports_details() {
    let app = app();
    let (_, shop_id, product_id) = stocked_shop(&app, 1).await;
    let customer = register(&app, "sam@example.com", "customer").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/orders",
        Some(&customer),
        Some(json!({
            "shop_id": shop_id,
            "items": [{ "product_id": product_id, "quantity": 3 }],
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");
    assert_eq!(body["details"]["product_id"], product_id);
    assert_eq!(body["details"]["requested"], 3);
    assert_eq!(body["details"]["available"], 1);
    assert_eq!(body["retryable"], false);

    let (_, orders) = call(&app, Method::GET, "/orders", Some(&customer), None).await;
    assert!(orders["orders"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn empty_cart_and_zero_quantity_are_bad_requests() {
    let app = app();
    let (_, shop_id, product_id) = stocked_shop(&app, 4).await;
    let customer = register(&app, "lee@example.com", "customer").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/orders",
        Some(&customer),
        Some(json!({ "shop_id": shop_id, "items": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EMPTY_ORDER");

    let (status, body) = call(
        &app,
        Method::POST,
        "/orders",
        Some(&customer),
        Some(json!({
            "shop_id": shop_id,
            "items": [{ "product_id": product_id, "quantity": 0 }],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_QUANTITY");
}

#[tokio::test]
async fn strict_policy_rejects_backward_moves() {
    let app = app_with(TransitionPolicy::Strict);
    let (merchant, shop_id, product_id) = stocked_shop(&app, 2).await;
    let customer = register(&app, "max@example.com", "customer").await;
    let (_, order) = call(
        &app,
        Method::POST,
        "/orders",
        Some(&customer),
        Some(json!({
            "shop_id": shop_id,
            "items": [{ "product_id": product_id, "quantity": 1 }],
        })),
    )
    .await;
    let uri = format!("/orders/{}/status", order["id"]);

    let (status, _) = call(
        &app,
        Method::PUT,
        &uri,
        Some(&merchant),
        Some(json!({ "status": "confirmed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(
        &app,
        Method::PUT,
        &uri,
        Some(&merchant),
        Some(json!({ "status": "ready" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");

    let (status, body) = call(
        &app,
        Method::PUT,
        &uri,
        Some(&merchant),
        Some(json!({ "status": "pending" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");

    let (status, body) = call(
        &app,
        Method::PUT,
        &uri,
        Some(&merchant),
        Some(json!({ "status": "shipped" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_STATUS");
}

#[tokio::test]
async fn deleted_products_leave_the_catalog() {
    let app = app();
    let (merchant, shop_id, product_id) = stocked_shop(&app, 3).await;

    let (status, body) = call(
        &app,
        Method::DELETE,
        &format!("/products/{product_id}"),
        Some(&merchant),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, body) = call(&app, Method::GET, &format!("/products/{product_id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "PRODUCT_NOT_FOUND");

    let (_, listed) = call(
        &app,
        Method::GET,
        &format!("/shops/{shop_id}/products"),
        None,
        None,
    )
    .await;
    assert!(listed["products"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn customer_cannot_touch_order_status_even_with_garbage_body() {
    let app = app();
    let (_, shop_id, product_id) = stocked_shop(&app, 2).await;
    let customer = register(&app, "ida@example.com", "customer").await;
    let (_, order) = call(
        &app,
        Method::POST,
        "/orders",
        Some(&customer),
        Some(json!({
            "shop_id": shop_id,
            "items": [{ "product_id": product_id, "quantity": 1 }],
        })),
    )
    .await;

    let request = Request::builder()
        .method(Method::PUT)
        .uri(format!("/orders/{}/status", order["id"]))
        .header(header::AUTHORIZATION, format!("Bearer {customer}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"status\":"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let (_, fetched) = call(
        &app,
        Method::GET,
        &format!("/orders/{}", order["id"]),
        Some(&customer),
        None,
    )
    .await;
    assert_eq!(fetched["status"], "pending");
}

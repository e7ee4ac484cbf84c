//! Integration tests for the API.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

use item_service::api::create_router;
use item_service::app::AppState;
use item_service::domain::{ErrorResponse, HealthResponse, HealthStatus, Item, MessageResponse};
use item_service::test_utils::MockItemRepository;

fn create_test_state() -> Arc<AppState> {
    let repo = Arc::new(MockItemRepository::new());
    Arc::new(AppState::new(repo))
}

fn post_item(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/items")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn put_item(id: i64, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(format!("/items/{}", id))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: impl AsRef<str>) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri.as_ref())
        .body(Body::empty())
        .unwrap()
}

fn delete(id: i64) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(format!("/items/{}", id))
        .body(Body::empty())
        .unwrap()
}

async fn body_as<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_create_item_returns_201() {
    let router = create_router(create_test_state());

    let response = router
        .oneshot(post_item(json!({"name": "Widget", "price": 9.99})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let item: Item = body_as(response).await;
    assert!(item.id > 0);
    assert_eq!(item.name, "Widget");
    assert_eq!(item.price, 9.99);
    assert_eq!(item.created_at, item.updated_at);
    assert!(item.deleted_at.is_none());
}

#[tokio::test]
async fn test_create_item_validation_errors() {
    let router = create_router(create_test_state());

    // 2-character name
    let response = router
        .clone()
        .oneshot(post_item(json!({"name": "ab", "price": 9.99})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = body_as(response).await;
    assert_eq!(body.error.r#type, "validation_error");

    // Zero price
    let response = router
        .clone()
        .oneshot(post_item(json!({"name": "Widget", "price": 0.0})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Over-long description
    let response = router
        .oneshot(post_item(
            json!({"name": "Widget", "description": "d".repeat(501), "price": 9.99}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_item_not_found() {
    let router = create_router(create_test_state());

    let response = router.oneshot(get("/items/9999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: ErrorResponse = body_as(response).await;
    assert_eq!(body.error.r#type, "not_found");
}

#[tokio::test]
async fn test_full_item_lifecycle_flow() {
    let router = create_router(create_test_state());

    // 1. Create
    let response = router
        .clone()
        .oneshot(post_item(
            json!({"name": "Lifecycle Item", "description": "First draft", "price": 5.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Item = body_as(response).await;

    // 2. Read it back
    let response = router
        .clone()
        .oneshot(get(format!("/items/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Item = body_as(response).await;
    assert_eq!(fetched, created);

    // 3. Update
    let response = router
        .clone()
        .oneshot(put_item(
            created.id,
            json!({"name": "Lifecycle Item v2", "price": 7.5}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Item = body_as(response).await;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Lifecycle Item v2");
    assert_eq!(updated.description, None);
    assert_eq!(updated.price, 7.5);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);

    // 4. List shows it
    let response = router.clone().oneshot(get("/items")).await.unwrap();
    let items: Vec<Item> = body_as(response).await;
    assert!(items.iter().any(|i| i.id == created.id));

    // 5. Delete
    let response = router.clone().oneshot(delete(created.id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: MessageResponse = body_as(response).await;
    assert_eq!(body.message, "item deleted successfully");

    // 6. Gone from reads, with the deleted kind, and immutable
    let response = router
        .clone()
        .oneshot(get(format!("/items/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: ErrorResponse = body_as(response).await;
    assert_eq!(body.error.r#type, "already_deleted");

    let response = router
        .clone()
        .oneshot(put_item(created.id, json!({"name": "Zombie", "price": 1.0})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = router.clone().oneshot(delete(created.id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // 7. List no longer shows it
    let response = router.oneshot(get("/items")).await.unwrap();
    let items: Vec<Item> = body_as(response).await;
    assert!(items.iter().all(|i| i.id != created.id));
}

#[tokio::test]
async fn test_delete_unknown_item_is_404() {
    let router = create_router(create_test_state());

    let response = router.oneshot(delete(9999)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_validation_rejected_before_store() {
    let repo = Arc::new(MockItemRepository::new());
    let state = Arc::new(AppState::new(Arc::clone(&repo) as _));
    let router = create_router(state);

    let response = router
        .oneshot(put_item(1, json!({"name": "ab", "price": 1.0})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(repo.call_count(), 0);
}

#[tokio::test]
async fn test_internal_error_hides_cause() {
    let repo = Arc::new(MockItemRepository::failing(
        "password authentication failed for user postgres",
    ));
    let state = Arc::new(AppState::new(repo));
    let router = create_router(state);

    let response = router.oneshot(get("/items")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: ErrorResponse = body_as(response).await;
    assert_eq!(body.error.r#type, "internal_error");
    assert_eq!(body.error.message, "internal server error");
}

#[tokio::test]
async fn test_health_endpoint() {
    let router = create_router(create_test_state());

    let response = router.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health: HealthResponse = body_as(response).await;
    assert_eq!(health.status, HealthStatus::Healthy);
    assert_eq!(health.database, HealthStatus::Healthy);
}

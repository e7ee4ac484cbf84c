//! Request-safety flows through the full router: rate-limit admission
//! and deadline enforcement.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

use item_service::api::{RequestSafetyConfig, create_router_with_safety};
use item_service::app::AppState;
use item_service::domain::{ErrorResponse, Item, RateLimitResponse};
use item_service::test_utils::{MockItemRepository, mocks::MockConfig};

fn config(timeout: Duration, rps: u32, burst: u32) -> RequestSafetyConfig {
    RequestSafetyConfig {
        timeout,
        rate_limit_rps: rps,
        rate_limit_burst: burst,
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_101_requests_against_full_100_bucket_reject_exactly_one() {
    let state = Arc::new(AppState::new(Arc::new(MockItemRepository::new())));
    // Refill of 1/s is negligible over the burst below, so the fresh
    // 100-token bucket admits exactly 100 requests.
    let router = create_router_with_safety(state, config(Duration::from_secs(10), 1, 100));

    let mut rejected = 0;
    for _ in 0..101 {
        let response = router.clone().oneshot(get("/health")).await.unwrap();
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            rejected += 1;
        }
    }

    assert_eq!(rejected, 1);
}

#[tokio::test]
async fn test_rejected_request_never_reaches_the_service() {
    let repo = Arc::new(MockItemRepository::new());
    let state = Arc::new(AppState::new(Arc::clone(&repo) as _));
    let router = create_router_with_safety(state, config(Duration::from_secs(10), 1, 1));

    let first = router.clone().oneshot(get("/items")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(repo.call_count(), 1);

    let second = router.oneshot(get("/items")).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    // Rejected at admission: no store call happened.
    assert_eq!(repo.call_count(), 1);

    let body_bytes = second.into_body().collect().await.unwrap().to_bytes();
    let body: RateLimitResponse = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body.error.r#type, "rate_limited");
}

#[tokio::test]
async fn test_slow_store_call_times_out_instead_of_hanging() {
    // Every store call takes 500ms against a 50ms deadline.
    let repo = Arc::new(MockItemRepository::with_config(
        MockConfig::success().with_latency(500),
    ));
    let state = Arc::new(AppState::new(repo));
    let router = create_router_with_safety(state, config(Duration::from_millis(50), 100, 100));

    let started = std::time::Instant::now();
    let response = router.oneshot(get("/items")).await.unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    // The guard answered at the deadline without waiting for the store.
    assert!(started.elapsed() < Duration::from_millis(400));

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: ErrorResponse = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body.error.r#type, "timeout");
}

#[tokio::test]
async fn test_fast_requests_unaffected_by_guards() {
    let state = Arc::new(AppState::new(Arc::new(MockItemRepository::new())));
    let router = create_router_with_safety(state, config(Duration::from_secs(10), 100, 100));

    let create = Request::builder()
        .method("POST")
        .uri("/items")
        .header("Content-Type", "application/json")
        .body(Body::from(
            json!({"name": "Widget", "price": 9.99}).to_string(),
        ))
        .unwrap();

    let response = router.clone().oneshot(create).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let item: Item = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(item.created_at, item.updated_at);

    // Taxonomy errors pass through the guards unchanged.
    let response = router.oneshot(get("/items/9999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

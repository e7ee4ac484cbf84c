//! HTTP routing configuration with request-safety guards.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::app::AppState;

use super::handlers::{
    create_item_handler, delete_item_handler, get_item_handler, health_check_handler,
    list_items_handler, update_item_handler,
};
use super::middleware::{
    RequestSafetyConfig, RequestSafetyState, rate_limit_middleware, timeout_middleware,
};

/// Create the router with the default request-safety configuration.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    create_router_with_safety(app_state, RequestSafetyConfig::default())
}

/// Create the router with an explicit request-safety configuration.
///
/// Guard order, outermost first: trace, rate limit, timeout. Admission
/// control runs before the deadline clock starts, and a rejected request
/// never reaches the timeout guard or a handler. Both guards wrap every
/// route, health included.
pub fn create_router_with_safety(app_state: Arc<AppState>, config: RequestSafetyConfig) -> Router {
    let safety = Arc::new(RequestSafetyState::new(config));

    let trace = ServiceBuilder::new().layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    let items_routes = Router::new()
        .route("/", post(create_item_handler).get(list_items_handler))
        .route(
            "/{id}",
            get(get_item_handler)
                .put(update_item_handler)
                .delete(delete_item_handler),
        );

    let health_routes = Router::new().route("/", get(health_check_handler));

    Router::new()
        .nest("/items", items_routes)
        .nest("/health", health_routes)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&safety),
            timeout_middleware,
        ))
        .layer(middleware::from_fn_with_state(safety, rate_limit_middleware))
        .layer(trace)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockItemRepository;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn test_router() -> Router {
        let repo = Arc::new(MockItemRepository::new());
        create_router(Arc::new(AppState::new(repo)))
    }

    #[tokio::test]
    async fn test_health_route_through_guards() {
        let router = test_router();

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let router = test_router();

        let request = Request::builder()
            .uri("/nonexistent")
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

//! HTTP request handlers.
//!
//! Thin transport adapter: binds typed payloads and path ids to service
//! calls and maps taxonomy errors back to status codes.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;

use crate::app::AppState;
use crate::domain::{
    CreateItemRequest, ErrorDetail, ErrorResponse, HealthResponse, Item, ItemError, ItemId,
    MessageResponse, UpdateItemRequest,
};

/// Create a new item.
pub async fn create_item_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<Item>), ItemError> {
    let item = state.service.create_item(&payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// List all active items.
pub async fn list_items_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Item>>, ItemError> {
    let items = state.service.get_all_items().await?;
    Ok(Json(items))
}

/// Get a single active item by id.
pub async fn get_item_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ItemId>,
) -> Result<Json<Item>, ItemError> {
    let item = state.service.get_item(id).await?;
    Ok(Json(item))
}

/// Replace the mutable fields of an active item.
pub async fn update_item_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ItemId>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<Json<Item>, ItemError> {
    let item = state.service.update_item(id, &payload).await?;
    Ok(Json(item))
}

/// Tombstone an active item.
pub async fn delete_item_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ItemId>,
) -> Result<Json<MessageResponse>, ItemError> {
    state.service.delete_item(id).await?;
    Ok(Json(MessageResponse {
        message: "item deleted successfully".to_string(),
    }))
}

/// Report service health.
pub async fn health_check_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let health = state.service.health_check().await;
    Json(health)
}

impl IntoResponse for ItemError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_type, message) = match &self {
            ItemError::Validation(_) => {
                (StatusCode::BAD_REQUEST, "validation_error", self.to_string())
            }
            ItemError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            ItemError::AlreadyDeleted(_) => {
                (StatusCode::CONFLICT, "already_deleted", self.to_string())
            }
            // The cause goes to the log, never to the caller.
            ItemError::Internal(cause) => {
                error!(cause = %cause, "Internal error serving request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                r#type: error_type.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}

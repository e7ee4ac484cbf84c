use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Store-assigned identifier for items.
pub type ItemId = i64;

/// Core domain entity. A non-null `deleted_at` marks the row as a
/// tombstone: physically stored, logically absent from normal reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Item {
    /// An item is either active or tombstoned; there is no third state.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Insert payload handed to the store. The service has already validated
/// the fields and stamped both timestamps; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Update payload handed to the store: the mutable fields of an active
/// record plus the freshly stamped `updated_at`. Validated by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemUpdate {
    pub id: ItemId,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a new item.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(length(min = 3, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(range(exclusive_min = 0.0))]
    pub price: f64,
}

impl CreateItemRequest {
    pub fn new(name: String, price: f64) -> Self {
        Self {
            name,
            description: None,
            price,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }
}

/// Request payload for replacing the mutable fields of an existing item.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateItemRequest {
    #[validate(length(min = 3, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(range(exclusive_min = 0.0))]
    pub price: f64,
}

/// Error payload returned by the API layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub r#type: String,
    pub message: String,
}

/// 429 payload emitted by the rate-limit guard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitResponse {
    pub error: ErrorDetail,
    pub retry_after: u64,
}

/// Confirmation payload for operations without a meaningful body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Health check status for services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Health check response for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub database: HealthStatus,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    #[must_use]
    pub fn new(database: HealthStatus) -> Self {
        Self {
            status: database.clone(),
            database,
            timestamp: Utc::now(),
        }
    }
}

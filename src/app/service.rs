//! Application service layer.
//!
//! This module contains the business rules for the item lifecycle:
//! input validation and timestamp stamping, with persistence delegated
//! to the `ItemRepository` abstraction.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::domain::{
    CreateItemRequest, HealthResponse, HealthStatus, Item, ItemError, ItemId, ItemRepository,
    ItemUpdate, NewItem, UpdateItemRequest,
};

/// Business-rule layer sitting directly above the store.
///
/// Validates input and stamps UTC timestamps before delegating to the
/// repository. Holds no mutable state of its own, and never swallows or
/// reclassifies repository errors: whatever taxonomy kind the store
/// produces is what the caller sees.
pub struct ItemService {
    repo: Arc<dyn ItemRepository>,
}

impl ItemService {
    #[must_use]
    pub fn new(repo: Arc<dyn ItemRepository>) -> Self {
        Self { repo }
    }

    /// Validates the request, stamps `created_at == updated_at`, and
    /// persists a new active item.
    ///
    /// # Errors
    ///
    /// `Validation` if any field constraint is violated, otherwise
    /// whatever the store returns.
    #[instrument(skip(self, request), fields(item_name = %request.name))]
    pub async fn create_item(&self, request: &CreateItemRequest) -> Result<Item, ItemError> {
        request.validate().map_err(|e| {
            warn!(error = %e, "Validation failed for create item request");
            ItemError::from(e)
        })?;

        let now = Utc::now();
        let item = self
            .repo
            .create(NewItem {
                name: request.name.clone(),
                description: request.description.clone(),
                price: request.price,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(item_id = item.id, "Item created");
        Ok(item)
    }

    /// Returns all active items.
    #[instrument(skip(self))]
    pub async fn get_all_items(&self) -> Result<Vec<Item>, ItemError> {
        self.repo.get_all().await
    }

    /// Returns the active item with the given id.
    #[instrument(skip(self))]
    pub async fn get_item(&self, id: ItemId) -> Result<Item, ItemError> {
        self.repo.get_by_id(id).await
    }

    /// Validates the request, stamps `updated_at`, and overwrites the
    /// mutable fields of the active record.
    ///
    /// Returns the post-update record as read back from storage.
    #[instrument(skip(self, request), fields(item_name = %request.name))]
    pub async fn update_item(
        &self,
        id: ItemId,
        request: &UpdateItemRequest,
    ) -> Result<Item, ItemError> {
        request.validate().map_err(|e| {
            warn!(error = %e, "Validation failed for update item request");
            ItemError::from(e)
        })?;

        self.repo
            .update(ItemUpdate {
                id,
                name: request.name.clone(),
                description: request.description.clone(),
                price: request.price,
                updated_at: Utc::now(),
            })
            .await
    }

    /// Tombstones the active item with the given id.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: ItemId) -> Result<(), ItemError> {
        self.repo.delete(id).await?;
        info!(item_id = id, "Item deleted");
        Ok(())
    }

    /// Reports storage connectivity.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> HealthResponse {
        let database = match self.repo.health_check().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => {
                warn!(error = ?e, "Database health check failed");
                HealthStatus::Unhealthy
            }
        };

        HealthResponse::new(database)
    }
}

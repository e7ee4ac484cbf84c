//! Mock implementations for testing.
//!
//! An in-memory implementation of the item repository that honors the
//! full store contract, including tombstone semantics and miss
//! classification, plus configurable failure and latency injection.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::{Item, ItemError, ItemId, ItemRepository, ItemUpdate, NewItem};

/// Configuration for mock behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// If true, operations will fail with `Internal`.
    pub should_fail: bool,
    /// Custom error message for failures.
    pub error_message: Option<String>,
    /// Simulated latency in milliseconds, applied to every operation.
    pub latency_ms: Option<u64>,
}

impl MockConfig {
    /// Creates a config that always succeeds.
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    /// Creates a config that always fails.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
            latency_ms: None,
        }
    }

    /// Adds simulated latency.
    #[must_use]
    pub fn with_latency(mut self, ms: u64) -> Self {
        self.latency_ms = Some(ms);
        self
    }
}

/// Mock item repository for testing.
///
/// Uses an in-memory HashMap keyed by id. Deleted items stay in the map
/// as tombstones, so `AlreadyDeleted` vs `NotFound` classification
/// behaves exactly like the real store.
///
/// # Example
///
/// ```
/// use item_service::test_utils::{MockItemRepository, mocks::MockConfig};
///
/// // A mock that succeeds
/// let mock = MockItemRepository::new();
///
/// // A mock whose every call takes 50ms (for timeout tests)
/// let slow = MockItemRepository::with_config(MockConfig::success().with_latency(50));
/// ```
pub struct MockItemRepository {
    storage: Arc<Mutex<HashMap<ItemId, Item>>>,
    next_id: AtomicI64,
    config: MockConfig,
    call_count: AtomicU64,
    is_healthy: AtomicBool,
}

impl MockItemRepository {
    /// Creates a new mock with default (success) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    /// Creates a new mock with the given configuration.
    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            storage: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicI64::new(1),
            config,
            call_count: AtomicU64::new(0),
            is_healthy: AtomicBool::new(true),
        }
    }

    /// Creates a mock that always fails.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    /// Gets the number of times any method was called.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Sets the health status.
    pub fn set_healthy(&self, healthy: bool) {
        self.is_healthy.store(healthy, Ordering::Relaxed);
    }

    /// Gets every stored row, tombstones included.
    pub fn stored_items(&self) -> Vec<Item> {
        self.storage.lock().unwrap().values().cloned().collect()
    }

    /// Clears all stored items.
    pub fn clear(&self) {
        self.storage.lock().unwrap().clear();
    }

    async fn begin_call(&self) -> Result<(), ItemError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        if let Some(ms) = self.config.latency_ms {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }

        if self.config.should_fail {
            let msg = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock repository error".to_string());
            return Err(ItemError::Internal(msg));
        }
        Ok(())
    }
}

impl Default for MockItemRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemRepository for MockItemRepository {
    async fn health_check(&self) -> Result<(), ItemError> {
        self.begin_call().await?;

        if !self.is_healthy.load(Ordering::Relaxed) {
            return Err(ItemError::Internal(
                "Mock repository unhealthy".to_string(),
            ));
        }
        Ok(())
    }

    async fn create(&self, item: NewItem) -> Result<Item, ItemError> {
        self.begin_call().await?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let item = Item {
            id,
            name: item.name,
            description: item.description,
            price: item.price,
            created_at: item.created_at,
            updated_at: item.updated_at,
            deleted_at: None,
        };

        let mut storage = self.storage.lock().unwrap();
        storage.insert(id, item.clone());

        Ok(item)
    }

    async fn get_all(&self) -> Result<Vec<Item>, ItemError> {
        self.begin_call().await?;

        let storage = self.storage.lock().unwrap();
        let mut items: Vec<Item> = storage.values().filter(|i| i.is_active()).cloned().collect();
        items.sort_by_key(|i| i.id);
        Ok(items)
    }

    async fn get_by_id(&self, id: ItemId) -> Result<Item, ItemError> {
        self.begin_call().await?;

        let storage = self.storage.lock().unwrap();
        match storage.get(&id) {
            Some(item) if item.is_active() => Ok(item.clone()),
            Some(_) => Err(ItemError::AlreadyDeleted(id)),
            None => Err(ItemError::NotFound(id)),
        }
    }

    async fn update(&self, update: ItemUpdate) -> Result<Item, ItemError> {
        self.begin_call().await?;

        // The lock makes the liveness check and the mutation one atomic
        // step, mirroring the store's single conditional statement.
        let mut storage = self.storage.lock().unwrap();
        match storage.get_mut(&update.id) {
            Some(item) if item.is_active() => {
                item.name = update.name;
                item.description = update.description;
                item.price = update.price;
                item.updated_at = update.updated_at;
                Ok(item.clone())
            }
            Some(_) => Err(ItemError::AlreadyDeleted(update.id)),
            None => Err(ItemError::NotFound(update.id)),
        }
    }

    async fn delete(&self, id: ItemId) -> Result<(), ItemError> {
        self.begin_call().await?;

        let mut storage = self.storage.lock().unwrap();
        match storage.get_mut(&id) {
            Some(item) if item.is_active() => {
                item.deleted_at = Some(Utc::now());
                Ok(())
            }
            Some(_) => Err(ItemError::AlreadyDeleted(id)),
            None => Err(ItemError::NotFound(id)),
        }
    }
}

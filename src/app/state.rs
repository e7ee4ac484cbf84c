//! Application state management.
//!
//! Shared application state accessible to all request handlers via
//! Axum's State extractor.

use std::sync::Arc;

use crate::domain::ItemRepository;

use super::service::ItemService;

/// Shared application state for the Axum web server.
///
/// All contained types are wrapped in `Arc` and implement `Send + Sync`,
/// making `AppState` safe to share across async tasks. Handlers only see
/// the `ItemRepository` trait, never a concrete store.
#[derive(Clone)]
pub struct AppState {
    /// The application service containing business rules.
    pub service: Arc<ItemService>,

    /// Repository for persistence operations.
    pub repo: Arc<dyn ItemRepository>,
}

impl AppState {
    /// Creates the state and wires the `ItemService` to the repository.
    #[must_use]
    pub fn new(repo: Arc<dyn ItemRepository>) -> Self {
        let service = Arc::new(ItemService::new(Arc::clone(&repo)));
        Self { service, repo }
    }

    /// Creates the state with a pre-configured service, for tests.
    #[must_use]
    pub fn with_service(service: Arc<ItemService>, repo: Arc<dyn ItemRepository>) -> Self {
        Self { service, repo }
    }
}

//! Domain traits defining the persistence contract.

use async_trait::async_trait;

use super::error::ItemError;
use super::types::{Item, ItemId, ItemUpdate, NewItem};

/// Persistence contract for items, with soft-delete semantics.
///
/// Implementations must keep tombstoned rows physically stored but
/// logically absent: reads and writes only see active records, and a miss
/// is always classified as `NotFound` (no row with that id ever existed)
/// or `AlreadyDeleted` (the row exists but is tombstoned). The two kinds
/// are never collapsed.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Check storage connectivity.
    async fn health_check(&self) -> Result<(), ItemError>;

    /// Persist a new active item and assign its id.
    ///
    /// The caller has already validated the fields and stamped both
    /// timestamps; the store does not re-validate business rules.
    async fn create(&self, item: NewItem) -> Result<Item, ItemError>;

    /// Return all active items. Tombstoned rows are excluded.
    async fn get_all(&self) -> Result<Vec<Item>, ItemError>;

    /// Return the active item with the given id.
    async fn get_by_id(&self, id: ItemId) -> Result<Item, ItemError>;

    /// Overwrite the mutable fields of the active record matching
    /// `update.id` and return the post-update record.
    ///
    /// The existence check and the conditional write must be evaluated as
    /// one consistent operation with respect to concurrent deletes: an
    /// update must never land on a row that was concurrently tombstoned,
    /// and a no-op must always surface as `NotFound` or `AlreadyDeleted`.
    async fn update(&self, update: ItemUpdate) -> Result<Item, ItemError>;

    /// Tombstone the active record with the given id.
    ///
    /// Deleting an already-tombstoned item fails `AlreadyDeleted`, never
    /// silently succeeds.
    async fn delete(&self, id: ItemId) -> Result<(), ItemError>;
}

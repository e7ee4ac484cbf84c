//! Domain layer containing core business types, traits, and error definitions.

pub mod error;
pub mod traits;
pub mod types;

pub use error::ItemError;
pub use traits::ItemRepository;
pub use types::{
    CreateItemRequest, ErrorDetail, ErrorResponse, HealthResponse, HealthStatus, Item, ItemId,
    ItemUpdate, MessageResponse, NewItem, RateLimitResponse, UpdateItemRequest,
};

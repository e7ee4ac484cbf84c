//! The API layer, containing web handlers, request-safety middleware,
//! and routing.

pub mod handlers;
pub mod middleware;
pub mod router;

pub use middleware::{RequestSafetyConfig, RequestSafetyState};
pub use router::{create_router, create_router_with_safety};

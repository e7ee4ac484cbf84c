//! Infrastructure layer implementations.

pub mod database;
pub mod observability;

pub use database::{PostgresConfig, PostgresItemStore};
pub use observability::init_tracing;

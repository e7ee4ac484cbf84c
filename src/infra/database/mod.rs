//! Database adapters.

pub mod postgres;

pub use postgres::{PostgresConfig, PostgresItemStore};

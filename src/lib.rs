//! Item Lifecycle Service
//!
//! A single-resource CRUD service over HTTP with soft-delete-aware
//! persistence and per-request safety guards (timeout enforcement and
//! rate limiting).
//!
//! # Architecture Overview
//!
//! This crate is organized into four main layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   API Layer                  │
//! │  HTTP handlers, request-safety guards, routes│
//! ├─────────────────────────────────────────────┤
//! │               Application Layer              │
//! │   Validation, timestamp stamping, delegation │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │   Traits, types, errors (no dependencies)    │
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │     PostgreSQL item store, tracing setup     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Key Behaviors
//!
//! - **Soft delete**: deleting an item stamps a tombstone; the row stays
//!   stored but is logically absent from every normal read and write.
//! - **Disambiguated misses**: a miss is always `NotFound` (no such row
//!   ever) or `AlreadyDeleted` (row exists, tombstoned) — never collapsed.
//! - **Atomic conditional writes**: updates and deletes are single
//!   `WHERE id = .. AND deleted_at IS NULL` statements, so a concurrent
//!   delete can never race an update into a tombstoned row.
//! - **Request safety**: a process-wide token bucket rejects excess
//!   requests with 429 before any work runs, and every admitted request
//!   races a fixed deadline, returning 408 when it elapses.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use item_service::api::create_router;
//! use item_service::app::AppState;
//! use item_service::infra::PostgresItemStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(PostgresItemStore::with_defaults(&database_url).await?);
//!     store.run_migrations().await?;
//!
//!     let state = Arc::new(AppState::new(store));
//!     let router = create_router(state);
//!     axum::serve(listener, router).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod domain;
pub mod infra;

// Test utilities are available in tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

//! Test utilities and mock implementations.
//!
//! This module provides a reusable mock implementation of the item
//! repository for use in unit and integration tests.

pub mod mocks;

pub use mocks::MockItemRepository;

//! Single-item and batch writes.
//!
//! Puts strip null attributes, updates are compiled from keyword arguments into
//! SET/REMOVE/ADD/DELETE clauses, and every single-item write can carry a
//! precondition compiled by [`crate::common::condition`].

/// Batch put and delete in chunks of 25, resubmitting unprocessed requests.
pub mod batch_write_item;

/// Settings shared by every single-item write.
pub mod common;

/// Delete an item by primary key.
pub mod delete_item;

/// Create or replace an item.
pub mod put_item;

/// Update compiler and the update item operation.
pub mod update_item;

//! Reads: single items, batches, and paginated queries and scans.
//!
//! Query and Scan send one page per call; [`iterator::ReadIterator`] drives them
//! page by page.

/// Batch get in chunks of 100, resubmitting unprocessed keys.
pub mod batch_get_item;

/// Settings shared by the read operations.
pub mod common;

/// Get a single item by primary key.
pub mod get_item;

/// Lazy, paginated iteration over query and scan results.
pub mod iterator;

/// One page of a query.
pub mod query;

/// One page of a scan.
pub mod scan;

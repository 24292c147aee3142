#![deny(missing_docs)]

//! # DynamoDB kwargs
//!
//! Keyword-argument expressions and paginated reads for Amazon DynamoDB.
//!
//! ## Overview
//!
//! Callers describe conditions and updates as flat keyword mappings such as
//! `{"age__gte": 18}` or `{"logins__plus": 1}`. This library:
//! - Splits keywords into nested attribute paths and a trailing operator or function
//! - Compiles them into condition, key condition, filter and update expressions
//! - Replaces every name and value with a placeholder allocated once per request
//! - Drives query and scan pagination through a configurable, lazy iterator
//!
//! ## Quick Example
//!
//! ```no_run
//! use dynamodb_kwargs::{common::{Kwargs, key::KeySchema}, config::TableConfig, table::Table};
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let users = Table::new(TableConfig {
//!     name: "users".to_string(),
//!     key_schema: KeySchema {
//!         hash_key: "id".to_string(),
//!         range_key: None,
//!     },
//!     indexes: Vec::new(),
//! });
//! // "SET #n0.#n1 = :v0 ADD #n2 :v1" with the precondition "#n3 <= :v2"
//! users.update(
//!     Kwargs::from([
//!         ("id".to_string(), json!("1")),
//!         ("address__city".to_string(), json!("Rome")),
//!         ("logins__plus".to_string(), json!(1)),
//!     ]),
//!     Kwargs::from([("age__lte".to_string(), json!(30))]),
//! )?;
//! for item in users.query(Kwargs::from([("id".to_string(), json!("1"))]))?.recursive()? {
//!     println!("{:?}", item?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`mod@common`] - Attribute paths, placeholders, conditions, keys and selections
//! - [`mod@read`] - Read operations and the paginated [`read::iterator::ReadIterator`]
//! - [`mod@write`] - Write operations and the update compiler
//! - [`mod@table`] - The keyword-argument façade over one table
//! - [`mod@client`] - The store client seam and its AWS implementation

/// The store client seam and the process-wide shared client.
pub mod client;

/// Common utilities for attribute paths, placeholders, conditions, keys and selections.
pub mod common;

/// Table declarations and client settings.
pub mod config;

/// Error type and result alias.
pub mod error;

/// Read operations for retrieving data from DynamoDB tables.
///
/// This module provides operations for:
/// - Getting individual items by key
/// - Querying items with key conditions
/// - Scanning entire tables
/// - Batch retrieving multiple items
pub mod read;

/// Keyword-argument façade over one table.
pub mod table;

/// Pluggable item validation.
pub mod validation;

/// Write operations for modifying data in DynamoDB tables.
///
/// This module provides operations for:
/// - Putting new items or replacing existing ones
/// - Updating items compiled from keyword arguments
/// - Deleting items by key
/// - Batch writing multiple items
pub mod write;

//! Common building blocks for DynamoDB requests.
//!
//! This module turns caller keyword arguments into typed trees and expression text:
//! attribute paths, placeholder allocation, conditions, key schemas, and projections.

/// Condition compiler for key conditions, filters, and write preconditions.
pub mod condition;

/// Key schema handling for tables and indexes.
pub mod key;

/// Keyword splitting into attribute paths and trailing operator tokens.
pub mod path;

/// Name and value placeholder allocation.
pub mod placeholder;

/// Attribute selection for projection expressions.
pub mod selection;

use crate::error::Result;

use aws_sdk_dynamodb::types;
use indexmap::IndexMap;
use serde::Serialize;
use serde_dynamo::to_attribute_value;
use std::collections;

/// A raw item as stored: attribute name to attribute value.
pub type Item = collections::HashMap<String, types::AttributeValue>;

/// Keyword arguments in the order the caller supplied them.
pub type Kwargs<T> = IndexMap<String, T>;

pub(crate) fn to_attribute_values<T: Serialize>(
    kwargs: Kwargs<T>,
) -> Result<Kwargs<types::AttributeValue>> {
    let mut values = IndexMap::with_capacity(kwargs.len());
    for (key, value) in kwargs {
        values.insert(key, to_attribute_value(value)?);
    }
    Ok(values)
}

/// Drop null attributes, descending into nested maps.
pub(crate) fn remove_nulls(item: Item) -> Item {
    item.into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key, remove_nested_nulls(value)))
        .collect()
}

fn remove_nested_nulls(value: types::AttributeValue) -> types::AttributeValue {
    match value {
        types::AttributeValue::M(map) => types::AttributeValue::M(remove_nulls(map)),
        value => value,
    }
}

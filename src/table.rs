//! Keyword-argument façade over one table.
//!
//! A [`Table`] normalizes keys against its key schema, runs items through its
//! validator, compiles keyword arguments into condition and update expressions, and
//! hands paginated reads out as configuring [`read::iterator::ReadIterator`]s.

use crate::{
    client,
    common::{self, condition, key},
    config,
    error::{Error, Result},
    read, validation, write,
};

use aws_sdk_dynamodb::types;
use serde::{Serialize, de::DeserializeOwned};
use serde_dynamo::{from_item, to_item};
use std::sync;

/// One declared table, bound to a client and a validator.
///
/// ```rust,no_run
/// use dynamodb_kwargs::{common::{Kwargs, key::KeySchema}, config::TableConfig, table::Table};
/// use serde_json::json;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let users = Table::new(TableConfig {
///     name: "users".to_string(),
///     key_schema: KeySchema {
///         hash_key: "id".to_string(),
///         range_key: None,
///     },
///     indexes: Vec::new(),
/// });
/// users.put(&json!({"id": "1", "name": "John", "logins": 0}))?;
/// users.update(
///     Kwargs::from([
///         ("id".to_string(), json!("1")),
///         ("logins__plus".to_string(), json!(1)),
///     ]),
///     Kwargs::from([("name".to_string(), json!("John"))]),
/// )?;
/// let adults = users
///     .scan(Kwargs::from([("age__gte".to_string(), json!(18))]))?
///     .recursive()?
///     .collect::<Result<Vec<_>, _>>()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Table {
    config: config::TableConfig,
    client: Option<sync::Arc<dyn client::Client>>,
    validator: sync::Arc<dyn validation::Validator>,
}

/// A secondary index of a [`Table`], read with the index key schema.
#[derive(Clone, Copy, Debug)]
pub struct Index<'a> {
    table: &'a Table,
    config: &'a config::IndexConfig,
}

impl Table {
    /// A table using the process-wide client and no validation.
    pub fn new(config: config::TableConfig) -> Self {
        Self {
            config,
            client: None,
            validator: sync::Arc::new(validation::NoValidation),
        }
    }

    /// Use `client` instead of [`client::shared`].
    pub fn with_client(mut self, client: sync::Arc<dyn client::Client>) -> Self {
        self.client = Some(client);
        self
    }

    /// Validate items written to and read from the table.
    pub fn with_validator(mut self, validator: sync::Arc<dyn validation::Validator>) -> Self {
        self.validator = validator;
        self
    }

    /// The table declaration.
    pub fn config(&self) -> &config::TableConfig {
        &self.config
    }

    fn client(&self) -> Result<sync::Arc<dyn client::Client>> {
        match &self.client {
            Some(client) => Ok(client.clone()),
            None => client::shared(),
        }
    }

    fn key<T: Serialize>(&self, fields: common::Kwargs<T>) -> Result<common::Item> {
        self.config
            .key_schema
            .key_from(common::to_attribute_values(fields)?)
    }

    fn dump<T: Serialize>(&self, item: &T) -> Result<common::Item> {
        Ok(self.validator.validate(to_item(item)?, false)?)
    }

    /// Read one item by its full primary key.
    pub fn get<T: Serialize>(
        &self,
        key: common::Kwargs<T>,
        consistent: bool,
    ) -> Result<Option<common::Item>> {
        let get_item = read::get_item::GetItem {
            key: self.key(key)?,
            single_read_args: read::common::SingleReadArgs {
                consistent_read: consistent.then_some(true),
                table_name: self.config.name.clone(),
                ..Default::default()
            },
        };
        get_item
            .send(self.client()?.as_ref())?
            .map(|raw| self.validator.validate(raw, false).map_err(Error::from))
            .transpose()
    }

    /// Like [`Self::get`], deserialized into `T`.
    pub fn get_as<K: Serialize, T: DeserializeOwned>(
        &self,
        key: common::Kwargs<K>,
        consistent: bool,
    ) -> Result<Option<T>> {
        self.get(key, consistent)?
            .map(|item| from_item(item).map_err(Error::from))
            .transpose()
    }

    /// Read many items by primary key, optionally only `attributes` of each.
    ///
    /// Items that do not exist are left out; the order of the result is unspecified.
    pub fn get_batch<T: Serialize>(
        &self,
        keys: Vec<common::Kwargs<T>>,
        consistent: bool,
        attributes: &[&str],
    ) -> Result<Vec<common::Item>> {
        let keys = keys
            .into_iter()
            .map(|key| self.key(key))
            .collect::<Result<Vec<_>>>()?;
        let selection = common::selection::Selection::parse(attributes)?;
        let partial = !selection.is_empty();
        let batch_get_item = read::batch_get_item::BatchGetItem {
            keys,
            single_read_args: read::common::SingleReadArgs {
                consistent_read: consistent.then_some(true),
                selection: Some(selection),
                table_name: self.config.name.clone(),
            },
        };
        batch_get_item
            .send(self.client()?.as_ref())?
            .into_iter()
            .map(|raw| self.validator.validate(raw, partial).map_err(Error::from))
            .collect()
    }

    /// Validate `item` and create or replace it; null attributes are not stored.
    pub fn put<T: Serialize>(&self, item: &T) -> Result<()> {
        let put_item = write::put_item::PutItem {
            item: self.dump(item)?,
            write_args: write::common::WriteArgs {
                table_name: self.config.name.clone(),
                ..Default::default()
            },
        };
        put_item.send(self.client()?.as_ref())
    }

    /// Like [`Self::put`], failing with [`Error::HashKeyExists`] instead of replacing.
    pub fn put_unique<T: Serialize>(&self, item: &T) -> Result<()> {
        let hash_key = common::path::AttributePath::new([self.config.key_schema.hash_key.as_str()])?;
        let put_item = write::put_item::PutItem {
            item: self.dump(item)?,
            write_args: write::common::WriteArgs {
                condition: Some(condition::ConditionNode::NotExists(hash_key)),
                table_name: self.config.name.clone(),
                ..Default::default()
            },
        };
        match put_item.send(self.client()?.as_ref()) {
            Err(Error::ConditionalCheckFailed(_)) => Err(Error::HashKeyExists),
            result => result,
        }
    }

    /// Validate and put many items, 25 per request.
    pub fn put_batch<T: Serialize>(&self, items: &[T]) -> Result<()> {
        let requests = items
            .iter()
            .map(|item| {
                let item = common::remove_nulls(self.dump(item)?);
                Ok(write::batch_write_item::WriteRequest::Put(item))
            })
            .collect::<Result<Vec<_>>>()?;
        self.batch_write(requests)
    }

    /// Delete many items by primary key, 25 per request.
    pub fn delete_batch<T: Serialize>(&self, keys: Vec<common::Kwargs<T>>) -> Result<()> {
        let requests = keys
            .into_iter()
            .map(|key| Ok(write::batch_write_item::WriteRequest::Delete(self.key(key)?)))
            .collect::<Result<Vec<_>>>()?;
        self.batch_write(requests)
    }

    fn batch_write(&self, requests: Vec<write::batch_write_item::WriteRequest>) -> Result<()> {
        let batch_write_item = write::batch_write_item::BatchWriteItem {
            requests,
            table_name: self.config.name.clone(),
        };
        batch_write_item.send(self.client()?.as_ref())
    }

    /// Update the item whose key fields are among `kwargs`, returning the updated attributes.
    ///
    /// The remaining keyword arguments are compiled into update actions and `conditions`
    /// into a precondition; a precondition that does not hold fails with
    /// [`Error::ConditionalCheckFailed`].
    pub fn update<T: Serialize>(
        &self,
        kwargs: common::Kwargs<T>,
        conditions: common::Kwargs<T>,
    ) -> Result<Option<common::Item>> {
        let (key, rest) = self
            .config
            .key_schema
            .split(common::to_attribute_values(kwargs)?)?;
        let actions = write::update_item::parse_all(rest)?;
        let condition = condition::ConditionNode::all(condition::parse_all(
            common::to_attribute_values(conditions)?,
        )?);
        let update_item = write::update_item::UpdateItem {
            key,
            actions,
            write_args: write::common::WriteArgs {
                condition,
                return_values: Some(types::ReturnValue::UpdatedNew),
                table_name: self.config.name.clone(),
            },
        };
        update_item
            .send(self.client()?.as_ref())?
            .map(|raw| self.validator.validate(raw, true).map_err(Error::from))
            .transpose()
    }

    /// Delete one item by its full primary key, if `conditions` hold.
    pub fn delete<T: Serialize>(
        &self,
        key: common::Kwargs<T>,
        conditions: common::Kwargs<T>,
    ) -> Result<()> {
        let delete_item = write::delete_item::DeleteItem {
            key: self.key(key)?,
            write_args: write::common::WriteArgs {
                condition: condition::ConditionNode::all(condition::parse_all(
                    common::to_attribute_values(conditions)?,
                )?),
                table_name: self.config.name.clone(),
                ..Default::default()
            },
        };
        delete_item.send(self.client()?.as_ref())
    }

    /// Query by key: keywords naming a key attribute form the key condition, the others
    /// filter the results.
    pub fn query<T: Serialize>(
        &self,
        kwargs: common::Kwargs<T>,
    ) -> Result<read::iterator::ReadIterator> {
        self.read_query(&self.config.key_schema, None, false, kwargs)
    }

    /// Scan the whole table, filtered by every keyword.
    pub fn scan<T: Serialize>(
        &self,
        kwargs: common::Kwargs<T>,
    ) -> Result<read::iterator::ReadIterator> {
        self.read_scan(None, false, kwargs)
    }

    /// A declared secondary index.
    pub fn index(&self, name: &str) -> Result<Index<'_>> {
        let config = self
            .config
            .index(name)
            .ok_or_else(|| Error::UnknownIndex(name.to_string()))?;
        Ok(Index {
            table: self,
            config,
        })
    }

    fn read_query<T: Serialize>(
        &self,
        key_schema: &key::KeySchema,
        index_name: Option<String>,
        partial: bool,
        kwargs: common::Kwargs<T>,
    ) -> Result<read::iterator::ReadIterator> {
        let (key_nodes, filter_nodes): (Vec<_>, Vec<_>) =
            condition::parse_all(common::to_attribute_values(kwargs)?)?
                .into_iter()
                .partition(|node| node.path().is_some_and(|path| key_schema.is_key_path(path)));
        read::query::check_key_condition(key_schema, &key_nodes)?;
        let key_condition = condition::ConditionNode::all(key_nodes).ok_or_else(|| {
            Error::InvalidKey(format!(
                "query requires an eq condition on hash key `{}`",
                key_schema.hash_key
            ))
        })?;
        let query = read::query::Query {
            key_condition,
            multiple_read_args: read::common::MultipleReadArgs {
                condition: condition::ConditionNode::all(filter_nodes),
                index_name,
                table_name: self.config.name.clone(),
                ..Default::default()
            },
            scan_index_forward: None,
        };
        Ok(
            read::iterator::ReadIterator::new(self.client()?, query.into())
                .validated(self.validator.clone(), partial),
        )
    }

    fn read_scan<T: Serialize>(
        &self,
        index_name: Option<String>,
        partial: bool,
        kwargs: common::Kwargs<T>,
    ) -> Result<read::iterator::ReadIterator> {
        let scan = read::scan::Scan {
            multiple_read_args: read::common::MultipleReadArgs {
                condition: condition::ConditionNode::all(condition::parse_all(
                    common::to_attribute_values(kwargs)?,
                )?),
                index_name,
                table_name: self.config.name.clone(),
                ..Default::default()
            },
        };
        Ok(
            read::iterator::ReadIterator::new(self.client()?, scan.into())
                .validated(self.validator.clone(), partial),
        )
    }
}

impl Index<'_> {
    /// The index declaration.
    pub fn config(&self) -> &config::IndexConfig {
        self.config
    }

    /// Query the index by its own key attributes.
    pub fn query<T: Serialize>(
        &self,
        kwargs: common::Kwargs<T>,
    ) -> Result<read::iterator::ReadIterator> {
        self.table.read_query(
            &self.config.key_schema,
            Some(self.config.name.clone()),
            self.config.projection.is_partial(),
            kwargs,
        )
    }

    /// Scan the whole index.
    pub fn scan<T: Serialize>(
        &self,
        kwargs: common::Kwargs<T>,
    ) -> Result<read::iterator::ReadIterator> {
        self.table.read_scan(
            Some(self.config.name.clone()),
            self.config.projection.is_partial(),
            kwargs,
        )
    }
}

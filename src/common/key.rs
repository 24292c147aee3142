use crate::{
    common::{self, path},
    error::{Error, Result},
};

use aws_sdk_dynamodb::types;

/// Primary key layout of a table or index (partition key and optional sort key).
///
/// ```rust
/// use dynamodb_kwargs::common::key;
///
/// let schema = key::KeySchema {
///     hash_key: "id".to_string(),
///     range_key: Some("created".to_string()),
/// };
/// assert!(schema.is_key("created"));
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct KeySchema {
    /// The partition key attribute.
    pub hash_key: String,
    /// The sort key attribute, for composite primary keys.
    pub range_key: Option<String>,
}

impl KeySchema {
    /// Whether `name` is the partition or sort key attribute.
    pub fn is_key(&self, name: &str) -> bool {
        self.hash_key == name || self.range_key.as_deref() == Some(name)
    }

    /// Whether `path` names a key attribute directly (not a nested attribute below it).
    pub fn is_key_path(&self, path: &path::AttributePath) -> bool {
        path.is_top_level() && self.is_key(path.root())
    }

    /// Build a full primary key, rejecting missing or extra attributes.
    pub fn key_from(&self, fields: common::Kwargs<types::AttributeValue>) -> Result<common::Item> {
        let mut key = common::Item::with_capacity(fields.len());
        for (name, value) in fields {
            if !self.is_key(&name) {
                return Err(Error::InvalidKey(format!("`{name}` is not a key attribute")));
            }
            key.insert(name, value);
        }
        self.check_complete(&key)?;
        Ok(key)
    }

    /// Separate key attributes from the remaining keyword arguments.
    ///
    /// A keyword counts as a key attribute only when it names the attribute exactly,
    /// with no nested segment or suffix.
    pub fn split(
        &self,
        kwargs: common::Kwargs<types::AttributeValue>,
    ) -> Result<(common::Item, common::Kwargs<types::AttributeValue>)> {
        let mut key = common::Item::new();
        let mut rest = common::Kwargs::with_capacity(kwargs.len());
        for (name, value) in kwargs {
            if self.is_key(&name) {
                key.insert(name, value);
            } else {
                rest.insert(name, value);
            }
        }
        self.check_complete(&key)?;
        Ok((key, rest))
    }

    /// Copy the key attributes out of a full item.
    pub fn key_of(&self, item: &common::Item) -> Result<common::Item> {
        let key: common::Item = item
            .iter()
            .filter(|(name, _)| self.is_key(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        self.check_complete(&key)?;
        Ok(key)
    }

    fn check_complete(&self, key: &common::Item) -> Result<()> {
        if !key.contains_key(&self.hash_key) {
            return Err(Error::InvalidKey(format!(
                "missing hash key `{}`",
                self.hash_key
            )));
        }
        if let Some(range_key) = &self.range_key {
            if !key.contains_key(range_key) {
                return Err(Error::InvalidKey(format!("missing range key `{range_key}`")));
            }
        }
        Ok(())
    }
}

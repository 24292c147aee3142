//! Table declarations and remote client settings.

use crate::common::key;

use std::env;

/// Environment variable overriding the store endpoint, for example a local instance.
pub const ENDPOINT_URL_ENV: &str = "DYNAMODB_ENDPOINT_URL";

/// Environment variable selecting the region.
pub const REGION_ENV: &str = "AWS_REGION";

/// Attributes copied into a secondary index.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Projection {
    /// Every attribute.
    #[default]
    All,
    /// Only the table and index key attributes.
    Keys,
    /// The key attributes and the listed ones.
    Include(Vec<String>),
}

impl Projection {
    /// Whether items read through the index may lack attributes of the table.
    pub fn is_partial(&self) -> bool {
        !matches!(self, Self::All)
    }
}

/// A global or local secondary index of a table.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IndexConfig {
    /// The index name.
    pub name: String,
    /// The key attributes of the index.
    pub key_schema: key::KeySchema,
    /// Attributes available when reading through the index.
    pub projection: Projection,
}

/// Declaration of one table: its name, key schema and secondary indexes.
///
/// ```rust
/// use dynamodb_kwargs::{common::key::KeySchema, config};
///
/// let table = config::TableConfig {
///     name: "users".to_string(),
///     key_schema: KeySchema {
///         hash_key: "id".to_string(),
///         range_key: None,
///     },
///     indexes: vec![config::IndexConfig {
///         name: "by-email".to_string(),
///         key_schema: KeySchema {
///             hash_key: "email".to_string(),
///             range_key: None,
///         },
///         projection: config::Projection::Keys,
///     }],
/// };
/// assert!(table.index("by-email").is_some());
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TableConfig {
    /// The table name.
    pub name: String,
    /// The primary key of the table.
    pub key_schema: key::KeySchema,
    /// Declared secondary indexes.
    pub indexes: Vec<IndexConfig>,
}

impl TableConfig {
    /// Look up a declared index by name.
    pub fn index(&self, name: &str) -> Option<&IndexConfig> {
        self.indexes.iter().find(|index| index.name == name)
    }
}

/// Settings for the default AWS-backed client.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ClientConfig {
    /// Custom endpoint, `None` for the regional AWS endpoint.
    pub endpoint_url: Option<String>,
    /// Region, `None` to defer to the AWS configuration chain.
    pub region: Option<String>,
}

impl ClientConfig {
    /// Read [`ENDPOINT_URL_ENV`] and [`REGION_ENV`]; unset or empty variables are `None`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).filter(|value| !value.is_empty());
        Self {
            endpoint_url: read(ENDPOINT_URL_ENV),
            region: read(REGION_ENV),
        }
    }
}

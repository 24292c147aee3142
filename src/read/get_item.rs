use crate::{client, common, error::Result, read};

/// Wire input of a GetItem call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetItemInput {
    /// Full primary key of the item.
    pub key: common::Item,
    /// Table, consistency and projection settings.
    pub single_read_operation: read::common::SingleReadInput,
}

/// Get item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use dynamodb_kwargs::{client, common, read};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let get_item = read::get_item::GetItem {
///     key: common::Item::from([("id".to_string(), AttributeValue::S("1".to_string()))]),
///     single_read_args: read::common::SingleReadArgs {
///         table_name: "users".to_string(),
///         ..Default::default()
///     },
/// };
/// let item = get_item.send(client::shared()?.as_ref())?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetItem {
    /// The primary key of the item to retrieve.
    pub key: common::Item,
    /// Additional read operation arguments (table name, consistent read, selection).
    pub single_read_args: read::common::SingleReadArgs,
}

impl From<GetItem> for GetItemInput {
    fn from(get_item: GetItem) -> Self {
        Self {
            key: get_item.key,
            single_read_operation: get_item.single_read_args.into(),
        }
    }
}

impl GetItem {
    /// Execute the get item operation, `None` when no item has the key.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_kwargs.get_item", skip(client), err)
    )]
    pub fn send(self, client: &dyn client::Client) -> Result<Option<common::Item>> {
        client.get_item(self.into())
    }
}

use crate::{client, common, error::Result, write};

/// Wire input of a DeleteItem call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeleteItemInput {
    /// Full primary key of the item.
    pub key: common::Item,
    /// Table, precondition and placeholder maps.
    pub write_operation: write::common::WriteInput,
}

/// Delete item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use dynamodb_kwargs::{client, common, write};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let delete_item = write::delete_item::DeleteItem {
///     key: common::Item::from([("id".to_string(), AttributeValue::S("1".to_string()))]),
///     write_args: write::common::WriteArgs {
///         table_name: "users".to_string(),
///         ..Default::default()
///     },
/// };
/// delete_item.send(client::shared()?.as_ref())?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeleteItem {
    /// The primary key of the item to delete.
    pub key: common::Item,
    /// Additional write operation arguments (table name, condition, return values).
    pub write_args: write::common::WriteArgs,
}

impl From<DeleteItem> for DeleteItemInput {
    fn from(delete_item: DeleteItem) -> Self {
        Self {
            key: delete_item.key,
            write_operation: delete_item.write_args.into(),
        }
    }
}

impl DeleteItem {
    /// Execute the delete item operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_kwargs.delete_item", skip(client), err)
    )]
    pub fn send(self, client: &dyn client::Client) -> Result<()> {
        client.delete_item(self.into())
    }
}

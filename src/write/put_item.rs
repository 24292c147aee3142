use crate::{client, common, error::Result, write};

/// Wire input of a PutItem call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PutItemInput {
    /// The full item, null attributes already stripped.
    pub item: common::Item,
    /// Table, precondition and placeholder maps.
    pub write_operation: write::common::WriteInput,
}

/// Put item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use dynamodb_kwargs::{client, common, write};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let put_item = write::put_item::PutItem {
///     item: common::Item::from([
///         ("id".to_string(), AttributeValue::S("1".to_string())),
///         ("name".to_string(), AttributeValue::S("John".to_string())),
///     ]),
///     write_args: write::common::WriteArgs {
///         table_name: "users".to_string(),
///         ..Default::default()
///     },
/// };
/// put_item.send(client::shared()?.as_ref())?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PutItem {
    /// The item to put into the table.
    pub item: common::Item,
    /// Additional write operation arguments (table name, condition, return values).
    pub write_args: write::common::WriteArgs,
}

impl From<PutItem> for PutItemInput {
    fn from(put_item: PutItem) -> Self {
        Self {
            item: common::remove_nulls(put_item.item),
            write_operation: put_item.write_args.into(),
        }
    }
}

impl PutItem {
    /// Execute the put item operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_kwargs.put_item", skip(client), err)
    )]
    pub fn send(self, client: &dyn client::Client) -> Result<()> {
        client.put_item(self.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{client::mock, error::Error};

    use aws_sdk_dynamodb::types;
    use rstest::rstest;
    use serde_dynamo::to_item;
    use serde_json::json;
    use std::collections;

    #[rstest]
    #[case::empty(
        PutItem {
            item: to_item(
                json!(
                    {
                        "a": "b"
                    }
                )
            ).unwrap(),
            write_args: write::common::WriteArgs {
                table_name: "c".to_string(),
                ..Default::default()
            },
        },
        PutItemInput {
            item: collections::HashMap::from(
                [(
                    "a".to_string(),
                    types::AttributeValue::S(
                        "b".to_string()
                    ),
                )]
            ),
            write_operation: write::common::WriteInput {
                table_name: "c".to_string(),
                ..Default::default()
            },
        }
    )]
    #[case::full(
        PutItem {
            item: to_item(
                json!(
                    {
                        "a": "b",
                        "f": null,
                        "g": {
                            "h": null,
                            "i": 1
                        }
                    }
                )
            ).unwrap(),
            write_args: write::common::WriteArgs {
                condition: Some(
                    common::condition::ConditionNode::parse(
                        "a__not_exists",
                        types::AttributeValue::Bool(true)
                    ).unwrap()
                ),
                return_values: Some(
                    types::ReturnValue::AllOld
                ),
                table_name: "e".to_string(),
            },
        },
        PutItemInput {
            item: collections::HashMap::from(
                [
                    (
                        "a".to_string(),
                        types::AttributeValue::S(
                            "b".to_string()
                        ),
                    ),
                    (
                        "g".to_string(),
                        types::AttributeValue::M(
                            collections::HashMap::from(
                                [(
                                    "i".to_string(),
                                    types::AttributeValue::N(
                                        "1".to_string()
                                    ),
                                )]
                            )
                        ),
                    ),
                ]
            ),
            write_operation: write::common::WriteInput {
                condition_expression: Some(
                    "attribute_not_exists(#n0)".to_string()
                ),
                expression_attribute_names: Some(
                    collections::HashMap::from(
                        [
                            ("#n0".to_string(), "a".to_string()),
                        ]
                    )
                ),
                return_values: Some(
                    types::ReturnValue::AllOld
                ),
                table_name: "e".to_string(),
                ..Default::default()
            },
        }
    )]
    fn test_put_item(#[case] args: PutItem, #[case] expected: PutItemInput) {
        let actual: PutItemInput = args.into();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_send_surfaces_conditional_failure() {
        let client = mock::MockClient::default().failing_writes();
        let put_item = PutItem {
            write_args: write::common::WriteArgs {
                table_name: "a".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let error = put_item.send(&client).unwrap_err();
        assert!(matches!(error, Error::ConditionalCheckFailed(_)));
        assert_eq!(client.requests().len(), 1);
    }
}

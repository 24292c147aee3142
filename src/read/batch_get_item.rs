use crate::{client, common, error::Result, read};

/// The store accepts at most this many keys in one batch read.
pub const MAX_BATCH_GET: usize = 100;

/// Wire input of a BatchGetItem call against one table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchGetItemInput {
    /// At most [`MAX_BATCH_GET`] full primary keys.
    pub keys: Vec<common::Item>,
    /// Table, consistency and projection settings.
    pub single_read_operation: read::common::SingleReadInput,
}

/// Wire output of a BatchGetItem call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchGetItemOutput {
    /// The items found, in no particular order.
    pub items: Vec<common::Item>,
    /// Keys the store did not get to and that must be resubmitted.
    pub unprocessed_keys: Vec<common::Item>,
}

/// Batch get item operation.
///
/// Keys are sent in chunks of [`MAX_BATCH_GET`]; unprocessed keys are resubmitted
/// until the store has answered all of them. Missing items are simply absent from the
/// result.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use dynamodb_kwargs::{client, common, read};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let batch_get = read::batch_get_item::BatchGetItem {
///     keys: vec![common::Item::from([(
///         "id".to_string(),
///         AttributeValue::S("1".to_string()),
///     )])],
///     single_read_args: read::common::SingleReadArgs {
///         table_name: "users".to_string(),
///         ..Default::default()
///     },
/// };
/// let items = batch_get.send(client::shared()?.as_ref())?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchGetItem {
    /// The primary keys of the items to retrieve.
    pub keys: Vec<common::Item>,
    /// Additional read operation arguments (table name, consistent read, selection).
    pub single_read_args: read::common::SingleReadArgs,
}

impl BatchGetItem {
    /// Execute the batch get item operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "dynamodb_kwargs.batch_get_item",
            skip_all,
            fields(table_name = %self.single_read_args.table_name, keys = self.keys.len()),
            err
        )
    )]
    pub fn send(self, client: &dyn client::Client) -> Result<Vec<common::Item>> {
        let single_read_operation: read::common::SingleReadInput = self.single_read_args.into();
        let mut items = Vec::with_capacity(self.keys.len());
        for chunk in self.keys.chunks(MAX_BATCH_GET) {
            let mut pending = chunk.to_vec();
            while !pending.is_empty() {
                let output = client.batch_get_item(BatchGetItemInput {
                    keys: pending,
                    single_read_operation: single_read_operation.clone(),
                })?;
                items.extend(output.items);
                pending = output.unprocessed_keys;
                #[cfg(feature = "tracing")]
                if !pending.is_empty() {
                    tracing::debug!(unprocessed = pending.len(), "resubmitting batch get");
                }
            }
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock;

    use aws_sdk_dynamodb::types;
    use rstest::rstest;
    use std::collections;

    fn key(id: usize) -> common::Item {
        common::Item::from([(
            "id".to_string(),
            types::AttributeValue::N(id.to_string()),
        )])
    }

    #[rstest]
    #[case::empty(0, 0, vec![])]
    #[case::single_chunk(3, 0, vec![3])]
    #[case::two_chunks(150, 0, vec![100, 50])]
    #[case::resubmitted(2, 1, vec![2, 1])]
    fn test_send(
        #[case] keys: usize,
        #[case] unprocessed_rounds: usize,
        #[case] expected_sizes: Vec<usize>,
    ) {
        let client = mock::MockClient::default().with_unprocessed_rounds(unprocessed_rounds);
        let batch_get = BatchGetItem {
            keys: (0..keys).map(key).collect(),
            single_read_args: read::common::SingleReadArgs {
                table_name: "a".to_string(),
                ..Default::default()
            },
        };
        let items = batch_get.send(&client).unwrap();
        assert_eq!(items.len(), keys);
        let sizes: Vec<usize> = client
            .requests()
            .into_iter()
            .map(|request| match request {
                mock::Request::BatchGetItem(input) => input.keys.len(),
                _ => panic!("unexpected request {request:?}"),
            })
            .collect();
        assert_eq!(sizes, expected_sizes);
    }

    #[test]
    fn test_send_projection() {
        let client = mock::MockClient::default();
        let batch_get = BatchGetItem {
            keys: vec![key(1)],
            single_read_args: read::common::SingleReadArgs {
                consistent_read: Some(true),
                selection: Some(common::selection::Selection::parse(["a", "b"]).unwrap()),
                table_name: "c".to_string(),
            },
        };
        batch_get.send(&client).unwrap();
        assert_eq!(
            client.requests(),
            vec![mock::Request::BatchGetItem(BatchGetItemInput {
                keys: vec![key(1)],
                single_read_operation: read::common::SingleReadInput {
                    consistent_read: Some(true),
                    expression_attribute_names: Some(collections::HashMap::from([
                        ("#n0".to_string(), "a".to_string()),
                        ("#n1".to_string(), "b".to_string()),
                    ])),
                    projection_expression: Some("#n0, #n1".to_string()),
                    table_name: "c".to_string(),
                },
            })]
        );
    }
}

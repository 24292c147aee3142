use crate::{client, common, error::Result};

/// The store accepts at most this many requests in one batch write.
pub const MAX_BATCH_WRITE: usize = 25;

/// A single request within a batch write operation.
#[derive(Clone, Debug, PartialEq)]
pub enum WriteRequest {
    /// Creates or replaces an item.
    Put(common::Item),
    /// Removes an item by its primary key.
    Delete(common::Item),
}

/// Wire input of a BatchWriteItem call against one table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchWriteItemInput {
    /// At most [`MAX_BATCH_WRITE`] requests.
    pub requests: Vec<WriteRequest>,
    /// The table to write to.
    pub table_name: String,
}

/// Wire output of a BatchWriteItem call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchWriteItemOutput {
    /// Requests the store did not get to and that must be resubmitted.
    pub unprocessed_requests: Vec<WriteRequest>,
}

/// Batch write item operation.
///
/// Requests are sent in chunks of [`MAX_BATCH_WRITE`]; unprocessed requests are
/// resubmitted until the store has processed all of them.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use dynamodb_kwargs::{client, common, write};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let batch_write = write::batch_write_item::BatchWriteItem {
///     requests: vec![write::batch_write_item::WriteRequest::Put(common::Item::from([(
///         "id".to_string(),
///         AttributeValue::S("1".to_string()),
///     )]))],
///     table_name: "users".to_string(),
/// };
/// batch_write.send(client::shared()?.as_ref())?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchWriteItem {
    /// The requests to apply, in order.
    pub requests: Vec<WriteRequest>,
    /// The name of the table to write to.
    pub table_name: String,
}

impl BatchWriteItem {
    /// Execute the batch write operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "dynamodb_kwargs.batch_write_item",
            skip_all,
            fields(table_name = %self.table_name, requests = self.requests.len()),
            err
        )
    )]
    pub fn send(self, client: &dyn client::Client) -> Result<()> {
        for chunk in self.requests.chunks(MAX_BATCH_WRITE) {
            let mut pending = chunk.to_vec();
            while !pending.is_empty() {
                let output = client.batch_write_item(BatchWriteItemInput {
                    requests: pending,
                    table_name: self.table_name.clone(),
                })?;
                pending = output.unprocessed_requests;
                #[cfg(feature = "tracing")]
                if !pending.is_empty() {
                    tracing::debug!(unprocessed = pending.len(), "resubmitting batch write");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock;

    use aws_sdk_dynamodb::types;
    use rstest::rstest;

    fn put(id: usize) -> WriteRequest {
        WriteRequest::Put(common::Item::from([(
            "id".to_string(),
            types::AttributeValue::N(id.to_string()),
        )]))
    }

    #[rstest]
    #[case::empty(0, 0, vec![])]
    #[case::single_chunk(3, 0, vec![3])]
    #[case::full_chunk(25, 0, vec![25])]
    #[case::two_chunks(30, 0, vec![25, 5])]
    #[case::resubmitted(3, 2, vec![3, 1, 1])]
    fn test_send(
        #[case] requests: usize,
        #[case] unprocessed_rounds: usize,
        #[case] expected_sizes: Vec<usize>,
    ) {
        let client = mock::MockClient::default().with_unprocessed_rounds(unprocessed_rounds);
        let batch_write = BatchWriteItem {
            requests: (0..requests).map(put).collect(),
            table_name: "a".to_string(),
        };
        batch_write.send(&client).unwrap();
        let sizes: Vec<usize> = client
            .requests()
            .into_iter()
            .map(|request| match request {
                mock::Request::BatchWriteItem(input) => input.requests.len(),
                _ => panic!("unexpected request {request:?}"),
            })
            .collect();
        assert_eq!(sizes, expected_sizes);
    }
}

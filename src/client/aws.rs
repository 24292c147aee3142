use crate::{
    common, config,
    error::{Error, Result},
    read, write,
};

use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::{
    Client,
    error::{self, ProvideErrorMetadata},
    types,
};
use std::error as std_error;
use tokio::runtime;

const CONDITIONAL_CHECK_FAILED: &str = "ConditionalCheckFailedException";
const THROTTLING: [&str; 3] = [
    "ProvisionedThroughputExceededException",
    "ThrottlingException",
    "RequestLimitExceeded",
];

/// [`crate::client::Client`] backed by `aws-sdk-dynamodb`.
///
/// Calls are driven to completion on a private current-thread runtime, so this client
/// must not be used from inside another tokio runtime.
#[derive(Debug)]
pub struct AwsClient {
    client: Client,
    runtime: runtime::Runtime,
}

impl AwsClient {
    /// Wrap an already configured SDK client.
    pub fn new(client: Client) -> Result<Self> {
        Ok(Self {
            client,
            runtime: build_runtime()?,
        })
    }

    /// Load the AWS configuration chain, then apply the region and endpoint overrides.
    pub fn from_config(config: &config::ClientConfig) -> Result<Self> {
        let runtime = build_runtime()?;
        let sdk_config = runtime.block_on(aws_config::defaults(BehaviorVersion::latest()).load());
        let mut builder = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
        if let Some(region) = &config.region {
            builder = builder.region(aws_sdk_dynamodb::config::Region::new(region.clone()));
        }
        if let Some(endpoint_url) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }
        Ok(Self {
            client: Client::from_conf(builder.build()),
            runtime,
        })
    }
}

fn build_runtime() -> Result<runtime::Runtime> {
    runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| Error::Transport(Box::new(error)))
}

/// The typed error for a store error code, `None` for codes passed through as transport errors.
fn classify(code: Option<&str>, message: &str) -> Option<Error> {
    match code? {
        CONDITIONAL_CHECK_FAILED => Some(Error::ConditionalCheckFailed(message.to_string())),
        code if THROTTLING.contains(&code) => Some(Error::Throttled(message.to_string())),
        _ => None,
    }
}

fn map_error<E>(sdk_error: error::SdkError<E>) -> Error
where
    E: ProvideErrorMetadata + std_error::Error + Send + Sync + 'static,
{
    let code = sdk_error.code().map(str::to_string);
    let message = sdk_error.message().unwrap_or_default().to_string();
    classify(code.as_deref(), &message).unwrap_or_else(|| Error::Transport(Box::new(sdk_error)))
}

fn build_error(build_error: error::BuildError) -> Error {
    Error::Transport(Box::new(build_error))
}

fn to_write_request(request: write::batch_write_item::WriteRequest) -> Result<types::WriteRequest> {
    let builder = match request {
        write::batch_write_item::WriteRequest::Put(item) => {
            let put_request = types::PutRequest::builder()
                .set_item(Some(item))
                .build()
                .map_err(build_error)?;
            types::WriteRequest::builder().put_request(put_request)
        }
        write::batch_write_item::WriteRequest::Delete(key) => {
            let delete_request = types::DeleteRequest::builder()
                .set_key(Some(key))
                .build()
                .map_err(build_error)?;
            types::WriteRequest::builder().delete_request(delete_request)
        }
    };
    Ok(builder.build())
}

fn from_write_request(request: types::WriteRequest) -> Option<write::batch_write_item::WriteRequest> {
    match (request.put_request, request.delete_request) {
        (Some(put_request), _) => Some(write::batch_write_item::WriteRequest::Put(put_request.item)),
        (None, Some(delete_request)) => Some(write::batch_write_item::WriteRequest::Delete(
            delete_request.key,
        )),
        (None, None) => None,
    }
}

fn into_page(
    items: Option<Vec<common::Item>>,
    last_evaluated_key: Option<common::Item>,
    count: i32,
    scanned_count: i32,
) -> read::common::Page {
    read::common::Page {
        items: items.unwrap_or_default(),
        last_evaluated_key: last_evaluated_key.filter(|key| !key.is_empty()),
        count,
        scanned_count,
    }
}

impl crate::client::Client for AwsClient {
    fn get_item(&self, input: read::get_item::GetItemInput) -> Result<Option<common::Item>> {
        let builder = self.client.get_item().set_key(Some(input.key));
        let output = self
            .runtime
            .block_on(
                crate::apply_single_read_operation!(builder, input.single_read_operation).send(),
            )
            .map_err(map_error)?;
        Ok(output.item)
    }

    fn put_item(&self, input: write::put_item::PutItemInput) -> Result<()> {
        let builder = self.client.put_item().set_item(Some(input.item));
        self.runtime
            .block_on(crate::apply_write_operation!(builder, input.write_operation).send())
            .map_err(map_error)?;
        Ok(())
    }

    fn update_item(
        &self,
        input: write::update_item::UpdateItemInput,
    ) -> Result<Option<common::Item>> {
        let builder = self
            .client
            .update_item()
            .set_key(Some(input.key))
            .update_expression(input.update_expression);
        let output = self
            .runtime
            .block_on(crate::apply_write_operation!(builder, input.write_operation).send())
            .map_err(map_error)?;
        Ok(output.attributes)
    }

    fn delete_item(&self, input: write::delete_item::DeleteItemInput) -> Result<()> {
        let builder = self.client.delete_item().set_key(Some(input.key));
        self.runtime
            .block_on(crate::apply_write_operation!(builder, input.write_operation).send())
            .map_err(map_error)?;
        Ok(())
    }

    fn query(&self, input: read::query::QueryInput) -> Result<read::common::Page> {
        let builder = self
            .client
            .query()
            .key_condition_expression(input.key_condition_expression)
            .set_scan_index_forward(input.scan_index_forward);
        let output = self
            .runtime
            .block_on(
                crate::apply_multiple_read_operation!(builder, input.multiple_read_operation)
                    .send(),
            )
            .map_err(map_error)?;
        Ok(into_page(
            output.items,
            output.last_evaluated_key,
            output.count,
            output.scanned_count,
        ))
    }

    fn scan(&self, input: read::common::MultipleReadInput) -> Result<read::common::Page> {
        let builder = self.client.scan();
        let output = self
            .runtime
            .block_on(crate::apply_multiple_read_operation!(builder, input).send())
            .map_err(map_error)?;
        Ok(into_page(
            output.items,
            output.last_evaluated_key,
            output.count,
            output.scanned_count,
        ))
    }

    fn batch_get_item(
        &self,
        input: read::batch_get_item::BatchGetItemInput,
    ) -> Result<read::batch_get_item::BatchGetItemOutput> {
        let operation = input.single_read_operation;
        let keys_and_attributes = types::KeysAndAttributes::builder()
            .set_consistent_read(operation.consistent_read)
            .set_expression_attribute_names(operation.expression_attribute_names)
            .set_keys(Some(input.keys))
            .set_projection_expression(operation.projection_expression)
            .build()
            .map_err(build_error)?;
        let output = self
            .runtime
            .block_on(
                self.client
                    .batch_get_item()
                    .request_items(operation.table_name.clone(), keys_and_attributes)
                    .send(),
            )
            .map_err(map_error)?;
        let items = output
            .responses
            .and_then(|mut responses| responses.remove(&operation.table_name))
            .unwrap_or_default();
        let unprocessed_keys = output
            .unprocessed_keys
            .and_then(|mut unprocessed| unprocessed.remove(&operation.table_name))
            .map(|keys_and_attributes| keys_and_attributes.keys)
            .unwrap_or_default();
        Ok(read::batch_get_item::BatchGetItemOutput {
            items,
            unprocessed_keys,
        })
    }

    fn batch_write_item(
        &self,
        input: write::batch_write_item::BatchWriteItemInput,
    ) -> Result<write::batch_write_item::BatchWriteItemOutput> {
        let requests = input
            .requests
            .into_iter()
            .map(to_write_request)
            .collect::<Result<Vec<_>>>()?;
        let output = self
            .runtime
            .block_on(
                self.client
                    .batch_write_item()
                    .request_items(input.table_name.clone(), requests)
                    .send(),
            )
            .map_err(map_error)?;
        let unprocessed_requests = output
            .unprocessed_items
            .and_then(|mut unprocessed| unprocessed.remove(&input.table_name))
            .unwrap_or_default()
            .into_iter()
            .filter_map(from_write_request)
            .collect();
        Ok(write::batch_write_item::BatchWriteItemOutput {
            unprocessed_requests,
        })
    }
}

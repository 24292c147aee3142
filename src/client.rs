//! Boundary with the remote store.
//!
//! Every remote call goes through the blocking [`Client`] trait, so the compilers and the
//! read iterator never depend on a transport. [`aws::AwsClient`] is the implementation
//! backed by the AWS SDK; tests substitute their own.

/// Client backed by `aws-sdk-dynamodb`.
pub mod aws;

#[cfg(test)]
pub(crate) mod mock;

use crate::{common, config, error::Result, read, write};

use parking_lot::RwLock;
use std::{fmt, sync};

/// Blocking access to the remote store, one method per wire operation.
///
/// Implementations report a failed precondition as
/// [`crate::error::Error::ConditionalCheckFailed`], capacity exhaustion as
/// [`crate::error::Error::Throttled`] and anything else as
/// [`crate::error::Error::Transport`]. They never retry on the caller's behalf.
pub trait Client: fmt::Debug + Send + Sync {
    /// Read one item by its full primary key.
    fn get_item(&self, input: read::get_item::GetItemInput) -> Result<Option<common::Item>>;

    /// Create or replace one item.
    fn put_item(&self, input: write::put_item::PutItemInput) -> Result<()>;

    /// Apply an update expression, returning the attributes asked for by `return_values`.
    fn update_item(
        &self,
        input: write::update_item::UpdateItemInput,
    ) -> Result<Option<common::Item>>;

    /// Delete one item by its full primary key.
    fn delete_item(&self, input: write::delete_item::DeleteItemInput) -> Result<()>;

    /// Read one page of a query.
    fn query(&self, input: read::query::QueryInput) -> Result<read::common::Page>;

    /// Read one page of a scan.
    fn scan(&self, input: read::common::MultipleReadInput) -> Result<read::common::Page>;

    /// Read up to 100 items by key from one table.
    fn batch_get_item(
        &self,
        input: read::batch_get_item::BatchGetItemInput,
    ) -> Result<read::batch_get_item::BatchGetItemOutput>;

    /// Write up to 25 put or delete requests to one table.
    fn batch_write_item(
        &self,
        input: write::batch_write_item::BatchWriteItemInput,
    ) -> Result<write::batch_write_item::BatchWriteItemOutput>;
}

static SHARED: RwLock<Option<sync::Arc<dyn Client>>> = parking_lot::const_rwlock(None);

/// The process-wide client.
///
/// Built once, on first use, from [`config::ClientConfig::from_env`] unless
/// [`set_shared`] installed one before.
pub fn shared() -> Result<sync::Arc<dyn Client>> {
    if let Some(client) = SHARED.read().as_ref() {
        return Ok(client.clone());
    }
    let mut slot = SHARED.write();
    if let Some(client) = slot.as_ref() {
        return Ok(client.clone());
    }
    let client: sync::Arc<dyn Client> = sync::Arc::new(aws::AwsClient::from_config(
        &config::ClientConfig::from_env(),
    )?);
    *slot = Some(client.clone());
    Ok(client)
}

/// Replace the process-wide client, for example with one pointed at a local instance.
pub fn set_shared(client: sync::Arc<dyn Client>) {
    *SHARED.write() = Some(client);
}

use crate::{
    client::Client,
    common,
    error::{Error, Result},
    read, write,
};

use parking_lot::Mutex;
use std::collections;

/// A request as recorded by [`MockClient`].
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Request {
    GetItem(read::get_item::GetItemInput),
    PutItem(write::put_item::PutItemInput),
    UpdateItem(write::update_item::UpdateItemInput),
    DeleteItem(write::delete_item::DeleteItemInput),
    Query(read::query::QueryInput),
    Scan(read::common::MultipleReadInput),
    BatchGetItem(read::batch_get_item::BatchGetItemInput),
    BatchWriteItem(write::batch_write_item::BatchWriteItemInput),
}

/// In-memory client that records requests and replays canned responses.
#[derive(Debug, Default)]
pub(crate) struct MockClient {
    item: Option<common::Item>,
    pages: Mutex<collections::VecDeque<read::common::Page>>,
    fail_writes: bool,
    fail_reads: bool,
    unprocessed_rounds: Mutex<usize>,
    requests: Mutex<Vec<Request>>,
}

impl MockClient {
    /// Item returned by GetItem and UpdateItem.
    pub(crate) fn with_item(mut self, item: common::Item) -> Self {
        self.item = Some(item);
        self
    }

    /// Pages returned, in order, by Query and Scan; an empty final page afterwards.
    pub(crate) fn with_pages(self, pages: Vec<read::common::Page>) -> Self {
        *self.pages.lock() = pages.into();
        self
    }

    /// Reject every write with a failed conditional check.
    pub(crate) fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Fail every Query and Scan with a transport error.
    pub(crate) fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Leave the last key or request of the next `rounds` batch calls unprocessed.
    pub(crate) fn with_unprocessed_rounds(self, rounds: usize) -> Self {
        *self.unprocessed_rounds.lock() = rounds;
        self
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    fn record(&self, request: Request) {
        self.requests.lock().push(request);
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_writes {
            return Err(Error::ConditionalCheckFailed(
                "The conditional request failed".to_string(),
            ));
        }
        Ok(())
    }

    fn next_page(&self) -> Result<read::common::Page> {
        if self.fail_reads {
            return Err(Error::Transport("connection reset".into()));
        }
        Ok(self.pages.lock().pop_front().unwrap_or_default())
    }

    fn take_unprocessed_round(&self) -> bool {
        let mut rounds = self.unprocessed_rounds.lock();
        if *rounds == 0 {
            return false;
        }
        *rounds -= 1;
        true
    }
}

impl Client for MockClient {
    fn get_item(&self, input: read::get_item::GetItemInput) -> Result<Option<common::Item>> {
        self.record(Request::GetItem(input));
        Ok(self.item.clone())
    }

    fn put_item(&self, input: write::put_item::PutItemInput) -> Result<()> {
        self.record(Request::PutItem(input));
        self.check_write()
    }

    fn update_item(
        &self,
        input: write::update_item::UpdateItemInput,
    ) -> Result<Option<common::Item>> {
        self.record(Request::UpdateItem(input));
        self.check_write()?;
        Ok(self.item.clone())
    }

    fn delete_item(&self, input: write::delete_item::DeleteItemInput) -> Result<()> {
        self.record(Request::DeleteItem(input));
        self.check_write()
    }

    fn query(&self, input: read::query::QueryInput) -> Result<read::common::Page> {
        self.record(Request::Query(input));
        self.next_page()
    }

    fn scan(&self, input: read::common::MultipleReadInput) -> Result<read::common::Page> {
        self.record(Request::Scan(input));
        self.next_page()
    }

    fn batch_get_item(
        &self,
        input: read::batch_get_item::BatchGetItemInput,
    ) -> Result<read::batch_get_item::BatchGetItemOutput> {
        let mut items = input.keys.clone();
        self.record(Request::BatchGetItem(input));
        let unprocessed_keys = match self.take_unprocessed_round() {
            true => items.pop().into_iter().collect(),
            false => Vec::new(),
        };
        Ok(read::batch_get_item::BatchGetItemOutput {
            items,
            unprocessed_keys,
        })
    }

    fn batch_write_item(
        &self,
        input: write::batch_write_item::BatchWriteItemInput,
    ) -> Result<write::batch_write_item::BatchWriteItemOutput> {
        let mut requests = input.requests.clone();
        self.record(Request::BatchWriteItem(input));
        let unprocessed_requests = match self.take_unprocessed_round() {
            true => requests.pop().into_iter().collect(),
            false => Vec::new(),
        };
        Ok(write::batch_write_item::BatchWriteItemOutput {
            unprocessed_requests,
        })
    }
}

use crate::{
    client, common,
    error::{Error, Result},
    read, validation,
};

use aws_sdk_dynamodb::types;
use std::{collections, sync};

/// The paginated operation behind a [`ReadIterator`].
#[derive(Clone, Debug, PartialEq)]
pub enum ReadRequest {
    /// Pages of a query.
    Query(read::query::Query),
    /// Pages of a scan.
    Scan(read::scan::Scan),
}

impl ReadRequest {
    fn args(&self) -> &read::common::MultipleReadArgs {
        match self {
            Self::Query(query) => &query.multiple_read_args,
            Self::Scan(scan) => &scan.multiple_read_args,
        }
    }

    fn args_mut(&mut self) -> &mut read::common::MultipleReadArgs {
        match self {
            Self::Query(query) => &mut query.multiple_read_args,
            Self::Scan(scan) => &mut scan.multiple_read_args,
        }
    }

    fn send(self, client: &dyn client::Client) -> Result<read::common::Page> {
        match self {
            Self::Query(query) => query.send(client),
            Self::Scan(scan) => scan.send(client),
        }
    }
}

impl From<read::query::Query> for ReadRequest {
    fn from(query: read::query::Query) -> Self {
        Self::Query(query)
    }
}

impl From<read::scan::Scan> for ReadRequest {
    fn from(scan: read::scan::Scan) -> Self {
        Self::Scan(scan)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Configuring,
    Bound,
    Exhausted,
}

/// Lazy sequence of the items of a query or scan.
///
/// Setters are only accepted while configuring; the first call to
/// [`Iterator::next`] or [`ReadIterator::count`] binds the configuration and sends the
/// first page request. Without [`ReadIterator::recursive`] exactly one page is read and
/// [`ReadIterator::again`] continues from where it stopped; with it, pages are fetched
/// transparently until the store reports the final one.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use dynamodb_kwargs::{client, common, read};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let scan = read::scan::Scan {
///     multiple_read_args: read::common::MultipleReadArgs {
///         condition: common::condition::ConditionNode::all(vec![
///             common::condition::ConditionNode::parse(
///                 "age__gte",
///                 AttributeValue::N("18".to_string()),
///             )?,
///         ]),
///         table_name: "users".to_string(),
///         ..Default::default()
///     },
/// };
/// let iterator = read::iterator::ReadIterator::new(client::shared()?, scan.into())
///     .consistent()?
///     .recursive()?;
/// for item in iterator {
///     println!("{:?}", item?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ReadIterator {
    client: sync::Arc<dyn client::Client>,
    request: ReadRequest,
    recursive: bool,
    limit_across_pages: bool,
    validator: sync::Arc<dyn validation::Validator>,
    partial: bool,
    state: State,
    buffer: collections::VecDeque<common::Item>,
    pages: usize,
    budget: Option<i32>,
    last: Option<common::Item>,
}

impl ReadIterator {
    /// A configuring iterator yielding raw items.
    pub fn new(client: sync::Arc<dyn client::Client>, request: ReadRequest) -> Self {
        Self {
            client,
            request,
            recursive: false,
            limit_across_pages: false,
            validator: sync::Arc::new(validation::NoValidation),
            partial: false,
            state: State::Configuring,
            buffer: collections::VecDeque::new(),
            pages: 0,
            budget: None,
            last: None,
        }
    }

    /// Pass every item through `validator`; `partial` when items may lack attributes.
    ///
    /// Items are always validated partially once [`Self::specific_attributes`] is set.
    pub fn validated(
        mut self,
        validator: sync::Arc<dyn validation::Validator>,
        partial: bool,
    ) -> Self {
        self.validator = validator;
        self.partial = partial;
        self
    }

    fn configure(mut self, apply: impl FnOnce(&mut Self) -> Result<()>) -> Result<Self> {
        if self.state != State::Configuring {
            return Err(Error::IteratorAlreadyBound);
        }
        apply(&mut self)?;
        Ok(self)
    }

    /// Evaluate at most `limit` items per page.
    pub fn limit(self, limit: i32) -> Result<Self> {
        self.configure(|iterator| {
            iterator.request.args_mut().limit = Some(limit);
            Ok(())
        })
    }

    /// Resume after `key`, a continuation token returned by an earlier page.
    pub fn start(self, key: common::Item) -> Result<Self> {
        self.configure(|iterator| {
            iterator.request.args_mut().exclusive_start_key = Some(key);
            Ok(())
        })
    }

    /// Use strongly consistent reads.
    pub fn consistent(self) -> Result<Self> {
        self.configure(|iterator| {
            iterator.request.args_mut().consistent_read = Some(true);
            Ok(())
        })
    }

    /// Read the sort key in descending order. Only queries have an order.
    pub fn reverse(self) -> Result<Self> {
        self.configure(|iterator| match &mut iterator.request {
            ReadRequest::Query(query) => {
                query.scan_index_forward = Some(false);
                Ok(())
            }
            ReadRequest::Scan(_) => Err(Error::ConflictingIteratorOptions(
                "a scan has no order to reverse".to_string(),
            )),
        })
    }

    /// Only return the named attributes; nested attributes use the `__` separator.
    pub fn specific_attributes<I, S>(self, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.configure(|iterator| {
            iterator.request.args_mut().selection =
                Some(common::selection::Selection::parse(names)?);
            Ok(())
        })
    }

    /// Keep fetching pages until the store reports the final one.
    pub fn recursive(self) -> Result<Self> {
        self.configure(|iterator| {
            iterator.recursive = true;
            Ok(())
        })
    }

    /// Allow [`Self::limit`] together with [`Self::recursive`].
    ///
    /// The limit then caps the items evaluated across all pages instead of per page.
    pub fn limit_across_pages(self) -> Result<Self> {
        self.configure(|iterator| {
            iterator.limit_across_pages = true;
            Ok(())
        })
    }

    /// Continuation token of the last page read, `None` once the final page was read.
    pub fn last_key(&self) -> Option<&common::Item> {
        self.last.as_ref()
    }

    /// A fresh configuring iterator with the same settings, starting after [`Self::last_key`].
    pub fn again(&self) -> Result<Self> {
        let last = self.last.clone().ok_or(Error::NoMorePages)?;
        let mut request = self.request.clone();
        request.args_mut().exclusive_start_key = Some(last);
        Ok(Self {
            client: self.client.clone(),
            request,
            recursive: self.recursive,
            limit_across_pages: self.limit_across_pages,
            validator: self.validator.clone(),
            partial: self.partial,
            state: State::Configuring,
            buffer: collections::VecDeque::new(),
            pages: 0,
            budget: None,
            last: None,
        })
    }

    /// Number of matching items, counted by the store without returning them.
    ///
    /// Reads one page, or every page when recursive, and sums the reported counts.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_kwargs.count", skip(self), err)
    )]
    pub fn count(mut self) -> Result<i64> {
        if self.state != State::Configuring {
            return Err(Error::IteratorAlreadyBound);
        }
        let args = self.request.args_mut();
        args.select = Some(types::Select::Count);
        args.selection = None;
        self.bind()?;
        let mut total = 0;
        loop {
            let page = self.fetch()?;
            total += i64::from(page.count);
            if !self.has_next_page() {
                return Ok(total);
            }
        }
    }

    fn bind(&mut self) -> Result<()> {
        let limit = self.request.args().limit;
        if self.recursive && limit.is_some() && !self.limit_across_pages {
            return Err(Error::ConflictingIteratorOptions(
                "limit caps a single page while recursive reads every page, \
                 use limit_across_pages to combine them"
                    .to_string(),
            ));
        }
        if self.recursive && self.limit_across_pages {
            self.budget = limit;
        }
        self.state = State::Bound;
        Ok(())
    }

    fn fetch(&mut self) -> Result<read::common::Page> {
        let mut request = self.request.clone();
        let args = request.args_mut();
        if self.pages > 0 {
            args.exclusive_start_key = self.last.clone();
        }
        if let Some(budget) = self.budget {
            args.limit = Some(budget);
        }
        let page = request.send(self.client.as_ref())?;
        self.pages += 1;
        self.last = page.last_evaluated_key.clone();
        if let Some(budget) = &mut self.budget {
            *budget -= page.scanned_count;
        }
        Ok(page)
    }

    fn has_next_page(&self) -> bool {
        self.recursive && self.last.is_some() && self.budget.is_none_or(|budget| budget > 0)
    }

    fn load_page(&mut self) -> Result<()> {
        let page = self.fetch()?;
        self.buffer.extend(page.items);
        Ok(())
    }

    fn validate(&self, raw: common::Item) -> Result<common::Item> {
        let partial = self.partial
            || self
                .request
                .args()
                .selection
                .as_ref()
                .is_some_and(|selection| !selection.is_empty());
        Ok(self.validator.validate(raw, partial)?)
    }

    fn fail(&mut self, error: Error) -> Option<Result<common::Item>> {
        self.state = State::Exhausted;
        self.buffer.clear();
        Some(Err(error))
    }
}

impl Iterator for ReadIterator {
    type Item = Result<common::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                State::Exhausted => return None,
                State::Configuring => {
                    if let Err(error) = self.bind().and_then(|()| self.load_page()) {
                        return self.fail(error);
                    }
                }
                State::Bound => {
                    if let Some(raw) = self.buffer.pop_front() {
                        return Some(self.validate(raw));
                    }
                    if !self.has_next_page() {
                        self.state = State::Exhausted;
                        return None;
                    }
                    if let Err(error) = self.load_page() {
                        return self.fail(error);
                    }
                }
            }
        }
    }
}

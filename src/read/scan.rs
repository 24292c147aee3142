use crate::{client, common::placeholder, error::Result, read};

/// One page of a Scan operation.
///
/// Most callers go through [`crate::table::Table::scan`], which builds this and wraps it in a
/// [`read::iterator::ReadIterator`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scan {
    /// Read operation arguments (table name, filter, selection, etc.).
    pub multiple_read_args: read::common::MultipleReadArgs,
}

impl From<Scan> for read::common::MultipleReadInput {
    fn from(scan: Scan) -> Self {
        let mut placeholders = placeholder::Placeholders::default();
        let mut operation = scan.multiple_read_args.into_input(&mut placeholders);
        (
            operation.expression_attribute_names,
            operation.expression_attribute_values,
        ) = placeholders.into_request_maps();
        operation
    }
}

impl Scan {
    /// Execute a single page of the scan.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_kwargs.scan", skip(client), err)
    )]
    pub fn send(self, client: &dyn client::Client) -> Result<read::common::Page> {
        let scan: read::common::MultipleReadInput = self.into();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            filter = ?scan.filter_expression,
            resumed = scan.exclusive_start_key.is_some(),
            "scan page"
        );
        client.scan(scan)
    }
}

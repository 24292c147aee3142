use crate::{
    client,
    common::{self, condition, placeholder},
    error::{Error, Result},
    read,
};

/// Wire input of a Query call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryInput {
    /// Rendered key condition.
    pub key_condition_expression: String,
    /// Settings shared with Scan, including the placeholder maps.
    pub multiple_read_operation: read::common::MultipleReadInput,
    /// `Some(false)` to read the sort key in descending order.
    pub scan_index_forward: Option<bool>,
}

/// One page of a Query operation.
///
/// Most callers go through [`crate::table::Table::query`], which builds this and wraps it in a
/// [`read::iterator::ReadIterator`].
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    /// Condition on the partition key and, optionally, the sort key.
    pub key_condition: condition::ConditionNode,
    /// Additional read operation arguments (table name, filter, selection, etc.).
    pub multiple_read_args: read::common::MultipleReadArgs,
    /// Whether to scan the index forward (ascending) or backward (descending).
    pub scan_index_forward: Option<bool>,
}

impl From<Query> for QueryInput {
    fn from(query: Query) -> Self {
        let mut placeholders = placeholder::Placeholders::default();
        let key_condition_expression = query.key_condition.render(&mut placeholders);
        let mut multiple_read_operation = query.multiple_read_args.into_input(&mut placeholders);
        (
            multiple_read_operation.expression_attribute_names,
            multiple_read_operation.expression_attribute_values,
        ) = placeholders.into_request_maps();
        Self {
            key_condition_expression,
            multiple_read_operation,
            scan_index_forward: query.scan_index_forward,
        }
    }
}

impl Query {
    /// Execute a single page of the query.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_kwargs.query", skip(client), err)
    )]
    pub fn send(self, client: &dyn client::Client) -> Result<read::common::Page> {
        let query: QueryInput = self.into();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            key_condition = %query.key_condition_expression,
            filter = ?query.multiple_read_operation.filter_expression,
            resumed = query.multiple_read_operation.exclusive_start_key.is_some(),
            "query page"
        );
        client.query(query)
    }
}

/// Whether `key_condition` is usable as a query key condition for `key_schema`.
///
/// The partition key must be tested for equality; the sort key, if tested, must use a
/// comparison, `between` or `begins_with`.
pub(crate) fn check_key_condition(
    key_schema: &common::key::KeySchema,
    nodes: &[condition::ConditionNode],
) -> Result<()> {
    let mut has_hash_key = false;
    for node in nodes {
        let Some(path) = node.path() else {
            continue;
        };
        let operator = node.operator().unwrap_or_default();
        if path.root() == key_schema.hash_key {
            if operator != condition::Operator::Eq {
                return Err(Error::malformed_condition(
                    &key_schema.hash_key,
                    "the hash key can only be queried with eq",
                ));
            }
            has_hash_key = true;
        } else if !matches!(
            operator,
            condition::Operator::Eq
                | condition::Operator::Lt
                | condition::Operator::Lte
                | condition::Operator::Gt
                | condition::Operator::Gte
                | condition::Operator::Between
                | condition::Operator::BeginsWith
        ) {
            return Err(Error::malformed_condition(
                path.root(),
                "the range key supports eq, lt, lte, gt, gte, between and begins_with",
            ));
        }
    }
    if !has_hash_key {
        return Err(Error::InvalidKey(format!(
            "query requires an eq condition on hash key `{}`",
            key_schema.hash_key
        )));
    }
    Ok(())
}

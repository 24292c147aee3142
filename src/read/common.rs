use crate::common;

use aws_sdk_dynamodb::types;
use std::collections;

/// Settings shared by single-item style reads (GetItem, BatchGetItem).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SingleReadInput {
    /// Strongly consistent read.
    pub consistent_read: Option<bool>,
    /// Placeholder names used by the projection.
    pub expression_attribute_names: Option<collections::HashMap<String, String>>,
    /// Attributes to return.
    pub projection_expression: Option<String>,
    /// The table to read from.
    pub table_name: String,
}

/// Arguments for single-item style reads (GetItem, BatchGetItem).
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct SingleReadArgs {
    /// Whether to use a consistent read.
    ///
    /// `true` for strongly consistent reads, `false` or `None` for eventually consistent reads.
    pub consistent_read: Option<bool>,
    /// Which attributes to retrieve (projection expression).
    ///
    /// If `None`, all attributes are retrieved.
    pub selection: Option<common::selection::Selection>,
    /// The name of the table to read from.
    pub table_name: String,
}

impl From<SingleReadArgs> for SingleReadInput {
    fn from(single_read_args: SingleReadArgs) -> Self {
        let (expression_attribute_names, projection_expression) = match single_read_args.selection {
            Some(selection) if !selection.is_empty() => {
                let mut placeholders = common::placeholder::Placeholders::default();
                let projection_expression = selection.render(&mut placeholders);
                let (names, _) = placeholders.into_request_maps();
                (names, Some(projection_expression))
            }
            _ => (None, None),
        };
        Self {
            consistent_read: single_read_args.consistent_read,
            expression_attribute_names,
            projection_expression,
            table_name: single_read_args.table_name,
        }
    }
}

/// Settings shared by paginated reads (Query, Scan).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultipleReadInput {
    /// Strongly consistent read.
    pub consistent_read: Option<bool>,
    /// Continuation token of the previous page.
    pub exclusive_start_key: Option<common::Item>,
    /// Placeholder names used by any of the expressions.
    pub expression_attribute_names: Option<collections::HashMap<String, String>>,
    /// Placeholder values used by any of the expressions.
    pub expression_attribute_values: Option<collections::HashMap<String, types::AttributeValue>>,
    /// Filter applied after items are read.
    pub filter_expression: Option<String>,
    /// Secondary index to read instead of the base table.
    pub index_name: Option<String>,
    /// Maximum number of items evaluated for this page.
    pub limit: Option<i32>,
    /// Attributes to return.
    pub projection_expression: Option<String>,
    /// `Select::Count` for count-only reads.
    pub select: Option<types::Select>,
    /// The table to read from.
    pub table_name: String,
}

/// Arguments for paginated reads (Query, Scan).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultipleReadArgs {
    /// Filter condition applied to the items read.
    pub condition: Option<common::condition::ConditionNode>,
    /// Whether to use a consistent read.
    pub consistent_read: Option<bool>,
    /// The exclusive start key for pagination.
    ///
    /// Typically obtained from the `last_evaluated_key` of the previous page.
    pub exclusive_start_key: Option<common::Item>,
    /// The name of a global or local secondary index to read.
    pub index_name: Option<String>,
    /// The maximum number of items to evaluate (not necessarily the number of matching items).
    pub limit: Option<i32>,
    /// `Select::Count` to only count matching items.
    pub select: Option<types::Select>,
    /// Which attributes to retrieve (projection expression).
    pub selection: Option<common::selection::Selection>,
    /// The name of the table to read from.
    pub table_name: String,
}

impl MultipleReadArgs {
    /// Render filter and projection through the request-wide placeholders.
    ///
    /// The placeholder maps are left unset: the caller fills them in once every
    /// expression of the request has been rendered.
    pub(crate) fn into_input(
        self,
        placeholders: &mut common::placeholder::Placeholders,
    ) -> MultipleReadInput {
        let filter_expression = self
            .condition
            .map(|condition| condition.render(placeholders));
        let projection_expression = self
            .selection
            .filter(|selection| !selection.is_empty())
            .map(|selection| selection.render(placeholders));
        MultipleReadInput {
            consistent_read: self.consistent_read,
            exclusive_start_key: self.exclusive_start_key,
            filter_expression,
            index_name: self.index_name,
            limit: self.limit,
            projection_expression,
            select: self.select,
            table_name: self.table_name,
            ..Default::default()
        }
    }
}

/// One page of a Query or Scan.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    /// The items on this page (empty for count-only reads).
    pub items: Vec<common::Item>,
    /// Continuation token, absent when this was the final page.
    pub last_evaluated_key: Option<common::Item>,
    /// Number of items matching after filtering.
    pub count: i32,
    /// Number of items evaluated before filtering.
    pub scanned_count: i32,
}

/// apply common single read operation settings to a builder
#[macro_export]
macro_rules! apply_single_read_operation {
    ($builder:expr, $single_read_operation:expr) => {
        $builder
            .set_consistent_read($single_read_operation.consistent_read)
            .set_expression_attribute_names($single_read_operation.expression_attribute_names)
            .set_projection_expression($single_read_operation.projection_expression)
            .table_name($single_read_operation.table_name)
    };
}

/// apply common multiple read operation settings to a builder
#[macro_export]
macro_rules! apply_multiple_read_operation {
    ($builder:expr, $multiple_read_operation:expr) => {
        $builder
            .set_consistent_read($multiple_read_operation.consistent_read)
            .set_exclusive_start_key($multiple_read_operation.exclusive_start_key)
            .set_expression_attribute_names($multiple_read_operation.expression_attribute_names)
            .set_expression_attribute_values($multiple_read_operation.expression_attribute_values)
            .set_filter_expression($multiple_read_operation.filter_expression)
            .set_index_name($multiple_read_operation.index_name)
            .set_limit($multiple_read_operation.limit)
            .set_projection_expression($multiple_read_operation.projection_expression)
            .set_select($multiple_read_operation.select)
            .table_name($multiple_read_operation.table_name)
    };
}

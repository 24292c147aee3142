use crate::common;

use aws_sdk_dynamodb::types;
use std::collections;

/// Settings shared by single-item writes (Put, Update, Delete).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WriteInput {
    /// Rendered precondition.
    pub condition_expression: Option<String>,
    /// Placeholder names used by any of the expressions.
    pub expression_attribute_names: Option<collections::HashMap<String, String>>,
    /// Placeholder values used by any of the expressions.
    pub expression_attribute_values: Option<collections::HashMap<String, types::AttributeValue>>,
    /// Which attributes the store sends back.
    pub return_values: Option<types::ReturnValue>,
    /// The table to write to.
    pub table_name: String,
}

/// Arguments common to all single-item writes (Put, Update, Delete).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WriteArgs {
    /// Precondition that must hold for the write to be applied.
    ///
    /// When it does not, the write fails with
    /// [`crate::error::Error::ConditionalCheckFailed`].
    pub condition: Option<common::condition::ConditionNode>,
    /// Which item attributes to return in the response.
    ///
    /// Options: `AllOld`, `AllNew`, `UpdatedOld`, `UpdatedNew`, or `None`.
    pub return_values: Option<types::ReturnValue>,
    /// The name of the table to write to.
    pub table_name: String,
}

impl WriteArgs {
    /// Render the precondition through the request-wide placeholders.
    ///
    /// The placeholder maps are left unset, as in
    /// [`crate::read::common::MultipleReadArgs`].
    pub(crate) fn into_input(
        self,
        placeholders: &mut common::placeholder::Placeholders,
    ) -> WriteInput {
        WriteInput {
            condition_expression: self
                .condition
                .map(|condition| condition.render(placeholders)),
            return_values: self.return_values,
            table_name: self.table_name,
            ..Default::default()
        }
    }
}

impl From<WriteArgs> for WriteInput {
    fn from(write_args: WriteArgs) -> Self {
        let mut placeholders = common::placeholder::Placeholders::default();
        let mut operation = write_args.into_input(&mut placeholders);
        (
            operation.expression_attribute_names,
            operation.expression_attribute_values,
        ) = placeholders.into_request_maps();
        operation
    }
}

/// apply common write operation settings to a builder
#[macro_export]
macro_rules! apply_write_operation {
    ($builder:expr, $write_operation:expr) => {
        $builder
            .set_condition_expression($write_operation.condition_expression)
            .set_expression_attribute_names($write_operation.expression_attribute_names)
            .set_expression_attribute_values($write_operation.expression_attribute_values)
            .set_return_values($write_operation.return_values)
            .table_name($write_operation.table_name)
    };
}

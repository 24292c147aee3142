use crate::{
    client,
    common::{self, condition, path, placeholder},
    error::{Error, Result},
    write,
};

use aws_sdk_dynamodb::types;
use serde::Serialize;
use std::collections;

/// Update function suffix of a keyword, plain `set` when none is given.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Function {
    /// `field=value`, overwrite.
    #[default]
    Set,
    /// `field__plus=n`, atomic increment.
    Plus,
    /// `field__minus=n`, atomic decrement.
    Minus,
    /// `field__if_not_exists=value`, set only when absent.
    IfNotExists,
    /// `field__append=[...]`, append to a list.
    Append,
    /// `field__add=value`, add to a number or a set.
    Add,
    /// `field__delete=set`, remove elements from a set.
    Delete,
}

impl path::Keyword for Function {
    fn from_token(token: &str) -> Option<Self> {
        let function = match token {
            "set" => Self::Set,
            "plus" => Self::Plus,
            "minus" => Self::Minus,
            "if_not_exists" => Self::IfNotExists,
            "append" => Self::Append,
            "add" => Self::Add,
            "delete" => Self::Delete,
            _ => return None,
        };
        Some(function)
    }

    fn token(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Plus => "plus",
            Self::Minus => "minus",
            Self::IfNotExists => "if_not_exists",
            Self::Append => "append",
            Self::Add => "add",
            Self::Delete => "delete",
        }
    }
}

/// Right-hand side of a SET action.
#[derive(Clone, Debug, PartialEq)]
pub enum SetValue {
    /// `path = value`.
    Literal(types::AttributeValue),
    /// `path = if_not_exists(source, default)`.
    IfNotExists(path::AttributePath, types::AttributeValue),
    /// `path = source + value`.
    Increment(path::AttributePath, types::AttributeValue),
    /// `path = source - value`.
    Decrement(path::AttributePath, types::AttributeValue),
    /// `path = list_append(source, value)`.
    ListAppend(path::AttributePath, types::AttributeValue),
}

impl SetValue {
    fn render(&self, placeholders: &mut placeholder::Placeholders) -> String {
        match self {
            Self::Literal(value) => placeholders.value(value),
            Self::IfNotExists(source, value) => {
                let source = placeholders.path(source);
                let value = placeholders.value(value);
                format!("if_not_exists({source}, {value})")
            }
            Self::Increment(source, value) => {
                let source = placeholders.path(source);
                let value = placeholders.value(value);
                format!("{source} + {value}")
            }
            Self::Decrement(source, value) => {
                let source = placeholders.path(source);
                let value = placeholders.value(value);
                format!("{source} - {value}")
            }
            Self::ListAppend(source, value) => {
                let source = placeholders.path(source);
                let value = placeholders.value(value);
                format!("list_append({source}, {value})")
            }
        }
    }
}

/// One clause of an update expression.
///
/// ```rust
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use dynamodb_kwargs::write::update_item::UpdateAction;
///
/// let action = UpdateAction::parse("views__plus", AttributeValue::N("1".to_string())).unwrap();
/// assert!(matches!(action, UpdateAction::Add(_, _)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum UpdateAction {
    /// `SET path = value`.
    Set(path::AttributePath, SetValue),
    /// `REMOVE path`.
    Remove(path::AttributePath),
    /// `ADD path value`.
    Add(path::AttributePath, types::AttributeValue),
    /// `DELETE path value`.
    Delete(path::AttributePath, types::AttributeValue),
}

impl UpdateAction {
    /// Compile a single `field__function` keyword and its value.
    ///
    /// A null value with the plain `set` function removes the attribute.
    pub fn parse(key: &str, value: types::AttributeValue) -> Result<Self> {
        let (path, function) = path::resolve::<Function>(key)?;
        if value.is_null() {
            return match function {
                Function::Set => Ok(Self::Remove(path)),
                _ => Err(Error::malformed_update(
                    key,
                    "only a plain set can remove an attribute",
                )),
            };
        }
        let action = match function {
            Function::Set => Self::Set(path, SetValue::Literal(value)),
            Function::IfNotExists => Self::Set(path.clone(), SetValue::IfNotExists(path, value)),
            Function::Append => {
                if !value.is_l() {
                    return Err(Error::malformed_update(key, "append needs a list"));
                }
                Self::Set(path.clone(), SetValue::ListAppend(path, value))
            }
            Function::Plus => Self::Add(path, number(key, value)?),
            Function::Minus => Self::Add(path, negate(&number(key, value)?)),
            Function::Add => {
                if !(value.is_n() || is_set(&value)) {
                    return Err(Error::malformed_update(key, "add needs a number or a set"));
                }
                Self::Add(path, value)
            }
            Function::Delete => {
                if !is_set(&value) {
                    return Err(Error::malformed_update(key, "delete needs a set"));
                }
                Self::Delete(path, value)
            }
        };
        Ok(action)
    }

    /// The attribute this action writes.
    pub fn path(&self) -> &path::AttributePath {
        match self {
            Self::Set(path, _) | Self::Remove(path) | Self::Add(path, _) | Self::Delete(path, _) => {
                path
            }
        }
    }

    fn render(&self, placeholders: &mut placeholder::Placeholders) -> String {
        let target = placeholders.path(self.path());
        match self {
            Self::Set(_, value) => format!("{target} = {}", value.render(placeholders)),
            Self::Remove(_) => target,
            Self::Add(_, value) | Self::Delete(_, value) => {
                format!("{target} {}", placeholders.value(value))
            }
        }
    }
}

fn number(key: &str, value: types::AttributeValue) -> Result<types::AttributeValue> {
    match value {
        types::AttributeValue::N(_) => Ok(value),
        _ => Err(Error::malformed_update(key, "needs a number")),
    }
}

fn negate(value: &types::AttributeValue) -> types::AttributeValue {
    let types::AttributeValue::N(number) = value else {
        return value.clone();
    };
    let negated = match number.strip_prefix('-') {
        Some(positive) => positive.to_string(),
        None if number.parse::<f64>().is_ok_and(|number| number == 0.0) => number.clone(),
        None => format!("-{number}"),
    };
    types::AttributeValue::N(negated)
}

fn is_set(value: &types::AttributeValue) -> bool {
    value.is_ss() || value.is_ns() || value.is_bs()
}

/// Render actions grouped by clause: `SET ... REMOVE ... ADD ... DELETE ...`.
///
/// Within a clause actions keep their input order.
pub fn render(actions: &[UpdateAction], placeholders: &mut placeholder::Placeholders) -> String {
    let mut clauses: [(&str, Vec<String>); 4] = [
        ("SET", Vec::new()),
        ("REMOVE", Vec::new()),
        ("ADD", Vec::new()),
        ("DELETE", Vec::new()),
    ];
    for action in actions {
        let index = match action {
            UpdateAction::Set(..) => 0,
            UpdateAction::Remove(_) => 1,
            UpdateAction::Add(..) => 2,
            UpdateAction::Delete(..) => 3,
        };
        clauses[index].1.push(action.render(placeholders));
    }
    let clauses: Vec<String> = clauses
        .into_iter()
        .filter(|(_, expressions)| !expressions.is_empty())
        .map(|(keyword, expressions)| format!("{keyword} {}", expressions.join(", ")))
        .collect();
    clauses.join(" ")
}

/// A compiled update together with its precondition and placeholders.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompiledUpdate {
    /// Actions in input order.
    pub actions: Vec<UpdateAction>,
    /// Precondition compiled from the separate condition mapping.
    pub condition: Option<condition::ConditionNode>,
    /// Names and values interned by both expressions.
    pub placeholders: placeholder::Placeholders,
    /// The rendered update expression.
    pub expression: String,
    /// The rendered precondition.
    pub condition_expression: Option<String>,
}

/// Compile update keyword arguments and an optional precondition mapping.
///
/// Both expressions are rendered through one allocator, so they can be sent together.
///
/// ```rust
/// use dynamodb_kwargs::{common::Kwargs, write::update_item};
/// use serde_json::json;
///
/// let kwargs = Kwargs::from([
///     ("name".to_string(), json!("John")),
///     ("logins__plus".to_string(), json!(1)),
/// ]);
/// let conditions = Kwargs::from([("version".to_string(), json!(3))]);
/// let compiled = update_item::compile(kwargs, conditions).unwrap();
/// assert_eq!(compiled.expression, "SET #n0 = :v0 ADD #n1 :v1");
/// assert_eq!(compiled.condition_expression.unwrap(), "#n2 = :v2");
/// ```
pub fn compile<T: Serialize>(
    kwargs: common::Kwargs<T>,
    conditions: common::Kwargs<T>,
) -> Result<CompiledUpdate> {
    let actions = parse_all(common::to_attribute_values(kwargs)?)?;
    let condition =
        condition::ConditionNode::all(condition::parse_all(common::to_attribute_values(
            conditions,
        )?)?);
    let mut placeholders = placeholder::Placeholders::default();
    let expression = render(&actions, &mut placeholders);
    let condition_expression = condition
        .as_ref()
        .map(|condition| condition.render(&mut placeholders));
    Ok(CompiledUpdate {
        actions,
        condition,
        placeholders,
        expression,
        condition_expression,
    })
}

/// Parse every keyword, rejecting an attribute targeted twice or an empty update.
pub(crate) fn parse_all(
    kwargs: common::Kwargs<types::AttributeValue>,
) -> Result<Vec<UpdateAction>> {
    if kwargs.is_empty() {
        return Err(Error::malformed_update("", "nothing to update"));
    }
    let mut targets = collections::HashSet::with_capacity(kwargs.len());
    let mut actions = Vec::with_capacity(kwargs.len());
    for (key, value) in kwargs {
        let action = UpdateAction::parse(&key, value)?;
        if !targets.insert(action.path().clone()) {
            return Err(Error::DuplicateUpdateTarget(action.path().to_string()));
        }
        actions.push(action);
    }
    Ok(actions)
}

/// Wire input of an UpdateItem call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateItemInput {
    /// Full primary key of the item.
    pub key: common::Item,
    /// Rendered update expression.
    pub update_expression: String,
    /// Table, precondition and the placeholder maps of both expressions.
    pub write_operation: write::common::WriteInput,
}

/// Update item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use dynamodb_kwargs::{client, common, write};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let update_item = write::update_item::UpdateItem {
///     key: common::Item::from([("id".to_string(), AttributeValue::S("1".to_string()))]),
///     actions: vec![write::update_item::UpdateAction::parse(
///         "name",
///         AttributeValue::S("New".to_string()),
///     )?],
///     write_args: write::common::WriteArgs {
///         table_name: "users".to_string(),
///         ..Default::default()
///     },
/// };
/// update_item.send(client::shared()?.as_ref())?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateItem {
    /// The primary key of the item to update.
    pub key: common::Item,
    /// The changes to make, in input order.
    pub actions: Vec<UpdateAction>,
    /// Additional write operation arguments (table name, condition, return values).
    pub write_args: write::common::WriteArgs,
}

impl From<UpdateItem> for UpdateItemInput {
    fn from(update_item: UpdateItem) -> Self {
        let mut placeholders = placeholder::Placeholders::default();
        let update_expression = render(&update_item.actions, &mut placeholders);
        let mut write_operation = update_item.write_args.into_input(&mut placeholders);
        (
            write_operation.expression_attribute_names,
            write_operation.expression_attribute_values,
        ) = placeholders.into_request_maps();
        Self {
            key: update_item.key,
            update_expression,
            write_operation,
        }
    }
}

impl UpdateItem {
    /// Execute the update item operation, returning the attributes asked for.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_kwargs.update_item", skip(client), err)
    )]
    pub fn send(self, client: &dyn client::Client) -> Result<Option<common::Item>> {
        let update_item: UpdateItemInput = self.into();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            update = %update_item.update_expression,
            condition = ?update_item.write_operation.condition_expression,
            "update item"
        );
        client.update_item(update_item)
    }
}

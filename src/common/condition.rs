use crate::{
    common::{self, path, placeholder},
    error::{Error, Result},
};

use aws_sdk_dynamodb::types;
use serde::Serialize;

/// The store accepts at most this many operands in one `IN` list.
const MAX_IN_OPERANDS: usize = 100;

const AND: &str = " AND ";

/// Condition operator suffix of a keyword, `eq` when none is given.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Operator {
    /// `field` or `field__eq`.
    #[default]
    Eq,
    /// `field__ne`.
    Ne,
    /// `field__lt`.
    Lt,
    /// `field__lte`.
    Lte,
    /// `field__gt`.
    Gt,
    /// `field__gte`.
    Gte,
    /// `field__between`, with a two element list operand.
    Between,
    /// `field__in`, with a non-empty list operand.
    In,
    /// `field__begins_with`, with a string or binary operand.
    BeginsWith,
    /// `field__contains`.
    Contains,
    /// `field__exists=true`.
    Exists,
    /// `field__not_exists=true`.
    NotExists,
}

impl path::Keyword for Operator {
    fn from_token(token: &str) -> Option<Self> {
        let operator = match token {
            "eq" => Self::Eq,
            "ne" => Self::Ne,
            "lt" => Self::Lt,
            "lte" => Self::Lte,
            "gt" => Self::Gt,
            "gte" => Self::Gte,
            "between" => Self::Between,
            "in" => Self::In,
            "begins_with" => Self::BeginsWith,
            "contains" => Self::Contains,
            "exists" => Self::Exists,
            "not_exists" => Self::NotExists,
            _ => return None,
        };
        Some(operator)
    }

    fn token(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Between => "between",
            Self::In => "in",
            Self::BeginsWith => "begins_with",
            Self::Contains => "contains",
            Self::Exists => "exists",
            Self::NotExists => "not_exists",
        }
    }
}

/// Typed condition tree.
///
/// A compiled condition is a single leaf or an [`ConditionNode::And`] of leaves.
///
/// ```rust
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use dynamodb_kwargs::common::condition::ConditionNode;
///
/// let node = ConditionNode::parse("age__gte", AttributeValue::N("18".to_string())).unwrap();
/// assert_eq!(node.path().unwrap().to_string(), "age");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum ConditionNode {
    /// `path = value`.
    Equals(path::AttributePath, types::AttributeValue),
    /// `path <> value`.
    NotEquals(path::AttributePath, types::AttributeValue),
    /// `path < value`.
    LessThan(path::AttributePath, types::AttributeValue),
    /// `path <= value`.
    LessOrEqual(path::AttributePath, types::AttributeValue),
    /// `path > value`.
    GreaterThan(path::AttributePath, types::AttributeValue),
    /// `path >= value`.
    GreaterOrEqual(path::AttributePath, types::AttributeValue),
    /// `path BETWEEN low AND high`, inclusive.
    Between(
        path::AttributePath,
        types::AttributeValue,
        types::AttributeValue,
    ),
    /// `path IN (values...)`.
    In(path::AttributePath, Vec<types::AttributeValue>),
    /// `begins_with(path, prefix)`.
    BeginsWith(path::AttributePath, types::AttributeValue),
    /// `contains(path, value)`.
    Contains(path::AttributePath, types::AttributeValue),
    /// `attribute_exists(path)`.
    Exists(path::AttributePath),
    /// `attribute_not_exists(path)`.
    NotExists(path::AttributePath),
    /// Conjunction of the children.
    And(Vec<ConditionNode>),
}

impl ConditionNode {
    /// Compile a single `field__op` keyword and its operand.
    pub fn parse(key: &str, value: types::AttributeValue) -> Result<Self> {
        let (path, operator) = path::resolve::<Operator>(key)?;
        Self::leaf(key, path, operator, value)
    }

    pub(crate) fn leaf(
        key: &str,
        path: path::AttributePath,
        operator: Operator,
        value: types::AttributeValue,
    ) -> Result<Self> {
        let node = match operator {
            Operator::Eq => Self::Equals(path, value),
            Operator::Ne => Self::NotEquals(path, value),
            Operator::Lt => Self::LessThan(path, value),
            Operator::Lte => Self::LessOrEqual(path, value),
            Operator::Gt => Self::GreaterThan(path, value),
            Operator::Gte => Self::GreaterOrEqual(path, value),
            Operator::Between => {
                let bounds = match value {
                    types::AttributeValue::L(bounds) => <[_; 2]>::try_from(bounds).ok(),
                    _ => None,
                };
                let Some([low, high]) = bounds else {
                    return Err(Error::malformed_condition(
                        key,
                        "between expects a list of exactly two operands",
                    ));
                };
                Self::Between(path, low, high)
            }
            Operator::In => match value {
                types::AttributeValue::L(values)
                    if !values.is_empty() && values.len() <= MAX_IN_OPERANDS =>
                {
                    Self::In(path, values)
                }
                _ => {
                    return Err(Error::malformed_condition(
                        key,
                        format!("in expects a list of 1 to {MAX_IN_OPERANDS} operands"),
                    ));
                }
            },
            Operator::BeginsWith => match value {
                types::AttributeValue::S(_) | types::AttributeValue::B(_) => {
                    Self::BeginsWith(path, value)
                }
                _ => {
                    return Err(Error::malformed_condition(
                        key,
                        "begins_with expects a string or binary operand",
                    ));
                }
            },
            Operator::Contains => Self::Contains(path, value),
            Operator::Exists | Operator::NotExists => {
                if value != types::AttributeValue::Bool(true) {
                    return Err(Error::malformed_condition(
                        key,
                        format!(
                            "{} takes no operand and must be given `true`",
                            path::Keyword::token(operator)
                        ),
                    ));
                }
                if operator == Operator::Exists {
                    Self::Exists(path)
                } else {
                    Self::NotExists(path)
                }
            }
        };
        Ok(node)
    }

    /// Combine nodes with AND, `None` when there is nothing to combine.
    pub fn all(mut nodes: Vec<Self>) -> Option<Self> {
        match nodes.len() {
            0 => None,
            1 => nodes.pop(),
            _ => Some(Self::And(nodes)),
        }
    }

    /// The attribute a leaf tests, `None` for [`ConditionNode::And`].
    pub fn path(&self) -> Option<&path::AttributePath> {
        match self {
            Self::Equals(path, _)
            | Self::NotEquals(path, _)
            | Self::LessThan(path, _)
            | Self::LessOrEqual(path, _)
            | Self::GreaterThan(path, _)
            | Self::GreaterOrEqual(path, _)
            | Self::Between(path, _, _)
            | Self::In(path, _)
            | Self::BeginsWith(path, _)
            | Self::Contains(path, _)
            | Self::Exists(path)
            | Self::NotExists(path) => Some(path),
            Self::And(_) => None,
        }
    }

    /// The operator of a leaf, `None` for [`ConditionNode::And`].
    pub fn operator(&self) -> Option<Operator> {
        let operator = match self {
            Self::Equals(..) => Operator::Eq,
            Self::NotEquals(..) => Operator::Ne,
            Self::LessThan(..) => Operator::Lt,
            Self::LessOrEqual(..) => Operator::Lte,
            Self::GreaterThan(..) => Operator::Gt,
            Self::GreaterOrEqual(..) => Operator::Gte,
            Self::Between(..) => Operator::Between,
            Self::In(..) => Operator::In,
            Self::BeginsWith(..) => Operator::BeginsWith,
            Self::Contains(..) => Operator::Contains,
            Self::Exists(_) => Operator::Exists,
            Self::NotExists(_) => Operator::NotExists,
            Self::And(_) => return None,
        };
        Some(operator)
    }

    /// Render the expression text, interning names and values as they are met.
    pub fn render(&self, placeholders: &mut placeholder::Placeholders) -> String {
        match self {
            Self::Equals(path, value) => compare(placeholders, path, "=", value),
            Self::NotEquals(path, value) => compare(placeholders, path, "<>", value),
            Self::LessThan(path, value) => compare(placeholders, path, "<", value),
            Self::LessOrEqual(path, value) => compare(placeholders, path, "<=", value),
            Self::GreaterThan(path, value) => compare(placeholders, path, ">", value),
            Self::GreaterOrEqual(path, value) => compare(placeholders, path, ">=", value),
            Self::Between(path, low, high) => {
                let path = placeholders.path(path);
                let low = placeholders.value(low);
                let high = placeholders.value(high);
                format!("{path} BETWEEN {low} AND {high}")
            }
            Self::In(path, values) => {
                let path = placeholders.path(path);
                let values: Vec<String> = values
                    .iter()
                    .map(|value| placeholders.value(value))
                    .collect();
                format!("{path} IN ({})", values.join(", "))
            }
            Self::BeginsWith(path, value) => function(placeholders, "begins_with", path, value),
            Self::Contains(path, value) => function(placeholders, "contains", path, value),
            Self::Exists(path) => format!("attribute_exists({})", placeholders.path(path)),
            Self::NotExists(path) => format!("attribute_not_exists({})", placeholders.path(path)),
            Self::And(children) => {
                let expressions: Vec<String> = children
                    .iter()
                    .map(|child| match child {
                        Self::And(_) => format!("({})", child.render(placeholders)),
                        _ => child.render(placeholders),
                    })
                    .collect();
                expressions.join(AND)
            }
        }
    }
}

fn compare(
    placeholders: &mut placeholder::Placeholders,
    path: &path::AttributePath,
    operator: &str,
    value: &types::AttributeValue,
) -> String {
    let path = placeholders.path(path);
    let value = placeholders.value(value);
    format!("{path} {operator} {value}")
}

fn function(
    placeholders: &mut placeholder::Placeholders,
    name: &str,
    path: &path::AttributePath,
    value: &types::AttributeValue,
) -> String {
    let path = placeholders.path(path);
    let value = placeholders.value(value);
    format!("{name}({path}, {value})")
}

/// A compiled keyword mapping together with the placeholders it allocated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompiledCondition {
    /// The condition tree, `None` for an empty mapping.
    pub node: Option<ConditionNode>,
    /// Names and values interned while compiling.
    pub placeholders: placeholder::Placeholders,
    /// The rendered expression text, `None` for an empty mapping.
    pub expression: Option<String>,
}

impl CompiledCondition {
    pub(crate) fn from_nodes(nodes: Vec<ConditionNode>) -> Self {
        let node = ConditionNode::all(nodes);
        let mut placeholders = placeholder::Placeholders::default();
        let expression = node.as_ref().map(|node| node.render(&mut placeholders));
        Self {
            node,
            placeholders,
            expression,
        }
    }
}

/// Compile keyword arguments into one AND-ed condition, in the caller's order.
///
/// ```rust
/// use dynamodb_kwargs::common::condition;
/// use indexmap::IndexMap;
/// use serde_json::json;
///
/// let kwargs = IndexMap::from([
///     ("address__state".to_string(), json!("CA")),
///     ("age__between".to_string(), json!([18, 65])),
/// ]);
/// let compiled = condition::compile(kwargs).unwrap();
/// assert_eq!(
///     compiled.expression.unwrap(),
///     "#n0.#n1 = :v0 AND #n2 BETWEEN :v1 AND :v2",
/// );
/// ```
pub fn compile<T: Serialize>(kwargs: common::Kwargs<T>) -> Result<CompiledCondition> {
    let nodes = parse_all(common::to_attribute_values(kwargs)?)?;
    Ok(CompiledCondition::from_nodes(nodes))
}

pub(crate) fn parse_all(
    kwargs: common::Kwargs<types::AttributeValue>,
) -> Result<Vec<ConditionNode>> {
    kwargs
        .into_iter()
        .map(|(key, value)| ConditionNode::parse(&key, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use indexmap::IndexMap;
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::collections;

    fn path(segments: &[&str]) -> path::AttributePath {
        path::AttributePath::new(segments.iter().copied()).unwrap()
    }

    fn n(value: &str) -> types::AttributeValue {
        types::AttributeValue::N(value.to_string())
    }

    fn s(value: &str) -> types::AttributeValue {
        types::AttributeValue::S(value.to_string())
    }

    #[rstest]
    #[case::default_eq("a__b", Operator::Eq, "#n0.#n1 = :v0")]
    #[case::eq("a__b__eq", Operator::Eq, "#n0.#n1 = :v0")]
    #[case::ne("a__b__ne", Operator::Ne, "#n0.#n1 <> :v0")]
    #[case::lt("a__b__lt", Operator::Lt, "#n0.#n1 < :v0")]
    #[case::lte("a__b__lte", Operator::Lte, "#n0.#n1 <= :v0")]
    #[case::gt("a__b__gt", Operator::Gt, "#n0.#n1 > :v0")]
    #[case::gte("a__b__gte", Operator::Gte, "#n0.#n1 >= :v0")]
    #[case::begins_with("a__b__begins_with", Operator::BeginsWith, "begins_with(#n0.#n1, :v0)")]
    #[case::contains("a__b__contains", Operator::Contains, "contains(#n0.#n1, :v0)")]
    fn test_single_operand_operators(
        #[case] key: &str,
        #[case] operator: Operator,
        #[case] expected: &str,
    ) {
        let node = ConditionNode::parse(key, s("c")).unwrap();
        assert_eq!(node.path(), Some(&path(&["a", "b"])));
        assert_eq!(node.operator(), Some(operator));
        let mut placeholders = placeholder::Placeholders::default();
        assert_eq!(node.render(&mut placeholders), expected);
        let (names, values) = placeholders.render();
        assert_eq!(
            names,
            collections::HashMap::from([
                ("#n0".to_string(), "a".to_string()),
                ("#n1".to_string(), "b".to_string()),
            ])
        );
        assert_eq!(
            values,
            collections::HashMap::from([(":v0".to_string(), s("c"))])
        );
    }

    #[rstest]
    #[case::between(
        "a__between",
        types::AttributeValue::L(vec![n("1"), n("2")]),
        ConditionNode::Between(path(&["a"]), n("1"), n("2")),
        "#n0 BETWEEN :v0 AND :v1"
    )]
    #[case::in_list(
        "a__in",
        types::AttributeValue::L(vec![n("1"), n("2"), n("3")]),
        ConditionNode::In(path(&["a"]), vec![n("1"), n("2"), n("3")]),
        "#n0 IN (:v0, :v1, :v2)"
    )]
    #[case::in_single(
        "a__in",
        types::AttributeValue::L(vec![n("1")]),
        ConditionNode::In(path(&["a"]), vec![n("1")]),
        "#n0 IN (:v0)"
    )]
    #[case::exists(
        "a__b__exists",
        types::AttributeValue::Bool(true),
        ConditionNode::Exists(path(&["a", "b"])),
        "attribute_exists(#n0.#n1)"
    )]
    #[case::not_exists(
        "a__not_exists",
        types::AttributeValue::Bool(true),
        ConditionNode::NotExists(path(&["a"])),
        "attribute_not_exists(#n0)"
    )]
    #[case::eq_list_value(
        "a",
        types::AttributeValue::L(vec![n("1")]),
        ConditionNode::Equals(path(&["a"]), types::AttributeValue::L(vec![n("1")])),
        "#n0 = :v0"
    )]
    #[case::operator_not_terminal(
        "a__eq__b",
        n("1"),
        ConditionNode::Equals(path(&["a", "eq", "b"]), n("1")),
        "#n0.#n1.#n2 = :v0"
    )]
    fn test_parse(
        #[case] key: &str,
        #[case] value: types::AttributeValue,
        #[case] expected: ConditionNode,
        #[case] expression: &str,
    ) {
        let node = ConditionNode::parse(key, value).unwrap();
        assert_eq!(node, expected);
        let mut placeholders = placeholder::Placeholders::default();
        assert_eq!(node.render(&mut placeholders), expression);
    }

    #[rstest]
    #[case::between_scalar("a__between", n("1"))]
    #[case::between_one("a__between", types::AttributeValue::L(vec![n("1")]))]
    #[case::between_three("a__between", types::AttributeValue::L(vec![n("1"), n("2"), n("3")]))]
    #[case::in_scalar("a__in", n("1"))]
    #[case::in_empty("a__in", types::AttributeValue::L(vec![]))]
    #[case::in_too_many("a__in", types::AttributeValue::L(vec![n("1"); 101]))]
    #[case::exists_false("a__exists", types::AttributeValue::Bool(false))]
    #[case::not_exists_value("a__not_exists", s("b"))]
    #[case::begins_with_number("a__begins_with", n("1"))]
    fn test_parse_malformed(#[case] key: &str, #[case] value: types::AttributeValue) {
        let error = ConditionNode::parse(key, value).unwrap_err();
        assert!(matches!(error, Error::MalformedCondition { key: actual, .. } if actual == key));
    }

    #[test]
    fn test_compile_combines_with_and() {
        let kwargs = IndexMap::from([
            ("a".to_string(), json!("b")),
            ("c__d__gt".to_string(), json!(1)),
            ("e__in".to_string(), json!(["b", 2])),
        ]);
        let compiled = compile(kwargs).unwrap();
        assert_eq!(
            compiled.node,
            Some(ConditionNode::And(vec![
                ConditionNode::Equals(path(&["a"]), s("b")),
                ConditionNode::GreaterThan(path(&["c", "d"]), n("1")),
                ConditionNode::In(path(&["e"]), vec![s("b"), n("2")]),
            ]))
        );
        assert_eq!(
            compiled.expression.as_deref(),
            Some("#n0 = :v0 AND #n1.#n2 > :v1 AND #n3 IN (:v0, :v2)")
        );
        let (names, values) = compiled.placeholders.render();
        assert_eq!(names.len(), 4);
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn test_compile_is_deterministic() {
        let kwargs = || {
            IndexMap::from([
                ("a__b__begins_with".to_string(), json!("x")),
                ("c__between".to_string(), json!([1, 5])),
                ("d__not_exists".to_string(), json!(true)),
            ])
        };
        let first = compile(kwargs()).unwrap();
        let second = compile(kwargs()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_compile_empty() {
        let compiled = compile(IndexMap::<String, Value>::new()).unwrap();
        assert_eq!(compiled, CompiledCondition::default());
    }

    #[test]
    fn test_compile_single_is_not_wrapped() {
        let compiled = compile(IndexMap::from([("a__lt".to_string(), json!(3))])).unwrap();
        assert_eq!(
            compiled.node,
            Some(ConditionNode::LessThan(path(&["a"]), n("3")))
        );
    }

    #[test]
    fn test_nested_and_is_parenthesized() {
        let node = ConditionNode::And(vec![
            ConditionNode::Exists(path(&["a"])),
            ConditionNode::And(vec![
                ConditionNode::Equals(path(&["b"]), n("1")),
                ConditionNode::Equals(path(&["c"]), n("1")),
            ]),
        ]);
        let mut placeholders = placeholder::Placeholders::default();
        assert_eq!(
            node.render(&mut placeholders),
            "attribute_exists(#n0) AND (#n1 = :v0 AND #n2 = :v0)"
        );
        assert_eq!(node.path(), None);
        assert_eq!(node.operator(), None);
    }

    #[test]
    fn test_invalid_path() {
        let error = compile(IndexMap::from([("a____b".to_string(), json!(1))])).unwrap_err();
        assert!(matches!(error, Error::InvalidAttributePath(_)));
    }
}

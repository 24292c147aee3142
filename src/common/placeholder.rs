use crate::common::path;

use aws_sdk_dynamodb::types;
use indexmap::IndexMap;
use std::collections;

/// Collision-free `#n<i>` / `:v<i>` tokens for one compiled request.
///
/// Equal names and equal values are interned to the same token. Tokens only grow
/// and never change for the lifetime of the allocator.
///
/// ```rust
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use dynamodb_kwargs::common::placeholder::Placeholders;
///
/// let mut placeholders = Placeholders::default();
/// assert_eq!(placeholders.name("status"), "#n0");
/// assert_eq!(placeholders.value(&AttributeValue::S("on".to_string())), ":v0");
/// assert_eq!(placeholders.name("status"), "#n0");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Placeholders {
    names: IndexMap<String, String>,
    values: Vec<(types::AttributeValue, String)>,
}

impl Placeholders {
    /// Token for an attribute name segment.
    pub fn name(&mut self, segment: &str) -> String {
        if let Some(token) = self.names.get(segment) {
            return token.clone();
        }
        let token = format!("#n{}", self.names.len());
        self.names.insert(segment.to_string(), token.clone());
        token
    }

    /// Dotted token path for a (possibly nested) attribute.
    pub fn path(&mut self, path: &path::AttributePath) -> String {
        let tokens: Vec<String> = path
            .segments()
            .iter()
            .map(|segment| self.name(segment))
            .collect();
        tokens.join(".")
    }

    /// Token for a literal value.
    pub fn value(&mut self, value: &types::AttributeValue) -> String {
        // AttributeValue is not hashable, a linear probe keeps equal literals on one token
        if let Some((_, token)) = self.values.iter().find(|(existing, _)| existing == value) {
            return token.clone();
        }
        let token = format!(":v{}", self.values.len());
        self.values.push((value.clone(), token.clone()));
        token
    }

    /// Whether nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.values.is_empty()
    }

    /// The token to name and token to value maps to send with the request.
    pub fn render(
        &self,
    ) -> (
        collections::HashMap<String, String>,
        collections::HashMap<String, types::AttributeValue>,
    ) {
        let names = self
            .names
            .iter()
            .map(|(name, token)| (token.clone(), name.clone()))
            .collect();
        let values = self
            .values
            .iter()
            .map(|(value, token)| (token.clone(), value.clone()))
            .collect();
        (names, values)
    }

    /// Like [`Self::render`], with empty maps left out since the store rejects them.
    pub(crate) fn into_request_maps(
        self,
    ) -> (
        Option<collections::HashMap<String, String>>,
        Option<collections::HashMap<String, types::AttributeValue>>,
    ) {
        let (names, values) = self.render();
        let names = (!names.is_empty()).then_some(names);
        let values = (!values.is_empty()).then_some(values);
        (names, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[test]
    fn test_same_name_same_token() {
        let mut placeholders = Placeholders::default();
        let first = placeholders.name("a");
        let second = placeholders.name("b");
        assert_eq!(placeholders.name("a"), first);
        assert_ne!(first, second);
    }

    #[rstest]
    #[case::strings(
        types::AttributeValue::S("a".to_string()),
        types::AttributeValue::S("b".to_string())
    )]
    #[case::string_and_number(
        types::AttributeValue::S("1".to_string()),
        types::AttributeValue::N("1".to_string())
    )]
    #[case::bool_and_null(
        types::AttributeValue::Bool(true),
        types::AttributeValue::Null(true)
    )]
    fn test_values_interned(
        #[case] first: types::AttributeValue,
        #[case] second: types::AttributeValue,
    ) {
        let mut placeholders = Placeholders::default();
        let first_token = placeholders.value(&first);
        let second_token = placeholders.value(&second);
        assert_ne!(first_token, second_token);
        assert_eq!(placeholders.value(&first), first_token);
        assert_eq!(placeholders.value(&second), second_token);
    }

    #[test]
    fn test_path() {
        let mut placeholders = Placeholders::default();
        let path = path::AttributePath::new(["a", "b", "a"]).unwrap();
        assert_eq!(placeholders.path(&path), "#n0.#n1.#n0");
    }

    #[test]
    fn test_render() {
        let mut placeholders = Placeholders::default();
        assert!(placeholders.is_empty());
        placeholders.name("a");
        placeholders.value(&types::AttributeValue::N("1".to_string()));
        let (names, values) = placeholders.render();
        assert_eq!(
            names,
            collections::HashMap::from([("#n0".to_string(), "a".to_string())])
        );
        assert_eq!(
            values,
            collections::HashMap::from([(
                ":v0".to_string(),
                types::AttributeValue::N("1".to_string())
            )])
        );
    }

    #[test]
    fn test_into_request_maps_skips_empty() {
        let mut placeholders = Placeholders::default();
        placeholders.name("a");
        let (names, values) = placeholders.into_request_maps();
        assert!(names.is_some());
        assert!(values.is_none());
    }
}

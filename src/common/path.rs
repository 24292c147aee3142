use crate::error::{Error, Result};

use std::fmt;

/// Separator between nested attribute segments and the trailing operator in a keyword.
pub const SEPARATOR: &str = "__";

/// Ordered, non-empty list of segments addressing a (possibly nested) attribute.
///
/// ```rust
/// use dynamodb_kwargs::common::path;
///
/// let path = path::AttributePath::parse("address__state").unwrap();
/// assert_eq!(path.to_string(), "address.state");
/// ```
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AttributePath(Vec<String>);

impl AttributePath {
    /// Build a path from already split segments.
    pub fn new<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty()
            || segments
                .iter()
                .any(|segment| segment.is_empty() || segment.contains(SEPARATOR))
        {
            return Err(Error::InvalidAttributePath(segments.join(SEPARATOR)));
        }
        Ok(Self(segments))
    }

    /// Split a keyword on [`SEPARATOR`] without looking for an operator.
    pub fn parse(raw: &str) -> Result<Self> {
        Self::new(raw.split(SEPARATOR))
    }

    /// The segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The top-level attribute name.
    pub fn root(&self) -> &str {
        &self.0[0]
    }

    /// Whether the path addresses a top-level attribute.
    pub fn is_top_level(&self) -> bool {
        self.0.len() == 1
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// A trailing keyword token recognized after the last [`SEPARATOR`].
///
/// The default value is what a keyword without a recognized suffix means.
pub trait Keyword: Copy + Default + Sized {
    /// Look a token up in the keyword table.
    fn from_token(token: &str) -> Option<Self>;

    /// The token this keyword is spelled with.
    fn token(self) -> &'static str;
}

/// Split a raw keyword into an attribute path and its trailing keyword.
///
/// Only the terminal token is checked: `foo__bar__eq` is `foo.bar` with `eq`, while
/// `foo__eq__bar` is the path `foo.eq.bar` with the default keyword. An attribute whose
/// last segment is spelled like a keyword cannot be addressed this way.
pub fn resolve<K: Keyword>(raw: &str) -> Result<(AttributePath, K)> {
    if let Some((head, tail)) = raw.rsplit_once(SEPARATOR) {
        if let Some(keyword) = K::from_token(tail) {
            let path = AttributePath::parse(head)
                .map_err(|_| Error::InvalidAttributePath(raw.to_string()))?;
            return Ok((path, keyword));
        }
    }
    let path =
        AttributePath::parse(raw).map_err(|_| Error::InvalidAttributePath(raw.to_string()))?;
    Ok((path, K::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    enum Suffix {
        #[default]
        Plain,
        Eq,
        Gt,
    }

    impl Keyword for Suffix {
        fn from_token(token: &str) -> Option<Self> {
            match token {
                "eq" => Some(Self::Eq),
                "gt" => Some(Self::Gt),
                _ => None,
            }
        }

        fn token(self) -> &'static str {
            match self {
                Self::Plain => "",
                Self::Eq => "eq",
                Self::Gt => "gt",
            }
        }
    }

    #[rstest]
    #[case::plain("a", vec!["a"], Suffix::Plain)]
    #[case::operator("a__gt", vec!["a"], Suffix::Gt)]
    #[case::nested("a__b", vec!["a", "b"], Suffix::Plain)]
    #[case::nested_operator("a__b__eq", vec!["a", "b"], Suffix::Eq)]
    #[case::operator_not_terminal("a__eq__b", vec!["a", "eq", "b"], Suffix::Plain)]
    #[case::keyword_alone("eq", vec!["eq"], Suffix::Plain)]
    #[case::single_underscores("a_b__c_d", vec!["a_b", "c_d"], Suffix::Plain)]
    #[case::triple_underscore("a___b", vec!["a", "_b"], Suffix::Plain)]
    fn test_resolve(
        #[case] raw: &str,
        #[case] segments: Vec<&str>,
        #[case] expected_suffix: Suffix,
    ) {
        let (path, suffix) = resolve::<Suffix>(raw).unwrap();
        assert_eq!(path, AttributePath::new(segments).unwrap());
        assert_eq!(suffix, expected_suffix);
    }

    #[rstest]
    #[case::empty("")]
    #[case::leading("__a")]
    #[case::trailing("a__")]
    #[case::double("a____b")]
    #[case::operator_only("__eq")]
    fn test_resolve_invalid(#[case] raw: &str) {
        let error = resolve::<Suffix>(raw).unwrap_err();
        assert!(matches!(error, Error::InvalidAttributePath(path) if path == raw));
    }

    #[rstest]
    #[case::top_level(vec!["a"], "a", true)]
    #[case::nested(vec!["a", "b", "c"], "a.b.c", false)]
    fn test_display(#[case] segments: Vec<&str>, #[case] expected: &str, #[case] top: bool) {
        let path = AttributePath::new(segments).unwrap();
        assert_eq!(path.to_string(), expected);
        assert_eq!(path.is_top_level(), top);
        assert_eq!(path.root(), "a");
    }

    #[test]
    fn test_new_rejects_separator_in_segment() {
        assert!(AttributePath::new(["a__b"]).is_err());
        assert!(AttributePath::new(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_keyword_token() {
        assert_eq!(Suffix::Eq.token(), "eq");
    }
}

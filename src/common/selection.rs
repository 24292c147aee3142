use crate::{
    common::{path, placeholder},
    error::Result,
};

/// Attributes to return from a read, as a projection expression.
///
/// Names use the keyword separator for nested attributes.
///
/// ```rust
/// use dynamodb_kwargs::common::{placeholder, selection};
///
/// let selection = selection::Selection::parse(["id", "address__state"]).unwrap();
/// let mut placeholders = placeholder::Placeholders::default();
/// assert_eq!(selection.render(&mut placeholders), "#n0, #n1.#n2");
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Selection(Vec<path::AttributePath>);

impl Selection {
    /// Parse attribute names such as `id` or `address__state`.
    pub fn parse<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let paths = names
            .into_iter()
            .map(|name| path::AttributePath::parse(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self(paths))
    }

    /// The selected paths.
    pub fn paths(&self) -> &[path::AttributePath] {
        &self.0
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the projection expression.
    pub fn render(&self, placeholders: &mut placeholder::Placeholders) -> String {
        let paths: Vec<String> = self.0.iter().map(|path| placeholders.path(path)).collect();
        paths.join(", ")
    }
}

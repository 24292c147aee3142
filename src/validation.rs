use crate::common;

use std::{collections, fmt};

/// Per-field validation failures reported by a [`Validator`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationError {
    /// Field name to the list of messages for that field.
    pub fields: collections::BTreeMap<String, Vec<String>>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed")?;
        for (index, (field, messages)) in self.fields.iter().enumerate() {
            let separator = if index == 0 { ": " } else { "; " };
            write!(f, "{separator}{field}: {}", messages.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Schema validation applied to raw items on their way in and out of the store.
///
/// `partial` is set when the item is known to carry only some attributes, such as
/// reads through a keys-only index or with a projection.
pub trait Validator: fmt::Debug + Send + Sync {
    /// Validate (and possibly normalize) a raw item.
    fn validate(&self, raw: common::Item, partial: bool)
    -> Result<common::Item, ValidationError>;
}

/// Validator that accepts every item unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoValidation;

impl Validator for NoValidation {
    fn validate(
        &self,
        raw: common::Item,
        _partial: bool,
    ) -> Result<common::Item, ValidationError> {
        Ok(raw)
    }
}

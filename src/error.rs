use crate::validation;

use std::{error, result};

/// Errors raised while compiling expressions, driving reads, or talking to the store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A condition keyword has an unusable operator or the wrong number of operands.
    #[error("malformed condition `{key}`: {reason}")]
    MalformedCondition {
        /// The raw keyword as supplied by the caller.
        key: String,
        /// What is wrong with it.
        reason: String,
    },
    /// An update keyword carries a value its function cannot use.
    #[error("malformed update `{key}`: {reason}")]
    MalformedUpdate {
        /// The raw keyword as supplied by the caller.
        key: String,
        /// What is wrong with it.
        reason: String,
    },
    /// A keyword splits into an empty attribute path segment.
    #[error("invalid attribute path `{0}`")]
    InvalidAttributePath(String),
    /// The same attribute path is targeted twice in one update.
    #[error("attribute `{0}` is targeted more than once in the same update")]
    DuplicateUpdateTarget(String),
    /// Read iterator options that contradict each other.
    #[error("conflicting iterator options: {0}")]
    ConflictingIteratorOptions(String),
    /// A read iterator was reconfigured after its first page was requested.
    #[error("the iterator is already bound to its first page and can no longer be configured")]
    IteratorAlreadyBound,
    /// `again` was called on an iterator whose last page was the final one.
    #[error("there are no more pages to read")]
    NoMorePages,
    /// Key fields do not match the table's key schema.
    #[error("invalid key: {0}")]
    InvalidKey(String),
    /// The named index is not declared on the table.
    #[error("unknown index `{0}`")]
    UnknownIndex(String),
    /// The store rejected a write because its precondition did not hold.
    #[error("conditional check failed: {0}")]
    ConditionalCheckFailed(String),
    /// A unique put found an item with the same hash key.
    #[error("an item with the same hash key already exists")]
    HashKeyExists,
    /// The injected validator rejected an item.
    #[error(transparent)]
    Validation(#[from] validation::ValidationError),
    /// A value could not be converted to or from attribute values.
    #[error(transparent)]
    Serialization(#[from] serde_dynamo::Error),
    /// The store ran out of capacity for the request.
    #[error("request throttled: {0}")]
    Throttled(String),
    /// Any other failure reported by the remote client.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn error::Error + Send + Sync>),
}

impl Error {
    /// Whether the caller may reasonably retry the failed call.
    ///
    /// Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConditionalCheckFailed(_) | Self::Throttled(_))
    }

    pub(crate) fn malformed_condition(key: &str, reason: impl Into<String>) -> Self {
        Self::MalformedCondition {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_update(key: &str, reason: impl Into<String>) -> Self {
        Self::MalformedUpdate {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::conditional_check(Error::ConditionalCheckFailed("a".to_string()), true)]
    #[case::throttled(Error::Throttled("a".to_string()), true)]
    #[case::no_more_pages(Error::NoMorePages, false)]
    #[case::duplicate(Error::DuplicateUpdateTarget("a".to_string()), false)]
    #[case::unique(Error::HashKeyExists, false)]
    fn test_is_retryable(#[case] error: Error, #[case] expected: bool) {
        assert_eq!(error.is_retryable(), expected);
    }
}

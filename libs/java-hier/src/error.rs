//! Errors raised while building the hierarchy.

use thiserror::Error;

/// Registry invariant violations. Unresolved names are not errors: they
/// become synthesized stub classes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("class {name} is defined in both {first} and {second}")]
    DuplicateClass {
        name: String,
        first: String,
        second: String,
    },
}

//! Error types for microdata graph extraction.

use thiserror::Error;

use crate::limits::LimitKind;

/// Error raised during graph extraction.
///
/// Limit breaches are the only fatal failure category. Malformed
/// identifiers and URLs rejected by policy are absorbed instead: the
/// affected value is dropped or left unresolved, and the rest of the
/// parse proceeds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// A configured ceiling was exceeded under the `Fail` policy.
    #[error("limit exceeded: {kind} is {max}, observed {observed}")]
    LimitExceeded {
        /// The ceiling that was breached.
        kind: LimitKind,
        /// The configured maximum.
        max: usize,
        /// The count that breached it.
        observed: usize,
    },
}

impl ExtractError {
    /// Returns the offending limit kind.
    pub fn limit_kind(&self) -> LimitKind {
        match self {
            ExtractError::LimitExceeded { kind, .. } => *kind,
        }
    }
}

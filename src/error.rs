//! Error types for filter compilation.

use thiserror::Error;

use crate::ast::ComparisonOp;

/// The single error surfaced by a failed compile call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// The input document is not valid JSON or has the wrong shape.
    #[error("Document parse error: {0}")]
    DocumentParse(String),

    /// `from` is absent or empty.
    #[error("Missing required field 'from'")]
    MissingTable,

    /// A key's value has the wrong JSON kind (e.g. a combinator with a scalar).
    #[error("Type mismatch: value of '{key}' must be {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    /// The operator prefix of a key is not part of the grammar.
    #[error("Unknown operator '{token}' in key '{key}'")]
    UnknownOperator { key: String, token: String },

    /// The operator cannot be applied to this kind of value.
    #[error("Operator '{operator}' cannot be applied to a {kind} value")]
    InvalidOperatorForType {
        operator: ComparisonOp,
        kind: &'static str,
    },

    /// The filter nests deeper than the configured limit.
    #[error("Filter nesting exceeds the maximum depth of {limit}")]
    DepthExceeded { limit: usize },
}

impl CompileError {
    pub fn type_mismatch(key: impl Into<String>, expected: &'static str) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            expected,
        }
    }
}

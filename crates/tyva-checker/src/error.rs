//! Error types for checker construction, navigation and validation

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tyva_types::TypeError;

/// A single validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Path from the reported root to the offending value, e.g.
    /// `value.addresses[2].zip`
    pub path: String,
    /// Failure message, e.g. "is not a string"
    pub message: String,
}

/// Error returned by `check`/`strict_check` when a value is invalid
///
/// Carries the most specific failure as `path`/`message` and the full list
/// of recorded failures as `details`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{path} {message}")]
pub struct ValidationError {
    /// Path of the primary failure
    pub path: String,
    /// Message of the primary failure
    pub message: String,
    /// Every recorded failure, most specific first
    pub details: Vec<ErrorDetail>,
}

/// Errors raised by checker construction and facade navigation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckerError {
    /// The type graph could not be compiled
    #[error(transparent)]
    Type(#[from] TypeError),

    /// `get_prop`/`method_args`/`method_result` named a missing property
    #[error("Type has no property '{name}'")]
    NoSuchProperty {
        /// The missing property name
        name: String,
    },

    /// `method_args`/`method_result` named a non-function property
    #[error("Property '{name}' is not a method")]
    NotAMethod {
        /// The offending property name
        name: String,
    },

    /// `get_args`/`get_result` applied to a non-function type
    #[error("Type is not a function")]
    NotAFunction,

    /// `get_prop` applied to a non-interface type
    #[error("Type is not an interface")]
    NotAnInterface,
}

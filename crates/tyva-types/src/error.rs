//! Type system errors

use thiserror::Error;

/// Errors raised while constructing or compiling a type graph
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    /// Undefined type reference
    #[error("Unknown type '{name}'")]
    UndefinedType {
        /// Type name that was not found
        name: String,
    },

    /// An enum literal names a type that is not an enum
    #[error("'{name}' is not an enum type")]
    NotAnEnum {
        /// The offending type name
        name: String,
    },

    /// An enum literal names a member the enum does not have
    #[error("Enum '{enum_name}' has no member '{member}'")]
    UndefinedEnumMember {
        /// Enum type name
        enum_name: String,
        /// Missing member name
        member: String,
    },

    /// A rest element appeared outside the final position of a tuple
    #[error("Rest type is only allowed in the last position of a tuple")]
    MisplacedRest,

    /// A rest element wraps something other than an array type
    #[error("Rest type must contain an array type")]
    RestNotArray,

    /// Name aliases form a cycle with no structural node in between
    #[error("Circular type reference detected: {name}")]
    CircularReference {
        /// A name participating in the cycle
        name: String,
    },
}

//! Structural type validator
//!
//! Given a type suite (see `tyva-types`) and a dynamic value (see
//! `tyva-value`), this crate decides whether the value conforms to a type
//! and, on failure, renders a precise diagnostic naming the offending
//! sub-path, e.g. `person.addresses[2].zip is not a string`.
//!
//! This crate provides:
//! - Diagnostic contexts tracking the best-effort failure path through
//!   recursive descent, unions and intersections
//! - The checker compiler, turning type nodes into reusable `Send + Sync`
//!   checker closures in plain and strict modes
//! - The checker facade: `check`/`test`/`validate`, their strict variants,
//!   and navigation into interface properties and method signatures
//!
//! # Usage
//!
//! ```
//! use tyva_checker::{create_checkers, Prop, TypeSuite, Value};
//!
//! let mut suite = TypeSuite::new();
//! let s = suite.string_type();
//! let n = suite.number_type();
//! let person = suite.iface(&[], vec![Prop::new("name", s), Prop::new("age", n)]);
//! suite.define("Person", person);
//!
//! let checkers = create_checkers(&[&suite]).unwrap();
//! let person = &checkers["Person"];
//!
//! let ok = Value::object([("name", Value::from("Alice")), ("age", Value::from(30))]);
//! assert!(person.test(&ok));
//!
//! let bad = Value::object([("name", Value::from("Alice"))]);
//! let errors = person.validate(&bad).unwrap();
//! assert_eq!(errors[0].path, "value.age");
//! assert_eq!(errors[0].message, "is missing");
//! ```

#![warn(missing_docs)]

pub mod checker;
pub mod compile;
pub mod context;
pub mod error;

pub use checker::{create_checkers, Checker};
pub use compile::CheckFn;
pub use context::{Context, Key, UnionResolver};
pub use error::{CheckerError, ErrorDetail, ValidationError};

// Re-export the companion crates' primary types for single-import use.
pub use tyva_types::{
    LitValue, Param, Prop, TypeError, TypeId, TypeNode, TypeSuite, INDEX_SIGNATURE_KEY,
};
pub use tyva_value::Value;

//! Type representation for the tyva structural validator
//!
//! This crate provides:
//! - The type node algebra (interfaces, unions, intersections, tuples,
//!   literals, enums, arrays, primitives, function signatures)
//! - Type suites: arena-backed, interned collections of type nodes with a
//!   name-resolution table and a built-in suite of primitive recognizers
//! - Builder methods for constructing type graphs, including recursive
//!   definitions via name indirection
//!
//! # Usage
//!
//! ```
//! use tyva_types::{Prop, TypeSuite};
//!
//! let mut suite = TypeSuite::new();
//! let s = suite.string_type();
//! let n = suite.number_type();
//! let person = suite.iface(&[], vec![Prop::new("name", s), Prop::new("age", n)]);
//! suite.define("Person", person);
//!
//! assert_eq!(suite.resolve("Person"), Ok(person));
//! ```

#![warn(missing_docs)]

pub mod builtins;
pub mod error;
pub mod suite;
pub mod ty;

pub use error::TypeError;
pub use suite::TypeSuite;
pub use ty::{
    ArrayType, BasicType, EnumLitType, EnumType, FuncType, IfaceType, IntersectionType, LitValue,
    NameType, OptionalType, Param, ParamListType, PartialType, Prop, RestType, TupleType, TypeId,
    TypeNode, UnionType, INDEX_SIGNATURE_KEY,
};

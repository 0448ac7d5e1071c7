//! Dynamic value runtime support
//!
//! This crate provides the `Value` type, an owned tree representing the
//! dynamic data a structural validator is asked to check:
//! - JSON-shaped data (null, booleans, numbers, strings, arrays, objects)
//! - `Undefined` for missing properties and elements
//! - host-native values (symbols, dates, regular expressions, byte buffers,
//!   callables) recognized by structural tag rather than identity
//!
//! Values are plain data; there is no coercion and no mutation API beyond
//! ordinary Rust ownership.

#![warn(missing_docs)]

pub mod convert;
pub mod value;

pub use value::Value;

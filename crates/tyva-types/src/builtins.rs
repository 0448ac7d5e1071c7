//! Built-in suite of primitive and host-native type recognizers
//!
//! Predicates are structural tag tests over `Value` variants, so values
//! originating anywhere validate the same way.

use tyva_value::Value;

fn is_string(v: &Value) -> bool {
    v.is_string()
}

fn is_number(v: &Value) -> bool {
    v.is_number()
}

fn is_boolean(v: &Value) -> bool {
    v.is_bool()
}

fn is_object(v: &Value) -> bool {
    v.is_object_like()
}

fn is_symbol(v: &Value) -> bool {
    v.is_symbol()
}

fn is_void(v: &Value) -> bool {
    v.is_null() || v.is_undefined()
}

fn is_undefined(v: &Value) -> bool {
    v.is_undefined()
}

fn is_null(v: &Value) -> bool {
    v.is_null()
}

fn is_any(_: &Value) -> bool {
    true
}

fn is_never(_: &Value) -> bool {
    false
}

fn is_date(v: &Value) -> bool {
    v.is_date()
}

fn is_regexp(v: &Value) -> bool {
    v.is_regexp()
}

fn is_bytes(v: &Value) -> bool {
    v.is_bytes()
}

/// Name, failure message and predicate of every built-in type
pub const BUILTINS: &[(&str, &str, fn(&Value) -> bool)] = &[
    ("string", "is not a string", is_string),
    ("number", "is not a number", is_number),
    ("boolean", "is not a boolean", is_boolean),
    ("object", "is not an object", is_object),
    ("symbol", "is not a symbol", is_symbol),
    ("void", "is not void", is_void),
    ("undefined", "is not undefined", is_undefined),
    ("null", "is not null", is_null),
    ("any", "is invalid", is_any),
    ("unknown", "is invalid", is_any),
    ("never", "is unexpected", is_never),
    ("Date", "is not a Date", is_date),
    ("RegExp", "is not a RegExp", is_regexp),
    ("Buffer", "is not a Buffer", is_bytes),
    ("ArrayBuffer", "is not an ArrayBuffer", is_bytes),
    ("Uint8Array", "is not a Uint8Array", is_bytes),
    ("Int8Array", "is not an Int8Array", is_bytes),
    ("Uint16Array", "is not a Uint16Array", is_bytes),
    ("Int16Array", "is not an Int16Array", is_bytes),
    ("Uint32Array", "is not a Uint32Array", is_bytes),
    ("Int32Array", "is not an Int32Array", is_bytes),
    ("Float32Array", "is not a Float32Array", is_bytes),
    ("Float64Array", "is not a Float64Array", is_bytes),
];

/// Check whether a name belongs to the built-in suite
pub fn is_builtin(name: &str) -> bool {
    BUILTINS.iter().any(|(n, _, _)| *n == name)
}

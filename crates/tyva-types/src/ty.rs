//! Core type node definitions

use std::fmt;
use tyva_value::Value;

/// Unique identifier for a type node within a suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    /// Create a TypeId from a raw value
    ///
    /// Note: this should generally only be used internally or for interop.
    /// Prefer using `TypeSuite` builder methods to obtain ids.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value of this TypeId
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Sentinel property name encoding an interface index signature
///
/// A property with this name in an `iface` prop list becomes the interface's
/// index signature; its type governs every key not declared as a property.
pub const INDEX_SIGNATURE_KEY: &str = "[key: string]";

/// Scalar carried by literal types and enum members
#[derive(Debug, Clone)]
pub enum LitValue {
    /// String literal
    Str(String),
    /// Number literal
    Num(f64),
    /// Boolean literal
    Bool(bool),
    /// The null literal
    Null,
    /// The undefined literal
    Undefined,
}

impl LitValue {
    /// Check whether a dynamic value equals this scalar
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (LitValue::Str(a), Value::String(b)) => a == b,
            (LitValue::Num(a), Value::Number(b)) => a == b,
            (LitValue::Bool(a), Value::Bool(b)) => a == b,
            (LitValue::Null, Value::Null) => true,
            (LitValue::Undefined, Value::Undefined) => true,
            _ => false,
        }
    }
}

impl fmt::Display for LitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LitValue::Str(s) => write!(f, "\"{}\"", s),
            LitValue::Num(n) => write!(f, "{}", n),
            LitValue::Bool(b) => write!(f, "{}", b),
            LitValue::Null => write!(f, "null"),
            LitValue::Undefined => write!(f, "undefined"),
        }
    }
}

impl PartialEq for LitValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LitValue::Str(a), LitValue::Str(b)) => a == b,
            // Compare f64 by bits for exact equality
            (LitValue::Num(a), LitValue::Num(b)) => a.to_bits() == b.to_bits(),
            (LitValue::Bool(a), LitValue::Bool(b)) => a == b,
            (LitValue::Null, LitValue::Null) => true,
            (LitValue::Undefined, LitValue::Undefined) => true,
            _ => false,
        }
    }
}

impl Eq for LitValue {}

impl std::hash::Hash for LitValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            LitValue::Str(s) => s.hash(state),
            // Hash f64 by converting to bits (safe for the Eq above)
            LitValue::Num(n) => n.to_bits().hash(state),
            LitValue::Bool(b) => b.hash(state),
            LitValue::Null | LitValue::Undefined => {}
        }
    }
}

impl From<&str> for LitValue {
    fn from(s: &str) -> Self {
        LitValue::Str(s.to_string())
    }
}

impl From<String> for LitValue {
    fn from(s: String) -> Self {
        LitValue::Str(s)
    }
}

impl From<f64> for LitValue {
    fn from(n: f64) -> Self {
        LitValue::Num(n)
    }
}

impl From<i32> for LitValue {
    fn from(n: i32) -> Self {
        LitValue::Num(n as f64)
    }
}

impl From<bool> for LitValue {
    fn from(b: bool) -> Self {
        LitValue::Bool(b)
    }
}

/// Leaf test over a primitive or host-native form
#[derive(Debug, Clone)]
pub struct BasicType {
    /// Type name as it appears in the built-in suite
    pub name: &'static str,
    /// Canned failure message, e.g. "is not a string"
    pub message: &'static str,
    /// Structural predicate over dynamic values
    pub predicate: fn(&Value) -> bool,
}

impl PartialEq for BasicType {
    fn eq(&self, other: &Self) -> bool {
        // Basics are identified by name; predicates are not comparable.
        self.name == other.name
    }
}

impl Eq for BasicType {}

impl std::hash::Hash for BasicType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Indirect reference to a named type, resolved against a suite
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameType {
    /// Referenced type name
    pub name: String,
}

/// Array type: T[]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayType {
    /// Element type
    pub element: TypeId,
}

/// Tuple type: [T1, T2, ..., Tn] with an optional variadic tail
///
/// A trailing `Rest` element is lifted out of the fixed-arity list at
/// construction; its start index is the fixed-arity length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleType {
    /// Fixed-arity element types
    pub elements: Vec<TypeId>,
    /// Lifted trailing rest element, if any (a `Rest` node)
    pub rest: Option<TypeId>,
}

/// Variadic tail of a tuple; wraps an array type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RestType {
    /// The wrapped array type whose element type validates the tail
    pub ty: TypeId,
}

/// Union type: the value satisfies at least one member
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnionType {
    /// Members of the union
    pub members: Vec<TypeId>,
}

/// Intersection type: the value satisfies all members
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IntersectionType {
    /// Conjuncts of the intersection
    pub members: Vec<TypeId>,
}

/// Relaxation of an interface making every required property optional
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartialType {
    /// The relaxed inner type
    pub inner: TypeId,
}

/// Enum type: a name-to-scalar member map
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumType {
    /// Members in declaration order
    pub members: Vec<(String, LitValue)>,
}

impl EnumType {
    /// Look up a member's scalar by name
    pub fn get(&self, member: &str) -> Option<&LitValue> {
        self.members
            .iter()
            .find(|(name, _)| name == member)
            .map(|(_, value)| value)
    }
}

/// Reference to a single enum member
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumLitType {
    /// Name of the enum type in the suite
    pub enum_name: String,
    /// Member name within the enum
    pub member: String,
}

/// Interface property
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Prop {
    /// Property name
    pub name: String,
    /// Property type
    pub ty: TypeId,
    /// Whether the property is declared optional
    pub optional: bool,
}

impl Prop {
    /// Create a required property
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Prop {
            name: name.into(),
            ty,
            optional: false,
        }
    }

    /// Create an optional property
    pub fn opt(name: impl Into<String>, ty: TypeId) -> Self {
        Prop {
            name: name.into(),
            ty,
            optional: true,
        }
    }
}

/// Interface type: an object shape with inheritance and an optional
/// index signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IfaceType {
    /// Names of base interfaces
    pub bases: Vec<String>,
    /// Own properties
    pub props: Vec<Prop>,
    /// Index signature type governing undeclared keys
    pub index: Option<TypeId>,
}

/// Marks a property or parameter type as omissible
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OptionalType {
    /// The wrapped type
    pub inner: TypeId,
}

/// Function type; at validation time only callability is checked
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FuncType {
    /// Parameter list (a `ParamList` node)
    pub params: TypeId,
    /// Result type
    pub result: TypeId,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    /// Parameter name, used in diagnostics
    pub name: String,
    /// Parameter type
    pub ty: TypeId,
    /// Whether the parameter is declared optional
    pub optional: bool,
}

impl Param {
    /// Create a required parameter
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Param {
            name: name.into(),
            ty,
            optional: false,
        }
    }

    /// Create an optional parameter
    pub fn opt(name: impl Into<String>, ty: TypeId) -> Self {
        Param {
            name: name.into(),
            ty,
            optional: true,
        }
    }
}

/// Tuple-like structure validating argument arrays of methods
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamListType {
    /// Parameters in declaration order
    pub params: Vec<Param>,
}

/// The core type representation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeNode {
    /// Leaf predicate over a primitive or host-native form
    Basic(BasicType),

    /// Indirect reference to a named type
    Name(NameType),

    /// Exact scalar equality
    Literal(LitValue),

    /// Array type: T[]
    Array(ArrayType),

    /// Tuple type with optional variadic tail
    Tuple(TupleType),

    /// Variadic tuple tail; valid only in the final tuple position
    Rest(RestType),

    /// Union type: T1 | T2 | ... | Tn
    Union(UnionType),

    /// Intersection type: T1 & T2 & ... & Tn
    Intersection(IntersectionType),

    /// Partial relaxation of an interface
    Partial(PartialType),

    /// Enum type
    Enum(EnumType),

    /// Single enum member
    EnumLiteral(EnumLitType),

    /// Interface type
    Iface(IfaceType),

    /// Omissible property or parameter type
    Optional(OptionalType),

    /// Function type
    Func(FuncType),

    /// Function parameter list
    ParamList(ParamListType),
}

impl TypeNode {
    /// Check if this node is a basic type
    pub fn is_basic(&self) -> bool {
        matches!(self, TypeNode::Basic(_))
    }

    /// Check if this node is a name reference
    pub fn is_name(&self) -> bool {
        matches!(self, TypeNode::Name(_))
    }

    /// Check if this node is an interface
    pub fn is_iface(&self) -> bool {
        matches!(self, TypeNode::Iface(_))
    }

    /// Check if this node is a function type
    pub fn is_func(&self) -> bool {
        matches!(self, TypeNode::Func(_))
    }

    /// Get the interface if this is an `Iface`
    pub fn as_iface(&self) -> Option<&IfaceType> {
        match self {
            TypeNode::Iface(iface) => Some(iface),
            _ => None,
        }
    }

    /// Get the function type if this is a `Func`
    pub fn as_func(&self) -> Option<&FuncType> {
        match self {
            TypeNode::Func(func) => Some(func),
            _ => None,
        }
    }

    /// Get the enum type if this is an `Enum`
    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            TypeNode::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Rewrite every child `TypeId` through `map`, where `map[old]` is the
    /// new id. Used when merging one suite's arena into another.
    pub(crate) fn remap(mut self, map: &[TypeId]) -> TypeNode {
        let r = |id: &mut TypeId| *id = map[id.0 as usize];
        match &mut self {
            TypeNode::Basic(_)
            | TypeNode::Name(_)
            | TypeNode::Literal(_)
            | TypeNode::Enum(_)
            | TypeNode::EnumLiteral(_) => {}
            TypeNode::Array(a) => r(&mut a.element),
            TypeNode::Tuple(t) => {
                t.elements.iter_mut().for_each(r);
                if let Some(rest) = &mut t.rest {
                    r(rest);
                }
            }
            TypeNode::Rest(rest) => r(&mut rest.ty),
            TypeNode::Union(u) => u.members.iter_mut().for_each(r),
            TypeNode::Intersection(i) => i.members.iter_mut().for_each(r),
            TypeNode::Partial(p) => r(&mut p.inner),
            TypeNode::Iface(iface) => {
                iface.props.iter_mut().for_each(|p| r(&mut p.ty));
                if let Some(index) = &mut iface.index {
                    r(index);
                }
            }
            TypeNode::Optional(o) => r(&mut o.inner),
            TypeNode::Func(f) => {
                r(&mut f.params);
                r(&mut f.result);
            }
            TypeNode::ParamList(pl) => pl.params.iter_mut().for_each(|p| r(&mut p.ty)),
        }
        self
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Basic(b) => write!(f, "{}", b.name),
            TypeNode::Name(n) => write!(f, "{}", n.name),
            TypeNode::Literal(lit) => write!(f, "{}", lit),
            TypeNode::Array(a) => write!(f, "{}[]", a.element),
            TypeNode::Tuple(t) => {
                write!(f, "[")?;
                for (i, elem) in t.elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", elem)?;
                }
                if let Some(rest) = &t.rest {
                    if !t.elements.is_empty() {
                        write!(f, ", ")?;
                    }
                    write!(f, "...{}", rest)?;
                }
                write!(f, "]")
            }
            TypeNode::Rest(rest) => write!(f, "...{}", rest.ty),
            TypeNode::Union(u) => {
                for (i, member) in u.members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", member)?;
                }
                Ok(())
            }
            TypeNode::Intersection(x) => {
                for (i, member) in x.members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " & ")?;
                    }
                    write!(f, "{}", member)?;
                }
                Ok(())
            }
            TypeNode::Partial(p) => write!(f, "Partial<{}>", p.inner),
            TypeNode::Enum(e) => {
                write!(f, "enum {{ ")?;
                for (i, (name, _)) in e.members.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", name)?;
                }
                write!(f, " }}")
            }
            TypeNode::EnumLiteral(el) => write!(f, "{}.{}", el.enum_name, el.member),
            TypeNode::Iface(iface) => {
                write!(f, "{{ ")?;
                for (i, prop) in iface.props.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", prop.name)?;
                    if prop.optional {
                        write!(f, "?")?;
                    }
                    write!(f, ": {}", prop.ty)?;
                }
                write!(f, " }}")
            }
            TypeNode::Optional(o) => write!(f, "{}?", o.inner),
            TypeNode::Func(func) => write!(f, "({}) => {}", func.params, func.result),
            TypeNode::ParamList(pl) => {
                write!(f, "(")?;
                for (i, param) in pl.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param.name)?;
                    if param.optional {
                        write!(f, "?")?;
                    }
                    write!(f, ": {}", param.ty)?;
                }
                write!(f, ")")
            }
        }
    }
}

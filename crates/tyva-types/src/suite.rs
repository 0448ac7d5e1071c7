//! Type suites: arena storage, interning and name resolution

use crate::builtins::BUILTINS;
use crate::error::TypeError;
use crate::ty::{
    ArrayType, BasicType, EnumLitType, EnumType, FuncType, IfaceType, IntersectionType, LitValue,
    NameType, OptionalType, Param, ParamListType, PartialType, Prop, RestType, TupleType, TypeId,
    TypeNode, UnionType, INDEX_SIGNATURE_KEY,
};
use rustc_hash::FxHashMap;

/// A suite of type nodes with a name-resolution table
///
/// Nodes live in an arena indexed by `TypeId` and are interned, so identical
/// nodes share an id. A new suite starts with the built-in primitives
/// registered under their usual names; user types are layered on top with
/// [`TypeSuite::define`], where later definitions override earlier ones.
///
/// Arena invariant: a node only ever references lower-numbered nodes, since
/// builder methods take already-interned child ids. `extend` relies on this.
#[derive(Debug, Clone)]
pub struct TypeSuite {
    /// Storage for all nodes, indexed by TypeId
    types: Vec<TypeNode>,

    /// Reverse mapping for interning
    type_to_id: FxHashMap<TypeNode, TypeId>,

    /// Named type definitions
    named: FxHashMap<String, TypeId>,
}

impl Default for TypeSuite {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeSuite {
    /// Create a suite containing the built-in types
    pub fn new() -> Self {
        let mut suite = TypeSuite {
            types: Vec::new(),
            type_to_id: FxHashMap::default(),
            named: FxHashMap::default(),
        };
        for &(name, message, predicate) in BUILTINS {
            let id = suite.intern(TypeNode::Basic(BasicType {
                name,
                message,
                predicate,
            }));
            suite.named.insert(name.to_string(), id);
        }
        suite
    }

    /// Intern a node, returning its TypeId
    ///
    /// If an identical node already exists, returns the existing id.
    pub fn intern(&mut self, node: TypeNode) -> TypeId {
        if let Some(&id) = self.type_to_id.get(&node) {
            return id;
        }
        let id = TypeId(self.types.len() as u32);
        self.types.push(node.clone());
        self.type_to_id.insert(node, id);
        id
    }

    /// Get a node by its id
    pub fn get(&self, id: TypeId) -> Option<&TypeNode> {
        self.types.get(id.0 as usize)
    }

    /// Get a node by its id, panicking if the id is invalid
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this suite.
    pub fn node(&self, id: TypeId) -> &TypeNode {
        self.get(id).expect("invalid TypeId")
    }

    /// Look up a node's id without interning
    pub fn lookup(&self, node: &TypeNode) -> Option<TypeId> {
        self.type_to_id.get(node).copied()
    }

    /// Register a named type; later definitions override earlier ones
    pub fn define(&mut self, name: impl Into<String>, ty: TypeId) {
        self.named.insert(name.into(), ty);
    }

    /// Look up a named type
    pub fn lookup_named(&self, name: &str) -> Option<TypeId> {
        self.named.get(name).copied()
    }

    /// Resolve a named type, returning an error if not found
    pub fn resolve(&self, name: &str) -> Result<TypeId, TypeError> {
        self.lookup_named(name).ok_or_else(|| TypeError::UndefinedType {
            name: name.to_string(),
        })
    }

    /// Follow `Name` indirections until a structural node is reached
    ///
    /// Fails on unknown names and on alias cycles that never reach a
    /// structural node.
    pub fn resolve_alias(&self, id: TypeId) -> Result<TypeId, TypeError> {
        let mut current = id;
        // An alias chain longer than the arena must revisit a node.
        for _ in 0..=self.types.len() {
            match self.node(current) {
                TypeNode::Name(n) => current = self.resolve(&n.name)?,
                _ => return Ok(current),
            }
        }
        let name = match self.node(id) {
            TypeNode::Name(n) => n.name.clone(),
            _ => String::new(),
        };
        Err(TypeError::CircularReference { name })
    }

    /// Iterate all registered type names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.named.keys().map(String::as_str)
    }

    /// Get the number of nodes in the suite
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the suite is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Merge another suite into this one
    ///
    /// Nodes are re-interned with remapped ids; the other suite's named
    /// entries override entries of the same name here.
    pub fn extend(&mut self, other: &TypeSuite) {
        let mut remap = Vec::with_capacity(other.types.len());
        for node in &other.types {
            let node = node.clone().remap(&remap);
            remap.push(self.intern(node));
        }
        for (name, id) in &other.named {
            self.named.insert(name.clone(), remap[id.0 as usize]);
        }
    }

    /// Human-readable rendering of a type, resolving child ids
    pub fn display(&self, id: TypeId) -> String {
        match self.node(id) {
            TypeNode::Basic(b) => b.name.to_string(),
            TypeNode::Name(n) => n.name.clone(),
            TypeNode::Literal(lit) => lit.to_string(),
            TypeNode::Array(a) => format!("{}[]", self.display(a.element)),
            TypeNode::Tuple(t) => {
                let mut parts: Vec<String> =
                    t.elements.iter().map(|&e| self.display(e)).collect();
                if let Some(rest) = t.rest {
                    parts.push(self.display(rest));
                }
                format!("[{}]", parts.join(", "))
            }
            TypeNode::Rest(rest) => format!("...{}", self.display(rest.ty)),
            TypeNode::Union(u) => u
                .members
                .iter()
                .map(|&m| self.display(m))
                .collect::<Vec<_>>()
                .join(" | "),
            TypeNode::Intersection(x) => x
                .members
                .iter()
                .map(|&m| self.display(m))
                .collect::<Vec<_>>()
                .join(" & "),
            TypeNode::Partial(p) => format!("Partial<{}>", self.display(p.inner)),
            TypeNode::Enum(e) => {
                let members: Vec<&str> = e.members.iter().map(|(n, _)| n.as_str()).collect();
                format!("enum {{ {} }}", members.join(", "))
            }
            TypeNode::EnumLiteral(el) => format!("{}.{}", el.enum_name, el.member),
            TypeNode::Iface(iface) => {
                let props: Vec<String> = iface
                    .props
                    .iter()
                    .map(|p| {
                        format!(
                            "{}{}: {}",
                            p.name,
                            if p.optional { "?" } else { "" },
                            self.display(p.ty)
                        )
                    })
                    .collect();
                format!("{{ {} }}", props.join(", "))
            }
            TypeNode::Optional(o) => format!("{}?", self.display(o.inner)),
            TypeNode::Func(f) => {
                format!("{} => {}", self.display(f.params), self.display(f.result))
            }
            TypeNode::ParamList(pl) => {
                let params: Vec<String> = pl
                    .params
                    .iter()
                    .map(|p| {
                        format!(
                            "{}{}: {}",
                            p.name,
                            if p.optional { "?" } else { "" },
                            self.display(p.ty)
                        )
                    })
                    .collect();
                format!("({})", params.join(", "))
            }
        }
    }

    // Builder methods

    /// Create a reference to a named type
    pub fn name(&mut self, name: impl Into<String>) -> TypeId {
        self.intern(TypeNode::Name(NameType { name: name.into() }))
    }

    /// Create a literal type from a scalar
    pub fn lit(&mut self, value: impl Into<LitValue>) -> TypeId {
        self.intern(TypeNode::Literal(value.into()))
    }

    /// Create an array type
    pub fn array(&mut self, element: TypeId) -> TypeId {
        self.intern(TypeNode::Array(ArrayType { element }))
    }

    /// Create a tuple type
    ///
    /// A trailing `Rest` element is lifted out of the fixed-arity list; a
    /// rest anywhere else is rejected at checker compilation.
    pub fn tuple(&mut self, mut elements: Vec<TypeId>) -> TypeId {
        let rest = match elements.last().copied() {
            Some(last) if matches!(self.node(last), TypeNode::Rest(_)) => elements.pop(),
            _ => None,
        };
        self.intern(TypeNode::Tuple(TupleType { elements, rest }))
    }

    /// Create a rest element wrapping an array type
    pub fn rest(&mut self, array_ty: TypeId) -> TypeId {
        self.intern(TypeNode::Rest(RestType { ty: array_ty }))
    }

    /// Create a union type
    ///
    /// Nested unions are flattened and duplicate members removed, keeping
    /// first-occurrence order; a single-member union collapses to the member.
    pub fn union(&mut self, members: Vec<TypeId>) -> TypeId {
        let mut flattened = Vec::new();
        for member in members {
            if let TypeNode::Union(u) = self.node(member) {
                flattened.extend_from_slice(&u.members);
            } else {
                flattened.push(member);
            }
        }

        let mut seen = rustc_hash::FxHashSet::default();
        flattened.retain(|id| seen.insert(*id));

        if flattened.len() == 1 {
            return flattened[0];
        }
        self.intern(TypeNode::Union(UnionType { members: flattened }))
    }

    /// Create an intersection type
    pub fn intersection(&mut self, members: Vec<TypeId>) -> TypeId {
        self.intern(TypeNode::Intersection(IntersectionType { members }))
    }

    /// Create a partial relaxation of an interface type
    pub fn partial(&mut self, inner: TypeId) -> TypeId {
        self.intern(TypeNode::Partial(PartialType { inner }))
    }

    /// Create an enum type from name/scalar members
    pub fn enum_type<N, V, I>(&mut self, members: I) -> TypeId
    where
        N: Into<String>,
        V: Into<LitValue>,
        I: IntoIterator<Item = (N, V)>,
    {
        let members = members
            .into_iter()
            .map(|(n, v)| (n.into(), v.into()))
            .collect();
        self.intern(TypeNode::Enum(EnumType { members }))
    }

    /// Create a reference to a single enum member
    pub fn enum_lit(&mut self, enum_name: impl Into<String>, member: impl Into<String>) -> TypeId {
        self.intern(TypeNode::EnumLiteral(EnumLitType {
            enum_name: enum_name.into(),
            member: member.into(),
        }))
    }

    /// Create an interface type
    ///
    /// A prop named [`INDEX_SIGNATURE_KEY`] becomes the interface's index
    /// signature (at most one; the last such prop wins).
    pub fn iface(&mut self, bases: &[&str], props: Vec<Prop>) -> TypeId {
        let mut index = None;
        let props: Vec<Prop> = props
            .into_iter()
            .filter(|p| {
                if p.name == INDEX_SIGNATURE_KEY {
                    index = Some(p.ty);
                    false
                } else {
                    true
                }
            })
            .collect();
        self.intern(TypeNode::Iface(IfaceType {
            bases: bases.iter().map(|b| (*b).to_string()).collect(),
            props,
            index,
        }))
    }

    /// Mark a type as omissible
    pub fn opt(&mut self, inner: TypeId) -> TypeId {
        self.intern(TypeNode::Optional(OptionalType { inner }))
    }

    /// Create a function type from parameters and a result type
    pub fn func(&mut self, params: Vec<Param>, result: TypeId) -> TypeId {
        let params = self.param_list(params);
        self.intern(TypeNode::Func(FuncType { params, result }))
    }

    /// Create a parameter list type
    pub fn param_list(&mut self, params: Vec<Param>) -> TypeId {
        self.intern(TypeNode::ParamList(ParamListType { params }))
    }

    // Convenience getters for common built-ins

    /// The built-in string type
    pub fn string_type(&self) -> TypeId {
        self.builtin("string")
    }

    /// The built-in number type
    pub fn number_type(&self) -> TypeId {
        self.builtin("number")
    }

    /// The built-in boolean type
    pub fn boolean_type(&self) -> TypeId {
        self.builtin("boolean")
    }

    /// The built-in null type
    pub fn null_type(&self) -> TypeId {
        self.builtin("null")
    }

    /// The built-in undefined type
    pub fn undefined_type(&self) -> TypeId {
        self.builtin("undefined")
    }

    /// The built-in any type
    pub fn any_type(&self) -> TypeId {
        self.builtin("any")
    }

    fn builtin(&self, name: &str) -> TypeId {
        self.lookup_named(name).expect("built-in type registered in new()")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interning() {
        let mut suite = TypeSuite::new();
        let num = suite.number_type();
        let arr1 = suite.array(num);
        let arr2 = suite.array(num);
        assert_eq!(arr1, arr2);
    }

    #[test]
    fn test_builtins_registered() {
        let suite = TypeSuite::new();
        assert!(suite.lookup_named("string").is_some());
        assert!(suite.lookup_named("never").is_some());
        assert!(suite.lookup_named("Uint8Array").is_some());
        assert!(suite.lookup_named("Person").is_none());
    }

    #[test]
    fn test_define_and_resolve() {
        let mut suite = TypeSuite::new();
        let num = suite.number_type();
        suite.define("MyNumber", num);
        assert_eq!(suite.resolve("MyNumber"), Ok(num));
        assert_eq!(
            suite.resolve("Missing"),
            Err(TypeError::UndefinedType {
                name: "Missing".to_string()
            })
        );
    }

    #[test]
    fn test_define_overrides() {
        let mut suite = TypeSuite::new();
        let num = suite.number_type();
        let str_ty = suite.string_type();
        suite.define("X", num);
        suite.define("X", str_ty);
        assert_eq!(suite.resolve("X"), Ok(str_ty));
    }

    #[test]
    fn test_union_flattening_and_dedup() {
        let mut suite = TypeSuite::new();
        let num = suite.number_type();
        let str_ty = suite.string_type();
        let bool_ty = suite.boolean_type();

        let inner = suite.union(vec![num, str_ty]);
        let outer = suite.union(vec![inner, bool_ty, num]);

        match suite.node(outer) {
            TypeNode::Union(u) => assert_eq!(u.members, vec![num, str_ty, bool_ty]),
            other => panic!("expected union, got {:?}", other),
        }
    }

    #[test]
    fn test_single_member_union_collapses() {
        let mut suite = TypeSuite::new();
        let num = suite.number_type();
        assert_eq!(suite.union(vec![num]), num);
    }

    #[test]
    fn test_tuple_lifts_trailing_rest() {
        let mut suite = TypeSuite::new();
        let num = suite.number_type();
        let str_ty = suite.string_type();
        let arr = suite.array(num);
        let rest = suite.rest(arr);
        let tuple = suite.tuple(vec![str_ty, rest]);

        match suite.node(tuple) {
            TypeNode::Tuple(t) => {
                assert_eq!(t.elements, vec![str_ty]);
                assert_eq!(t.rest, Some(rest));
            }
            other => panic!("expected tuple, got {:?}", other),
        }
    }

    #[test]
    fn test_iface_lifts_index_signature() {
        let mut suite = TypeSuite::new();
        let num = suite.number_type();
        let str_ty = suite.string_type();
        let iface = suite.iface(
            &[],
            vec![
                Prop::new("name", str_ty),
                Prop::new(INDEX_SIGNATURE_KEY, num),
            ],
        );

        match suite.node(iface) {
            TypeNode::Iface(i) => {
                assert_eq!(i.props.len(), 1);
                assert_eq!(i.index, Some(num));
            }
            other => panic!("expected iface, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_alias_follows_names() {
        let mut suite = TypeSuite::new();
        let num = suite.number_type();
        suite.define("A", num);
        let b = suite.name("A");
        suite.define("B", b);
        let c = suite.name("B");

        assert_eq!(suite.resolve_alias(c), Ok(num));
    }

    #[test]
    fn test_resolve_alias_detects_cycles() {
        let mut suite = TypeSuite::new();
        let a = suite.name("B");
        suite.define("A", a);
        let b = suite.name("A");
        suite.define("B", b);

        assert!(matches!(
            suite.resolve_alias(a),
            Err(TypeError::CircularReference { .. })
        ));
    }

    #[test]
    fn test_extend_remaps_ids() {
        let mut base = TypeSuite::new();

        let mut other = TypeSuite::new();
        let num = other.number_type();
        let arr = other.array(num);
        other.define("Numbers", arr);
        // Force the other suite's arena to diverge from base's.
        let str_ty = other.string_type();
        let pair = other.tuple(vec![str_ty, num]);
        other.define("Pair", pair);

        base.extend(&other);

        let merged_arr = base.resolve("Numbers").unwrap();
        match base.node(merged_arr) {
            TypeNode::Array(a) => {
                assert_eq!(base.node(a.element), &other.node(num).clone());
            }
            other => panic!("expected array, got {:?}", other),
        }
        assert!(base.resolve("Pair").is_ok());
    }

    #[test]
    fn test_display() {
        let mut suite = TypeSuite::new();
        let num = suite.number_type();
        let arr = suite.array(num);
        assert_eq!(suite.display(arr), "number[]");

        let str_ty = suite.string_type();
        let union = suite.union(vec![num, str_ty]);
        assert_eq!(suite.display(union), "number | string");

        let person = suite.iface(
            &[],
            vec![Prop::new("name", str_ty), Prop::opt("nick", str_ty)],
        );
        assert_eq!(suite.display(person), "{ name: string, nick?: string }");
    }
}

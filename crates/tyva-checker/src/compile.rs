//! Checker compilation
//!
//! Walks a type graph and produces one reusable checker closure per
//! (type, mode) pair. Compiled checkers are pure, `Send + Sync`, and write
//! failures into the per-call diagnostic context.

use crate::context::{Context, Key};
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::{Arc, OnceLock};
use tyva_types::{IfaceType, TypeError, TypeId, TypeNode, TypeSuite};
use tyva_value::Value;

/// A compiled checker: `(value, ctx) -> bool`, recording failure frames in
/// `ctx` on rejection
pub type CheckFn = Arc<dyn Fn(&Value, &mut Context) -> bool + Send + Sync>;

/// Property names admitted by strict mode, shared across an interface's
/// bases and an intersection's conjuncts during compilation
type AllowedProps = Arc<RwLock<FxHashSet<String>>>;

static UNDEFINED: Value = Value::Undefined;

/// Compiles type nodes of one suite into checkers for one mode
pub(crate) struct Compiler<'a> {
    suite: &'a TypeSuite,
    strict: bool,

    /// In-progress name compilations, keyed by type name and partiality.
    /// `Name` nodes and interface base references share these entries, so
    /// any name-indirected cycle terminates. Re-entering one returns a
    /// closure deferring to the slot, which is filled when the outer
    /// compilation completes; the entry is dropped right after, so the
    /// slot only lives as long as the recursion needs.
    names: FxHashMap<(String, bool), Arc<OnceLock<CheckFn>>>,
}

impl<'a> Compiler<'a> {
    pub fn new(suite: &'a TypeSuite, strict: bool) -> Self {
        Compiler {
            suite,
            strict,
            names: FxHashMap::default(),
        }
    }

    /// Compile a checker for `id`
    pub fn compile(&mut self, id: TypeId) -> Result<CheckFn, TypeError> {
        self.compile_node(id, false, None)
    }

    fn compile_node(
        &mut self,
        id: TypeId,
        partial: bool,
        allowed: Option<&AllowedProps>,
    ) -> Result<CheckFn, TypeError> {
        let node = self.suite.node(id).clone();
        match node {
            TypeNode::Basic(basic) => {
                let predicate = basic.predicate;
                let message = basic.message;
                Ok(Arc::new(move |value, ctx| {
                    predicate(value) || ctx.fail(Key::None, Some(message), 0)
                }))
            }

            TypeNode::Name(name) => self.compile_name(&name.name, partial, allowed),

            TypeNode::Literal(lit) => {
                let message = format!("is not {}", lit);
                Ok(Arc::new(move |value, ctx| {
                    lit.matches(value) || ctx.fail(Key::None, Some(&message), -1)
                }))
            }

            TypeNode::Array(array) => {
                let element = self.compile_node(array.element, partial, None)?;
                Ok(Arc::new(move |value, ctx| {
                    let Some(items) = value.as_array() else {
                        return ctx.fail(Key::None, Some("is not an array"), 0);
                    };
                    let mut ok = true;
                    for (i, item) in items.iter().enumerate() {
                        ctx.fork();
                        if !element(item, ctx) {
                            ctx.fail(Key::Index(i), None, 0);
                            ok = false;
                        }
                        if !ctx.complete_fork() {
                            return false;
                        }
                    }
                    ok
                }))
            }

            TypeNode::Tuple(tuple) => {
                let mut elements = Vec::with_capacity(tuple.elements.len());
                for &elem in &tuple.elements {
                    if matches!(self.suite.node(elem), TypeNode::Rest(_)) {
                        return Err(TypeError::MisplacedRest);
                    }
                    elements.push(self.compile_node(elem, partial, None)?);
                }
                let rest = match tuple.rest {
                    Some(rest_id) => {
                        let rest_ty = match self.suite.node(rest_id) {
                            TypeNode::Rest(rest) => rest.ty,
                            _ => return Err(TypeError::MisplacedRest),
                        };
                        let array_id = self.suite.resolve_alias(rest_ty)?;
                        let element = match self.suite.node(array_id) {
                            TypeNode::Array(array) => array.element,
                            _ => return Err(TypeError::RestNotArray),
                        };
                        Some(self.compile_node(element, partial, None)?)
                    }
                    None => None,
                };
                let start = elements.len();
                let strict = self.strict;
                Ok(Arc::new(move |value, ctx| {
                    let Some(items) = value.as_array() else {
                        return ctx.fail(Key::None, Some("is not an array"), 0);
                    };
                    let mut ok = true;
                    for (i, element) in elements.iter().enumerate() {
                        let item = items.get(i).unwrap_or(&UNDEFINED);
                        ctx.fork();
                        if !element(item, ctx) {
                            ctx.fail(Key::Index(i), None, 0);
                            ok = false;
                        }
                        if !ctx.complete_fork() {
                            return false;
                        }
                    }
                    if let Some(rest) = &rest {
                        for (i, item) in items.iter().enumerate().skip(start) {
                            ctx.fork();
                            if !rest(item, ctx) {
                                ctx.fail(Key::Index(i), None, 0);
                                ok = false;
                            }
                            if !ctx.complete_fork() {
                                return false;
                            }
                        }
                    } else if strict && items.len() > start {
                        ctx.fork();
                        ctx.fail(Key::Index(start), Some("is extraneous"), 2);
                        ok = false;
                        if !ctx.complete_fork() {
                            return false;
                        }
                    }
                    ok
                }))
            }

            TypeNode::Rest(_) => Err(TypeError::MisplacedRest),

            TypeNode::Union(union) => {
                let mut checkers = Vec::with_capacity(union.members.len());
                for &member in &union.members {
                    checkers.push(self.compile_node(member, partial, None)?);
                }
                let summary = self.union_summary(&union.members);
                Ok(Arc::new(move |value, ctx| {
                    let mut resolver = ctx.union_resolver();
                    for checker in &checkers {
                        if checker(value, resolver.next_context()) {
                            return true;
                        }
                    }
                    if ctx.resolve_union(resolver) {
                        false
                    } else {
                        ctx.fail(Key::None, Some(&summary), 0)
                    }
                }))
            }

            TypeNode::Intersection(intersection) => {
                let allowed = shared_props(allowed);
                let mut checkers = Vec::with_capacity(intersection.members.len());
                for &member in &intersection.members {
                    checkers.push(self.compile_node(member, partial, Some(&allowed))?);
                }
                Ok(Arc::new(move |value, ctx| {
                    let mut ok = true;
                    for checker in &checkers {
                        ctx.fork();
                        let passed = checker(value, ctx);
                        ok = ok && passed;
                        if !ctx.complete_fork() {
                            return false;
                        }
                    }
                    ok
                }))
            }

            TypeNode::Partial(p) => {
                let inner = self.compile_node(p.inner, true, allowed)?;
                Ok(Arc::new(move |value, ctx| {
                    value.is_undefined() || inner(value, ctx)
                }))
            }

            TypeNode::Enum(enum_ty) => {
                let values: Vec<_> = enum_ty.members.into_iter().map(|(_, v)| v).collect();
                Ok(Arc::new(move |value, ctx| {
                    values.iter().any(|candidate| candidate.matches(value))
                        || ctx.fail(Key::None, Some("is not a valid enum value"), -1)
                }))
            }

            TypeNode::EnumLiteral(el) => {
                let enum_id = self.suite.resolve_alias(self.suite.resolve(&el.enum_name)?)?;
                let Some(enum_ty) = self.suite.node(enum_id).as_enum() else {
                    return Err(TypeError::NotAnEnum {
                        name: el.enum_name.clone(),
                    });
                };
                let Some(expected) = enum_ty.get(&el.member) else {
                    return Err(TypeError::UndefinedEnumMember {
                        enum_name: el.enum_name.clone(),
                        member: el.member.clone(),
                    });
                };
                let expected = expected.clone();
                let message = format!("is not {}.{}", el.enum_name, el.member);
                Ok(Arc::new(move |value, ctx| {
                    expected.matches(value) || ctx.fail(Key::None, Some(&message), -1)
                }))
            }

            TypeNode::Iface(iface) => self.compile_iface(&iface, partial, allowed),

            TypeNode::Optional(optional) => {
                let inner = self.compile_node(optional.inner, partial, None)?;
                Ok(Arc::new(move |value, ctx| {
                    value.is_undefined() || inner(value, ctx)
                }))
            }

            TypeNode::Func(_) => Ok(Arc::new(move |value, ctx| {
                value.is_function() || ctx.fail(Key::None, Some("is not a function"), 0)
            })),

            TypeNode::ParamList(param_list) => {
                let mut params = Vec::with_capacity(param_list.params.len());
                for param in &param_list.params {
                    let checker = self.compile_node(param.ty, partial, None)?;
                    let required = !param.optional && rejects_undefined(&checker);
                    params.push((param.name.clone(), checker, required));
                }
                let strict = self.strict;
                let arity = params.len();
                Ok(Arc::new(move |value, ctx| {
                    let Some(args) = value.as_array() else {
                        return ctx.fail(Key::None, Some("is not an array"), 0);
                    };
                    let mut ok = true;
                    for (i, (name, checker, required)) in params.iter().enumerate() {
                        let arg = args.get(i).unwrap_or(&UNDEFINED);
                        if arg.is_undefined() {
                            if *required {
                                ctx.fork();
                                ctx.fail(Key::Prop(name), Some("is missing"), 1);
                                ok = false;
                                if !ctx.complete_fork() {
                                    return false;
                                }
                            }
                        } else {
                            ctx.fork();
                            if !checker(arg, ctx) {
                                ctx.fail(Key::Prop(name), None, 0);
                                ok = false;
                            }
                            if !ctx.complete_fork() {
                                return false;
                            }
                        }
                    }
                    if strict && args.len() > arity {
                        ctx.fork();
                        ctx.fail(Key::Index(arity), Some("is extraneous"), 2);
                        ok = false;
                        if !ctx.complete_fork() {
                            return false;
                        }
                    }
                    ok
                }))
            }
        }
    }

    /// Compile a name reference with recursion protection
    fn compile_name(
        &mut self,
        name: &str,
        partial: bool,
        allowed: Option<&AllowedProps>,
    ) -> Result<CheckFn, TypeError> {
        let key = (name.to_string(), partial);
        if let Some(slot) = self.names.get(&key) {
            // Re-entered while this name is still compiling: defer.
            let slot = Arc::clone(slot);
            return Ok(Arc::new(move |value, ctx| {
                match slot.get() {
                    Some(checker) => checker(value, ctx),
                    // Only reachable from the compile-time required-property
                    // probe re-entering a definition still being compiled;
                    // every slot is filled before a checker is handed out.
                    // Rejecting here keeps the probed property required.
                    None => false,
                }
            }));
        }

        let slot: Arc<OnceLock<CheckFn>> = Arc::new(OnceLock::new());
        self.names.insert(key.clone(), Arc::clone(&slot));
        let result = self.suite.resolve(name).and_then(|target| {
            let inner = self.compile_node(target, partial, allowed)?;
            // Complex targets get an extra "is not a <Name>" layer; basics
            // and further names already say everything there is to say.
            if matches!(
                self.suite.node(target),
                TypeNode::Basic(_) | TypeNode::Name(_)
            ) {
                Ok(inner)
            } else {
                let message = format!("is not a {}", name);
                Ok(Arc::new(move |value: &Value, ctx: &mut Context| {
                    inner(value, ctx) || ctx.fail(Key::None, Some(&message), 0)
                }) as CheckFn)
            }
        });
        self.names.remove(&key);
        let checker = result?;
        let _ = slot.set(Arc::clone(&checker));
        Ok(checker)
    }

    /// Compile an interface checker
    fn compile_iface(
        &mut self,
        iface: &IfaceType,
        partial: bool,
        allowed: Option<&AllowedProps>,
    ) -> Result<CheckFn, TypeError> {
        let allowed = shared_props(allowed);
        {
            let mut set = allowed.write();
            for prop in &iface.props {
                set.insert(prop.name.clone());
            }
        }

        let mut bases = Vec::with_capacity(iface.bases.len());
        for base in &iface.bases {
            // Bases go through the name trampoline so that inheritance
            // cycles terminate like any other name-indirected cycle.
            bases.push(self.compile_name(base, partial, Some(&allowed))?);
        }

        let mut props = Vec::with_capacity(iface.props.len());
        for prop in &iface.props {
            let checker = self.compile_node(prop.ty, partial, None)?;
            // Required iff not declared optional and the type itself
            // rejects undefined.
            let required = !prop.optional && rejects_undefined(&checker);
            props.push((prop.name.clone(), checker, required));
        }

        let index = match iface.index {
            Some(index) => Some(self.compile_node(index, partial, None)?),
            None => None,
        };

        let strict = self.strict;
        let is_partial = partial;
        Ok(Arc::new(move |value, ctx| {
            let Some(object) = value.as_object() else {
                return ctx.fail(Key::None, Some("is not an object"), 0);
            };
            let mut ok = true;

            for base in &bases {
                ctx.fork();
                let passed = base(value, ctx);
                ok = ok && passed;
                if !ctx.complete_fork() {
                    return false;
                }
            }

            for (name, checker, required) in &props {
                match object.get(name) {
                    None | Some(Value::Undefined) => {
                        if *required && !is_partial {
                            ctx.fork();
                            ctx.fail(Key::Prop(name), Some("is missing"), 1);
                            ok = false;
                            if !ctx.complete_fork() {
                                return false;
                            }
                        }
                    }
                    Some(item) => {
                        ctx.fork();
                        if !checker(item, ctx) {
                            ctx.fail(Key::Prop(name), None, 0);
                            ok = false;
                        }
                        if !ctx.complete_fork() {
                            return false;
                        }
                    }
                }
            }

            if let Some(index) = &index {
                // The index signature governs every undeclared key and
                // replaces the extraneous-key check in either mode.
                let declared = allowed.read();
                for (key, item) in object.iter() {
                    if declared.contains(key) {
                        continue;
                    }
                    ctx.fork();
                    if !index(item, ctx) {
                        ctx.fail(Key::Prop(key), None, 0);
                        ok = false;
                    }
                    if !ctx.complete_fork() {
                        return false;
                    }
                }
            } else if strict {
                let declared = allowed.read();
                for key in object.keys() {
                    if !declared.contains(key) {
                        ctx.fork();
                        ctx.fail(Key::Prop(key), Some("is extraneous"), 2);
                        ok = false;
                        if !ctx.complete_fork() {
                            return false;
                        }
                    }
                }
            }

            ok
        }))
    }

    /// Failure summary for a union: named alternatives are listed, the rest
    /// are counted
    fn union_summary(&self, members: &[TypeId]) -> String {
        let mut names = Vec::new();
        let mut unnamed = 0usize;
        for &member in members {
            match self.suite.node(member) {
                TypeNode::Basic(basic) => names.push(basic.name.to_string()),
                TypeNode::Name(name) => names.push(name.name.clone()),
                TypeNode::Literal(lit) => names.push(lit.to_string()),
                _ => unnamed += 1,
            }
        }
        if names.is_empty() {
            format!("is none of {} types", unnamed)
        } else {
            if unnamed > 0 {
                names.push(format!("{} more", unnamed));
            }
            format!("is none of {}", names.join(", "))
        }
    }
}

/// Probe whether a compiled checker rejects `undefined`
fn rejects_undefined(checker: &CheckFn) -> bool {
    let mut probe = Context::noop();
    !checker(&UNDEFINED, &mut probe)
}

fn shared_props(allowed: Option<&AllowedProps>) -> AllowedProps {
    match allowed {
        Some(existing) => Arc::clone(existing),
        None => Arc::new(RwLock::new(FxHashSet::default())),
    }
}

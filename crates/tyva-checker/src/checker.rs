//! The checker facade
//!
//! A `Checker` binds one type out of a suite and exposes the validation
//! entry points (`check`, `test`, `validate` and their strict variants)
//! plus navigation into interface properties and method signatures.

use crate::compile::{CheckFn, Compiler};
use crate::context::Context;
use crate::error::{CheckerError, ErrorDetail, ValidationError};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tyva_types::{builtins, FuncType, IfaceType, TypeError, TypeId, TypeNode, TypeSuite};
use tyva_value::Value;

/// Default root path used in rendered error messages
const DEFAULT_PATH: &str = "value";

/// Validator bound to a single type
///
/// Holds one compiled checker per mode; both are pure and the facade may be
/// shared across threads.
#[derive(Clone)]
pub struct Checker {
    suite: Arc<TypeSuite>,
    ty: TypeId,
    path: String,
    plain: CheckFn,
    strict: CheckFn,
}

impl std::fmt::Debug for Checker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checker")
            .field("suite", &self.suite)
            .field("ty", &self.ty)
            .field("path", &self.path)
            .finish()
    }
}

impl Checker {
    /// Compile a checker facade for a type in a suite
    pub fn compile(suite: Arc<TypeSuite>, ty: TypeId) -> Result<Checker, TypeError> {
        let plain = Compiler::new(&suite, false).compile(ty)?;
        let strict = Compiler::new(&suite, true).compile(ty)?;
        Ok(Checker {
            suite,
            ty,
            path: DEFAULT_PATH.to_string(),
            plain,
            strict,
        })
    }

    /// Override the root path prefix used in error messages
    pub fn set_reported_path(&mut self, path: &str) {
        self.path = path.to_string();
    }

    /// Check a value in plain mode; returns quickly with no allocation
    pub fn test(&self, value: &Value) -> bool {
        let mut ctx = Context::noop();
        (self.plain)(value, &mut ctx)
    }

    /// Check a value in strict mode; returns quickly with no allocation
    pub fn strict_test(&self, value: &Value) -> bool {
        let mut ctx = Context::noop();
        (self.strict)(value, &mut ctx)
    }

    /// Validate a value in plain mode
    ///
    /// Returns `None` when valid, otherwise the recorded failures, most
    /// specific first.
    pub fn validate(&self, value: &Value) -> Option<Vec<ErrorDetail>> {
        self.run_validate(&self.plain, value)
    }

    /// Validate a value in strict mode
    pub fn strict_validate(&self, value: &Value) -> Option<Vec<ErrorDetail>> {
        self.run_validate(&self.strict, value)
    }

    /// Check a value in plain mode, failing with a rendered error
    pub fn check(&self, value: &Value) -> Result<(), ValidationError> {
        self.run_check(&self.plain, value)
    }

    /// Check a value in strict mode, failing with a rendered error
    pub fn strict_check(&self, value: &Value) -> Result<(), ValidationError> {
        self.run_check(&self.strict, value)
    }

    /// The type node this facade is bound to
    pub fn get_type(&self) -> &TypeNode {
        self.suite.node(self.ty)
    }

    /// Facade for a property of the bound interface type
    ///
    /// The new facade reports errors under `<path>.<name>`.
    pub fn get_prop(&self, name: &str) -> Result<Checker, CheckerError> {
        let prop_ty = self.find_prop(name)?;
        Ok(self.sub_checker(prop_ty, format!("{}.{}", self.path, name))?)
    }

    /// Facade for the parameter list of a method of the bound interface
    pub fn method_args(&self, name: &str) -> Result<Checker, CheckerError> {
        let func = self.method_func(name)?;
        Ok(self.sub_checker(func.params, format!("{}.{}", self.path, name))?)
    }

    /// Facade for the result type of a method of the bound interface
    pub fn method_result(&self, name: &str) -> Result<Checker, CheckerError> {
        let func = self.method_func(name)?;
        Ok(self.sub_checker(func.result, format!("{}.{}", self.path, name))?)
    }

    /// Facade for the parameter list of the bound function type
    pub fn get_args(&self) -> Result<Checker, CheckerError> {
        let func = self.own_func()?;
        Ok(self.sub_checker(func.params, self.path.clone())?)
    }

    /// Facade for the result type of the bound function type
    pub fn get_result(&self) -> Result<Checker, CheckerError> {
        let func = self.own_func()?;
        Ok(self.sub_checker(func.result, self.path.clone())?)
    }

    fn run_validate(&self, checker: &CheckFn, value: &Value) -> Option<Vec<ErrorDetail>> {
        // Exploratory pass first; the detail context only pays off on
        // failure.
        let mut probe = Context::noop();
        if checker(value, &mut probe) {
            return None;
        }
        let mut ctx = Context::detail();
        checker(value, &mut ctx);
        Some(ctx.error_details(&self.path))
    }

    fn run_check(&self, checker: &CheckFn, value: &Value) -> Result<(), ValidationError> {
        match self.run_validate(checker, value) {
            None => Ok(()),
            Some(details) => {
                let primary = details.first().cloned().unwrap_or_else(|| ErrorDetail {
                    path: self.path.clone(),
                    message: "is invalid".to_string(),
                });
                Err(ValidationError {
                    path: primary.path,
                    message: primary.message,
                    details,
                })
            }
        }
    }

    fn sub_checker(&self, ty: TypeId, path: String) -> Result<Checker, TypeError> {
        let mut checker = Checker::compile(Arc::clone(&self.suite), ty)?;
        checker.path = path;
        Ok(checker)
    }

    fn own_iface(&self) -> Result<&IfaceType, CheckerError> {
        let id = self.suite.resolve_alias(self.ty)?;
        self.suite
            .node(id)
            .as_iface()
            .ok_or(CheckerError::NotAnInterface)
    }

    fn own_func(&self) -> Result<FuncType, CheckerError> {
        let id = self.suite.resolve_alias(self.ty)?;
        self.suite
            .node(id)
            .as_func()
            .cloned()
            .ok_or(CheckerError::NotAFunction)
    }

    /// Find a property's type on the bound interface, searching inherited
    /// bases depth-first
    fn find_prop(&self, name: &str) -> Result<TypeId, CheckerError> {
        let iface = self.own_iface()?;
        self.find_prop_in(iface, name)
    }

    fn find_prop_in(&self, iface: &IfaceType, name: &str) -> Result<TypeId, CheckerError> {
        if let Some(prop) = iface.props.iter().find(|prop| prop.name == name) {
            return Ok(prop.ty);
        }
        for base in &iface.bases {
            let base_id = self.suite.resolve_alias(self.suite.resolve(base)?)?;
            if let Some(base_iface) = self.suite.node(base_id).as_iface() {
                if let Ok(ty) = self.find_prop_in(base_iface, name) {
                    return Ok(ty);
                }
            }
        }
        Err(CheckerError::NoSuchProperty {
            name: name.to_string(),
        })
    }

    fn method_func(&self, name: &str) -> Result<FuncType, CheckerError> {
        let prop_ty = self.find_prop(name)?;
        let resolved = self.suite.resolve_alias(prop_ty)?;
        self.suite
            .node(resolved)
            .as_func()
            .cloned()
            .ok_or_else(|| CheckerError::NotAMethod {
                name: name.to_string(),
            })
    }
}

/// Build one checker facade per named type in the given suites
///
/// The suites are merged on top of the built-in suite, later suites
/// overriding earlier ones for a given name. Facades are returned for
/// user-defined names only.
pub fn create_checkers(
    suites: &[&TypeSuite],
) -> Result<FxHashMap<String, Checker>, TypeError> {
    let mut merged = TypeSuite::new();
    for suite in suites {
        merged.extend(suite);
    }
    let merged = Arc::new(merged);

    let mut user_names: Vec<&str> = suites
        .iter()
        .flat_map(|suite| suite.names())
        .filter(|name| !builtins::is_builtin(name))
        .collect();
    user_names.sort_unstable();
    user_names.dedup();

    let mut checkers = FxHashMap::default();
    for name in user_names {
        let ty = merged.resolve(name)?;
        checkers.insert(name.to_string(), Checker::compile(Arc::clone(&merged), ty)?);
    }
    Ok(checkers)
}

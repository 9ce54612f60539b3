//! Lexical scopes for checking.
//!
//! The scope stack doubles as the constant-evaluation environment: a
//! constant pattern may read a variable only if the stack knows it as
//! constant storage with a known value.

use nyx_ir::{Name, Span};
use nyx_types::{ConstEnv, ConstEvalError, ConstValue, Idx, ValueCategory};
use rustc_hash::FxHashMap;

/// What checking knows about one declared variable.
#[derive(Clone, PartialEq, Debug)]
pub struct VarInfo {
    pub ty: Idx,
    pub category: ValueCategory,
    /// Manifestly-constant storage; only these may be read by patterns.
    pub is_const: bool,
    /// Evaluated initializer, present only for constant storage whose
    /// initializer itself folded.
    pub const_value: Option<ConstValue>,
}

impl VarInfo {
    /// An ordinary mutable variable.
    pub fn local(ty: Idx) -> Self {
        VarInfo {
            ty,
            category: ValueCategory::LValue,
            is_const: false,
            const_value: None,
        }
    }

    /// Constant storage with a folded value.
    pub fn constant(ty: Idx, value: ConstValue) -> Self {
        VarInfo {
            ty,
            category: ValueCategory::LValue,
            is_const: true,
            const_value: Some(value),
        }
    }
}

/// A stack of lexical scopes, innermost last.
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<FxHashMap<Name, VarInfo>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack {
            scopes: vec![FxHashMap::default()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// Pop the innermost scope. The root scope is never popped.
    pub fn pop_scope(&mut self) {
        debug_assert!(self.scopes.len() > 1, "popped the root scope");
        self.scopes.pop();
    }

    /// Declare in the innermost scope, shadowing any outer declaration.
    pub fn declare(&mut self, name: Name, info: VarInfo) {
        self.scopes
            .last_mut()
            .expect("scope stack is never empty")
            .insert(name, info);
    }

    /// Innermost declaration of `name`, if any.
    pub fn lookup(&self, name: Name) -> Option<&VarInfo> {
        self.scopes.iter().rev().find_map(|scope| scope.get(&name))
    }
}

impl ConstEnv for ScopeStack {
    fn lookup_const(&self, name: Name, span: Span) -> Result<ConstValue, ConstEvalError> {
        match self.lookup(name) {
            Some(info) => match (&info.const_value, info.is_const) {
                (Some(value), true) => Ok(value.clone()),
                _ => Err(ConstEvalError::NonConstRead { span, name }),
            },
            None => Err(ConstEvalError::Undeclared { span, name }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nyx_ir::SharedInterner;
    use pretty_assertions::assert_eq;

    #[test]
    fn shadowing_resolves_innermost_first() {
        let interner = SharedInterner::new();
        let x = interner.intern("x");
        let mut scopes = ScopeStack::new();
        scopes.declare(x, VarInfo::local(Idx::INT));
        scopes.push_scope();
        scopes.declare(x, VarInfo::local(Idx::FLOAT));

        assert_eq!(scopes.lookup(x).unwrap().ty, Idx::FLOAT);
        scopes.pop_scope();
        assert_eq!(scopes.lookup(x).unwrap().ty, Idx::INT);
    }

    #[test]
    fn const_env_distinguishes_non_const_from_undeclared() {
        let interner = SharedInterner::new();
        let c = interner.intern("c");
        let v = interner.intern("v");
        let mut scopes = ScopeStack::new();
        scopes.declare(c, VarInfo::constant(Idx::INT, ConstValue::Int(7)));
        scopes.declare(v, VarInfo::local(Idx::INT));

        assert_eq!(
            scopes.lookup_const(c, Span::DUMMY),
            Ok(ConstValue::Int(7))
        );
        assert!(matches!(
            scopes.lookup_const(v, Span::DUMMY),
            Err(ConstEvalError::NonConstRead { .. })
        ));
        assert!(matches!(
            scopes.lookup_const(interner.intern("nope"), Span::DUMMY),
            Err(ConstEvalError::Undeclared { .. })
        ));
    }
}

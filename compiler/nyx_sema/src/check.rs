//! Checking the inspect construct end to end.
//!
//! `check_inspect` validates one construct and produces a [`CheckedInspect`]
//! that lowering can consume without re-deriving anything: compiled
//! predicates, binding slots, the result type, and per-arm conversions into
//! the result slot.
//!
//! Checking never stops at the first problem. A bad pattern poisons its own
//! arm (the arm is dropped from the checked output and contributes error
//! poison to deduction), and every other arm is still checked in full.

use nyx_diagnostic::{diagnostic, DiagnosticQueue};
use nyx_ir::{
    Arm, ArmAction, CondDecl, ExprArena, ExprId, InspectExpr, Name, SharedInterner, Span, StmtId,
    TypeAnnot,
};
use nyx_types::{is_bool_convertible, Conversion, Idx, Pool, ValueCategory};
use rustc_hash::FxHashMap;

use crate::deduce::{deduce_result_type, ArmResult};
use crate::env::{ScopeStack, VarInfo};
use crate::infer::{check_stmt, infer_expr};
use crate::matcher::compile_pattern;
use crate::predicate::{BindingSlot, Predicate};

/// Shared state for one checking pass.
pub struct SemaCtx<'a> {
    pub arena: &'a ExprArena,
    pub pool: &'a mut Pool,
    pub interner: &'a SharedInterner,
    pub scopes: ScopeStack,
    /// Resolution of surface type names to pool indices.
    pub named_types: FxHashMap<Name, Idx>,
    pub diags: &'a mut DiagnosticQueue,
}

impl<'a> SemaCtx<'a> {
    pub fn new(
        arena: &'a ExprArena,
        pool: &'a mut Pool,
        interner: &'a SharedInterner,
        diags: &'a mut DiagnosticQueue,
    ) -> Self {
        SemaCtx {
            arena,
            pool,
            interner,
            scopes: ScopeStack::new(),
            named_types: FxHashMap::default(),
            diags,
        }
    }

    /// Make a declared record reachable from surface type annotations.
    pub fn register_named_type(&mut self, name: Name, ty: Idx) {
        self.named_types.insert(name, ty);
    }

    /// Human-readable type name for diagnostics.
    pub fn display(&self, ty: Idx) -> String {
        self.pool.display(ty, self.interner)
    }
}

/// One arm that survived checking.
#[derive(Clone, PartialEq, Debug)]
pub struct CheckedArm {
    /// Position in the surface arm list; attempt order is this order.
    pub index: usize,
    pub predicate: Predicate,
    pub bindings: Vec<BindingSlot>,
    pub guard: Option<ExprId>,
    pub action: ArmAction,
    pub action_ty: Idx,
    /// Conversion applied when this arm's value is written to the result
    /// slot.
    pub conversion: Conversion,
    /// Marked `!`: the action still runs but never writes the result slot.
    pub excluded: bool,
    pub span: Span,
}

/// A fully checked construct, ready for lowering.
#[derive(Clone, PartialEq, Debug)]
pub struct CheckedInspect {
    pub init: Option<StmtId>,
    pub cond_decl: Option<CondDecl>,
    pub scrutinee: ExprId,
    pub scrutinee_ty: Idx,
    pub scrutinee_category: ValueCategory,
    pub result_ty: Idx,
    /// Surviving arms in attempt order; poisoned arms are absent.
    pub arms: Vec<CheckedArm>,
    /// A trailing guard-free wildcard makes the chain exhaustive.
    pub exhaustive: bool,
}

/// Check one inspect construct, reporting into the queue.
pub fn check_inspect(cx: &mut SemaCtx<'_>, inspect: &InspectExpr) -> CheckedInspect {
    cx.scopes.push_scope();

    if let Some(init) = inspect.init {
        let stmt = cx.arena.get_stmt(init);
        check_stmt(cx, stmt);
    }
    if let Some(cond) = &inspect.cond_decl {
        let (ty, _) = infer_expr(cx, cond.init);
        cx.scopes.declare(cond.name, VarInfo::local(ty));
    }

    let (scrutinee_ty, scrutinee_category) = infer_expr(cx, inspect.scrutinee);
    tracing::debug!(
        arms = inspect.arms.len(),
        scrutinee = %cx.display(scrutinee_ty),
        "checking inspect construct"
    );

    let mut arms = Vec::with_capacity(inspect.arms.len());
    let mut results = Vec::with_capacity(inspect.arms.len());
    for (index, arm) in inspect.arms.iter().enumerate() {
        match compile_pattern(cx, &arm.pattern, scrutinee_ty, scrutinee_category, arm.span) {
            Ok(compiled) => {
                let action_ty = check_arm_body(cx, arm, &compiled.bindings);
                results.push(ArmResult {
                    ty: action_ty,
                    span: arm.span,
                    excluded: arm.is_excluded(),
                });
                arms.push(CheckedArm {
                    index,
                    predicate: compiled.predicate,
                    bindings: compiled.bindings,
                    guard: arm.guard,
                    action: arm.action.clone(),
                    action_ty,
                    conversion: Conversion::Identity,
                    excluded: arm.is_excluded(),
                    span: arm.span,
                });
            }
            // Poisoned arm: contributes poison to deduction so the rest of
            // the construct still checks, but lowering never sees it.
            Err(_) => results.push(ArmResult {
                ty: Idx::ERROR,
                span: arm.span,
                excluded: arm.is_excluded(),
            }),
        }
    }

    let declared = inspect
        .declared_ty
        .map(|annot| resolve_annot(cx, annot, inspect.span));
    let deduction = deduce_result_type(cx, declared, &results, inspect.span);
    for arm in &mut arms {
        arm.conversion = deduction.conversions[arm.index];
    }

    cx.scopes.pop_scope();

    CheckedInspect {
        init: inspect.init,
        cond_decl: inspect.cond_decl.clone(),
        scrutinee: inspect.scrutinee,
        scrutinee_ty,
        scrutinee_category,
        result_ty: deduction.result_ty,
        arms,
        exhaustive: inspect.has_exhaustive_wildcard(),
    }
}

/// Guard and action check under the arm's bindings.
fn check_arm_body(cx: &mut SemaCtx<'_>, arm: &Arm, bindings: &[BindingSlot]) -> Idx {
    cx.scopes.push_scope();
    for slot in bindings {
        cx.scopes.declare(
            slot.name,
            VarInfo {
                ty: slot.ty,
                category: slot.category,
                is_const: false,
                const_value: None,
            },
        );
    }

    if let Some(guard) = arm.guard {
        let (guard_ty, _) = infer_expr(cx, guard);
        if guard_ty != Idx::ERROR && !is_bool_convertible(cx.pool, guard_ty) {
            let found = cx.display(guard_ty);
            let span = cx.arena.get_expr(guard).span;
            cx.diags.report(diagnostic::guard_not_boolean(span, &found));
        }
    }

    let action_ty = match arm.action {
        ArmAction::Expr(expr) => infer_expr(cx, expr).0,
        ArmAction::Block(stmts) => {
            for stmt in cx.arena.get_stmts(stmts) {
                check_stmt(cx, stmt);
            }
            Idx::VOID
        }
        ArmAction::Empty => Idx::VOID,
    };

    cx.scopes.pop_scope();
    action_ty
}

fn resolve_annot(cx: &mut SemaCtx<'_>, annot: TypeAnnot, span: Span) -> Idx {
    match annot {
        TypeAnnot::Void => Idx::VOID,
        TypeAnnot::Bool => Idx::BOOL,
        TypeAnnot::Int => Idx::INT,
        TypeAnnot::Float => Idx::FLOAT,
        TypeAnnot::Char => Idx::CHAR,
        TypeAnnot::Str => Idx::STR,
        TypeAnnot::Named(name) => match cx.named_types.get(&name) {
            Some(&ty) => ty,
            None => {
                let text = cx.interner.lookup(name);
                cx.diags.report(diagnostic::unknown_identifier(span, &text));
                Idx::ERROR
            }
        },
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use nyx_diagnostic::DiagnosticQueue;
    use nyx_ir::{Expr, ExprArena, ExprId, ExprKind, Name, SharedInterner, Span};
    use nyx_types::Pool;

    use super::SemaCtx;

    /// Owns everything a `SemaCtx` borrows.
    pub struct Session {
        pub arena: ExprArena,
        pub pool: Pool,
        pub interner: SharedInterner,
        pub diags: DiagnosticQueue,
    }

    impl Session {
        pub fn new() -> Self {
            Session {
                arena: ExprArena::new(),
                pool: Pool::new(),
                interner: SharedInterner::new(),
                diags: DiagnosticQueue::new(),
            }
        }

        pub fn name(&self, text: &str) -> Name {
            self.interner.intern(text)
        }

        pub fn expr(&mut self, kind: ExprKind) -> ExprId {
            self.arena.alloc_expr(Expr::new(kind, Span::DUMMY))
        }

        pub fn ctx(&mut self) -> SemaCtx<'_> {
            SemaCtx::new(&self.arena, &mut self.pool, &self.interner, &mut self.diags)
        }
    }
}

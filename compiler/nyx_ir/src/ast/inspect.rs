//! The pattern model and the inspect construct.
//!
//! An `InspectExpr` tests one scrutinee against an ordered list of arms and
//! lowers the winning arm to control flow that optionally produces a value.
//! Arms are stored in a plain `Vec` in source order; source order is the
//! match-attempt order and must be preserved exactly.

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::{ExprId, Name, Span, StmtId, StmtRange};

/// A pattern, as written on the left of an arm.
///
/// Closed variant set: the matcher and the lowering pass both match this
/// exhaustively, so a new pattern kind forces every consumer to be updated.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Pattern {
    /// `__`: matches anything, binds nothing.
    Wildcard,
    /// Bare identifier: matches anything, introduces one new alias to the
    /// scrutinee scoped to [guard, action]. The alias preserves the
    /// scrutinee's value category: no implicit copy.
    Binding(Name),
    /// A manifestly-constant value compared to the scrutinee with `==`
    /// (user-overloadable for aggregates). `explicit_case` is the `case`
    /// qualifier: it forces constant lookup even for a bare identifier that
    /// would otherwise introduce a binding.
    Constant { expr: ExprId, explicit_case: bool },
    /// `[p0, .., pn]`: decomposes the scrutinee into a fixed arity of
    /// element accesses. Declared arity must equal the scrutinee type's
    /// decomposition arity; checked once per pattern, before any matching.
    Decompose(SmallVec<[ElementPattern; 4]>),
    /// OR of several structural sub-tests sharing one guard and one body.
    /// Sub-patterns may not introduce bindings.
    Alternative(Vec<Pattern>),
}

/// One position of a decomposition pattern.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ElementPattern {
    Wildcard,
    /// New binding to the decomposed element, value-category-preserving.
    Binding(Name),
    /// Constant compared against the decomposed element.
    Constant(ExprId),
}

bitflags! {
    /// Per-arm flags.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ArmFlags: u8 {
        /// `!` action prefix: this arm's result never participates in
        /// result-type deduction.
        const EXCLUDED_FROM_DEDUCTION = 1 << 0;
    }
}

/// What an arm does once selected.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ArmAction {
    /// `=> expr`: contributes the expression's type to deduction.
    Expr(ExprId),
    /// `=> { ... }`: a statement block, contributes `void`.
    Block(StmtRange),
    /// `=>;`: a no-op arm, contributes `void`.
    Empty,
}

/// One arm: pattern, optional guard, action.
///
/// At most one guard per arm; the guard must be boolean-convertible and is
/// evaluated strictly after the structural predicate succeeds and after the
/// arm's bindings are established.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Arm {
    pub pattern: Pattern,
    pub guard: Option<ExprId>,
    pub action: ArmAction,
    pub flags: ArmFlags,
    pub span: Span,
}

impl Arm {
    pub fn new(pattern: Pattern, action: ArmAction, span: Span) -> Self {
        Arm {
            pattern,
            guard: None,
            action,
            flags: ArmFlags::empty(),
            span,
        }
    }

    #[must_use]
    pub fn with_guard(mut self, guard: ExprId) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Mark this arm as excluded from result-type deduction.
    #[must_use]
    pub fn excluded(mut self) -> Self {
        self.flags |= ArmFlags::EXCLUDED_FROM_DEDUCTION;
        self
    }

    pub fn is_excluded(&self) -> bool {
        self.flags.contains(ArmFlags::EXCLUDED_FROM_DEDUCTION)
    }
}

/// Surface-written type annotation, resolved to a pool index during
/// validation. Kept syntactic here so the IR does not depend on the type
/// pool.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeAnnot {
    Void,
    Bool,
    Int,
    Float,
    Char,
    Str,
    /// A named aggregate or tuple-protocol record.
    Named(Name),
}

/// Condition declaration: `inspect (T x = init)`.
///
/// Declares a fresh variable initialized once; the variable becomes the
/// scrutinee and is an lvalue, so identifier patterns alias it.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct CondDecl {
    pub name: Name,
    pub init: ExprId,
    pub span: Span,
}

/// The inspect construct.
///
/// Exactly one of {implicit deduced result type, explicit declared result
/// type} governs the construct; in expression form exactly one shared
/// result slot exists and is written by exactly one selected arm per
/// execution.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct InspectExpr {
    /// Optional init statement run before the scrutinee is evaluated.
    pub init: Option<StmtId>,
    /// Optional condition declaration; when present it is the scrutinee.
    pub cond_decl: Option<CondDecl>,
    /// Evaluated exactly once per construct execution and cached in an
    /// addressable temporary; every arm reads the cache.
    pub scrutinee: ExprId,
    /// Arms in source order. Source order is the match-attempt order.
    pub arms: Vec<Arm>,
    /// Explicit trailing result type (`-> T`), if declared.
    pub declared_ty: Option<TypeAnnot>,
    pub span: Span,
}

impl InspectExpr {
    pub fn new(scrutinee: ExprId, span: Span) -> Self {
        InspectExpr {
            init: None,
            cond_decl: None,
            scrutinee,
            arms: Vec::new(),
            declared_ty: None,
            span,
        }
    }

    /// Append an arm, preserving source order.
    pub fn push_arm(&mut self, arm: Arm) {
        self.arms.push(arm);
    }

    /// True if a trailing guard-free wildcard makes the chain exhaustive.
    pub fn has_exhaustive_wildcard(&self) -> bool {
        self.arms
            .last()
            .is_some_and(|arm| matches!(arm.pattern, Pattern::Wildcard) && arm.guard.is_none())
    }
}

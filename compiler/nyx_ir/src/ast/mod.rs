//! AST nodes for the expression slice the `inspect` construct touches.
//!
//! The general statement grammar lives outside this core; what is modeled
//! here is exactly what scrutinees, constant patterns, guards, and arm
//! actions can contain.

mod inspect;

pub use inspect::{
    Arm, ArmAction, ArmFlags, CondDecl, ElementPattern, InspectExpr, Pattern, TypeAnnot,
};

use crate::{ExprId, InspectId, Name, Span, StmtRange};

/// An expression node.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

/// Expression variants.
///
/// Floats are stored as raw bits so `Expr` stays `Eq + Hash`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    Int(i64),
    /// `f64` bit pattern; use `f64::from_bits` to read.
    Float(u64),
    Bool(bool),
    Char(char),
    Str(Name),
    Ident(Name),
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    /// `target = value`; target must be a place expression.
    Assign {
        target: ExprId,
        value: ExprId,
    },
    /// Member access on an aggregate: `base.field`.
    Field {
        base: ExprId,
        field: Name,
    },
    /// Statement block with an optional tail expression (`ExprId::NONE`
    /// when the block yields no value).
    Block {
        stmts: StmtRange,
        tail: ExprId,
    },
    /// An embedded inspect construct; the record lives in the arena.
    Inspect(InspectId),
}

/// A statement node.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

/// Statement variants.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    /// Expression evaluated for its effects.
    Expr(ExprId),
    /// Variable declaration. `is_const` marks manifestly-constant storage,
    /// which is what constant patterns are allowed to read.
    Let {
        name: Name,
        is_const: bool,
        init: ExprId,
    },
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    /// True for operators whose result type is `bool` regardless of operands.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    /// True for short-circuiting logical operators.
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

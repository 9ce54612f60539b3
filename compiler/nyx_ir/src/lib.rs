//! Nyx IR - Intermediate Representation Types
//!
//! This crate contains the core data structures for the Nyx compiler:
//! - Spans for source locations
//! - Names for interned identifiers
//! - AST nodes for the expression slice the `inspect` construct touches
//! - The pattern model (`Pattern`, `Arm`) and the inspect construct itself
//! - Arena allocation for expressions, statements, and inspect records
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: Strings → `Name(u32)`
//! - **Flatten Everything**: No `Box<Expr>`, use `ExprId(u32)` indices
//! - **Closed variants**: `Pattern` is a sealed tagged union matched
//!   exhaustively by every consumer, so adding a pattern kind is a
//!   compile-time event downstream
//!
//! Types that contain floats store them as u64 bits for Hash compatibility.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
pub mod ast;
mod expr_id;
mod interner;
mod name;
mod span;

pub use arena::ExprArena;
pub use ast::{
    Arm, ArmAction, ArmFlags, BinaryOp, CondDecl, ElementPattern, Expr, ExprKind, InspectExpr,
    Pattern, Stmt, StmtKind, TypeAnnot, UnaryOp,
};
pub use expr_id::{ExprId, InspectId, StmtId, StmtRange};
pub use interner::{SharedInterner, StringInterner};
pub use name::Name;
pub use span::Span;

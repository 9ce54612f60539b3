//! Semantic analysis for the inspect construct.
//!
//! The pipeline for one construct:
//!
//! 1. infer the scrutinee's type and value category ([`infer`])
//! 2. compile each arm's pattern to a predicate plus bindings ([`matcher`])
//! 3. check guards and arm actions under the bindings ([`check`])
//! 4. deduce or verify the result type ([`deduce`])
//!
//! Diagnostics accumulate in the queue throughout; nothing aborts early.
//! The product is a [`CheckedInspect`] that lowering consumes directly.

mod check;
mod deduce;
mod env;
mod infer;
mod matcher;
mod predicate;

pub use check::{check_inspect, CheckedArm, CheckedInspect, SemaCtx};
pub use deduce::{deduce_result_type, ArmResult, Deduction};
pub use env::{ScopeStack, VarInfo};
pub use infer::{check_stmt, infer_expr};
pub use matcher::compile_pattern;
pub use predicate::{Access, BindingSlot, CompiledPattern, EqOp, Predicate};

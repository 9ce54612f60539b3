//! Lowering for the inspect construct.
//!
//! [`lower_inspect`] turns a checked construct into a [`Body`]: labeled
//! basic blocks forming a first-match-wins decision chain over the cached
//! scrutinee, with a shared result slot for the expression form. [`Machine`]
//! executes a body against a variable environment, which is how the
//! end-to-end semantics are exercised.

mod block;
mod interp;
mod lower;

pub use block::{Block, BlockId, Body, Inst, LocalId, Terminator};
pub use interp::{ExecError, HostEq, Machine};
pub use lower::lower_inspect;

//! Type system for Nyx.
//!
//! Types are interned in a [`Pool`] and handled through compact [`Idx`]
//! indices, so equality is a `u32` compare and type data never needs to
//! be cloned around the checker. The pool pre-populates the builtins;
//! arrays are hash-consed; records are declared once per program.
//!
//! Beyond the pool this crate carries the pieces of the type system that
//! pattern checking leans on:
//! - conversion classification and common-type computation ([`convert`])
//! - lvalue/rvalue tracking ([`ValueCategory`])
//! - decomposition of aggregates into element accessors ([`decompose`])
//! - constant-expression evaluation ([`const_eval`])

mod convert;
mod decompose;
mod idx;
mod pool;
mod tag;
mod value_category;

pub mod const_eval;

pub use convert::{classify_conversion, common_type, is_bool_convertible, Conversion};
pub use decompose::{decompose, ElementAccess, ElementAccessor, NotDecomposable};
pub use idx::Idx;
pub use pool::{FieldDef, Pool, RecordDef};
pub use tag::Tag;
pub use value_category::ValueCategory;

pub use const_eval::{evaluate, fold_binary, fold_unary, ConstEnv, ConstEvalError, ConstValue};

// Size assertions to prevent accidental regressions.
#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{ElementAccessor, Idx};
    nyx_ir::static_assert_size!(Idx, 4);
    nyx_ir::static_assert_size!(ElementAccessor, 12);
}

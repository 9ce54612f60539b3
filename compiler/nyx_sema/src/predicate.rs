//! Compiled pattern predicates.
//!
//! The matcher turns each surface pattern into a [`Predicate`]: a boolean
//! formula over the cached scrutinee, plus an ordered list of
//! [`BindingSlot`]s to establish once the formula holds. Lowering consumes
//! predicates, never surface patterns, so pattern legality is settled in
//! exactly one place.

use nyx_ir::Name;
use nyx_types::{ConstValue, ElementAccessor, Idx, ValueCategory};

/// Where a test or binding reads from.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Access {
    /// The cached scrutinee itself.
    Root,
    /// One decomposed element of the scrutinee.
    Element(ElementAccessor),
}

/// Which equality is used for a constant test.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum EqOp {
    /// Builtin scalar equality, possibly after numeric promotion.
    Builtin,
    /// User-declared `==` registered under this name in the host table.
    UserMethod(Name),
}

/// A compile-time boolean formula over the scrutinee.
#[derive(Clone, PartialEq, Debug)]
pub enum Predicate {
    /// Irrefutable: matches every value.
    True,
    /// `read(access) == value` under `eq`.
    Equals {
        access: Access,
        value: ConstValue,
        eq: EqOp,
    },
    /// All conjuncts hold, tested left to right with short circuit.
    All(Vec<Predicate>),
    /// At least one disjunct holds, tested left to right.
    Any(Vec<Predicate>),
}

impl Predicate {
    /// True when the predicate can never fail at runtime.
    pub fn is_irrefutable(&self) -> bool {
        match self {
            Predicate::True => true,
            Predicate::Equals { .. } => false,
            Predicate::All(preds) => preds.iter().all(Predicate::is_irrefutable),
            Predicate::Any(preds) => preds.iter().any(Predicate::is_irrefutable),
        }
    }
}

/// One name introduced by a pattern, aliased to a place.
///
/// The slot carries the scrutinee's value category: binding an lvalue
/// scrutinee aliases its storage, so assignment through the binding is
/// visible after the construct.
#[derive(Clone, PartialEq, Debug)]
pub struct BindingSlot {
    pub name: Name,
    pub access: Access,
    pub ty: Idx,
    pub category: ValueCategory,
}

/// A pattern after legality checking: the formula plus its bindings.
#[derive(Clone, PartialEq, Debug)]
pub struct CompiledPattern {
    pub predicate: Predicate,
    pub bindings: Vec<BindingSlot>,
}

impl CompiledPattern {
    /// A pattern that matches everything and binds nothing.
    pub fn irrefutable() -> Self {
        CompiledPattern {
            predicate: Predicate::True,
            bindings: Vec::new(),
        }
    }
}

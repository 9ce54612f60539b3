//! Common-type unification and implicit-conversion classification.
//!
//! `common_type` is the conditional-expression rule: the type two branch
//! values would unify to in `cond ? a : b`. Result-type deduction across
//! inspect arms folds with exactly this rule, left to right.

use crate::{Idx, Pool, Tag};

/// Classification of an implicit conversion.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Conversion {
    /// Same type, nothing to do.
    Identity,
    /// Value-preserving (`int` → `float`, `char` → `int`, `bool` → `int`).
    Widening,
    /// May change the value (`float` → `int`, numeric → `bool`); produces a
    /// warning, never a hard error.
    Narrowing,
    /// No implicit conversion exists.
    Forbidden,
}

impl Conversion {
    pub fn is_allowed(self) -> bool {
        !matches!(self, Conversion::Forbidden)
    }
}

/// Conversion rank for numeric types; a conversion to a lower rank narrows.
fn numeric_rank(tag: Tag) -> Option<u8> {
    match tag {
        Tag::Bool => Some(0),
        Tag::Char => Some(1),
        Tag::Int => Some(2),
        Tag::Float => Some(3),
        _ => None,
    }
}

/// Classify the implicit conversion from `from` to `to`.
pub fn classify_conversion(pool: &Pool, from: Idx, to: Idx) -> Conversion {
    if from == to {
        return Conversion::Identity;
    }
    // Error poison converts anywhere: the error is already reported.
    if from == Idx::ERROR || to == Idx::ERROR {
        return Conversion::Identity;
    }
    let (from_tag, to_tag) = (pool.tag(from), pool.tag(to));
    match (numeric_rank(from_tag), numeric_rank(to_tag)) {
        (Some(f), Some(t)) if f <= t => Conversion::Widening,
        (Some(_), Some(_)) => Conversion::Narrowing,
        _ => Conversion::Forbidden,
    }
}

/// The conditional-expression common type of `a` and `b`, if one exists.
pub fn common_type(pool: &Pool, a: Idx, b: Idx) -> Option<Idx> {
    if a == b {
        return Some(a);
    }
    if a == Idx::ERROR || b == Idx::ERROR {
        return Some(Idx::ERROR);
    }
    let (ra, rb) = (numeric_rank(pool.tag(a))?, numeric_rank(pool.tag(b))?);
    Some(if ra >= rb { a } else { b })
}

/// True if a value of `ty` may appear where a boolean test is required.
pub fn is_bool_convertible(pool: &Pool, ty: Idx) -> bool {
    ty == Idx::ERROR || numeric_rank(pool.tag(ty)).is_some()
}

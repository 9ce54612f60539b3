//! The decomposition protocol.
//!
//! Given a scrutinee type, produce the ordered element accessors a
//! structured-binding pattern decomposes it into:
//!
//! - fixed-size array → indices `0..N-1`
//! - tuple-protocol record → N per-index accessor calls
//! - plain aggregate → its data members in declaration order
//!
//! Anything else is not decomposable. Arity checking against the declared
//! pattern is the caller's job; the protocol only reports what exists.

use crate::{Idx, Pool, Tag};

/// How one decomposed element is reached.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ElementAccess {
    /// `scrutinee[i]` on a fixed-size array.
    ArrayIndex(u32),
    /// Tuple-protocol accessor call `get<i>(scrutinee)`.
    ProtocolGet(u32),
    /// Direct member access, by declaration-order position.
    FieldAt(u32),
}

/// One decomposed element: its type and how to reach it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ElementAccessor {
    pub ty: Idx,
    pub access: ElementAccess,
}

/// The scrutinee type supports no decomposition.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NotDecomposable;

/// Decompose `ty` into its ordered element accessors.
pub fn decompose(pool: &Pool, ty: Idx) -> Result<Vec<ElementAccessor>, NotDecomposable> {
    match pool.tag(ty) {
        Tag::Array => {
            let elem = pool.array_elem(ty);
            let len = pool.array_len(ty);
            Ok((0..len)
                .map(|i| ElementAccessor {
                    ty: elem,
                    access: ElementAccess::ArrayIndex(i),
                })
                .collect())
        }
        Tag::Record => {
            let def = pool.record(ty);
            let access: fn(u32) -> ElementAccess = if def.tuple_protocol {
                ElementAccess::ProtocolGet
            } else {
                ElementAccess::FieldAt
            };
            Ok(def
                .fields
                .iter()
                .enumerate()
                .map(|(i, field)| {
                    #[expect(clippy::cast_possible_truncation, reason = "field count fits u32")]
                    let position = i as u32;
                    ElementAccessor {
                        ty: field.ty,
                        access: access(position),
                    }
                })
                .collect())
        }
        _ => Err(NotDecomposable),
    }
}

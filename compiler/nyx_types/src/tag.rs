//! Cheap type-kind dispatch.

/// The kind of a pooled type, for dispatch without touching payload data.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Tag {
    Error,
    Void,
    Bool,
    Int,
    Float,
    Char,
    Str,
    /// Fixed-size array `[T; N]`.
    Array,
    /// Named record: a plain aggregate or a tuple-protocol type.
    Record,
}

impl Tag {
    /// Arithmetic-capable types, ordered by conversion rank elsewhere.
    pub fn is_numeric(self) -> bool {
        matches!(self, Tag::Bool | Tag::Char | Tag::Int | Tag::Float)
    }

    /// Types with a builtin `==`.
    pub fn has_builtin_eq(self) -> bool {
        matches!(
            self,
            Tag::Bool | Tag::Char | Tag::Int | Tag::Float | Tag::Str
        )
    }
}

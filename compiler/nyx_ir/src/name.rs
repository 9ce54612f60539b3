//! Interned identifier names.

use std::fmt;

/// An interned identifier.
///
/// Names are `u32` handles into a `StringInterner`; equality and hashing are
/// O(1) and never touch the underlying string.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Name(u32);

crate::static_assert_size!(Name, 4);

impl Name {
    /// Create a name from a raw interner index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    /// The raw interner index.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

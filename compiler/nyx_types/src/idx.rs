//! Type pool indices.

use std::fmt;

/// Index of a type in the [`Pool`](crate::Pool).
///
/// Builtin types have fixed indices so they can be referenced without a
/// pool in hand.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Idx(u32);

nyx_ir::static_assert_size!(Idx, 4);

impl Idx {
    /// Poison type: an error was already reported, suppress cascades.
    pub const ERROR: Idx = Idx(0);
    /// The no-value type of statement-form constructs and empty arms.
    pub const VOID: Idx = Idx(1);
    pub const BOOL: Idx = Idx(2);
    pub const INT: Idx = Idx(3);
    pub const FLOAT: Idx = Idx(4);
    pub const CHAR: Idx = Idx(5);
    pub const STR: Idx = Idx(6);

    /// Number of builtin indices reserved at the front of the pool.
    pub(crate) const BUILTIN_COUNT: u32 = 7;

    #[inline]
    pub(crate) const fn new(raw: u32) -> Self {
        Idx(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Idx::ERROR => write!(f, "Idx(error)"),
            Idx::VOID => write!(f, "Idx(void)"),
            Idx::BOOL => write!(f, "Idx(bool)"),
            Idx::INT => write!(f, "Idx(int)"),
            Idx::FLOAT => write!(f, "Idx(float)"),
            Idx::CHAR => write!(f, "Idx(char)"),
            Idx::STR => write!(f, "Idx(str)"),
            Idx(raw) => write!(f, "Idx({raw})"),
        }
    }
}

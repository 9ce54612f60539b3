//! Arena index types.
//!
//! All AST storage is flattened: nodes refer to each other through `u32`
//! indices into the `ExprArena` rather than through owned pointers.

use std::fmt;

/// Index of an expression in the arena.
///
/// `ExprId::NONE` is a sentinel for "no expression" in slots that are
/// optional but hot enough that `Option<ExprId>` padding would hurt
/// (e.g. block tails).
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ExprId(u32);

crate::static_assert_size!(ExprId, 4);

impl ExprId {
    /// Sentinel for an absent expression.
    pub const NONE: ExprId = ExprId(u32::MAX);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        ExprId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// True unless this is the `NONE` sentinel.
    #[inline]
    pub const fn is_present(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_present() {
            write!(f, "ExprId({})", self.0)
        } else {
            write!(f, "ExprId(NONE)")
        }
    }
}

/// Index of a statement in the arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct StmtId(u32);

impl StmtId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        StmtId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Contiguous run of statements in the arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct StmtRange {
    pub start: u32,
    pub end: u32,
}

impl StmtRange {
    pub const EMPTY: StmtRange = StmtRange { start: 0, end: 0 };

    #[inline]
    pub const fn len(self) -> usize {
        (self.end - self.start) as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }
}

/// Index of an inspect construct record in the arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct InspectId(u32);

impl InspectId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        InspectId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

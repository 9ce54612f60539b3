//! Value categories: whether an expression denotes addressable storage.
//!
//! Identifier bindings in patterns mirror the scrutinee's category: an
//! lvalue scrutinee binds by place alias (mutation flows through to the
//! original storage), a temporary binds by consuming the cached value. In
//! neither case is an implicit copy made.

/// Value category of an expression.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
pub enum ValueCategory {
    /// Denotes addressable storage that outlives the expression.
    LValue,
    /// A temporary; it lives in the construct's cache slot only.
    #[default]
    RValue,
}

impl ValueCategory {
    #[inline]
    pub const fn is_lvalue(self) -> bool {
        matches!(self, Self::LValue)
    }

    /// Human-readable name for diagnostics and traces.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LValue => "lvalue",
            Self::RValue => "rvalue",
        }
    }
}

impl std::fmt::Display for ValueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

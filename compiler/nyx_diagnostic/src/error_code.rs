use std::fmt;

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E1xxx: structural (build-time) errors
/// - E2xxx: type (validation-time) errors
/// - E3xxx: pattern (matcher-time) errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Structural errors (E1xxx)
    /// Malformed guard expression
    E1001,
    /// Missing delimiter in pattern list
    E1002,

    // Type errors (E2xxx)
    /// Unknown identifier
    E2001,
    /// Result type mismatch between an arm and the deduced/declared type
    E2002,
    /// No valid type can be deduced (every arm excluded)
    E2003,
    /// Guard is not boolean-convertible
    E2004,
    /// Narrowing conversion (warning)
    E2005,
    /// Operands of an operator have no common type
    E2006,
    /// Assignment to a non-place expression
    E2007,
    /// Unknown field on an aggregate
    E2008,

    // Pattern errors (E3xxx)
    /// Pattern is not a constant expression
    E3001,
    /// Decomposition arity mismatch
    E3002,
    /// Scrutinee type does not decompose
    E3003,
    /// No equality operator between pattern and scrutinee
    E3004,
    /// Binding inside an alternative pattern
    E3005,
}

impl ErrorCode {
    /// Short description for docs and `--explain`.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::E1001 => "malformed guard expression",
            ErrorCode::E1002 => "missing delimiter in pattern list",
            ErrorCode::E2001 => "unknown identifier",
            ErrorCode::E2002 => "result type mismatch",
            ErrorCode::E2003 => "no valid type can be deduced",
            ErrorCode::E2004 => "guard is not boolean-convertible",
            ErrorCode::E2005 => "narrowing conversion",
            ErrorCode::E2006 => "operands have no common type",
            ErrorCode::E2007 => "assignment target is not a place",
            ErrorCode::E2008 => "unknown field",
            ErrorCode::E3001 => "pattern is not a constant expression",
            ErrorCode::E3002 => "decomposition arity mismatch",
            ErrorCode::E3003 => "type does not decompose",
            ErrorCode::E3004 => "no usable equality operator",
            ErrorCode::E3005 => "binding inside alternative pattern",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

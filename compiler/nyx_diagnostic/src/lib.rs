//! Diagnostic system for the Nyx compiler.
//!
//! - Error codes for searchability
//! - Clear messages (what went wrong)
//! - Primary span (where it went wrong)
//! - Context labels and notes (why it's wrong)
//!
//! Diagnostics accumulate in a [`DiagnosticQueue`]; reporting never unwinds
//! control flow, so one bad arm never suppresses diagnostics for sibling
//! arms or the enclosing function.
//!
//! # Error Guarantees
//!
//! [`ErrorGuaranteed`] is type-level proof that at least one error was
//! emitted; it can only be obtained by reporting an error.

pub mod diagnostic;
mod error_code;
mod guarantee;
pub mod queue;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};

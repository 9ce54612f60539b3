use std::fmt;

use nyx_ir::Span;

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A labeled span with a message.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    /// Create a primary label (the main error location).
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a secondary label (related context).
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: false,
        }
    }
}

/// A diagnostic with the context needed for a useful message.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    /// Error code for searchability.
    pub code: ErrorCode,
    /// Severity level.
    pub severity: Severity,
    /// Main error message.
    pub message: String,
    /// Labeled spans showing where the error occurred.
    pub labels: Vec<Label>,
    /// Additional notes providing context.
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    pub fn error(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Error)
    }

    /// Create a new warning diagnostic.
    pub fn warning(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Warning)
    }

    /// Set the main message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add a primary label at the error location.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label for context.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Add a note providing additional context.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Get the primary span (first primary label's span).
    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find(|l| l.is_primary).map(|l| l.span)
    }

    /// Check if this is an error (vs warning/note).
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;

        for label in &self.labels {
            let marker = if label.is_primary { "-->" } else { "   " };
            write!(f, "\n  {} {:?}: {}", marker, label.span, label.message)?;
        }

        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }

        Ok(())
    }
}

/// "pattern is not a constant expression", with the offending read named in
/// a note when known.
pub fn not_a_constant_expression(span: Span, read_of: Option<&str>) -> Diagnostic {
    let diag = Diagnostic::error(ErrorCode::E3001)
        .with_message("pattern is not a constant expression")
        .with_label(span, "this pattern must be computable at compile time");
    match read_of {
        Some(name) => diag.with_note(format!(
            "read of non-constant variable `{name}` is not allowed in a constant expression"
        )),
        None => diag,
    }
}

/// Decomposition arity mismatch, carrying both arities.
pub fn decomposition_arity_mismatch(
    span: Span,
    type_name: &str,
    decomposed: usize,
    provided: usize,
) -> Diagnostic {
    Diagnostic::error(ErrorCode::E3002)
        .with_message(format!(
            "type `{type_name}` decomposes into {decomposed} elements, but {provided} names were provided"
        ))
        .with_label(span, "pattern list must match number of decomposed elements")
}

/// Scrutinee type supports no decomposition at all.
pub fn not_decomposable(span: Span, type_name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E3003)
        .with_message(format!("type `{type_name}` cannot be decomposed"))
        .with_label(span, "scrutinee is not an array, tuple-like, or aggregate")
}

/// Every arm excluded from deduction: nothing to deduce from.
pub fn no_deduced_type(span: Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2003)
        .with_message("no valid type can be deduced for inspect expression")
        .with_label(span, "every arm is excluded from type deduction")
}

/// An arm's result does not fit the deduced or declared type. Reports both.
pub fn result_type_mismatch(span: Span, found: &str, expected: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2002)
        .with_message(format!(
            "resulting expression type `{found}` must match result type `{expected}`"
        ))
        .with_label(span, format!("this arm has type `{found}`"))
}

/// Implicit narrowing conversion in an arm result. Warning, never an error.
pub fn narrowing_conversion(span: Span, from: &str, to: &str) -> Diagnostic {
    Diagnostic::warning(ErrorCode::E2005)
        .with_message(format!(
            "implicit conversion from `{from}` to `{to}` may change the value"
        ))
        .with_label(span, "narrowing happens here")
}

/// Use of an undeclared identifier.
pub fn unknown_identifier(span: Span, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2001)
        .with_message(format!("use of undeclared identifier `{name}`"))
        .with_label(span, "not found in this scope")
}

/// Guard expression is not boolean-convertible.
pub fn guard_not_boolean(span: Span, found: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2004)
        .with_message(format!("guard of type `{found}` is not convertible to `bool`"))
        .with_label(span, "guards must be boolean-convertible")
}

/// Equality between scrutinee and constant pattern has no usable operator.
pub fn no_equality_operator(span: Span, scrutinee_ty: &str, pattern_ty: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E3004)
        .with_message(format!(
            "no `==` between scrutinee type `{scrutinee_ty}` and pattern type `{pattern_ty}`"
        ))
        .with_label(span, "this constant cannot be compared to the scrutinee")
}

/// A sub-pattern of an alternative tries to introduce a binding.
pub fn binding_in_alternative(span: Span, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E3005)
        .with_message(format!(
            "binding `{name}` is not allowed inside an alternative pattern"
        ))
        .with_label(span, "only one branch of the alternative would bind it")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_accumulates_parts() {
        let diag = Diagnostic::error(ErrorCode::E2001)
            .with_message("test error")
            .with_label(Span::new(0, 5), "here")
            .with_note("some context");

        assert_eq!(diag.code, ErrorCode::E2001);
        assert!(diag.is_error());
        assert_eq!(diag.labels.len(), 1);
        assert!(diag.labels[0].is_primary);
        assert_eq!(diag.primary_span(), Some(Span::new(0, 5)));
        assert_eq!(diag.notes.len(), 1);
    }

    #[test]
    fn arity_mismatch_reports_both_arities() {
        let diag = decomposition_arity_mismatch(Span::new(3, 12), "s", 2, 3);
        assert_eq!(diag.code, ErrorCode::E3002);
        assert!(diag.message.contains("2 elements"));
        assert!(diag.message.contains("3 names"));
    }

    #[test]
    fn constant_expression_error_names_the_read() {
        let diag = not_a_constant_expression(Span::new(0, 3), Some("foo"));
        assert_eq!(diag.code, ErrorCode::E3001);
        assert!(diag.notes[0].contains("`foo`"));

        let bare = not_a_constant_expression(Span::new(0, 3), None);
        assert!(bare.notes.is_empty());
    }

    #[test]
    fn narrowing_is_a_warning() {
        let diag = narrowing_conversion(Span::new(0, 3), "float", "int");
        assert!(!diag.is_error());
        assert_eq!(diag.severity, Severity::Warning);
    }

    #[test]
    fn display_includes_code_and_labels() {
        let diag = no_deduced_type(Span::new(0, 9));
        let rendered = diag.to_string();
        assert!(rendered.contains("error [E2003]"));
        assert!(rendered.contains("no valid type can be deduced"));
        assert!(rendered.contains("-->"));
    }
}

//! Accumulating diagnostic queue.
//!
//! The queue is the sink every pass reports into: it collects, it never
//! unwinds control flow, and it hands back a position-sorted batch on
//! flush. A hard limit keeps one broken construct from flooding output.

use crate::{Diagnostic, ErrorGuaranteed};

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors before further errors are dropped
    /// (0 = unlimited). Warnings are never limited.
    pub error_limit: usize,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig { error_limit: 25 }
    }
}

impl DiagnosticConfig {
    /// A config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig { error_limit: 0 }
    }
}

/// Queue for collecting and sorting diagnostics.
#[derive(Default, Debug)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    config: DiagnosticConfig,
    error_count: usize,
    dropped: usize,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    /// Report a diagnostic. Never fails, never unwinds.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            if self.config.error_limit != 0 && self.error_count >= self.config.error_limit {
                self.dropped += 1;
                return;
            }
            self.error_count += 1;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Report an error diagnostic and obtain proof that an error exists.
    pub fn report_error(&mut self, diagnostic: Diagnostic) -> ErrorGuaranteed {
        debug_assert!(diagnostic.is_error(), "report_error given a non-error");
        self.report(diagnostic);
        ErrorGuaranteed::new()
    }

    /// Number of errors reported so far (including dropped ones).
    pub fn error_count(&self) -> usize {
        self.error_count + self.dropped
    }

    /// True if at least one error (not warning) was reported.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Diagnostics reported so far, in report order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drain all diagnostics, sorted by primary span position, errors
    /// before warnings at the same position.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut out = std::mem::take(&mut self.diagnostics);
        out.sort_by_key(|d| {
            let span = d.primary_span().unwrap_or_default();
            (span.start, span.end, !d.is_error())
        });
        out
    }
}

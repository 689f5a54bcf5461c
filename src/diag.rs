//! Diagnostic reporting for the front end.
//!
//! Lexical errors are non-fatal: the lexer skips the offending
//! character and keeps scanning, reporting what it skipped to a
//! [`DiagnosticSink`] injected at construction time. The default
//! sink forwards to the [`log`] crate; tests use a
//! [`CollectingSink`] to make assertions about what was reported.

use std::fmt;

/// A single non-fatal diagnostic with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// A human-readable description of the problem.
    pub message: String,
    /// The 1-based line at which the problem occurred.
    pub line: usize,
    /// The 1-based column at which the problem occurred.
    pub column: usize,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line {}, column {}", self.message, self.line, self.column)
    }
}

/// A sink for non-fatal diagnostics.
pub trait DiagnosticSink {
    /// Reports a single diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

/// The default sink, forwarding diagnostics to [`log::warn!`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
    }
}

/// A sink that retains every reported diagnostic.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    /// The diagnostics reported so far, in order.
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

impl<S: DiagnosticSink> DiagnosticSink for std::rc::Rc<std::cell::RefCell<S>> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.borrow_mut().report(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_retains_order() {
        let mut sink = CollectingSink::default();
        sink.report(Diagnostic {
            message: "first".into(),
            line: 1,
            column: 1,
        });
        sink.report(Diagnostic {
            message: "second".into(),
            line: 2,
            column: 7,
        });

        assert_eq!(sink.diagnostics.len(), 2);
        assert_eq!(sink.diagnostics[0].message, "first");
        assert_eq!(sink.diagnostics[1].to_string(), "second at line 2, column 7");
    }
}

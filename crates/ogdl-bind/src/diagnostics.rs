//! Diagnostic routing
//!
//! Every failure is returned to the caller as a value *and* reported to a
//! caller-supplied [`DiagnosticSink`]. The default sink forwards to the
//! `log` facade.

use parking_lot::Mutex;

use crate::error::FailureKind;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The component cannot do its job
    Error,
    /// A single call failed
    Warning,
}

/// One reported failure
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Severity
    pub severity: Severity,
    /// Failure kind
    pub kind: FailureKind,
    /// Human-readable message
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic
    pub fn new(severity: Severity, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind,
            message: message.into(),
        }
    }
}

/// Receiver of diagnostics
pub trait DiagnosticSink: Send + Sync {
    /// Report a diagnostic
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => log::error!("[{:?}] {}", diagnostic.kind, diagnostic.message),
            Severity::Warning => log::warn!("[{:?}] {}", diagnostic.kind, diagnostic.message),
        }
    }
}

/// Discards diagnostics
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _diagnostic: Diagnostic) {}
}

/// Keeps diagnostics in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything reported so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    /// Remove and return everything reported so far
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.lock())
    }

    /// Number of diagnostics
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True when nothing has been reported
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.entries.lock().push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink() {
        let sink = CollectingSink::new();
        assert!(sink.is_empty());

        sink.report(Diagnostic::new(Severity::Warning, FailureKind::Resolution, "no method f()"));
        sink.report(Diagnostic::new(Severity::Error, FailureKind::Construction, "no class"));

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.diagnostics()[0].kind, FailureKind::Resolution);

        let taken = sink.take();
        assert_eq!(taken.len(), 2);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_log_and_null_sinks_accept_reports() {
        LogSink.report(Diagnostic::new(Severity::Warning, FailureKind::Invocation, "ignored"));
        NullSink.report(Diagnostic::new(Severity::Error, FailureKind::Unusable, "ignored"));
    }
}

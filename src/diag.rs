//! Diagnostics reporting.
//!
//! A sink is injected per formatter instance; there is no process-wide
//! logger. Formatting itself never fails, so everything the formatter has to
//! say about degraded output goes through here.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Debug => "debug",
            Severity::Warn => "warn",
            Severity::Error => "error",
        })
    }
}

pub trait DiagnosticSink {
    fn emit(&self, severity: Severity, message: fmt::Arguments<'_>);
}

/// Discards every diagnostic.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _severity: Severity, _message: fmt::Arguments<'_>) {}
}

/// Prints diagnostics at or above a severity threshold to stderr.
#[derive(Clone, Copy, Debug)]
pub struct StderrSink {
    min_severity: Severity,
}

impl StderrSink {
    pub fn new(min_severity: Severity) -> Self {
        Self { min_severity }
    }
}

impl Default for StderrSink {
    fn default() -> Self {
        Self::new(Severity::Warn)
    }
}

impl DiagnosticSink for StderrSink {
    fn emit(&self, severity: Severity, message: fmt::Arguments<'_>) {
        if severity >= self.min_severity {
            eprintln!("[{severity}] {message}");
        }
    }
}

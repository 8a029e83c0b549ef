//! Severity-tagged diagnostic records shared by the macro processor and
//! symbol table (the two phases of the pipeline that accumulate rather than
//! fail fast — see spec.md §7).

use std::fmt;

use crate::source_location::SourceLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        };
        write!(f, "{}", s)
    }
}

/// A single diagnostic record. `code` is a short machine-stable identifier
/// (e.g. `"undefined-macro"`); `message` is the human-readable text that
/// appears in `description`.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub message: String,
    pub location: SourceLocation,
    pub symbol_name: Option<String>,
    pub related_location: Option<SourceLocation>,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        code: impl Into<String>,
        message: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Diagnostic {
            severity,
            code: code.into(),
            message: message.into(),
            location,
            symbol_name: None,
            related_location: None,
        }
    }

    pub fn with_symbol(mut self, name: impl Into<String>) -> Self {
        self.symbol_name = Some(name.into());
        self
    }

    pub fn with_related(mut self, related: SourceLocation) -> Self {
        self.related_location = Some(related);
        self
    }

    /// The stable, testable `file:line:column: severity: message` form
    /// required by spec.md §3/§6.
    pub fn description(&self) -> String {
        format!("{}: {}: {}", self.location, self.severity, self.message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

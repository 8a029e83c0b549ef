//! Source location attribution shared by every diagnostic, token, expression
//! node, and symbol in the toolchain.

use std::fmt;

/// A position in a source file. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        SourceLocation {
            file: file.into(),
            line,
            column,
        }
    }

    /// Sentinel location for synthesized nodes that have no source text of
    /// their own (e.g. a FORM expansion's fallback output).
    pub fn unknown() -> Self {
        SourceLocation {
            file: String::from("<unknown>"),
            line: 0,
            column: 0,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.file == "<unknown>"
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

//! Scoped symbol table: a stack of per-scope maps, forward-reference
//! resolution, and end-of-compilation validation. Modeled on
//! `grue_compiler::semantic`'s scope-stack approach to name resolution,
//! generalized to track reference sites instead of failing at first use
//! so a single pass can report every problem it finds.

use std::collections::HashMap;

use log::debug;

use crate::diagnostic::{Diagnostic, Severity};
use crate::source_location::SourceLocation;

/// Symbol-table diagnostics share `Diagnostic`'s shape exactly
/// (location, severity, message) rather than warranting a separate
/// struct.
pub type SymbolDiagnostic = Diagnostic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolType {
    Routine,
    Object,
    Global,
    Constant,
    Property,
    LocalVariable,
    Macro,
    Flag,
    Direction,
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub symbol_type: SymbolType,
    pub defined_at: SourceLocation,
    pub references: Vec<SourceLocation>,
    /// The scope stack's depth at definition time, minus one — 0 for the
    /// global scope, 1 for the first pushed scope, and so on.
    pub scope_level: usize,
}

impl Symbol {
    fn new(name: impl Into<String>, symbol_type: SymbolType, defined_at: SourceLocation, scope_level: usize) -> Self {
        Symbol {
            name: name.into(),
            symbol_type,
            defined_at,
            references: Vec::new(),
            scope_level,
        }
    }
}

type Scope = HashMap<String, Symbol>;

pub struct SymbolTableManager {
    scopes: Vec<Scope>,
    history: Vec<Scope>,
    undefined_references: HashMap<String, Vec<SourceLocation>>,
    diagnostics: Vec<Diagnostic>,
}

impl Default for SymbolTableManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTableManager {
    pub fn new() -> Self {
        SymbolTableManager {
            scopes: vec![Scope::new()],
            history: Vec::new(),
            undefined_references: HashMap::new(),
            diagnostics: Vec::new(),
        }
    }

    fn current_scope_index(&self) -> usize {
        self.scopes.len() - 1
    }

    /// Defines `name` in the current (innermost) scope. Fails only when
    /// the name already exists in that scope — shadowing an outer scope
    /// is allowed. On success, any pending undefined references to
    /// `name` are moved onto the new symbol (forward-reference
    /// resolution) and removed from the undefined map.
    pub fn define_symbol(&mut self, name: impl Into<String>, symbol_type: SymbolType, at: SourceLocation) -> bool {
        let name = name.into();
        let current = self.current_scope_index();
        if self.scopes[current].contains_key(&name) {
            let original = self.scopes[current][&name].defined_at.clone();
            self.diagnostics.push(
                Diagnostic::new(
                    Severity::Error,
                    "symbol-redefinition",
                    format!("'{}' is already defined at {}", name, original),
                    at.clone(),
                )
                .with_symbol(name.clone())
                .with_related(original),
            );
            return false;
        }

        let mut symbol = Symbol::new(name.clone(), symbol_type, at, current);
        if let Some(pending) = self.undefined_references.remove(&name) {
            debug!("resolving {} forward reference(s) to '{}'", pending.len(), name);
            symbol.references.extend(pending);
        }
        self.scopes[current].insert(name, symbol);
        true
    }

    /// Looks up `name` from the innermost scope outward without
    /// recording a reference.
    pub fn lookup_symbol(&self, name: &str) -> Option<&Symbol> {
        for scope in self.scopes.iter().rev() {
            if let Some(symbol) = scope.get(name) {
                return Some(symbol);
            }
        }
        None
    }

    /// Same search as `lookup_symbol`, but also records `at` as a use
    /// site. If `name` is not yet defined anywhere, `at` is appended to
    /// the undefined-references map instead, pending a later
    /// `define_symbol` call or a `validate()` diagnostic.
    pub fn reference_symbol(&mut self, name: &str, at: SourceLocation) -> Option<&Symbol> {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(symbol) = scope.get_mut(name) {
                symbol.references.push(at);
                return Some(symbol);
            }
        }
        self.undefined_references
            .entry(name.to_string())
            .or_default()
            .push(at);
        None
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    /// Pops the innermost scope into history, where it remains visible
    /// to `validate()` but not to `lookup_symbol`/`get_all_symbols`.
    /// Popping scope 0 is forbidden; the global scope remains current
    /// and a diagnostic is recorded.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() <= 1 {
            self.diagnostics.push(Diagnostic::new(
                Severity::Error,
                "cannot-pop-global-scope",
                "cannot pop the global scope".to_string(),
                SourceLocation::unknown(),
            ));
            return;
        }
        let scope = self.scopes.pop().expect("checked len above");
        self.history.push(scope);
    }

    pub fn get_current_scope(&self) -> usize {
        self.current_scope_index()
    }

    pub fn get_symbols_in_scope(&self, level: usize) -> Vec<&Symbol> {
        self.scopes.get(level).map(|s| s.values().collect()).unwrap_or_default()
    }

    /// All symbols across the currently active scope stack — history is
    /// excluded, matching `lookup_symbol`'s visibility.
    pub fn get_all_symbols(&self) -> Vec<&Symbol> {
        self.scopes.iter().flat_map(|s| s.values()).collect()
    }

    pub fn get_undefined_references(&self) -> &HashMap<String, Vec<SourceLocation>> {
        &self.undefined_references
    }

    /// Emits `unused-symbol` for every symbol (active or historical)
    /// with no references, and `undefined-symbol` for every name still
    /// outstanding in the undefined-references map. Returns the
    /// diagnostics raised by this call (not the full accumulated list).
    pub fn validate(&mut self) -> Vec<Diagnostic> {
        let mut raised = Vec::new();

        for scope in self.scopes.iter().chain(self.history.iter()) {
            for symbol in scope.values() {
                if symbol.references.is_empty() {
                    raised.push(
                        Diagnostic::new(
                            Severity::Warning,
                            "unused-symbol",
                            format!("'{}' is never referenced", symbol.name),
                            symbol.defined_at.clone(),
                        )
                        .with_symbol(symbol.name.clone()),
                    );
                }
            }
        }

        let mut names: Vec<&String> = self.undefined_references.keys().collect();
        names.sort();
        for name in names {
            let locations = &self.undefined_references[name];
            let at = locations.first().cloned().unwrap_or_else(SourceLocation::unknown);
            raised.push(
                Diagnostic::new(
                    Severity::Error,
                    "undefined-symbol",
                    format!("undefined symbol '{}'", name),
                    at,
                )
                .with_symbol(name.clone()),
            );
        }

        self.diagnostics.extend(raised.clone());
        raised
    }

    pub fn get_diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

#[cfg(test)]
#[path = "symbol_table_tests.rs"]
mod tests;

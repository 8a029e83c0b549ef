//! The macro expander: substitutes arguments into a registered macro's
//! body and walks an expression tree expanding every application it
//! finds. Modeled on `grue_compiler::ir`'s tree-walking recursion style,
//! generalized to ZIL's non-hygienic, FORM-based macro semantics rather
//! than Grue's statically typed IR lowering.

use std::collections::HashMap;

use log::debug;

use crate::ast::ZilExpression;
use crate::diagnostic::{Diagnostic, Severity};
use crate::source_location::SourceLocation;

/// Macro diagnostics share `Diagnostic`'s shape exactly (location,
/// severity, message) rather than warranting a separate struct.
pub type MacroDiagnostic = Diagnostic;

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Parameter { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Macro {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub body: ZilExpression,
    pub defined_at: SourceLocation,
}

#[derive(Debug, Clone)]
pub struct MacroExpansionTraceEntry {
    pub macro_name: String,
    pub arguments: Vec<ZilExpression>,
    pub location: SourceLocation,
}

pub enum ExpandMacroResult {
    Success(ZilExpression),
    Error(Diagnostic),
}

/// Registry plus expander. `expand_stack` tracks macros currently being
/// expanded so `expand_expression` can detect direct and indirect
/// recursion without a separate graph pass.
pub struct MacroProcessor {
    macros: HashMap<String, Macro>,
    diagnostics: Vec<Diagnostic>,
    expand_stack: Vec<String>,
    debug_tracing: bool,
    trace: Vec<MacroExpansionTraceEntry>,
}

impl Default for MacroProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl MacroProcessor {
    pub fn new() -> Self {
        MacroProcessor {
            macros: HashMap::new(),
            diagnostics: Vec::new(),
            expand_stack: Vec::new(),
            debug_tracing: false,
            trace: Vec::new(),
        }
    }

    /// Registers a macro. Redefinition is rejected: the initial registry
    /// is empty and there are no built-ins to override, so a collision
    /// always means the source defined the same name twice.
    pub fn define_macro(
        &mut self,
        name: impl Into<String>,
        parameters: Vec<Parameter>,
        body: ZilExpression,
        at: SourceLocation,
    ) -> bool {
        let name = name.into();
        if self.macros.contains_key(&name) {
            self.diagnostics.push(
                Diagnostic::new(
                    Severity::Error,
                    "macro-redefinition",
                    format!("macro '{}' is already defined", name),
                    at,
                )
                .with_symbol(name.clone()),
            );
            return false;
        }
        debug!("defining macro {} with {} parameter(s)", name, parameters.len());
        self.macros.insert(
            name.clone(),
            Macro {
                name,
                parameters,
                body,
                defined_at: at,
            },
        );
        true
    }

    pub fn get_macro(&self, name: &str) -> Option<&Macro> {
        self.macros.get(name)
    }

    pub fn get_all_macros(&self) -> Vec<&Macro> {
        self.macros.values().collect()
    }

    pub fn get_diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn clear_diagnostics(&mut self) {
        self.diagnostics.clear();
    }

    pub fn set_debug_tracing(&mut self, enabled: bool) {
        self.debug_tracing = enabled;
        if !enabled {
            self.trace.clear();
        }
    }

    pub fn get_expansion_trace(&self) -> &[MacroExpansionTraceEntry] {
        &self.trace
    }

    /// Expand one macro call. Cycles are resolved silently (see
    /// `expand_expression`'s doc comment); this entry point always either
    /// substitutes or reports a diagnostic.
    pub fn expand_macro(
        &mut self,
        name: &str,
        arguments: &[ZilExpression],
        at: &SourceLocation,
    ) -> ExpandMacroResult {
        let mac = match self.macros.get(name) {
            Some(m) => m.clone(),
            None => {
                let diag = Diagnostic::new(
                    Severity::Error,
                    "undefined-macro",
                    format!("undefined macro '{}'", name),
                    at.clone(),
                )
                .with_symbol(name.to_string());
                self.diagnostics.push(diag.clone());
                return ExpandMacroResult::Error(diag);
            }
        };

        if mac.parameters.len() != arguments.len() {
            let diag = Diagnostic::new(
                Severity::Error,
                "argument-count-mismatch",
                format!(
                    "macro '{}' expects {} argument(s), got {}",
                    name,
                    mac.parameters.len(),
                    arguments.len()
                ),
                at.clone(),
            )
            .with_symbol(name.to_string());
            self.diagnostics.push(diag.clone());
            return ExpandMacroResult::Error(diag);
        }

        if self.debug_tracing {
            self.trace.push(MacroExpansionTraceEntry {
                macro_name: name.to_string(),
                arguments: arguments.to_vec(),
                location: at.clone(),
            });
        }

        let mut bindings = HashMap::new();
        for (param, arg) in mac.parameters.iter().zip(arguments.iter()) {
            bindings.insert(param.name.clone(), arg.clone());
        }

        let substituted = self.substitute(&mac.body, &bindings);
        let result = self.strip_form(substituted);
        ExpandMacroResult::Success(result)
    }

    /// Replaces every `atom(NAME)` or `localVariable(NAME)` whose name is
    /// a bound parameter with the bound argument expression, verbatim.
    /// No renaming: a `.TEMP` the macro body introduces that does not
    /// name a parameter passes through untouched.
    fn substitute(&self, expr: &ZilExpression, bindings: &HashMap<String, ZilExpression>) -> ZilExpression {
        match expr {
            ZilExpression::Atom(name, _) | ZilExpression::LocalVariable(name, _) => {
                bindings.get(name).cloned().unwrap_or_else(|| expr.clone())
            }
            ZilExpression::List(items, loc) => {
                let substituted = items.iter().map(|item| self.substitute(item, bindings)).collect();
                ZilExpression::List(substituted, loc.clone())
            }
            other => other.clone(),
        }
    }

    /// After substitution, a body shaped `[FORM, head, arg1, ..]` is
    /// unwrapped into a plain application `[head, arg1, ..]`. A malformed
    /// FORM (fewer than 2 elements) is left as-is.
    fn strip_form(&self, expr: ZilExpression) -> ZilExpression {
        match &expr {
            ZilExpression::List(items, loc) if items.first().and_then(|e| e.as_atom_name()) == Some("FORM") => {
                if items.len() >= 2 {
                    ZilExpression::List(items[1..].to_vec(), loc.clone())
                } else {
                    expr
                }
            }
            _ => expr,
        }
    }

    /// Walks `expr` expanding every list whose head names a macro,
    /// recursing into the result (and into unexpanded children) so
    /// nested macro calls are fully expanded.
    ///
    /// Cycle handling: before expanding macro `M` its name is pushed
    /// onto `expand_stack`. If `M` is already on the stack the call is
    /// left unexpanded and no diagnostic is raised — expansion is
    /// idempotent on cycles so later phases still see the original
    /// form.
    pub fn expand_expression(&mut self, expr: &ZilExpression) -> ZilExpression {
        let items = match expr {
            ZilExpression::List(items, loc) => (items.clone(), loc.clone()),
            other => return other.clone(),
        };
        let (items, loc) = items;

        if let Some(head) = items.first().and_then(|e| e.as_atom_name()) {
            if self.macros.contains_key(head) {
                if self.expand_stack.iter().any(|m| m == head) {
                    return ZilExpression::List(items, loc);
                }
                let head_name = head.to_string();
                let arguments = items[1..].to_vec();
                let at = items.first().map(|e| e.location().clone()).unwrap_or(loc.clone());

                self.expand_stack.push(head_name.clone());
                let expanded = match self.expand_macro(&head_name, &arguments, &at) {
                    ExpandMacroResult::Success(e) => e,
                    ExpandMacroResult::Error(_) => ZilExpression::List(items, loc),
                };
                self.expand_stack.pop();

                return self.expand_expression(&expanded);
            }
        }

        let expanded_items = items.iter().map(|item| self.expand_expression(item)).collect();
        ZilExpression::List(expanded_items, loc)
    }
}

#[cfg(test)]
#[path = "macros_tests.rs"]
mod tests;

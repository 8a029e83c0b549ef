//! The `parse → macro-expand → symbol-resolve → assemble → emit`
//! pipeline coordinator. A thin sequencer over the four independent
//! subsystems — it does not reimplement any of their logic, just runs
//! them in the fixed order spec.md §5 mandates and aggregates their
//! diagnostics. Modeled on the teacher's `lib.rs::compile` entry point,
//! which performs the same "own one of each phase, run them in order,
//! bail on the first fatal problem" sequencing for a single z-code
//! program.

use std::fmt;

use indexmap::IndexMap;
use log::{debug, info};

use crate::ast::{Declaration, ZilExpression};
use crate::config::CompilerConfig;
use crate::diagnostic::{Diagnostic, Severity};
use crate::macros::MacroProcessor;
use crate::memory_layout::{LayoutError, MemoryLayoutManager};
use crate::parser::ParseError;
use crate::parser::Parser;
use crate::symbol_table::{SymbolTableManager, SymbolType};

#[derive(Debug, Clone)]
pub enum CompileFailure {
    Parse(ParseError),
    Diagnostics(Vec<Diagnostic>),
    Layout(LayoutError),
}

impl fmt::Display for CompileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileFailure::Parse(e) => write!(f, "{}", e),
            CompileFailure::Diagnostics(diags) => {
                for (i, d) in diags.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", d.description())?;
                }
                Ok(())
            }
            CompileFailure::Layout(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CompileFailure {}

/// Owns one instance each of the four core subsystems and runs a
/// single source unit through all of them. Property values on `OBJECT`
/// declarations are ZIL expressions of arbitrary shape; this driver
/// encodes the literal forms spec.md's instruction/memory-layout
/// sections actually define (numbers, and references to already-known
/// globals/objects) and leaves anything else unencoded rather than
/// guessing at a general expression evaluator spec.md does not
/// describe.
pub struct CompilationSession {
    config: CompilerConfig,
    macros: MacroProcessor,
    symbols: SymbolTableManager,
    layout: MemoryLayoutManager,
    property_numbers: IndexMap<String, u8>,
}

impl CompilationSession {
    pub fn new(config: CompilerConfig) -> Self {
        let mut layout = MemoryLayoutManager::new(config.target_version());
        layout.set_debug_tracing(config.debug_tracing);
        let mut macros = MacroProcessor::new();
        macros.set_debug_tracing(config.debug_tracing);
        CompilationSession {
            macros,
            symbols: SymbolTableManager::new(),
            layout,
            property_numbers: IndexMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Runs `source` through parse, macro-expand, symbol-resolve,
    /// allocate, and emit, in that order. Returns the assembled story
    /// file or the first failure: a parse error (fatal, stops
    /// immediately), accumulated diagnostics (if any reached error
    /// severity, or warning severity under `warnings_as_errors`), or a
    /// layout error from assembly.
    pub fn compile(&mut self, file: &str, source: &str) -> Result<Vec<u8>, CompileFailure> {
        info!("compiling '{}'", file);
        let declarations = Parser::parse_source(file, source).map_err(CompileFailure::Parse)?;

        for decl in &declarations {
            self.register_symbol(decl);
        }

        let expanded: Vec<Declaration> = declarations.into_iter().map(|d| self.expand_declaration(d)).collect();

        for decl in &expanded {
            self.resolve_references(decl);
        }

        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        diagnostics.extend(self.macros.get_diagnostics().iter().cloned());
        diagnostics.extend(self.symbols.get_diagnostics().iter().cloned());
        diagnostics.extend(self.symbols.validate());

        let treat_as_error = |d: &Diagnostic| {
            matches!(d.severity, Severity::Error | Severity::Fatal)
                || (self.config.warnings_as_errors && d.severity == Severity::Warning)
        };
        if diagnostics.iter().any(treat_as_error) {
            return Err(CompileFailure::Diagnostics(diagnostics));
        }

        for decl in &expanded {
            if let Declaration::Global(g) = decl {
                self.layout.allocate_global(&g.name).map_err(CompileFailure::Layout)?;
            }
        }
        self.allocate_properties(&expanded).map_err(CompileFailure::Layout)?;

        let bytes = self.layout.generate_story_file().map_err(CompileFailure::Layout)?;
        debug!("assembled {} bytes for '{}'", bytes.len(), file);
        Ok(bytes)
    }

    fn register_symbol(&mut self, decl: &Declaration) {
        match decl {
            Declaration::Routine(r) => {
                self.symbols.define_symbol(r.name.clone(), SymbolType::Routine, r.location.clone());
            }
            Declaration::Object(o) => {
                self.symbols.define_symbol(o.name.clone(), SymbolType::Object, o.location.clone());
            }
            Declaration::Global(g) => {
                self.symbols.define_symbol(g.name.clone(), SymbolType::Global, g.location.clone());
            }
            Declaration::Constant(c) => {
                self.symbols.define_symbol(c.name.clone(), SymbolType::Constant, c.location.clone());
            }
            Declaration::Property(p) => {
                self.symbols.define_symbol(p.name.clone(), SymbolType::Property, p.location.clone());
                self.property_number(&p.name);
            }
            Declaration::Version(_) | Declaration::Include(..) | Declaration::InsertFile(..) | Declaration::Expression(_) => {}
        }
    }

    fn expand_declaration(&mut self, decl: Declaration) -> Declaration {
        match decl {
            Declaration::Routine(mut r) => {
                r.body = r.body.iter().map(|e| self.macros.expand_expression(e)).collect();
                Declaration::Routine(r)
            }
            Declaration::Object(mut o) => {
                o.properties = o.properties.iter().map(|e| self.macros.expand_expression(e)).collect();
                Declaration::Object(o)
            }
            Declaration::Global(mut g) => {
                g.initial_value = self.macros.expand_expression(&g.initial_value);
                Declaration::Global(g)
            }
            Declaration::Constant(mut c) => {
                c.value = self.macros.expand_expression(&c.value);
                Declaration::Constant(c)
            }
            Declaration::Expression(e) => Declaration::Expression(self.macros.expand_expression(&e)),
            other => other,
        }
    }

    fn resolve_references(&mut self, decl: &Declaration) {
        match decl {
            Declaration::Routine(r) => {
                for expr in &r.body {
                    self.walk_references(expr);
                }
            }
            Declaration::Object(o) => {
                for expr in &o.properties {
                    self.walk_property_value(expr);
                }
            }
            Declaration::Global(g) => self.walk_references(&g.initial_value),
            Declaration::Constant(c) => self.walk_references(&c.value),
            Declaration::Expression(e) => self.walk_references(e),
            Declaration::Property(_) | Declaration::Version(_) | Declaration::Include(..) | Declaration::InsertFile(..) => {}
        }
    }

    /// Records a reference for every `,GLOBAL`-sigil use and, for a
    /// list's head atom, only when that atom already names a defined
    /// routine or object. ZIL special forms (`SET`, `COND`, ...),
    /// instruction mnemonics, and anything else not already in the
    /// symbol table are left unresolved rather than flagged — this pass
    /// cannot tell a special form from a forward reference to a routine
    /// this source unit never defines, and misclassifying the former as
    /// the latter would reject ordinary programs.
    fn walk_references(&mut self, expr: &ZilExpression) {
        match expr {
            ZilExpression::GlobalVariable(name, loc) => {
                self.symbols.reference_symbol(name, loc.clone());
            }
            ZilExpression::List(items, _) => {
                if let Some(head) = items.first() {
                    if let Some(name) = head.as_atom_name() {
                        if self.names_a_routine_or_object(name) {
                            self.symbols.reference_symbol(name, head.location().clone());
                        }
                    }
                }
                for item in items {
                    self.walk_references(item);
                }
            }
            _ => {}
        }
    }

    /// Walks an object property's value. The head of the property
    /// expression itself (`DESC` in `(DESC "...")`) is never treated as
    /// a reference: it names the property being set, which is declared
    /// via `PROPDEF`, not referenced by use — `PROPDEF` declarations are
    /// registered directly in `register_symbol`. Everything nested under
    /// the head is walked the same way `walk_references` walks any other
    /// expression.
    fn walk_property_value(&mut self, expr: &ZilExpression) {
        match expr {
            ZilExpression::GlobalVariable(name, loc) => {
                self.symbols.reference_symbol(name, loc.clone());
            }
            ZilExpression::List(items, _) => {
                for item in items {
                    self.walk_references(item);
                }
            }
            _ => {}
        }
    }

    fn names_a_routine_or_object(&self, name: &str) -> bool {
        matches!(
            self.symbols.lookup_symbol(name).map(|s| s.symbol_type),
            Some(SymbolType::Routine) | Some(SymbolType::Object)
        )
    }

    fn property_number(&mut self, name: &str) -> u8 {
        if let Some(number) = self.property_numbers.get(name) {
            return *number;
        }
        let number = (self.property_numbers.len() + 1) as u8;
        self.property_numbers.insert(name.to_string(), number);
        number
    }

    /// Encodes the literal, already-resolvable operands of a property
    /// value: number literals as their smallest big-endian form, and
    /// atoms/global references naming an already-allocated global or
    /// object as that address. Anything else contributes nothing.
    fn encode_property_operand(&self, expr: &ZilExpression, object_addresses: &IndexMap<String, u16>) -> Vec<u8> {
        match expr {
            ZilExpression::Number(n, _) => {
                let raw = *n as u16;
                if raw <= 0xFF {
                    vec![raw as u8]
                } else {
                    vec![(raw >> 8) as u8, (raw & 0xFF) as u8]
                }
            }
            ZilExpression::Atom(name, _) | ZilExpression::GlobalVariable(name, _) => {
                if let Some(addr) = object_addresses.get(name) {
                    vec![(*addr >> 8) as u8, (*addr & 0xFF) as u8]
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }

    /// Second allocation pass: object property bodies can reference
    /// other objects' addresses, so every object must already have a
    /// slot before any property is encoded.
    fn allocate_properties(&mut self, expanded: &[Declaration]) -> Result<(), LayoutError> {
        let mut object_addresses = IndexMap::new();
        for decl in expanded {
            if let Declaration::Object(o) = decl {
                let addr = self.layout.allocate_object(&o.name)?;
                object_addresses.insert(o.name.clone(), addr);
            }
        }
        for decl in expanded {
            let Declaration::Object(o) = decl else { continue };
            self.layout.start_object(&o.name)?;
            for property in &o.properties {
                let Some(items) = property.as_list() else { continue };
                let Some(name) = items.first().and_then(|e| e.as_atom_name()) else { continue };
                let number = self.property_number(name);
                let mut data = Vec::new();
                for operand in &items[1..] {
                    data.extend(self.encode_property_operand(operand, &object_addresses));
                }
                if !data.is_empty() {
                    self.layout.add_property(number, data)?;
                }
            }
            self.layout.end_object()?;
        }
        Ok(())
    }
}

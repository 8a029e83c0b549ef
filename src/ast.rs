//! The tagged expression tree produced by the parser, generalized from
//! `grue_compiler::ast`'s `Item`/`Program` split to ZIL's S-expression
//! shape: every node is either an atomic token or a list, and every node
//! carries the `SourceLocation` it was parsed from.

use crate::source_location::SourceLocation;

#[derive(Debug, Clone, PartialEq)]
pub enum ZilExpression {
    Atom(String, SourceLocation),
    Number(i16, SourceLocation),
    Str(String, SourceLocation),
    LocalVariable(String, SourceLocation),
    GlobalVariable(String, SourceLocation),
    PropertyReference(String, SourceLocation),
    FlagReference(String, SourceLocation),
    List(Vec<ZilExpression>, SourceLocation),
}

impl ZilExpression {
    pub fn location(&self) -> &SourceLocation {
        match self {
            ZilExpression::Atom(_, loc)
            | ZilExpression::Number(_, loc)
            | ZilExpression::Str(_, loc)
            | ZilExpression::LocalVariable(_, loc)
            | ZilExpression::GlobalVariable(_, loc)
            | ZilExpression::PropertyReference(_, loc)
            | ZilExpression::FlagReference(_, loc)
            | ZilExpression::List(_, loc) => loc,
        }
    }

    pub fn as_list(&self) -> Option<&[ZilExpression]> {
        match self {
            ZilExpression::List(items, _) => Some(items),
            _ => None,
        }
    }

    pub fn as_atom_name(&self) -> Option<&str> {
        match self {
            ZilExpression::Atom(name, _) => Some(name),
            _ => None,
        }
    }

    /// The head atom of a list expression, e.g. `FOO` in `<FOO A B>`.
    pub fn list_head(&self) -> Option<&str> {
        self.as_list()
            .and_then(|items| items.first())
            .and_then(|first| first.as_atom_name())
    }
}

/// A routine's parameter list: required, `OPT` (a.k.a. `OPTIONAL`), and
/// `AUX`/`AUXILIARY` sections.
#[derive(Debug, Clone, PartialEq)]
pub struct Routine {
    pub name: String,
    pub parameters: Vec<String>,
    pub optionals: Vec<String>,
    pub auxiliaries: Vec<String>,
    pub body: Vec<ZilExpression>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub name: String,
    pub properties: Vec<ZilExpression>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Global {
    pub name: String,
    pub initial_value: ZilExpression,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub name: String,
    pub value: ZilExpression,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    pub name: String,
    pub default_pattern: Vec<ZilExpression>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VersionDecl {
    pub version_name: String,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Routine(Routine),
    Object(Object),
    Global(Global),
    Constant(Constant),
    Property(PropertyDef),
    Version(VersionDecl),
    Include(String, SourceLocation),
    InsertFile(String, SourceLocation),
    /// Any other top-level `<HEAD ...>` form the parser does not recognize
    /// as a declaration keyword — preserved verbatim for the macro
    /// processor and later phases to interpret.
    Expression(ZilExpression),
}

impl Declaration {
    pub fn location(&self) -> &SourceLocation {
        match self {
            Declaration::Routine(r) => &r.location,
            Declaration::Object(o) => &o.location,
            Declaration::Global(g) => &g.location,
            Declaration::Constant(c) => &c.location,
            Declaration::Property(p) => &p.location,
            Declaration::Version(v) => &v.location,
            Declaration::Include(_, loc) | Declaration::InsertFile(_, loc) => loc,
            Declaration::Expression(e) => e.location(),
        }
    }
}

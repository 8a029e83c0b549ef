//! Recursive-descent parser: tokens to top-level declarations.
//!
//! Structured like `grue_compiler::parser` — a `Parser` over a token
//! vector with `peek`/`check`/`advance`/`consume` helpers — generalized
//! from Grue's brace-delimited items to ZIL's `<HEAD ...>` list dispatch.

use std::fmt;

use crate::ast::{Constant, Declaration, Global, Object, PropertyDef, Routine, VersionDecl, ZilExpression};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::source_location::SourceLocation;

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    UnexpectedToken(String, String, SourceLocation), // expected, found
    UnexpectedEndOfFile(SourceLocation),
    InvalidSyntax(String, SourceLocation),
    UndefinedSymbol(String, SourceLocation),
    DuplicateDefinition(String, SourceLocation, SourceLocation), // name, original, redefinition
    TypeError(String, SourceLocation),
    ExpectedAtom(SourceLocation),
    ExpectedRoutineName(SourceLocation),
    ExpectedObjectName(SourceLocation),
    ExpectedGlobalName(SourceLocation),
    ExpectedPropertyName(SourceLocation),
    ExpectedConstantName(SourceLocation),
    ExpectedFilename(SourceLocation),
    ExpectedVersionType(SourceLocation),
    ExpectedParameterName(SourceLocation),
    ExpectedObjectProperty(SourceLocation),
    InvalidParameterSection(String, SourceLocation),
    UnknownDeclaration(String, SourceLocation),
}

impl ParseError {
    pub fn location(&self) -> &SourceLocation {
        match self {
            ParseError::UnexpectedToken(_, _, loc) => loc,
            ParseError::UnexpectedEndOfFile(loc) => loc,
            ParseError::InvalidSyntax(_, loc) => loc,
            ParseError::UndefinedSymbol(_, loc) => loc,
            ParseError::DuplicateDefinition(_, _, redefinition) => redefinition,
            ParseError::TypeError(_, loc) => loc,
            ParseError::ExpectedAtom(loc)
            | ParseError::ExpectedRoutineName(loc)
            | ParseError::ExpectedObjectName(loc)
            | ParseError::ExpectedGlobalName(loc)
            | ParseError::ExpectedPropertyName(loc)
            | ParseError::ExpectedConstantName(loc)
            | ParseError::ExpectedFilename(loc)
            | ParseError::ExpectedVersionType(loc)
            | ParseError::ExpectedParameterName(loc)
            | ParseError::ExpectedObjectProperty(loc) => loc,
            ParseError::InvalidParameterSection(_, loc) => loc,
            ParseError::UnknownDeclaration(_, loc) => loc,
        }
    }

    fn message(&self) -> String {
        match self {
            ParseError::UnexpectedToken(expected, found, _) => {
                format!("expected {} but found {}", expected, found)
            }
            ParseError::UnexpectedEndOfFile(_) => "unexpected end of file".to_string(),
            ParseError::InvalidSyntax(msg, _) => msg.clone(),
            ParseError::UndefinedSymbol(name, _) => format!("undefined symbol '{}'", name),
            ParseError::DuplicateDefinition(name, original, _) => {
                format!("duplicate definition of '{}', first defined at {}", name, original)
            }
            ParseError::TypeError(msg, _) => msg.clone(),
            ParseError::ExpectedAtom(_) => "expected an atom".to_string(),
            ParseError::ExpectedRoutineName(_) => "expected a routine name".to_string(),
            ParseError::ExpectedObjectName(_) => "expected an object name".to_string(),
            ParseError::ExpectedGlobalName(_) => "expected a global name".to_string(),
            ParseError::ExpectedPropertyName(_) => "expected a property name".to_string(),
            ParseError::ExpectedConstantName(_) => "expected a constant name".to_string(),
            ParseError::ExpectedFilename(_) => "expected a filename string".to_string(),
            ParseError::ExpectedVersionType(_) => "expected a version type".to_string(),
            ParseError::ExpectedParameterName(_) => "expected a parameter name".to_string(),
            ParseError::ExpectedObjectProperty(_) => "expected an object property".to_string(),
            ParseError::InvalidParameterSection(name, _) => {
                format!("invalid parameter section keyword '{}'", name)
            }
            ParseError::UnknownDeclaration(name, _) => format!("unknown declaration '{}'", name),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: error: {}", self.location(), self.message())
    }
}

impl std::error::Error for ParseError {}

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, current: 0 }
    }

    /// Convenience constructor: lex then parse in one call.
    pub fn parse_source(file: &str, source: &str) -> Result<Vec<Declaration>, ParseError> {
        let mut lexer = Lexer::new(file, source);
        let tokens = lexer.tokenize()?;
        let mut parser = Parser::new(tokens);
        parser.parse_program()
    }

    pub fn parse_program(&mut self) -> Result<Vec<Declaration>, ParseError> {
        let mut declarations = Vec::new();
        while !self.is_at_end() {
            declarations.push(self.parse_top_level_form()?);
        }
        Ok(declarations)
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.current].clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn check_left_angle(&self) -> bool {
        matches!(self.peek().kind, TokenKind::LeftAngle)
    }

    fn expect_left_angle(&mut self) -> Result<SourceLocation, ParseError> {
        let token = self.peek().clone();
        if matches!(token.kind, TokenKind::LeftAngle) {
            self.advance();
            Ok(token.location)
        } else {
            Err(ParseError::UnexpectedToken(
                "'<'".to_string(),
                format!("{:?}", token.kind),
                token.location,
            ))
        }
    }

    fn expect_right_angle(&mut self) -> Result<(), ParseError> {
        let token = self.peek().clone();
        if matches!(token.kind, TokenKind::RightAngle) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken(
                "'>'".to_string(),
                format!("{:?}", token.kind),
                token.location,
            ))
        }
    }

    fn expect_atom(&mut self) -> Result<(String, SourceLocation), ParseError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Atom(name) => {
                self.advance();
                Ok((name, token.location))
            }
            _ => Err(ParseError::ExpectedAtom(token.location)),
        }
    }

    fn expect_string(&mut self) -> Result<(String, SourceLocation), ParseError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Str(s) => {
                self.advance();
                Ok((s, token.location))
            }
            _ => Err(ParseError::ExpectedFilename(token.location)),
        }
    }

    /// Parse one top-level form: a `<HEAD ...>` list dispatched to a
    /// dedicated sub-parser when `HEAD` is a known declaration keyword,
    /// otherwise a raw expression wrapped as `Declaration::Expression`.
    fn parse_top_level_form(&mut self) -> Result<Declaration, ParseError> {
        if !self.check_left_angle() {
            // A bare expression (e.g. a top-level macro invocation) is still
            // a valid top-level form.
            let expr = self.parse_expression()?;
            return Ok(Declaration::Expression(expr));
        }

        let start = self.current;
        let open_loc = self.expect_left_angle()?;
        let head_token = self.peek().clone();
        let head_name = match &head_token.kind {
            TokenKind::Atom(name) => name.clone(),
            _ => {
                // Not headed by an atom at all; rewind and parse generically.
                self.current = start;
                let expr = self.parse_expression()?;
                return Ok(Declaration::Expression(expr));
            }
        };

        match head_name.as_str() {
            "ROUTINE" => {
                self.advance();
                self.parse_routine(open_loc)
            }
            "OBJECT" | "ROOM" => {
                self.advance();
                self.parse_object(open_loc)
            }
            "GLOBAL" => {
                self.advance();
                self.parse_global(open_loc)
            }
            "CONSTANT" => {
                self.advance();
                self.parse_constant(open_loc)
            }
            "VERSION" => {
                self.advance();
                self.parse_version(open_loc)
            }
            "INSERT-FILE" => {
                self.advance();
                self.parse_insert_file(open_loc)
            }
            "PROPDEF" => {
                self.advance();
                self.parse_propdef(open_loc)
            }
            _ => {
                // Not a declaration keyword: rewind and parse as a raw
                // top-level expression.
                self.current = start;
                let expr = self.parse_expression()?;
                Ok(Declaration::Expression(expr))
            }
        }
    }

    fn parse_routine(&mut self, loc: SourceLocation) -> Result<Declaration, ParseError> {
        let (name, _) = self.expect_atom().map_err(|e| match e {
            ParseError::ExpectedAtom(l) => ParseError::ExpectedRoutineName(l),
            other => other,
        })?;

        let (parameters, optionals, auxiliaries) = self.parse_parameter_list()?;

        let mut body = Vec::new();
        while !matches!(self.peek().kind, TokenKind::RightAngle) {
            if self.is_at_end() {
                return Err(ParseError::UnexpectedEndOfFile(self.peek().location.clone()));
            }
            body.push(self.parse_expression()?);
        }
        self.expect_right_angle()?;

        Ok(Declaration::Routine(Routine {
            name,
            parameters,
            optionals,
            auxiliaries,
            body,
            location: loc,
        }))
    }

    /// `( required* "OPT" optional* "AUX" auxiliary* )` — synonyms
    /// `OPTIONAL`/`AUXILIARY` are accepted for the section markers.
    fn parse_parameter_list(&mut self) -> Result<(Vec<String>, Vec<String>, Vec<String>), ParseError> {
        let token = self.peek().clone();
        if !matches!(token.kind, TokenKind::LeftParen) {
            return Err(ParseError::UnexpectedToken(
                "'('".to_string(),
                format!("{:?}", token.kind),
                token.location,
            ));
        }
        self.advance();

        let mut required = Vec::new();
        let mut optionals = Vec::new();
        let mut auxiliaries = Vec::new();

        #[derive(PartialEq, PartialOrd)]
        enum Section {
            Required,
            Optional,
            Auxiliary,
        }
        let mut section = Section::Required;

        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::RightParen => {
                    self.advance();
                    break;
                }
                TokenKind::Atom(name) => {
                    self.advance();
                    match name.as_str() {
                        "OPT" | "OPTIONAL" => {
                            if section >= Section::Optional {
                                return Err(ParseError::InvalidParameterSection(name, token.location));
                            }
                            section = Section::Optional;
                        }
                        "AUX" | "AUXILIARY" => {
                            if section >= Section::Auxiliary {
                                return Err(ParseError::InvalidParameterSection(name, token.location));
                            }
                            section = Section::Auxiliary;
                        }
                        _ => match section {
                            Section::Required => required.push(name),
                            Section::Optional => optionals.push(name),
                            Section::Auxiliary => auxiliaries.push(name),
                        },
                    }
                }
                _ => {
                    return Err(ParseError::ExpectedParameterName(token.location));
                }
            }
        }

        Ok((required, optionals, auxiliaries))
    }

    fn parse_object(&mut self, loc: SourceLocation) -> Result<Declaration, ParseError> {
        let (name, _) = self.expect_atom().map_err(|e| match e {
            ParseError::ExpectedAtom(l) => ParseError::ExpectedObjectName(l),
            other => other,
        })?;

        let mut properties = Vec::new();
        while !matches!(self.peek().kind, TokenKind::RightAngle) {
            if self.is_at_end() {
                return Err(ParseError::UnexpectedEndOfFile(self.peek().location.clone()));
            }
            if !matches!(self.peek().kind, TokenKind::LeftParen) {
                return Err(ParseError::ExpectedObjectProperty(self.peek().location.clone()));
            }
            properties.push(self.parse_expression()?);
        }
        self.expect_right_angle()?;

        Ok(Declaration::Object(Object {
            name,
            properties,
            location: loc,
        }))
    }

    fn parse_global(&mut self, loc: SourceLocation) -> Result<Declaration, ParseError> {
        let (name, _) = self.expect_atom().map_err(|e| match e {
            ParseError::ExpectedAtom(l) => ParseError::ExpectedGlobalName(l),
            other => other,
        })?;
        let initial_value = if matches!(self.peek().kind, TokenKind::RightAngle) {
            ZilExpression::Number(0, loc.clone())
        } else {
            self.parse_expression()?
        };
        self.expect_right_angle()?;
        Ok(Declaration::Global(Global {
            name,
            initial_value,
            location: loc,
        }))
    }

    fn parse_constant(&mut self, loc: SourceLocation) -> Result<Declaration, ParseError> {
        let (name, _) = self.expect_atom().map_err(|e| match e {
            ParseError::ExpectedAtom(l) => ParseError::ExpectedConstantName(l),
            other => other,
        })?;
        let value = self.parse_expression()?;
        self.expect_right_angle()?;
        Ok(Declaration::Constant(Constant {
            name,
            value,
            location: loc,
        }))
    }

    fn parse_version(&mut self, loc: SourceLocation) -> Result<Declaration, ParseError> {
        let token = self.peek().clone();
        let version_name = match token.kind {
            TokenKind::Atom(name) => {
                self.advance();
                name
            }
            _ => return Err(ParseError::ExpectedVersionType(token.location)),
        };
        self.expect_right_angle()?;
        Ok(Declaration::Version(VersionDecl {
            version_name,
            location: loc,
        }))
    }

    fn parse_insert_file(&mut self, loc: SourceLocation) -> Result<Declaration, ParseError> {
        let (name, _) = self.expect_string().or_else(|_| self.expect_atom())?;
        self.expect_right_angle()?;
        Ok(Declaration::InsertFile(name, loc))
    }

    fn parse_propdef(&mut self, loc: SourceLocation) -> Result<Declaration, ParseError> {
        let (name, _) = self.expect_atom().map_err(|e| match e {
            ParseError::ExpectedAtom(l) => ParseError::ExpectedPropertyName(l),
            other => other,
        })?;
        let mut default_pattern = Vec::new();
        while !matches!(self.peek().kind, TokenKind::RightAngle) {
            if self.is_at_end() {
                return Err(ParseError::UnexpectedEndOfFile(self.peek().location.clone()));
            }
            default_pattern.push(self.parse_expression()?);
        }
        self.expect_right_angle()?;
        Ok(Declaration::Property(PropertyDef {
            name,
            default_pattern,
            location: loc,
        }))
    }

    /// Parse a single token or a single bracketed expression (`<...>`,
    /// `(...)`, or `[...]`).
    pub fn parse_expression(&mut self) -> Result<ZilExpression, ParseError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::LeftAngle => self.parse_bracketed(TokenKind::RightAngle),
            TokenKind::LeftParen => self.parse_bracketed(TokenKind::RightParen),
            TokenKind::LeftBracket => self.parse_bracketed(TokenKind::RightBracket),
            TokenKind::RightAngle | TokenKind::RightParen | TokenKind::RightBracket => Err(
                ParseError::UnexpectedToken("an expression".to_string(), format!("{:?}", token.kind), token.location),
            ),
            TokenKind::Atom(name) => {
                self.advance();
                Ok(ZilExpression::Atom(name, token.location))
            }
            TokenKind::Number(n) => {
                self.advance();
                Ok(ZilExpression::Number(n, token.location))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(ZilExpression::Str(s, token.location))
            }
            TokenKind::LocalVarRef(name) => {
                self.advance();
                Ok(ZilExpression::LocalVariable(name, token.location))
            }
            TokenKind::GlobalVarRef(name) => {
                self.advance();
                Ok(ZilExpression::GlobalVariable(name, token.location))
            }
            TokenKind::PropertyRef(name) => {
                self.advance();
                Ok(ZilExpression::PropertyReference(name, token.location))
            }
            TokenKind::FlagRef(name) => {
                self.advance();
                Ok(ZilExpression::FlagReference(name, token.location))
            }
            TokenKind::Quote => {
                self.advance();
                self.parse_expression()
            }
            TokenKind::Eof => Err(ParseError::UnexpectedEndOfFile(token.location)),
        }
    }

    fn parse_bracketed(&mut self, closer: TokenKind) -> Result<ZilExpression, ParseError> {
        let open = self.advance();
        let mut elements = Vec::new();
        loop {
            if self.is_at_end() {
                return Err(ParseError::UnexpectedEndOfFile(self.peek().location.clone()));
            }
            if std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(&closer) {
                self.advance();
                break;
            }
            elements.push(self.parse_expression()?);
        }
        Ok(ZilExpression::List(elements, open.location))
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;

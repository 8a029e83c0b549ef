//! ZIL source lexer: character stream to token stream.
//!
//! Structured the way `grue_compiler::lexer` tokenizes Grue — a `Lexer`
//! holding the character vector plus a cursor, a `next_token` that matches
//! on the current character, and a `TokenKind` enum — generalized here to
//! ZIL's sigil-prefixed identifiers instead of Grue's keyword set.

use crate::parser::ParseError;
use crate::source_location::SourceLocation;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftAngle,
    RightAngle,
    Atom(String),
    Number(i16),
    Str(String),
    LocalVarRef(String),
    GlobalVarRef(String),
    PropertyRef(String),
    FlagRef(String),
    Quote,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: SourceLocation,
}

pub struct Lexer {
    file: String,
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(file: impl Into<String>, source: &str) -> Self {
        Lexer {
            file: file.into(),
            input: source.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn current(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if self.current() == Some('\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.position += 1;
    }

    fn loc(&self, line: usize, column: usize) -> SourceLocation {
        SourceLocation::new(self.file.clone(), line, column)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.current() {
                Some(ch) if ch.is_whitespace() => self.advance(),
                Some(';') => {
                    while let Some(ch) = self.current() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn is_identifier_char(ch: char) -> bool {
        ch.is_alphanumeric() || matches!(ch, '-' | '?' | '!' | '*')
    }

    fn read_identifier(&mut self) -> String {
        let mut s = String::new();
        while let Some(ch) = self.current() {
            if Self::is_identifier_char(ch) {
                s.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        s
    }

    fn read_number(&mut self, start_line: usize, start_col: usize) -> Result<Token, ParseError> {
        let mut s = String::new();
        if self.current() == Some('-') {
            s.push('-');
            self.advance();
        }
        while let Some(ch) = self.current() {
            if ch.is_ascii_digit() {
                s.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        let loc = self.loc(start_line, start_col);
        let value: i32 = s.parse().map_err(|_| {
            ParseError::InvalidSyntax(format!("malformed number literal '{}'", s), loc.clone())
        })?;
        if !(i16::MIN as i32..=i16::MAX as i32).contains(&value) {
            return Err(ParseError::InvalidSyntax(
                format!("number literal '{}' does not fit in 16 bits", s),
                loc.clone(),
            ));
        }
        Ok(Token {
            kind: TokenKind::Number(value as i16),
            location: loc,
        })
    }

    fn read_string(&mut self, start_line: usize, start_col: usize) -> Result<Token, ParseError> {
        // opening quote already consumed by caller
        let mut value = String::new();
        loop {
            match self.current() {
                None => {
                    return Err(ParseError::UnexpectedEndOfFile(
                        self.loc(start_line, start_col),
                    ))
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.current() {
                        Some('"') => {
                            value.push('"');
                            self.advance();
                        }
                        Some('\\') => {
                            value.push('\\');
                            self.advance();
                        }
                        Some('n') => {
                            value.push('\n');
                            self.advance();
                        }
                        Some('t') => {
                            value.push('\t');
                            self.advance();
                        }
                        Some(other) => {
                            value.push(other);
                            self.advance();
                        }
                        None => {
                            return Err(ParseError::UnexpectedEndOfFile(
                                self.loc(start_line, start_col),
                            ))
                        }
                    }
                }
                Some(ch) => {
                    value.push(ch);
                    self.advance();
                }
            }
        }
        Ok(Token {
            kind: TokenKind::Str(value),
            location: self.loc(start_line, start_col),
        })
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace_and_comments();

        let start_line = self.line;
        let start_col = self.column;
        let loc = self.loc(start_line, start_col);

        let ch = match self.current() {
            None => {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    location: loc,
                })
            }
            Some(ch) => ch,
        };

        match ch {
            '(' => {
                self.advance();
                Ok(Token {
                    kind: TokenKind::LeftParen,
                    location: loc,
                })
            }
            ')' => {
                self.advance();
                Ok(Token {
                    kind: TokenKind::RightParen,
                    location: loc,
                })
            }
            '[' => {
                self.advance();
                Ok(Token {
                    kind: TokenKind::LeftBracket,
                    location: loc,
                })
            }
            ']' => {
                self.advance();
                Ok(Token {
                    kind: TokenKind::RightBracket,
                    location: loc,
                })
            }
            '<' => {
                self.advance();
                Ok(Token {
                    kind: TokenKind::LeftAngle,
                    location: loc,
                })
            }
            '>' => {
                self.advance();
                Ok(Token {
                    kind: TokenKind::RightAngle,
                    location: loc,
                })
            }
            '\'' => {
                self.advance();
                Ok(Token {
                    kind: TokenKind::Quote,
                    location: loc,
                })
            }
            '"' => {
                self.advance();
                self.read_string(start_line, start_col)
            }
            ',' => {
                self.advance();
                let name = self.read_identifier();
                if name.is_empty() {
                    return Err(ParseError::InvalidSyntax(
                        "expected identifier after ','".to_string(),
                        loc,
                    ));
                }
                Ok(Token {
                    kind: TokenKind::GlobalVarRef(name),
                    location: loc,
                })
            }
            '.' => {
                self.advance();
                let name = self.read_identifier();
                if name.is_empty() {
                    return Err(ParseError::InvalidSyntax(
                        "expected identifier after '.'".to_string(),
                        loc,
                    ));
                }
                Ok(Token {
                    kind: TokenKind::LocalVarRef(name),
                    location: loc,
                })
            }
            'P' if self.peek_char(1) == Some('?') => {
                self.advance();
                self.advance();
                let name = self.read_identifier();
                if name.is_empty() {
                    return Err(ParseError::InvalidSyntax(
                        "expected identifier after 'P?'".to_string(),
                        loc,
                    ));
                }
                Ok(Token {
                    kind: TokenKind::PropertyRef(name),
                    location: loc,
                })
            }
            'F' if self.peek_char(1) == Some('?') => {
                self.advance();
                self.advance();
                let name = self.read_identifier();
                if name.is_empty() {
                    return Err(ParseError::InvalidSyntax(
                        "expected identifier after 'F?'".to_string(),
                        loc,
                    ));
                }
                Ok(Token {
                    kind: TokenKind::FlagRef(name),
                    location: loc,
                })
            }
            ch if ch.is_ascii_digit() => self.read_number(start_line, start_col),
            '-' if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number(start_line, start_col)
            }
            ch if Self::is_identifier_char(ch) => {
                let name = self.read_identifier();
                Ok(Token {
                    kind: TokenKind::Atom(name),
                    location: loc,
                })
            }
            other => Err(ParseError::InvalidSyntax(
                format!("unexpected character '{}'", other),
                loc,
            )),
        }
    }
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;

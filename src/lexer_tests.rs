use super::*;

fn kinds(src: &str) -> Vec<TokenKind> {
    let mut lexer = Lexer::new("test.zil", src);
    lexer
        .tokenize()
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn lexes_parens_and_atoms() {
    assert_eq!(
        kinds("<ROUTINE TEST ()>"),
        vec![
            TokenKind::LeftAngle,
            TokenKind::Atom("ROUTINE".into()),
            TokenKind::Atom("TEST".into()),
            TokenKind::LeftParen,
            TokenKind::RightParen,
            TokenKind::RightAngle,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lexes_global_variable_reference() {
    assert_eq!(
        kinds(",C-ENABLED?"),
        vec![TokenKind::GlobalVarRef("C-ENABLED?".into()), TokenKind::Eof]
    );
}

#[test]
fn lexes_local_variable_reference() {
    assert_eq!(
        kinds(".INT"),
        vec![TokenKind::LocalVarRef("INT".into()), TokenKind::Eof]
    );
}

#[test]
fn lexes_property_and_flag_references() {
    assert_eq!(
        kinds("P?STRENGTH F?INVISIBLE"),
        vec![
            TokenKind::PropertyRef("STRENGTH".into()),
            TokenKind::FlagRef("INVISIBLE".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lexes_signed_numbers() {
    assert_eq!(
        kinds("42 -7 0"),
        vec![
            TokenKind::Number(42),
            TokenKind::Number(-7),
            TokenKind::Number(0),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lexes_strings_with_escapes() {
    assert_eq!(
        kinds(r#""a\"b\\c\nd\te""#),
        vec![
            TokenKind::Str("a\"b\\c\nd\te".to_string()),
            TokenKind::Eof
        ]
    );
}

#[test]
fn skips_semicolon_comments_to_end_of_line() {
    assert_eq!(
        kinds("FOO ; this is a comment\nBAR"),
        vec![
            TokenKind::Atom("FOO".into()),
            TokenKind::Atom("BAR".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn distinguishes_bracket_kinds() {
    assert_eq!(
        kinds("([<"),
        vec![
            TokenKind::LeftParen,
            TokenKind::LeftBracket,
            TokenKind::LeftAngle,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tracks_line_and_column() {
    let mut lexer = Lexer::new("test.zil", "FOO\nBAR");
    let tokens = lexer.tokenize().unwrap();
    assert_eq!(tokens[0].location.line, 1);
    assert_eq!(tokens[0].location.column, 1);
    assert_eq!(tokens[1].location.line, 2);
    assert_eq!(tokens[1].location.column, 1);
}

#[test]
fn unterminated_string_is_an_error() {
    let mut lexer = Lexer::new("test.zil", "\"unterminated");
    assert!(lexer.tokenize().is_err());
}

#[test]
fn bare_ampersand_is_unexpected() {
    let mut lexer = Lexer::new("test.zil", "&");
    assert!(lexer.tokenize().is_err());
}

//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Integer, string and character literals with escape sequences
//! - Operators and punctuation
//! - Comments and positions
//! - Error tokens and recovery

use pretty_assertions::assert_eq;

use super::{
    lexer::{tokenize, Scanner},
    tokens::{Token, TokenKind},
};
use crate::Position;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).iter().map(|token| token.kind).collect()
}

fn pairs(source: &str) -> Vec<(TokenKind, String)> {
    tokenize(source)
        .into_iter()
        .map(|token| (token.kind, token.literal))
        .collect()
}

fn pair(kind: TokenKind, literal: &str) -> (TokenKind, String) {
    (kind, literal.to_string())
}

#[test]
fn test_tokenize_number() {
    assert_eq!(
        pairs("1337"),
        vec![pair(TokenKind::Integer, "1337"), pair(TokenKind::Eof, "")]
    );
}

#[test]
fn test_tokenize_declaration() {
    assert_eq!(
        pairs("a: int = 4"),
        vec![
            pair(TokenKind::Ident, "a"),
            pair(TokenKind::Colon, ":"),
            pair(TokenKind::Int, "int"),
            pair(TokenKind::Assign, "="),
            pair(TokenKind::Integer, "4"),
            pair(TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("-+/%==!=<<=>>="),
        vec![
            TokenKind::Sub,
            TokenKind::Add,
            TokenKind::Div,
            TokenKind::Rem,
            TokenKind::Eq,
            TokenKind::Neq,
            TokenKind::Lt,
            TokenKind::Le,
            TokenKind::Gt,
            TokenKind::Ge,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_tokenize_keywords() {
    assert_eq!(
        kinds("if else while return length use int bool true false _"),
        vec![
            TokenKind::If,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::Return,
            TokenKind::Length,
            TokenKind::Use,
            TokenKind::Int,
            TokenKind::Bool,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Underscore,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    assert_eq!(
        pairs("foo baz_123 _under x' iffy"),
        vec![
            pair(TokenKind::Ident, "foo"),
            pair(TokenKind::Ident, "baz_123"),
            pair(TokenKind::Ident, "_under"),
            pair(TokenKind::Ident, "x'"),
            pair(TokenKind::Ident, "iffy"),
            pair(TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_fixed_spellings_scan_back_to_their_kind() {
    let fixed = [
        TokenKind::If,
        TokenKind::Else,
        TokenKind::While,
        TokenKind::Return,
        TokenKind::Length,
        TokenKind::Use,
        TokenKind::Int,
        TokenKind::Bool,
        TokenKind::True,
        TokenKind::False,
        TokenKind::Underscore,
        TokenKind::Add,
        TokenKind::Sub,
        TokenKind::Mul,
        TokenKind::Div,
        TokenKind::Rem,
        TokenKind::Assign,
        TokenKind::Not,
        TokenKind::Eq,
        TokenKind::Neq,
        TokenKind::Lt,
        TokenKind::Le,
        TokenKind::Gt,
        TokenKind::Ge,
        TokenKind::And,
        TokenKind::Or,
        TokenKind::Lparen,
        TokenKind::Lbrack,
        TokenKind::Lbrace,
        TokenKind::Rparen,
        TokenKind::Rbrack,
        TokenKind::Rbrace,
        TokenKind::Comma,
        TokenKind::Colon,
        TokenKind::Semicolon,
    ];

    for kind in fixed {
        assert_eq!(kinds(kind.as_str()), vec![kind, TokenKind::Eof], "{}", kind);
    }
}

#[test]
fn test_tokenize_strings() {
    assert_eq!(
        pairs(r#"a: int[] = "Hello, world\n""#),
        vec![
            pair(TokenKind::Ident, "a"),
            pair(TokenKind::Colon, ":"),
            pair(TokenKind::Int, "int"),
            pair(TokenKind::Lbrack, "["),
            pair(TokenKind::Rbrack, "]"),
            pair(TokenKind::Assign, "="),
            pair(TokenKind::String, r#""Hello, world\n""#),
            pair(TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_tokenize_string_escapes() {
    let tokens = tokenize(r#""tab\t" "q\"q" "s\'" "b\\" "hex\x{41}" "wide\x{1F60}""#);

    assert!(tokens.iter().all(|token| !token.is_error()), "{:?}", tokens);
    assert_eq!(tokens.len(), 7);
    assert_eq!(tokens[4].literal, r#""hex\x{41}""#);
}

#[test]
fn test_unknown_escape_sequence() {
    let tokens = tokenize("\"Hello, world\\d\"");

    assert_eq!(tokens[0].kind, TokenKind::Error);
    assert_eq!(tokens[0].literal, "unknown escape sequence");
    // The literal is still delivered after the error.
    assert_eq!(tokens[1].kind, TokenKind::String);
    assert_eq!(tokens[2].kind, TokenKind::Eof);
}

#[test]
fn test_bad_hex_escapes() {
    let first_error = |source: &str| tokenize(source)[0].literal.clone();

    assert_eq!(first_error(r#""\x41""#), "expected { in escape sequence");
    assert_eq!(
        first_error(r#""\x{g}""#),
        "illegal character U+0067 'g' in escape sequence"
    );
    assert_eq!(first_error(r#""\x{4142A}""#), "expected } in escape sequence");
}

#[test]
fn test_unterminated_string() {
    assert_eq!(
        pairs("\"Hello, world\nx"),
        vec![
            pair(TokenKind::Error, "string literal not terminated"),
            pair(TokenKind::String, "\"Hello, world"),
            pair(TokenKind::Ident, "x"),
            pair(TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_character_literals() {
    assert_eq!(
        pairs(r"'a' '\n' '\x{7A}' '\''"),
        vec![
            pair(TokenKind::Char, "'a'"),
            pair(TokenKind::Char, r"'\n'"),
            pair(TokenKind::Char, r"'\x{7A}'"),
            pair(TokenKind::Char, r"'\''"),
            pair(TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_illegal_character_literals() {
    assert_eq!(
        pairs("'' 'ab' x"),
        vec![
            pair(TokenKind::Error, "illegal character literal"),
            pair(TokenKind::Char, "''"),
            pair(TokenKind::Error, "illegal character literal"),
            pair(TokenKind::Char, "'ab'"),
            pair(TokenKind::Ident, "x"),
            pair(TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_unterminated_character_literal() {
    assert_eq!(
        pairs("'a"),
        vec![
            pair(TokenKind::Error, "character literal not terminated"),
            pair(TokenKind::Char, "'a"),
            pair(TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_integer_followed_by_letter() {
    assert_eq!(
        pairs("12ab"),
        vec![
            pair(TokenKind::Error, "unexpected token: U+0061 'a'"),
            pair(TokenKind::Integer, "12"),
            pair(TokenKind::Ident, "ab"),
            pair(TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_unrecognized_character() {
    let tokens = tokenize("x = @ 1");

    assert_eq!(tokens[2].kind, TokenKind::Error);
    assert_eq!(tokens[2].literal, "unexpected token: U+0040 '@'");
    assert_eq!(tokens[2].position, Position::new(1, 5));
    assert_eq!(tokens[3].kind, TokenKind::Integer);
}

#[test]
fn test_tokenize_comments() {
    assert_eq!(
        pairs("x = 5 // this is a comment\ny = 10 //"),
        vec![
            pair(TokenKind::Ident, "x"),
            pair(TokenKind::Assign, "="),
            pair(TokenKind::Integer, "5"),
            pair(TokenKind::Ident, "y"),
            pair(TokenKind::Assign, "="),
            pair(TokenKind::Integer, "10"),
            pair(TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_token_positions() {
    let tokens = tokenize("a: int = 4\n\n  while\tb");
    let positions: Vec<Position> = tokens.iter().map(|token| token.position).collect();

    assert_eq!(
        positions,
        vec![
            Position::new(1, 1),
            Position::new(1, 2),
            Position::new(1, 4),
            Position::new(1, 8),
            Position::new(1, 10),
            Position::new(3, 3),
            Position::new(3, 9),
            Position::new(3, 10),
        ]
    );
}

#[test]
fn test_positions_never_decrease() {
    let source = "f(a: int[]): int {\n  // comment\n  x:int = 'c' + 12ab\n  return \"s\\q\"\n}\n@";
    let tokens = tokenize(source);

    assert_eq!(tokens.last().map(|token| token.kind), Some(TokenKind::Eof));
    for window in tokens.windows(2) {
        assert!(
            window[0].position <= window[1].position,
            "{:?} then {:?}",
            window[0],
            window[1]
        );
    }
}

#[test]
fn test_scan_returns_eof_forever() {
    let mut scanner = Scanner::new("x");

    assert_eq!(scanner.scan().kind, TokenKind::Ident);
    let eof: Token = scanner.scan();
    assert_eq!(eof.kind, TokenKind::Eof);
    for _ in 0..3 {
        assert_eq!(scanner.scan(), eof);
    }
}

#[test]
fn test_tokens_iterator_ends_after_eof() {
    let mut tokens = Scanner::new("a b").tokens();

    assert_eq!(tokens.next().map(|token| token.literal), Some(String::from("a")));
    assert_eq!(tokens.next().map(|token| token.literal), Some(String::from("b")));
    assert_eq!(tokens.next().map(|token| token.kind), Some(TokenKind::Eof));
    assert_eq!(tokens.next(), None);
    assert_eq!(tokens.next(), None);
}

#[test]
fn test_error_count() {
    let mut scanner = Scanner::new("@ # x");
    while !scanner.scan().is_eof() {}

    assert_eq!(scanner.error_count(), 2);
}

#[test]
fn test_dropping_scanner_early_stops_producer() {
    let source = "x ".repeat(10_000);
    let mut scanner = Scanner::new(&source);

    assert_eq!(scanner.scan().kind, TokenKind::Ident);
    // Drop joins the producer thread; this returns only if it shut down.
    drop(scanner);
}

#[test]
fn test_tokenize_sort_program() {
    let source = r#"
sort(a: int[]) {
	i:int = 0
	n:int = length(a)
	while (i < n) {
		j:int = i
		while (j > 0) {
			if (a[j-1] > a[j]) {
				swap:int = a[j]
				a[j] = a[j-1]
				a[j-1] = swap
			}
			j = j-1
		}
		i = i+1
	}
}
"#;
    let tokens = tokenize(source);

    assert!(tokens.iter().all(|token| !token.is_error()));
    assert_eq!(tokens.len(), 98);
    assert_eq!(
        tokens[..9].iter().map(|token| token.kind).collect::<Vec<_>>(),
        vec![
            TokenKind::Ident,
            TokenKind::Lparen,
            TokenKind::Ident,
            TokenKind::Colon,
            TokenKind::Int,
            TokenKind::Lbrack,
            TokenKind::Rbrack,
            TokenKind::Rparen,
            TokenKind::Lbrace,
        ]
    );
    assert_eq!(tokens[0].position, Position::new(2, 1));
    assert_eq!(tokens[9].position, Position::new(3, 2));
}

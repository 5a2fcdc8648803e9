//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{Error, ErrorImpl, ErrorPhase, ErrorTip};
use crate::Position;

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::Lexical {
            message: "unexpected token: U+0040 '@'".to_string(),
        },
        Position::new(1, 10),
    );

    assert_eq!(error.get_error_name(), "LexicalError");
    assert_eq!(error.phase(), ErrorPhase::Lexical);
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            expected: "identifier".to_string(),
            found: "}".to_string(),
        },
        Position::new(3, 42),
    );

    assert_eq!(error.get_position(), Some(Position::new(3, 42)));
}

#[test]
fn test_error_display_with_file() {
    let error = Error::new(
        ErrorImpl::NotDefined {
            name: "foo".to_string(),
        },
        Position::new(2, 5),
    )
    .with_file("test.xi");

    assert_eq!(
        error.to_string(),
        "test.xi:2:5: semantic error: \"foo\" not defined"
    );
}

#[test]
fn test_error_display_without_position() {
    let error = Error::without_position(ErrorImpl::Internal {
        message: "scanner stopped".to_string(),
    });

    assert_eq!(error.to_string(), "internal error: scanner stopped");
    assert_eq!(error.get_position(), None);
}

#[test]
fn test_with_file_keeps_first_file() {
    let error = Error::new(ErrorImpl::IllegalCallTarget, Position::new(1, 1))
        .with_file("a.xi")
        .with_file("b.xi");

    assert_eq!(error.get_file(), Some("a.xi"));
}

#[test]
fn test_syntax_phase() {
    for error_impl in [
        ErrorImpl::InvalidType {
            found: "x".to_string(),
        },
        ErrorImpl::IllegalCallTarget,
        ErrorImpl::UseAfterFunction,
    ] {
        let error = Error::new(error_impl, Position::new(1, 1));
        assert_eq!(error.phase(), ErrorPhase::Syntax);
    }
}

#[test]
fn test_type_mismatch_error() {
    let error = Error::new(
        ErrorImpl::TypeMismatch {
            expected: "int".to_string(),
            found: "bool".to_string(),
        },
        Position::new(1, 1),
    );

    assert_eq!(error.get_error_name(), "TypeMismatch");
    assert_eq!(error.phase(), ErrorPhase::Semantic);
    assert_eq!(error.get_tip().to_string(), "expected `int`, found `bool`");
}

#[test]
fn test_already_declared_error() {
    let error = Error::new(
        ErrorImpl::AlreadyDeclared {
            name: "x".to_string(),
        },
        Position::new(1, 1),
    );

    assert_eq!(error.get_error_name(), "AlreadyDeclared");
    assert_eq!(error.message(), "\"x\" already declared");
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::Lexical {
            message: "unknown escape sequence".to_string(),
        },
        Position::new(1, 1),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::ArgumentCount {
            name: "f".to_string(),
            expected: 2,
            received: 3,
        },
        Position::new(1, 1),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert_eq!(tip, "expected 2 arguments, received 3"),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

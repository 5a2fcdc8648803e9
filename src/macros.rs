//! Utility macros for the front end.
//!
//! This module defines helper macros used throughout the crate:
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_ERROR_TOKEN!` - Creates an error Token carrying a formatted message
//!
//! These macros reduce boilerplate in the lexer implementation.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$literal` - The token's source text
/// * `$position` - The position of the token's first character
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Integer, "42".to_string(), position);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $literal:expr, $position:expr) => {
        Token {
            kind: $kind,
            literal: $literal,
            position: $position,
        }
    };
}

/// Creates an error Token whose literal is a formatted message.
///
/// # Example
///
/// ```ignore
/// let token = MK_ERROR_TOKEN!(position, "unexpected token: {}", describe(ch));
/// ```
#[macro_export]
macro_rules! MK_ERROR_TOKEN {
    ($position:expr, $($arg:tt)+) => {
        Token {
            kind: TokenKind::Error,
            literal: format!($($arg)+),
            position: $position,
        }
    };
}

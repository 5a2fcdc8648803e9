//! Lexical analysis module for the Xi front end.
//!
//! This module contains the scanner that converts source text into a stream
//! of tokens for parsing. It handles:
//!
//! - A character-classifying state machine running on a producer thread
//! - Recognition of keywords, identifiers, literals, and operators
//! - Escape sequences in string and character literals
//! - Token position tracking for error reporting
//! - Comments and whitespace handling
//!
//! Malformed input produces `Error` tokens in the stream; scanning carries on
//! with the next token.

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;

//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that pulls tokens from the concurrent
//! scanner and builds a [`File`](crate::ast::ast::File). It uses a Pratt
//! parser for expressions with proper operator precedence and handles:
//!
//! - Declaration parsing (`use` declarations, functions)
//! - Statement parsing (declarations, assignments, calls, control flow)
//! - Expression parsing (binary and unary ops, calls, subscripts, literals)
//! - Type parsing for type annotations
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling. The
//! first error aborts the parse; there is no recovery.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

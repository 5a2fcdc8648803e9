use std::collections::HashMap;

use crate::{
    ast::{expressions::Expr, statements::Stmt},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser, stmt::*};

/// Operator precedence, lowest first. All binary levels are left-associative.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    LogicalOr,
    LogicalAnd,
    Equality,
    Relational,
    Additive,
    Multiplicative,
    Unary,
    Postfix,
    Primary,
}

pub type StmtHandler = fn(&mut Parser) -> Result<Stmt, Error>;
pub type NUDHandler = fn(&mut Parser) -> Result<Expr, Error>;
pub type LEDHandler = fn(&mut Parser, Expr, BindingPower) -> Result<Expr, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Logical
    parser.led(TokenKind::Or, BindingPower::LogicalOr, parse_binary_expr);
    parser.led(TokenKind::And, BindingPower::LogicalAnd, parse_binary_expr);

    // Equality and relational
    parser.led(TokenKind::Eq, BindingPower::Equality, parse_binary_expr);
    parser.led(TokenKind::Neq, BindingPower::Equality, parse_binary_expr);
    parser.led(TokenKind::Lt, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Le, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Gt, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Ge, BindingPower::Relational, parse_binary_expr);

    // Additive and multiplicative
    parser.led(TokenKind::Add, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Sub, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Mul, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Div, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Rem, BindingPower::Multiplicative, parse_binary_expr);

    // Postfix
    parser.led(TokenKind::Lbrack, BindingPower::Postfix, parse_subscript_expr);
    parser.led(TokenKind::Lparen, BindingPower::Postfix, parse_call_expr);

    // Literals and symbols
    parser.nud(TokenKind::Ident, parse_primary_expr);
    parser.nud(TokenKind::Integer, parse_primary_expr);
    parser.nud(TokenKind::Char, parse_primary_expr);
    parser.nud(TokenKind::String, parse_primary_expr);
    parser.nud(TokenKind::True, parse_primary_expr);
    parser.nud(TokenKind::False, parse_primary_expr);
    parser.nud(TokenKind::Lbrace, parse_array_lit_expr);
    parser.nud(TokenKind::Length, parse_length_expr);
    parser.nud(TokenKind::Lparen, parse_grouping_expr);
    parser.nud(TokenKind::Sub, parse_prefix_expr);
    parser.nud(TokenKind::Not, parse_prefix_expr);

    // Statements
    parser.stmt(TokenKind::Ident, parse_ident_stmt);
    parser.stmt(TokenKind::Underscore, parse_discard_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::While, parse_while_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::Lbrace, parse_block_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;

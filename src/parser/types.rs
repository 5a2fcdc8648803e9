//! Type parsing implementation.
//!
//! This module handles parsing of type annotations. It supports:
//!
//! - Primitive types (`int`, `bool`)
//! - Array types, optionally sized (`int[]`, `int[n][]`)
//!
//! Similar to expression parsing, it uses NUD/LED handlers with
//! binding powers for parsing type expressions.

use std::collections::HashMap;

use crate::{
    ast::types::{ArrayType, PrimitiveKind, PrimitiveType, Type},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{expr::parse_expr, lookups::BindingPower, parser::Parser};

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<Type, Error>;

/// Type alias for type left denotation handler functions.
pub type TypeLEDHandler = fn(&mut Parser, Type, BindingPower) -> Result<Type, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Type alias for type LED lookup table.
pub type TypeLEDLookup = HashMap<TokenKind, TypeLEDHandler>;

/// Type alias for type binding power lookup table.
pub type TypeBPLookup = HashMap<TokenKind, BindingPower>;

/// Initializes the type parsing lookup tables.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Int, parse_primitive_type);
    parser.type_nud(TokenKind::Bool, parse_primitive_type);
    parser.type_led(TokenKind::Lbrack, BindingPower::Postfix, parse_array_type);
}

pub fn parse_primitive_type(parser: &mut Parser) -> Result<Type, Error> {
    let kind = match parser.current_token_kind() {
        TokenKind::Int => PrimitiveKind::Int,
        TokenKind::Bool => PrimitiveKind::Bool,
        _ => return Err(invalid_type(parser)),
    };

    let token = parser.advance();
    Ok(Type::Primitive(PrimitiveType {
        kind,
        position: token.position,
    }))
}

pub fn parse_array_type(
    parser: &mut Parser,
    left: Type,
    _bp: BindingPower,
) -> Result<Type, Error> {
    parser.expect(TokenKind::Lbrack)?;

    let size = if parser.current_token_kind() != TokenKind::Rbrack {
        Some(Box::new(parse_expr(parser, BindingPower::Default)?))
    } else {
        None
    };

    parser.expect(TokenKind::Rbrack)?;

    Ok(Type::Array(ArrayType {
        position: left.position(),
        element: Box::new(left),
        size,
    }))
}

fn invalid_type(parser: &Parser) -> Error {
    let token = parser.current_token();
    if token.is_error() {
        return parser.unexpected("type");
    }

    Error::new(
        ErrorImpl::InvalidType {
            found: token.describe(),
        },
        token.position,
    )
}

pub fn parse_type(parser: &mut Parser, bp: BindingPower) -> Result<Type, Error> {
    parser.traced("Type", |parser| {
        // First parse NUD
        let token_kind = parser.current_token_kind();
        let Some(nud) = parser.get_type_nud_lookup().get(&token_kind).copied() else {
            return Err(invalid_type(parser));
        };

        let mut left = nud(parser)?;

        loop {
            let token_kind = parser.current_token_kind();
            let next_bp = parser
                .get_type_bp_lookup()
                .get(&token_kind)
                .copied()
                .unwrap_or(BindingPower::Default);
            if next_bp <= bp {
                break;
            }

            let Some(led) = parser.get_type_led_lookup().get(&token_kind).copied() else {
                break;
            };
            left = led(parser, left, next_bp)?;
        }

        Ok(left)
    })
}

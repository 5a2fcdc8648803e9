use crate::{
    ast::{
        ast::Ident,
        expressions::{
            ArrayLit, BasicLit, BinaryExpr, BinaryOp, CallExpr, Expr, LengthExpr, LitKind,
            SubscriptExpr, UnaryExpr, UnaryOp,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    parser.traced("Expr", |parser| {
        // First parse NUD
        let token_kind = parser.current_token_kind();
        let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
            return Err(parser.unexpected("expression"));
        };

        let mut left = nud(parser)?;

        // While the next operator binds tighter than `bp`, keep extending lhs
        loop {
            let token_kind = parser.current_token_kind();
            let next_bp = parser
                .get_bp_lookup()
                .get(&token_kind)
                .copied()
                .unwrap_or(BindingPower::Default);
            if next_bp <= bp {
                break;
            }

            let Some(led) = parser.get_led_lookup().get(&token_kind).copied() else {
                break;
            };
            left = led(parser, left, next_bp)?;
        }

        Ok(left)
    })
}

pub fn parse_ident(parser: &mut Parser) -> Result<Ident, Error> {
    let token = parser.expect(TokenKind::Ident)?;
    Ok(Ident {
        name: token.literal,
        position: token.position,
    })
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let kind = match parser.current_token_kind() {
        TokenKind::Ident => return Ok(Expr::Ident(parse_ident(parser)?)),
        TokenKind::Integer => LitKind::Integer,
        TokenKind::Char => LitKind::Char,
        TokenKind::String => LitKind::String,
        TokenKind::True | TokenKind::False => LitKind::Bool,
        _ => return Err(parser.unexpected("expression")),
    };

    let token = parser.advance();
    Ok(Expr::BasicLit(BasicLit {
        kind,
        value: token.literal,
        position: token.position,
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::Lparen)?;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Rparen)?;

    Ok(expr)
}

pub fn parse_array_lit_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.traced("ArrayLit", |parser| {
        let position = parser.expect(TokenKind::Lbrace)?.position;

        let mut elements = vec![];
        while parser.current_token_kind() != TokenKind::Rbrace {
            elements.push(parse_expr(parser, BindingPower::Default)?);

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }

        parser.expect(TokenKind::Rbrace)?;

        Ok(Expr::ArrayLit(ArrayLit { elements, position }))
    })
}

pub fn parse_length_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let position = parser.expect(TokenKind::Length)?.position;

    parser.expect(TokenKind::Lparen)?;
    let arg = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Rparen)?;

    Ok(Expr::Length(LengthExpr {
        arg: Box::new(arg),
        position,
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance();
    let op = UnaryOp::from_token(operator_token.kind).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnknownOperator {
                operator: operator_token.kind.to_string(),
            },
            operator_token.position,
        )
    })?;

    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Unary(UnaryExpr {
        op,
        operand: Box::new(operand),
        position: operator_token.position,
    }))
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: Expr,
    bp: BindingPower,
) -> Result<Expr, Error> {
    let operator_token = parser.advance();
    let op = BinaryOp::from_token(operator_token.kind).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnknownOperator {
                operator: operator_token.kind.to_string(),
            },
            operator_token.position,
        )
    })?;

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        op,
        position: left.position(),
        lhs: Box::new(left),
        rhs: Box::new(right),
    }))
}

/// Parses one `[index]` suffix applied to `lhs`.
pub fn parse_subscript_suffix(parser: &mut Parser, lhs: Expr) -> Result<SubscriptExpr, Error> {
    parser.expect(TokenKind::Lbrack)?;
    let index = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Rbrack)?;

    Ok(SubscriptExpr {
        position: lhs.position(),
        lhs: Box::new(lhs),
        index: Box::new(index),
    })
}

pub fn parse_subscript_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    Ok(Expr::Subscript(parse_subscript_suffix(parser, left)?))
}

/// Parses `(arg, ...)`.
pub fn parse_call_args(parser: &mut Parser) -> Result<Vec<Expr>, Error> {
    parser.expect(TokenKind::Lparen)?;

    let mut args = vec![];
    if parser.current_token_kind() != TokenKind::Rparen {
        loop {
            args.push(parse_expr(parser, BindingPower::Default)?);
            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    parser.expect(TokenKind::Rparen)?;
    Ok(args)
}

pub fn parse_call_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    let func = match left {
        Expr::Ident(func) => func,
        other => return Err(Error::new(ErrorImpl::IllegalCallTarget, other.position())),
    };

    let args = parse_call_args(parser)?;

    Ok(Expr::Call(CallExpr {
        position: func.position,
        func,
        args,
    }))
}

use crate::{
    ast::{
        ast::{Decl, File, FuncDecl, Ident, Spec, UseDecl},
        expressions::{CallExpr, Expr},
        statements::{
            AssignStmt, Assignable, BlockStmt, IfStmt, Lvalue, MultiDeclStmt, ReturnStmt,
            SingleDeclStmt, Stmt, WhileStmt,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{
        expr::{parse_call_args, parse_expr, parse_ident, parse_subscript_suffix},
        lookups::BindingPower,
    },
    Position,
};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.traced("Stmt", |parser| {
        let token_kind = parser.current_token_kind();
        match parser.get_stmt_lookup().get(&token_kind).copied() {
            Some(handler) => handler(parser),
            None => Err(parser.unexpected("statement")),
        }
    })
}

/// Statements that start with an identifier: declarations, calls and
/// assignments.
pub fn parse_ident_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let ident = parse_ident(parser)?;

    match parser.current_token_kind() {
        TokenKind::Colon => parse_decl_stmt(parser, ident),
        TokenKind::Lparen => {
            let args = parse_call_args(parser)?;
            Ok(Stmt::Call(CallExpr {
                position: ident.position,
                func: ident,
                args,
            }))
        }
        TokenKind::Assign | TokenKind::Lbrack => parse_assign_stmt(parser, ident),
        _ => Err(parser.unexpected("`:`, `=`, `[` or `(`")),
    }
}

fn parse_spec_rest(parser: &mut Parser, name: Ident) -> Result<Spec, Error> {
    parser.expect(TokenKind::Colon)?;
    let ty = parse_type(parser, BindingPower::Default)?;

    Ok(Spec {
        position: name.position,
        name,
        ty,
    })
}

pub fn parse_spec(parser: &mut Parser) -> Result<Spec, Error> {
    let name = parse_ident(parser)?;
    parse_spec_rest(parser, name)
}

fn parse_decl_stmt(parser: &mut Parser, ident: Ident) -> Result<Stmt, Error> {
    let spec = parse_spec_rest(parser, ident)?;
    let position = spec.position;

    match parser.current_token_kind() {
        TokenKind::Comma => parse_multi_decl_rest(parser, vec![Assignable::Spec(spec)], position),
        TokenKind::Assign => {
            parser.advance();
            let init = parse_expr(parser, BindingPower::Default)?;
            Ok(Stmt::SingleDecl(SingleDeclStmt {
                spec,
                init: Some(init),
                position,
            }))
        }
        _ => Ok(Stmt::SingleDecl(SingleDeclStmt {
            spec,
            init: None,
            position,
        })),
    }
}

/// `_ [, assignable]* = f(args)`
pub fn parse_discard_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.expect(TokenKind::Underscore)?.position;
    parse_multi_decl_rest(parser, vec![Assignable::Discard(position)], position)
}

fn parse_assignable(parser: &mut Parser) -> Result<Assignable, Error> {
    if parser.current_token_kind() == TokenKind::Underscore {
        return Ok(Assignable::Discard(parser.advance().position));
    }

    Ok(Assignable::Spec(parse_spec(parser)?))
}

fn parse_multi_decl_rest(
    parser: &mut Parser,
    mut assignables: Vec<Assignable>,
    position: Position,
) -> Result<Stmt, Error> {
    parser.traced("MultiDecl", |parser| {
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            assignables.push(parse_assignable(parser)?);
        }

        parser.expect(TokenKind::Assign)?;

        if parser.current_token_kind() != TokenKind::Ident {
            return Err(parser.unexpected("function call"));
        }
        let func = parse_ident(parser)?;
        let args = parse_call_args(parser)?;

        Ok(Stmt::MultiDecl(MultiDeclStmt {
            assignables,
            init: CallExpr {
                position: func.position,
                func,
                args,
            },
            position,
        }))
    })
}

fn parse_assign_stmt(parser: &mut Parser, ident: Ident) -> Result<Stmt, Error> {
    let position = ident.position;

    let lhs = if parser.current_token_kind() == TokenKind::Lbrack {
        let mut subscript = parse_subscript_suffix(parser, Expr::Ident(ident))?;
        while parser.current_token_kind() == TokenKind::Lbrack {
            subscript = parse_subscript_suffix(parser, Expr::Subscript(subscript))?;
        }
        Lvalue::Subscript(subscript)
    } else {
        Lvalue::Ident(ident)
    };

    parser.expect(TokenKind::Assign)?;
    let rhs = parse_expr(parser, BindingPower::Default)?;

    Ok(Stmt::Assign(AssignStmt { lhs, rhs, position }))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.expect(TokenKind::If)?.position;

    let cond = parse_expr(parser, BindingPower::Default)?;
    let then = parse_stmt(parser)?;

    let otherwise = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(Box::new(parse_stmt(parser)?))
    } else {
        None
    };

    Ok(Stmt::If(IfStmt {
        cond,
        then: Box::new(then),
        otherwise,
        position,
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.expect(TokenKind::While)?.position;

    let cond = parse_expr(parser, BindingPower::Default)?;
    let body = parse_stmt(parser)?;

    Ok(Stmt::While(WhileStmt {
        cond,
        body: Box::new(body),
        position,
    }))
}

/// `return [e (, e)*]`. Whether values follow is decided by trying to parse
/// one: a failure that consumed no tokens means a bare `return`.
pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.expect(TokenKind::Return)?.position;

    let before = parser.consumed();
    let first = match parse_expr(parser, BindingPower::Default) {
        Ok(expr) => expr,
        Err(_) if parser.consumed() == before && !parser.current_token().is_error() => {
            return Ok(Stmt::Return(ReturnStmt {
                values: vec![],
                position,
            }));
        }
        Err(error) => return Err(error),
    };

    let mut values = vec![first];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        values.push(parse_expr(parser, BindingPower::Default)?);
    }

    Ok(Stmt::Return(ReturnStmt { values, position }))
}

pub fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    parser.traced("Block", |parser| {
        let position = parser.expect(TokenKind::Lbrace)?.position;

        let mut stmts = Vec::new();
        while !matches!(
            parser.current_token_kind(),
            TokenKind::Rbrace | TokenKind::Eof
        ) {
            stmts.push(parse_stmt(parser)?);

            if parser.current_token_kind() == TokenKind::Semicolon {
                parser.advance();
            }
        }

        parser.expect(TokenKind::Rbrace)?;

        Ok(BlockStmt { stmts, position })
    })
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::Block(parse_block(parser)?))
}

pub fn parse_use_decl(parser: &mut Parser) -> Result<UseDecl, Error> {
    parser.traced("UseDecl", |parser| {
        let position = parser.expect(TokenKind::Use)?.position;
        let lib = parse_ident(parser)?;

        if parser.current_token_kind() == TokenKind::Semicolon {
            parser.advance();
        }

        Ok(UseDecl { lib, position })
    })
}

pub fn parse_func_decl(parser: &mut Parser) -> Result<FuncDecl, Error> {
    parser.traced("FuncDecl", |parser| {
        let name = parse_ident(parser)?;

        parser.expect(TokenKind::Lparen)?;
        let mut params = Vec::new();
        if parser.current_token_kind() != TokenKind::Rparen {
            loop {
                params.push(parse_spec(parser)?);
                if parser.current_token_kind() != TokenKind::Comma {
                    break;
                }
                parser.advance();
            }
        }
        parser.expect(TokenKind::Rparen)?;

        let mut results = Vec::new();
        if parser.current_token_kind() == TokenKind::Colon {
            parser.advance();
            loop {
                results.push(parse_type(parser, BindingPower::Default)?);
                if parser.current_token_kind() != TokenKind::Comma {
                    break;
                }
                parser.advance();
            }
        }

        let body = parse_block(parser)?;

        Ok(FuncDecl {
            position: name.position,
            name,
            params,
            results,
            body,
        })
    })
}

pub fn parse_decl(parser: &mut Parser) -> Result<Decl, Error> {
    match parser.current_token_kind() {
        TokenKind::Use => Ok(Decl::Use(parse_use_decl(parser)?)),
        TokenKind::Ident => Ok(Decl::Func(parse_func_decl(parser)?)),
        _ => Err(parser.unexpected("`use` or function declaration")),
    }
}

/// All `use` declarations, then one or more function declarations.
pub fn parse_file_decls(parser: &mut Parser) -> Result<File, Error> {
    let mut uses = Vec::new();
    let mut funcs = Vec::new();

    while parser.current_token_kind() != TokenKind::Eof {
        match parse_decl(parser)? {
            Decl::Use(use_decl) if !funcs.is_empty() => {
                return Err(Error::new(ErrorImpl::UseAfterFunction, use_decl.position));
            }
            Decl::Use(use_decl) => uses.push(use_decl),
            Decl::Func(func) => funcs.push(func),
        }
    }

    if funcs.is_empty() {
        return Err(parser.unexpected("function declaration"));
    }

    Ok(File { uses, funcs })
}

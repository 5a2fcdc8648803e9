use std::fmt::Display;

use crate::{lexer::tokens::TokenKind, Position};

use super::ast::Ident;

/// Kind of a literal token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Integer,
    Char,
    String,
    Bool,
}

/// A literal. `value` is the raw source text, quotes and escapes included.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicLit {
    pub kind: LitKind,
    pub value: String,
    pub position: Position,
}

/// `{e1, e2, ...}`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLit {
    pub elements: Vec<Expr>,
    pub position: Position,
}

/// `f(args)`. Only a bare identifier can be called.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub func: Ident,
    pub args: Vec<Expr>,
    pub position: Position,
}

/// `length(e)`
#[derive(Debug, Clone, PartialEq)]
pub struct LengthExpr {
    pub arg: Box<Expr>,
    pub position: Position,
}

/// `lhs[index]`
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptExpr {
    pub lhs: Box<Expr>,
    pub index: Box<Expr>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(Ident),
    BasicLit(BasicLit),
    ArrayLit(ArrayLit),
    Call(CallExpr),
    Length(LengthExpr),
    Subscript(SubscriptExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
}

impl Expr {
    pub fn position(&self) -> Position {
        match self {
            Expr::Ident(ident) => ident.position,
            Expr::BasicLit(lit) => lit.position,
            Expr::ArrayLit(lit) => lit.position,
            Expr::Call(call) => call.position,
            Expr::Length(length) => length.position,
            Expr::Subscript(subscript) => subscript.position,
            Expr::Unary(unary) => unary.position,
            Expr::Binary(binary) => binary.position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn from_token(kind: TokenKind) -> Option<UnaryOp> {
        match kind {
            TokenKind::Sub => Some(UnaryOp::Neg),
            TokenKind::Not => Some(UnaryOp::Not),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<BinaryOp> {
        let op = match kind {
            TokenKind::Add => BinaryOp::Add,
            TokenKind::Sub => BinaryOp::Sub,
            TokenKind::Mul => BinaryOp::Mul,
            TokenKind::Div => BinaryOp::Div,
            TokenKind::Rem => BinaryOp::Rem,
            TokenKind::Eq => BinaryOp::Eq,
            TokenKind::Neq => BinaryOp::Neq,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::Le => BinaryOp::Le,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::Ge => BinaryOp::Ge,
            TokenKind::And => BinaryOp::And,
            TokenKind::Or => BinaryOp::Or,
            _ => return None,
        };
        Some(op)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
        }
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

use crate::Position;

use super::{
    ast::{Ident, Spec},
    expressions::{CallExpr, Expr, SubscriptExpr},
};

/// Legal left-hand side of an assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Lvalue {
    Ident(Ident),
    Subscript(SubscriptExpr),
}

impl Lvalue {
    pub fn position(&self) -> Position {
        match self {
            Lvalue::Ident(ident) => ident.position,
            Lvalue::Subscript(subscript) => subscript.position,
        }
    }
}

/// One binding target of a multi-value declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignable {
    /// `_`
    Discard(Position),
    Spec(Spec),
}

impl Assignable {
    pub fn position(&self) -> Position {
        match self {
            Assignable::Discard(position) => *position,
            Assignable::Spec(spec) => spec.position,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub lhs: Lvalue,
    pub rhs: Expr,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then: Box<Stmt>,
    pub otherwise: Option<Box<Stmt>>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Box<Stmt>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub values: Vec<Expr>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub stmts: Vec<Stmt>,
    pub position: Position,
}

/// `name: type [= init]`
#[derive(Debug, Clone, PartialEq)]
pub struct SingleDeclStmt {
    pub spec: Spec,
    pub init: Option<Expr>,
    pub position: Position,
}

/// `a, _, c: int = f(args)`
#[derive(Debug, Clone, PartialEq)]
pub struct MultiDeclStmt {
    pub assignables: Vec<Assignable>,
    pub init: CallExpr,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign(AssignStmt),
    If(IfStmt),
    While(WhileStmt),
    Return(ReturnStmt),
    Block(BlockStmt),
    SingleDecl(SingleDeclStmt),
    MultiDecl(MultiDeclStmt),
    /// A procedure call used as a statement.
    Call(CallExpr),
}

impl Stmt {
    pub fn position(&self) -> Position {
        match self {
            Stmt::Assign(assign) => assign.position,
            Stmt::If(if_stmt) => if_stmt.position,
            Stmt::While(while_stmt) => while_stmt.position,
            Stmt::Return(ret) => ret.position,
            Stmt::Block(block) => block.position,
            Stmt::SingleDecl(decl) => decl.position,
            Stmt::MultiDecl(decl) => decl.position,
            Stmt::Call(call) => call.position,
        }
    }
}

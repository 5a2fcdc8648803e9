//! Type annotations as written in the source.
//!
//! These are syntax only. The checker resolves them into semantic types
//! (see `type_checker::types`).

use std::fmt::Display;

use crate::Position;

use super::expressions::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Int,
    Bool,
}

impl Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrimitiveKind::Int => write!(f, "int"),
            PrimitiveKind::Bool => write!(f, "bool"),
        }
    }
}

/// `int` or `bool`
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveType {
    pub kind: PrimitiveKind,
    pub position: Position,
}

/// `element[]` or `element[size]`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    pub element: Box<Type>,
    pub size: Option<Box<Expr>>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primitive(PrimitiveType),
    Array(ArrayType),
}

impl Type {
    pub fn position(&self) -> Position {
        match self {
            Type::Primitive(primitive) => primitive.position,
            Type::Array(array) => array.position,
        }
    }
}

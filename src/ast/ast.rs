use crate::Position;

use super::{statements::BlockStmt, types::Type};

/// A name as it appears in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub position: Position,
}

/// A `name: type` pair, used for parameters and declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Spec {
    pub name: Ident,
    pub ty: Type,
    pub position: Position,
}

/// `use lib`
#[derive(Debug, Clone, PartialEq)]
pub struct UseDecl {
    pub lib: Ident,
    pub position: Position,
}

/// `name(params): results { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: Ident,
    pub params: Vec<Spec>,
    pub results: Vec<Type>,
    pub body: BlockStmt,
    pub position: Position,
}

/// Top-level declarations.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Func(FuncDecl),
    Use(UseDecl),
}

impl Decl {
    pub fn position(&self) -> Position {
        match self {
            Decl::Func(func) => func.position,
            Decl::Use(use_decl) => use_decl.position,
        }
    }
}

/// One parsed source file: all `use` declarations, then all functions.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub uses: Vec<UseDecl>,
    pub funcs: Vec<FuncDecl>,
}

impl File {
    pub fn find_func(&self, name: &str) -> Option<&FuncDecl> {
        self.funcs.iter().find(|func| func.name.name == name)
    }
}

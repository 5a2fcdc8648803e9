use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Position;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("return", TokenKind::Return);
        map.insert("length", TokenKind::Length);
        map.insert("use", TokenKind::Use);
        map.insert("int", TokenKind::Int);
        map.insert("bool", TokenKind::Bool);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("_", TokenKind::Underscore);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Error,
    Eof,

    // Reserved
    If,
    Else,
    While,
    Return,
    Length,
    Use,
    Int,
    Bool,
    True,
    False,
    Underscore,

    Ident,
    Integer,
    Char,
    String,

    Add, // +
    Sub, // -
    Mul, // *
    Div, // /
    Rem, // %

    Assign, // =
    Not,    // !
    Eq,     // ==
    Neq,    // !=
    Lt,
    Le,
    Gt,
    Ge,
    And, // &
    Or,  // |

    Lparen,
    Lbrack,
    Lbrace,
    Rparen,
    Rbrack,
    Rbrace,

    Comma,
    Colon,
    Semicolon,
}

impl TokenKind {
    /// The source spelling of fixed tokens, or an upper-case class name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Error => "ERROR",
            TokenKind::Eof => "EOF",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::Return => "return",
            TokenKind::Length => "length",
            TokenKind::Use => "use",
            TokenKind::Int => "int",
            TokenKind::Bool => "bool",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Underscore => "_",
            TokenKind::Ident => "IDENT",
            TokenKind::Integer => "INTEGER",
            TokenKind::Char => "CHAR",
            TokenKind::String => "STRING",
            TokenKind::Add => "+",
            TokenKind::Sub => "-",
            TokenKind::Mul => "*",
            TokenKind::Div => "/",
            TokenKind::Rem => "%",
            TokenKind::Assign => "=",
            TokenKind::Not => "!",
            TokenKind::Eq => "==",
            TokenKind::Neq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Le => "<=",
            TokenKind::Gt => ">",
            TokenKind::Ge => ">=",
            TokenKind::And => "&",
            TokenKind::Or => "|",
            TokenKind::Lparen => "(",
            TokenKind::Lbrack => "[",
            TokenKind::Lbrace => "{",
            TokenKind::Rparen => ")",
            TokenKind::Rbrack => "]",
            TokenKind::Rbrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified lexeme. For `Error` tokens the literal is the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub position: Position,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Ident
            | TokenKind::Integer
            | TokenKind::Char
            | TokenKind::String
            | TokenKind::Error => write!(f, "{}({})", self.kind, self.literal),
            _ => write!(f, "{}", self.kind),
        }
    }
}

impl Token {
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    pub fn is_error(&self) -> bool {
        self.kind == TokenKind::Error
    }

    /// Short human-readable form used in syntax errors.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => String::from("end of file"),
            TokenKind::Error => format!("invalid token ({})", self.literal),
            _ if self.literal.is_empty() => self.kind.to_string(),
            _ => self.literal.clone(),
        }
    }
}

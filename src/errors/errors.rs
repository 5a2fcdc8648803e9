use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// Compilation stage an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPhase {
    Lexical,
    Syntax,
    Semantic,
    Internal,
}

impl Display for ErrorPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorPhase::Lexical => write!(f, "lexical error"),
            ErrorPhase::Syntax => write!(f, "syntax error"),
            ErrorPhase::Semantic => write!(f, "semantic error"),
            ErrorPhase::Internal => write!(f, "internal error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Option<Position>,
    file: Option<String>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position: Some(position),
            file: None,
        }
    }

    pub fn without_position(error_impl: ErrorImpl) -> Self {
        Error {
            internal_error: error_impl,
            position: None,
            file: None,
        }
    }

    /// Attaches the file name, keeping one that is already set.
    pub fn with_file(mut self, file: &str) -> Self {
        if self.file.is_none() {
            self.file = Some(file.to_string());
        }
        self
    }

    pub fn get_position(&self) -> Option<Position> {
        self.position
    }

    pub fn get_file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn phase(&self) -> ErrorPhase {
        match &self.internal_error {
            ErrorImpl::Lexical { .. } => ErrorPhase::Lexical,
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::InvalidType { .. }
            | ErrorImpl::IllegalCallTarget
            | ErrorImpl::UseAfterFunction => ErrorPhase::Syntax,
            ErrorImpl::Internal { .. } => ErrorPhase::Internal,
            _ => ErrorPhase::Semantic,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::Lexical { .. } => "LexicalError",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::InvalidType { .. } => "InvalidType",
            ErrorImpl::IllegalCallTarget => "IllegalCallTarget",
            ErrorImpl::UseAfterFunction => "UseAfterFunction",
            ErrorImpl::NotDefined { .. } => "NotDefined",
            ErrorImpl::AlreadyDeclared { .. } => "AlreadyDeclared",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::InvalidOperand { .. } => "InvalidOperand",
            ErrorImpl::UnknownOperator { .. } => "UnknownOperator",
            ErrorImpl::NotAnArray { .. } => "NotAnArray",
            ErrorImpl::NonIntegerSubscript { .. } => "NonIntegerSubscript",
            ErrorImpl::MismatchedArrayElements { .. } => "MismatchedArrayElements",
            ErrorImpl::NotCallable { .. } => "NotCallable",
            ErrorImpl::ArgumentCount { .. } => "ArgumentCount",
            ErrorImpl::ResultCount { .. } => "ResultCount",
            ErrorImpl::NoValue { .. } => "NoValue",
            ErrorImpl::MultipleValues { .. } => "MultipleValues",
            ErrorImpl::NotAssignable { .. } => "NotAssignable",
            ErrorImpl::UnknownLibrary { .. } => "UnknownLibrary",
            ErrorImpl::MissingReturn { .. } => "MissingReturn",
            ErrorImpl::IntegerOutOfRange { .. } => "IntegerOutOfRange",
            ErrorImpl::UnusedResult { .. } => "UnusedResult",
            ErrorImpl::Internal { .. } => "InternalError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::Lexical { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { expected, found } => {
                ErrorTip::Suggestion(format!("expected {}, found `{}`", expected, found))
            }
            ErrorImpl::InvalidType { found } => ErrorTip::Suggestion(format!(
                "`{}` is not a type, expected `int` or `bool`",
                found
            )),
            ErrorImpl::IllegalCallTarget => {
                ErrorTip::Suggestion(String::from("only named functions can be called"))
            }
            ErrorImpl::UseAfterFunction => ErrorTip::Suggestion(String::from(
                "move `use` declarations above the first function",
            )),
            ErrorImpl::NotDefined { name } => {
                ErrorTip::Suggestion(format!("`{}` is not declared in any enclosing scope", name))
            }
            ErrorImpl::AlreadyDeclared { name } => {
                ErrorTip::Suggestion(format!("`{}` is already declared in this scope", name))
            }
            ErrorImpl::TypeMismatch { expected, found } => {
                ErrorTip::Suggestion(format!("expected `{}`, found `{}`", expected, found))
            }
            ErrorImpl::InvalidOperand { operator, found } => ErrorTip::Suggestion(format!(
                "`{}` cannot be applied to `{}`",
                operator, found
            )),
            ErrorImpl::UnknownOperator { .. } => ErrorTip::None,
            ErrorImpl::NotAnArray { found } => {
                ErrorTip::Suggestion(format!("expected an array, found `{}`", found))
            }
            ErrorImpl::NonIntegerSubscript { found } => {
                ErrorTip::Suggestion(format!("subscripts must be `int`, found `{}`", found))
            }
            ErrorImpl::MismatchedArrayElements { expected, found } => ErrorTip::Suggestion(
                format!("first element is `{}`, this one is `{}`", expected, found),
            ),
            ErrorImpl::NotCallable { name } => {
                ErrorTip::Suggestion(format!("`{}` is not a function", name))
            }
            ErrorImpl::ArgumentCount {
                expected, received, ..
            } => ErrorTip::Suggestion(format!(
                "expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::ResultCount { expected, received } => ErrorTip::Suggestion(format!(
                "expected {} values, received {}",
                expected, received
            )),
            ErrorImpl::NoValue { name } => {
                ErrorTip::Suggestion(format!("`{}` is a procedure and returns nothing", name))
            }
            ErrorImpl::MultipleValues { name } => ErrorTip::Suggestion(format!(
                "`{}` returns several values, bind them with a multiple declaration",
                name
            )),
            ErrorImpl::NotAssignable { name } => {
                ErrorTip::Suggestion(format!("`{}` is not a variable", name))
            }
            ErrorImpl::UnknownLibrary { name } => ErrorTip::Suggestion(format!(
                "library `{}` does not exist, available: io, conv",
                name
            )),
            ErrorImpl::MissingReturn { function } => ErrorTip::Suggestion(format!(
                "every path through `{}` must end in a return",
                function
            )),
            ErrorImpl::IntegerOutOfRange { literal } => {
                ErrorTip::Suggestion(format!("`{}` does not fit in 64 bits", literal))
            }
            ErrorImpl::UnusedResult { name } => ErrorTip::Suggestion(format!(
                "`{}` returns values, only procedures can be called as statements",
                name
            )),
            ErrorImpl::Internal { .. } => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:", file)?;
        }
        if let Some(position) = &self.position {
            write!(f, "{}: ", position)?;
        } else if self.file.is_some() {
            write!(f, " ")?;
        }
        write!(f, "{}: {}", self.phase(), self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexical
    #[error("{message}")]
    Lexical { message: String },

    // Syntax
    #[error("unexpected token: expected {expected}, found {found:?}")]
    UnexpectedToken { expected: String, found: String },
    #[error("invalid type {found:?}")]
    InvalidType { found: String },
    #[error("cannot call a non-identifier expression")]
    IllegalCallTarget,
    #[error("use declarations must precede function declarations")]
    UseAfterFunction,

    // Semantic
    #[error("{name:?} not defined")]
    NotDefined { name: String },
    #[error("{name:?} already declared")]
    AlreadyDeclared { name: String },
    #[error("types do not match: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
    #[error("cannot apply operation {operator} to {found}")]
    InvalidOperand { operator: String, found: String },
    #[error("unknown op {operator}")]
    UnknownOperator { operator: String },
    #[error("expected an array, found {found}")]
    NotAnArray { found: String },
    #[error("cannot subscript an array with a non-integer value of type {found}")]
    NonIntegerSubscript { found: String },
    #[error("mismatched array elements: expected {expected}, found {found}")]
    MismatchedArrayElements { expected: String, found: String },
    #[error("{name:?} is not a function")]
    NotCallable { name: String },
    #[error("wrong number of arguments to {name:?}: expected {expected}, received {received}")]
    ArgumentCount {
        name: String,
        expected: usize,
        received: usize,
    },
    #[error("wrong number of values: expected {expected}, received {received}")]
    ResultCount { expected: usize, received: usize },
    #[error("{name:?} does not return a value")]
    NoValue { name: String },
    #[error("{name:?} returns multiple values")]
    MultipleValues { name: String },
    #[error("cannot assign to {name:?}")]
    NotAssignable { name: String },
    #[error("unknown library {name:?}")]
    UnknownLibrary { name: String },
    #[error("missing return statement in {function:?}")]
    MissingReturn { function: String },
    #[error("integer literal {literal} out of range")]
    IntegerOutOfRange { literal: String },
    #[error("result of {name:?} is unused")]
    UnusedResult { name: String },

    #[error("{message}")]
    Internal { message: String },
}

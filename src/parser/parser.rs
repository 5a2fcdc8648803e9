//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the pipeline entry points.
//! The parser pulls tokens from a [`Scanner`] with one token of lookahead and
//! uses a Pratt parser approach with NUD/LED handlers for expressions and
//! specialized functions for declarations and statements.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix and postfix expressions
//! - Binding powers for operator precedence
//! - Type parsing handlers

use std::collections::HashMap;

use bitflags::bitflags;
use tracing::debug;

use crate::{
    ast::{ast::File, expressions::Expr},
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::Scanner,
        tokens::{Token, TokenKind},
    },
    Position,
};

use super::{
    expr::parse_expr,
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_file_decls,
    types::{
        create_token_type_lookups, TypeBPLookup, TypeLEDHandler, TypeLEDLookup, TypeNUDHandler,
        TypeNUDLookup,
    },
};

bitflags! {
    /// Parser options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Mode: u32 {
        /// Print an indented log of grammar rule entry and exit.
        const TRACE = 1 << 0;
    }
}

/// The main parser structure that maintains parsing state.
pub struct Parser {
    scanner: Scanner,
    /// The lookahead token
    token: Token,
    /// Number of tokens consumed so far
    consumed: usize,
    /// The name of the source file being parsed
    file: String,
    mode: Mode,
    depth: usize,
    trace_log: Vec<String>,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Lookup table for type null denotation handlers
    type_nud_lookup: TypeNUDLookup,
    /// Lookup table for type left denotation handlers
    type_led_lookup: TypeLEDLookup,
    /// Lookup table for type binding powers
    type_binding_power_lookup: TypeBPLookup,
}

impl Parser {
    /// Creates a parser over `source` and primes the lookahead token.
    ///
    /// # Arguments
    ///
    /// * `file` - File name used to label errors
    /// * `source` - The complete source text
    /// * `mode` - Parser options
    pub fn new(file: &str, source: &str, mode: Mode) -> Self {
        let mut scanner = Scanner::new(source);
        let token = scanner.scan();

        let mut parser = Parser {
            scanner,
            token,
            consumed: 0,
            file: file.to_string(),
            mode,
            depth: 0,
            trace_log: Vec::new(),
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
            type_led_lookup: HashMap::new(),
            type_binding_power_lookup: HashMap::new(),
        };
        create_token_lookups(&mut parser);
        create_token_type_lookups(&mut parser);

        parser
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.token
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.token.kind
    }

    /// Advances to the next token and returns the previous one.
    pub fn advance(&mut self) -> Token {
        let next = self.scanner.scan();
        self.consumed += 1;
        std::mem::replace(&mut self.token, next)
    }

    /// Number of tokens consumed so far. Used to tell whether a failed
    /// speculative parse made progress.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            return match error {
                Some(error) => Err(error),
                None => Err(self.unexpected(&describe_kind(expected_kind))),
            };
        }

        Ok(self.advance())
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Builds the error for the current token not matching `expected`. An
    /// error token from the scanner is reported as the lexical error it is.
    pub fn unexpected(&self, expected: &str) -> Error {
        let token = self.current_token();
        if token.is_error() {
            return Error::new(
                ErrorImpl::Lexical {
                    message: token.literal.clone(),
                },
                token.position,
            );
        }

        Error::new(
            ErrorImpl::UnexpectedToken {
                expected: expected.to_string(),
                found: token.describe(),
            },
            token.position,
        )
    }

    /// Returns the position of the current token.
    pub fn get_position(&self) -> Position {
        self.token.position
    }

    pub fn get_file(&self) -> &str {
        &self.file
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Returns a reference to the type binding power lookup table.
    pub fn get_type_bp_lookup(&self) -> &TypeBPLookup {
        &self.type_binding_power_lookup
    }

    /// Returns a reference to the type NUD lookup table.
    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    /// Returns a reference to the type LED lookup table.
    pub fn get_type_led_lookup(&self) -> &TypeLEDLookup {
        &self.type_led_lookup
    }

    /// Registers a left denotation (infix or postfix) handler for a token.
    ///
    /// Only tokens with a LED handler get a binding power; any other token
    /// ends the expression.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Registers a type left denotation handler.
    pub fn type_led(
        &mut self,
        kind: TokenKind,
        binding_power: BindingPower,
        led_fn: TypeLEDHandler,
    ) {
        self.type_binding_power_lookup.insert(kind, binding_power);
        self.type_led_lookup.insert(kind, led_fn);
    }

    /// Registers a type null denotation handler.
    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    /// Runs one grammar rule. In trace mode, rule entry and exit are logged
    /// with the current token position and nesting depth.
    pub fn traced<T>(
        &mut self,
        rule: &str,
        parse: impl FnOnce(&mut Parser) -> Result<T, Error>,
    ) -> Result<T, Error> {
        if !self.mode.contains(Mode::TRACE) {
            return parse(self);
        }

        self.print_trace(&format!("{} (", rule));
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        self.print_trace(")");

        result
    }

    fn print_trace(&mut self, text: &str) {
        let line = format!("{}: {}{}", self.token.position, ". ".repeat(self.depth), text);
        eprintln!("{}", line);
        self.trace_log.push(line);
    }

    /// Every trace line printed so far.
    pub fn trace_log(&self) -> &[String] {
        &self.trace_log
    }

    /// Parses the whole file. The error, if any, carries the file name.
    pub fn parse(&mut self) -> Result<File, Error> {
        debug!(file = %self.file, "parsing");

        let result = self.traced("File", parse_file_decls);
        match &result {
            Ok(file) => debug!(
                file = %self.file,
                uses = file.uses.len(),
                funcs = file.funcs.len(),
                "parsed"
            ),
            Err(error) => debug!(file = %self.file, %error, "parse failed"),
        }

        let file = self.file.clone();
        result.map_err(|error| error.with_file(&file))
    }
}

/// Readable name of a token kind for "expected ..." messages.
pub fn describe_kind(kind: TokenKind) -> String {
    match kind {
        TokenKind::Ident => String::from("identifier"),
        TokenKind::Integer => String::from("integer literal"),
        TokenKind::Char => String::from("character literal"),
        TokenKind::String => String::from("string literal"),
        TokenKind::Eof => String::from("end of file"),
        _ => format!("`{}`", kind),
    }
}

/// Parses a source buffer into a [`File`].
///
/// This is the main entry point for parsing. `file` is only used to label
/// the error. No partial tree is returned on failure.
pub fn parse_file(file: &str, source: &str, mode: Mode) -> Result<File, Error> {
    Parser::new(file, source, mode).parse()
}

/// Parses a single expression that must span the whole input.
pub fn parse_expression(source: &str) -> Result<Expr, Error> {
    let mut parser = Parser::new("<expr>", source, Mode::empty());
    let expr = parse_expr(&mut parser, BindingPower::Default)?;

    if parser.current_token_kind() != TokenKind::Eof {
        return Err(parser.unexpected("end of file"));
    }

    Ok(expr)
}

//! Diagnostic dumps of the front end stages.
//!
//! Each input file produces a sibling file with its extension replaced:
//! `.lexed` holds one `line:column repr` line per token, `.parsed` the debug
//! dump of the AST and `.typed` the checker verdict. When a stage fails, the
//! error text is written in place of the output and returned.

use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::Scanner,
        tokens::{Token, TokenKind},
    },
    parser::parser::{parse_file, Mode},
    type_checker::type_checker::type_check,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lex,
    Parse,
    Typecheck,
}

impl Stage {
    pub fn extension(&self) -> &'static str {
        match self {
            Stage::Lex => "lexed",
            Stage::Parse => "parsed",
            Stage::Typecheck => "typed",
        }
    }
}

fn io_error(path: &Path, error: std::io::Error) -> Error {
    Error::without_position(ErrorImpl::Internal {
        message: format!("{}: {}", path.display(), error),
    })
}

/// `dir/name.xi` becomes `dir/name.<stage extension>`.
pub fn output_path(file: &Path, stage: Stage) -> PathBuf {
    file.with_extension(stage.extension())
}

fn unquote(literal: &str) -> &str {
    let inner = literal.strip_prefix(['"', '\'']).unwrap_or(literal);
    inner.strip_suffix(['"', '\'']).unwrap_or(inner)
}

/// The `line:column repr` line for one token.
pub fn format_token(token: &Token) -> String {
    let repr = match token.kind {
        TokenKind::Integer => format!("integer {}", token.literal),
        TokenKind::String => format!("string {}", unquote(&token.literal)),
        TokenKind::Char => format!("character {}", unquote(&token.literal)),
        TokenKind::Ident => format!("id {}", token.literal),
        _ => token.literal.clone(),
    };

    format!("{} {}", token.position, repr)
}

/// Writes every token of `source` up to end of file. Stops at the first
/// error token, after writing it.
pub fn lex<W: Write>(source: &str, out: &mut W) -> Result<(), Error> {
    let write_error = |error: std::io::Error| {
        Error::without_position(ErrorImpl::Internal {
            message: error.to_string(),
        })
    };

    let mut scanner = Scanner::new(source);
    loop {
        let token = scanner.scan();
        if token.is_eof() {
            return Ok(());
        }

        writeln!(out, "{}", format_token(&token)).map_err(write_error)?;
        if token.is_error() {
            return Err(Error::new(
                ErrorImpl::Lexical {
                    message: token.literal,
                },
                token.position,
            ));
        }
    }
}

/// Runs `stage` over `source` and writes its dump to `out`.
pub fn dump<W: Write>(
    stage: Stage,
    file: &str,
    source: &str,
    mode: Mode,
    out: &mut W,
) -> Result<(), Error> {
    let write_error = |error: std::io::Error| {
        Error::without_position(ErrorImpl::Internal {
            message: error.to_string(),
        })
    };

    let result = match stage {
        Stage::Lex => lex(source, &mut *out).map_err(|error| error.with_file(file)),
        Stage::Parse => parse_file(file, source, mode)
            .and_then(|ast| writeln!(out, "{:#?}", ast).map_err(write_error)),
        Stage::Typecheck => parse_file(file, source, mode)
            .and_then(|ast| type_check(&ast).map_err(|error| error.with_file(file)))
            .and_then(|_| writeln!(out, "Valid Xi Program").map_err(write_error)),
    };

    // The lexed dump already ends with the offending token.
    if let (Err(error), Stage::Parse | Stage::Typecheck) = (&result, stage) {
        writeln!(out, "{}", error).map_err(write_error)?;
    }

    result
}

/// Reads `path`, runs `stage` and writes the sibling output file. Returns the
/// path written.
pub fn run_file(stage: Stage, mode: Mode, path: &Path) -> Result<PathBuf, Error> {
    let source = fs::read_to_string(path).map_err(|error| io_error(path, error))?;
    let output = output_path(path, stage);
    debug!(input = %path.display(), output = %output.display(), "writing diagnostic");

    let handle = fs::File::create(&output).map_err(|error| io_error(&output, error))?;
    let mut out = BufWriter::new(handle);

    let file = path.to_string_lossy();
    let result = dump(stage, &file, &source, mode, &mut out);
    out.flush().map_err(|error| io_error(&output, error))?;

    result.map(|_| output)
}

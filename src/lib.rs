#![allow(clippy::module_inception)]

use std::fmt::Display;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod diagnostic;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

/// A 1-based line and column inside one source file.
///
/// Ordering is lexicographic on (line, column). The file name is not part of
/// the position; whoever issued the token attaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }

    /// Position used for predeclared objects that have no source location.
    pub fn null() -> Self {
        Position { line: 0, column: 0 }
    }

    pub fn is_null(&self) -> bool {
        self.line == 0
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Returns the text of the given 1-based line, without its line terminator.
pub fn get_line_at_position(source: &str, position: Position) -> Option<&str> {
    if position.is_null() {
        return None;
    }

    source
        .split('\n')
        .nth(position.line as usize - 1)
        .map(|line| line.trim_end_matches('\r'))
}

pub fn display_error(error: &Error, source: &str, file: &str) {
    /*
        Error: TypeMismatch (expected `int`, found `bool`)
        -> sort.xi
           |
        20 | x:int = true
           | --------^
    */

    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {}", error.get_error_name());
    } else {
        eprintln!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    eprintln!("-> {}", file);

    let Some(position) = error.get_position() else {
        return;
    };
    let Some(line_text) = get_line_at_position(source, position) else {
        return;
    };

    let line_string = position.line.to_string();
    let padding = line_string.len() + 2;

    eprintln!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
    eprintln!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = (position.column as usize).saturating_sub(removed_whitespace).max(1);

    eprintln!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (string.chars().skip(start).collect(), start)
}

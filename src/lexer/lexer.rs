use std::thread::{self, JoinHandle};

use crossbeam::channel::{bounded, Receiver, Sender};
use tracing::{debug, trace};

use crate::{Position, MK_ERROR_TOKEN, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

/// The consumer hung up; the producer should stop.
#[derive(Debug)]
pub struct Hangup;

type Emit = Result<(), Hangup>;

/// One state of the lexer. Each state consumes some input, emits zero or more
/// tokens and names the state to run next, or `None` once `Eof` was sent.
pub struct State(fn(&mut Lexer) -> Result<Option<State>, Hangup>);

/// Producer half of the scanner. Runs on its own thread and hands every token
/// over a rendezvous channel, so at most one token is ever in flight.
pub struct Lexer {
    source: Vec<char>,
    pos: usize,
    start: usize,
    line: u32,
    line_start: usize,
    token_position: Position,
    sink: Sender<Token>,
}

impl Lexer {
    pub fn new(source: &str, sink: Sender<Token>) -> Lexer {
        Lexer {
            source: source.chars().collect(),
            pos: 0,
            start: 0,
            line: 1,
            line_start: 0,
            token_position: Position::new(1, 1),
            sink,
        }
    }

    pub fn run(mut self) {
        let mut state = State(scan_default);
        loop {
            match (state.0)(&mut self) {
                Ok(Some(next)) => state = next,
                Ok(None) => break,
                Err(Hangup) => {
                    debug!("scanner consumer dropped, stopping producer");
                    break;
                }
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek() {
            self.pos += 1;
            if ch == '\n' {
                self.line += 1;
                self.line_start = self.pos;
            }
        }
    }

    fn current_position(&self) -> Position {
        Position::new(self.line, (self.pos - self.line_start + 1) as u32)
    }

    fn begin(&mut self) {
        self.start = self.pos;
        self.token_position = self.current_position();
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.pos].iter().collect()
    }

    fn send(&self, token: Token) -> Emit {
        trace!(kind = %token.kind, position = %token.position, literal = %token.literal, "token");
        self.sink.send(token).map_err(|_| Hangup)
    }

    fn emit(&mut self, kind: TokenKind) -> Emit {
        let token = MK_TOKEN!(kind, self.lexeme(), self.token_position);
        self.start = self.pos;
        self.send(token)
    }

    fn error_at(&self, position: Position, message: String) -> Emit {
        self.send(MK_ERROR_TOKEN!(position, "{}", message))
    }

    /// Errors found inside a token are reported at the token's start, so
    /// positions never decrease across the stream.
    fn error_here(&self, message: String) -> Emit {
        self.error_at(self.token_position, message)
    }

    fn switch2(&mut self, single: TokenKind, double: TokenKind) -> TokenKind {
        if self.peek() == Some('=') {
            self.advance();
            double
        } else {
            single
        }
    }

    /// Scans one escape sequence starting at the backslash. On failure an
    /// error token is emitted and the offending character is left unconsumed.
    fn scan_escape(&mut self) -> Result<bool, Hangup> {
        self.advance();

        match self.peek() {
            Some('\\' | '"' | '\'' | 'n' | 't') => {
                self.advance();
                Ok(true)
            }
            Some('x') => {
                self.advance();
                if self.peek() != Some('{') {
                    self.error_here(String::from("expected { in escape sequence"))?;
                    return Ok(false);
                }
                self.advance();

                match self.peek() {
                    Some(ch) if ch.is_ascii_hexdigit() => self.advance(),
                    Some(ch) => {
                        self.error_here(format!(
                            "illegal character {} in escape sequence",
                            describe_char(ch)
                        ))?;
                        return Ok(false);
                    }
                    None => {
                        self.error_here(String::from("expected } in escape sequence"))?;
                        return Ok(false);
                    }
                }

                for _ in 0..3 {
                    match self.peek() {
                        Some(ch) if ch.is_ascii_hexdigit() => self.advance(),
                        _ => break,
                    }
                }

                if self.peek() != Some('}') {
                    self.error_here(String::from("expected } in escape sequence"))?;
                    return Ok(false);
                }
                self.advance();
                Ok(true)
            }
            _ => {
                self.error_here(String::from("unknown escape sequence"))?;
                Ok(false)
            }
        }
    }

    fn skip_to_quote(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\'' {
                self.advance();
                return;
            }
            self.advance();
        }
    }
}

fn is_alpha(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '\''
}

/// Renders a character as `U+0040 '@'`.
pub fn describe_char(ch: char) -> String {
    format!("U+{:04X} '{}'", ch as u32, ch)
}

fn scan_default(lexer: &mut Lexer) -> Result<Option<State>, Hangup> {
    lexer.begin();

    let Some(ch) = lexer.peek() else {
        lexer.emit(TokenKind::Eof)?;
        return Ok(None);
    };

    if is_alpha(ch) || ch == '_' {
        return Ok(Some(State(scan_ident)));
    }
    if ch.is_ascii_digit() {
        return Ok(Some(State(scan_int)));
    }

    match ch {
        '"' => return Ok(Some(State(scan_string))),
        '\'' => return Ok(Some(State(scan_char))),
        _ => {}
    }

    lexer.advance();
    let kind = match ch {
        '+' => TokenKind::Add,
        '-' => TokenKind::Sub,
        '*' => TokenKind::Mul,
        '/' => {
            if lexer.peek() == Some('/') {
                while !matches!(lexer.peek(), Some('\n') | None) {
                    lexer.advance();
                }
                return Ok(Some(State(scan_default)));
            }
            TokenKind::Div
        }
        '%' => TokenKind::Rem,
        '&' => TokenKind::And,
        '|' => TokenKind::Or,
        '(' => TokenKind::Lparen,
        '[' => TokenKind::Lbrack,
        '{' => TokenKind::Lbrace,
        ')' => TokenKind::Rparen,
        ']' => TokenKind::Rbrack,
        '}' => TokenKind::Rbrace,
        ',' => TokenKind::Comma,
        ':' => TokenKind::Colon,
        ';' => TokenKind::Semicolon,
        '=' => lexer.switch2(TokenKind::Assign, TokenKind::Eq),
        '!' => lexer.switch2(TokenKind::Not, TokenKind::Neq),
        '<' => lexer.switch2(TokenKind::Lt, TokenKind::Le),
        '>' => lexer.switch2(TokenKind::Gt, TokenKind::Ge),
        ' ' | '\t' | '\r' | '\n' => return Ok(Some(State(scan_default))),
        _ => {
            lexer.error_at(
                lexer.token_position,
                format!("unexpected token: {}", describe_char(ch)),
            )?;
            return Ok(Some(State(scan_default)));
        }
    };

    lexer.emit(kind)?;
    Ok(Some(State(scan_default)))
}

fn scan_ident(lexer: &mut Lexer) -> Result<Option<State>, Hangup> {
    lexer.advance();
    while lexer.peek().is_some_and(is_ident_continue) {
        lexer.advance();
    }

    let kind = RESERVED_LOOKUP
        .get(lexer.lexeme().as_str())
        .copied()
        .unwrap_or(TokenKind::Ident);
    lexer.emit(kind)?;

    Ok(Some(State(scan_default)))
}

fn scan_int(lexer: &mut Lexer) -> Result<Option<State>, Hangup> {
    while lexer.peek().is_some_and(|ch| ch.is_ascii_digit()) {
        lexer.advance();
    }

    if let Some(ch) = lexer.peek().filter(|ch| is_alpha(*ch)) {
        lexer.error_here(format!("unexpected token: {}", describe_char(ch)))?;
    }

    lexer.emit(TokenKind::Integer)?;
    Ok(Some(State(scan_default)))
}

fn scan_string(lexer: &mut Lexer) -> Result<Option<State>, Hangup> {
    lexer.advance();

    loop {
        match lexer.peek() {
            None | Some('\n') => {
                lexer.error_at(
                    lexer.token_position,
                    String::from("string literal not terminated"),
                )?;
                lexer.emit(TokenKind::String)?;
                return Ok(Some(State(scan_default)));
            }
            Some('\\') => {
                lexer.scan_escape()?;
            }
            Some('"') => {
                lexer.advance();
                lexer.emit(TokenKind::String)?;
                return Ok(Some(State(scan_default)));
            }
            Some(_) => lexer.advance(),
        }
    }
}

fn scan_char(lexer: &mut Lexer) -> Result<Option<State>, Hangup> {
    lexer.advance();

    match lexer.peek() {
        None | Some('\n') => {
            lexer.error_at(
                lexer.token_position,
                String::from("character literal not terminated"),
            )?;
            lexer.emit(TokenKind::Char)?;
            return Ok(Some(State(scan_default)));
        }
        Some('\'') => {
            lexer.error_at(lexer.token_position, String::from("illegal character literal"))?;
            lexer.advance();
            lexer.emit(TokenKind::Char)?;
            return Ok(Some(State(scan_default)));
        }
        Some('\\') => {
            if !lexer.scan_escape()? {
                lexer.skip_to_quote();
                lexer.emit(TokenKind::Char)?;
                return Ok(Some(State(scan_default)));
            }
        }
        Some(_) => lexer.advance(),
    }

    match lexer.peek() {
        Some('\'') => lexer.advance(),
        None | Some('\n') => lexer.error_at(
            lexer.token_position,
            String::from("character literal not terminated"),
        )?,
        Some(_) => {
            lexer.error_at(lexer.token_position, String::from("illegal character literal"))?;
            lexer.skip_to_quote();
        }
    }

    lexer.emit(TokenKind::Char)?;
    Ok(Some(State(scan_default)))
}

/// Consumer half of the scanner.
///
/// `scan` pulls one token at a time from the producer thread. After the first
/// `Eof` it keeps returning that token. Dropping the scanner disconnects the
/// channel, which stops the producer at its next hand-off.
pub struct Scanner {
    receiver: Option<Receiver<Token>>,
    handle: Option<JoinHandle<()>>,
    eof: Option<Token>,
    last_position: Position,
    error_count: usize,
}

impl Scanner {
    pub fn new(source: &str) -> Scanner {
        let (sender, receiver) = bounded(0);
        let lexer = Lexer::new(source, sender);

        let handle = thread::Builder::new()
            .name(String::from("xi-scanner"))
            .spawn(move || lexer.run())
            .ok();

        Scanner {
            receiver: Some(receiver),
            handle,
            eof: None,
            last_position: Position::new(1, 1),
            error_count: 0,
        }
    }

    pub fn scan(&mut self) -> Token {
        if let Some(eof) = &self.eof {
            return eof.clone();
        }

        let received = self.receiver.as_ref().map(|receiver| receiver.recv());
        let token = match received {
            Some(Ok(token)) => token,
            _ => {
                self.eof = Some(MK_TOKEN!(TokenKind::Eof, String::new(), self.last_position));
                self.error_count += 1;
                return MK_ERROR_TOKEN!(
                    self.last_position,
                    "token stream closed before end of file"
                );
            }
        };

        if token.is_error() {
            self.error_count += 1;
        }
        if token.is_eof() {
            self.eof = Some(token.clone());
        }
        self.last_position = token.position;

        token
    }

    /// Number of error tokens handed out so far.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Consumes the scanner into an iterator that yields `Eof` once.
    pub fn tokens(self) -> Tokens {
        Tokens {
            scanner: self,
            done: false,
        }
    }
}

/// Iterator over a scanner's tokens, ending after the first `Eof`.
pub struct Tokens {
    scanner: Scanner,
    done: bool,
}

impl Iterator for Tokens {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }

        let token = self.scanner.scan();
        self.done = token.is_eof();
        Some(token)
    }
}

impl Drop for Scanner {
    fn drop(&mut self) {
        self.receiver.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Scans the whole source, error tokens included, up to and including `Eof`.
pub fn tokenize(source: &str) -> Vec<Token> {
    Scanner::new(source).tokens().collect()
}

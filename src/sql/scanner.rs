use std::{io::Read, iter::FusedIterator};

use tracing::{debug, trace};
use unicode_general_category::{get_general_category, GeneralCategory};

use super::{
    cursor::{Cursor, DEFAULT_CHUNK_SIZE},
    error::ScanError,
    keywords,
    token::{Token, TokenKind},
};

const DIGITS: &str = "0123456789";
const NONZERO_DIGITS: &str = "123456789";
// Characters allowed after a backslash in string literals, besides `u`.
const SIMPLE_ESCAPES: &str = "\"\\/bfnrt";

/// String literal delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Double,
    Single,
    Triple,
}

impl Quote {
    pub fn as_str(self) -> &'static str {
        match self {
            Quote::Double => "\"",
            Quote::Single => "'",
            Quote::Triple => "\"\"\"",
        }
    }

    fn escaped(self) -> &'static str {
        match self {
            Quote::Double => "\\\"",
            Quote::Single => "\\'",
            Quote::Triple => "\\\"\"\"",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Text,
    String(Quote),
    QuotedIdentifier,
    Number,
    Identifier,
    Done,
}

/// Pull-based SQL tokenizer.
///
/// Each call to [`Scanner::next_token`] runs the state machine only until
/// one token has been recognized, so the scanner never works ahead of its
/// consumer. The stream always ends with exactly one EOF or one ILLEGAL
/// token; after that it yields nothing.
pub struct Scanner<R> {
    cursor: Cursor<R>,
    state: State,
    pending: Option<Token>,
    error: Option<ScanError>,
}

impl<R: Read> Scanner<R> {
    pub fn new(reader: R) -> Self {
        Scanner::with_chunk_size(reader, DEFAULT_CHUNK_SIZE)
    }

    /// Like `new`, reading from the source `chunk_size` bytes at a time.
    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        Scanner {
            cursor: Cursor::new(reader, chunk_size),
            state: State::Text,
            pending: None,
            error: None,
        }
    }

    pub fn next_token(&mut self) -> Option<Token> {
        while self.pending.is_none() && self.state != State::Done {
            let step = match self.state {
                State::Text => self.lex_text(),
                State::String(quote) => self.lex_string(quote),
                State::QuotedIdentifier => self.lex_quoted_identifier(),
                State::Number => self.lex_number(),
                State::Identifier => self.lex_identifier(),
                State::Done => break,
            };
            match step {
                Ok(next) => {
                    if next != self.state {
                        trace!(from = ?self.state, to = ?next, "state");
                    }
                    self.state = next;
                }
                Err(err) => {
                    debug!(
                        error = %err,
                        lexical = err.is_lexical(),
                        offset = self.cursor.offset(),
                        "scan failed"
                    );
                    self.pending = Some(self.cursor.emit_error(&err));
                    self.error = Some(err);
                    self.state = State::Done;
                }
            }
        }
        self.pending.take()
    }

    /// The failure behind the ILLEGAL token, once it has been produced.
    pub fn error(&self) -> Option<&ScanError> {
        self.error.as_ref()
    }

    pub fn into_error(self) -> Option<ScanError> {
        self.error
    }

    fn emit(&mut self, kind: TokenKind) {
        let token = self.cursor.emit(kind);
        trace!(kind = %token.kind, literal = %token.literal, start = token.start, "emit");
        if kind == TokenKind::Eof {
            debug!(offset = token.start, "end of input");
        }
        self.pending = Some(token);
    }

    fn lex_text(&mut self) -> Result<State, ScanError> {
        loop {
            if self.cursor.has_prefix(Quote::Triple.as_str())? {
                for _ in 0..3 {
                    self.cursor.skip()?;
                }
                return Ok(State::String(Quote::Triple));
            }

            let Some(c) = self.cursor.peek()? else {
                self.emit(TokenKind::Eof);
                return Ok(State::Done);
            };
            if let Some(kind) = self.lex_punctuation(c)? {
                self.emit(kind);
                return Ok(State::Text);
            }
            match c {
                '"' => {
                    self.cursor.skip()?;
                    return Ok(State::String(Quote::Double));
                }
                '\'' => {
                    self.cursor.skip()?;
                    return Ok(State::String(Quote::Single));
                }
                '`' => {
                    self.cursor.skip()?;
                    return Ok(State::QuotedIdentifier);
                }
                c if c.is_whitespace() => {
                    self.cursor.skip()?;
                }
                '0'..='9' | '-' => return Ok(State::Number),
                _ => return Ok(State::Identifier),
            }
        }
    }

    /// Consumes a punctuation token starting with `c`, if there is one.
    /// `==` and `!=` win over `=` and `!`.
    fn lex_punctuation(&mut self, c: char) -> Result<Option<TokenKind>, ScanError> {
        let (kind, longer) = match c {
            ';' => (TokenKind::Semicolon, None),
            '.' => (TokenKind::Period, None),
            '*' => (TokenKind::Asterisk, None),
            ',' => (TokenKind::Comma, None),
            '(' => (TokenKind::LParen, None),
            ')' => (TokenKind::RParen, None),
            '{' => (TokenKind::LBrace, None),
            '}' => (TokenKind::RBrace, None),
            '[' => (TokenKind::LSquare, None),
            ']' => (TokenKind::RSquare, None),
            '<' => (TokenKind::Lt, None),
            '>' => (TokenKind::Gt, None),
            '+' => (TokenKind::Plus, None),
            '/' => (TokenKind::Slash, None),
            '=' => (TokenKind::Assign, Some(TokenKind::Eq)),
            '!' => (TokenKind::Bang, Some(TokenKind::NotEq)),
            _ => return Ok(None),
        };
        self.cursor.next()?;
        match longer {
            Some(longer) if self.cursor.accept("=")? => Ok(Some(longer)),
            _ => Ok(Some(kind)),
        }
    }

    fn lex_string(&mut self, quote: Quote) -> Result<State, ScanError> {
        let escaped = quote.escaped();
        let delimiter = quote.as_str();
        loop {
            if self.cursor.has_prefix(escaped)? {
                for _ in 0..escaped.len() {
                    self.cursor.next()?;
                }
                continue;
            }
            if self.cursor.has_prefix(delimiter)? {
                self.emit(TokenKind::String);
                for _ in 0..delimiter.len() {
                    self.cursor.skip()?;
                }
                return Ok(State::Text);
            }
            match self.cursor.next()? {
                None => return Err(ScanError::UnclosedString),
                Some('\\') => self.lex_escape()?,
                Some(c) if c.is_control() => return Err(ScanError::ControlCharacter),
                Some(_) => {}
            }
        }
    }

    // Called with the backslash already consumed.
    fn lex_escape(&mut self) -> Result<(), ScanError> {
        if self.cursor.accept(SIMPLE_ESCAPES)? {
            return Ok(());
        }
        match self.cursor.next()? {
            Some('u') => self.lex_hex_digits(),
            _ => Err(ScanError::UnsupportedEscape),
        }
    }

    fn lex_hex_digits(&mut self) -> Result<(), ScanError> {
        for _ in 0..4 {
            if !self.cursor.accept_if(|c| c.is_ascii_hexdigit())? {
                return Err(ScanError::ExpectedHexDigits);
            }
        }
        Ok(())
    }

    fn lex_quoted_identifier(&mut self) -> Result<State, ScanError> {
        loop {
            match self.cursor.peek()? {
                Some('`') => {
                    if self.cursor.lexeme().is_empty() {
                        return Err(ScanError::EmptyQuotedIdentifier);
                    }
                    self.emit(TokenKind::Ident);
                    self.cursor.skip()?;
                    return Ok(State::Text);
                }
                Some(_) => {
                    self.cursor.next()?;
                }
                None => return Err(ScanError::UnclosedQuotedIdentifier),
            }
        }
    }

    fn lex_number(&mut self) -> Result<State, ScanError> {
        self.cursor.accept("-")?;
        if self.cursor.accept(NONZERO_DIGITS)? {
            self.cursor.accept_run(DIGITS)?;
        } else if self.cursor.accept("0")? {
            if matches!(self.cursor.peek()?, Some(c) if c.is_ascii_digit()) {
                return Err(ScanError::BadDigit);
            }
        } else {
            return Err(ScanError::BadDigit);
        }

        if self.cursor.accept(".")? {
            self.cursor.accept_run(DIGITS)?;
        }
        if self.cursor.accept("eE")? {
            self.cursor.accept("+-")?;
            if !self.cursor.accept(DIGITS)? {
                return Err(ScanError::ExponentDigitExpected);
            }
            self.cursor.accept_run(DIGITS)?;
        }
        self.emit(TokenKind::Number);
        Ok(State::Text)
    }

    fn lex_identifier(&mut self) -> Result<State, ScanError> {
        if self.cursor.has_prefix("\\u")? {
            self.cursor.next()?;
            self.cursor.next()?;
            self.lex_hex_digits()?;
        } else if !self
            .cursor
            .accept_if(|c| is_letter(c) || c == '$' || c == '_')?
        {
            return Err(ScanError::IdentifierExpected);
        }

        while self.cursor.accept_if(is_identifier_part)? {}

        let kind = keywords::lookup(self.cursor.lexeme());
        self.emit(kind);
        Ok(State::Text)
    }
}

// Letters are categories L*, digits are Nd. Marks, letter numbers and
// other numerics (`²`, `½`, `Ⅻ`) are neither.
fn is_letter(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

fn is_digit(c: char) -> bool {
    get_general_category(c) == GeneralCategory::DecimalNumber
}

fn is_identifier_part(c: char) -> bool {
    is_letter(c) || is_digit(c) || c == '_'
}

impl<R: Read> Iterator for Scanner<R> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

impl<R: Read> FusedIterator for Scanner<R> {}

/// Scans all of `source`, returning the tokens up to and including EOF,
/// or the error that stopped the scan.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ScanError> {
    let mut scanner = Scanner::new(source.as_bytes());
    let tokens: Vec<Token> = scanner.by_ref().collect();
    match scanner.into_error() {
        Some(err) => Err(err),
        None => Ok(tokens),
    }
}

use std::{io, mem};

use bytes::{Buf, BytesMut};

use super::{
    error::ScanError,
    token::{Token, TokenKind},
};

pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Decodes a byte stream into chars on demand and collects the pending
/// lexeme. Lookahead is served from `window`, which holds bytes already
/// read from the source but not yet consumed.
pub struct Cursor<R> {
    reader: R,
    window: BytesMut,
    chunk_size: usize,
    exhausted: bool,
    buffer: String,
    pos: usize,
    line: usize,
    column: usize,
    start: usize,
    start_line: usize,
    start_column: usize,
}

impl<R: io::Read> Cursor<R> {
    pub fn new(reader: R, chunk_size: usize) -> Self {
        Cursor {
            reader,
            window: BytesMut::with_capacity(chunk_size),
            chunk_size: chunk_size.max(1),
            exhausted: false,
            buffer: String::new(),
            pos: 0,
            line: 1,
            column: 1,
            start: 0,
            start_line: 1,
            start_column: 1,
        }
    }

    /// Consumes the next char and appends it to the pending lexeme.
    /// `None` means the input is exhausted.
    pub fn next(&mut self) -> Result<Option<char>, ScanError> {
        if self.buffer.is_empty() {
            self.mark();
        }
        let c = self.advance()?;
        if let Some(c) = c {
            self.buffer.push(c);
        }
        Ok(c)
    }

    /// Consumes the next char without buffering it.
    pub fn skip(&mut self) -> Result<Option<char>, ScanError> {
        let c = self.advance()?;
        if self.buffer.is_empty() {
            self.mark();
        }
        Ok(c)
    }

    pub fn peek(&mut self) -> Result<Option<char>, ScanError> {
        Ok(self.decode()?.map(|(c, _)| c))
    }

    /// Tests the upcoming bytes against `prefix` without consuming them.
    /// Running out of input is a mismatch, not an error.
    pub fn has_prefix(&mut self, prefix: &str) -> Result<bool, ScanError> {
        let prefix = prefix.as_bytes();
        self.fill(prefix.len())?;
        Ok(self.window.len() >= prefix.len() && &self.window[..prefix.len()] == prefix)
    }

    /// Consumes the next char if it is one of `valid`.
    pub fn accept(&mut self, valid: &str) -> Result<bool, ScanError> {
        self.accept_if(|c| valid.contains(c))
    }

    pub fn accept_if(&mut self, pred: impl Fn(char) -> bool) -> Result<bool, ScanError> {
        match self.peek()? {
            Some(c) if pred(c) => {
                self.next()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn accept_run(&mut self, valid: &str) -> Result<(), ScanError> {
        while self.accept(valid)? {}
        Ok(())
    }

    /// Builds a token from the pending lexeme and starts a new one at the
    /// current position.
    pub fn emit(&mut self, kind: TokenKind) -> Token {
        let literal = mem::take(&mut self.buffer);
        let token = Token::new(kind, literal, self.start, self.start_line, self.start_column);
        self.mark();
        token
    }

    /// Same position bookkeeping as `emit`, for the ILLEGAL token.
    pub fn emit_error(&mut self, err: &ScanError) -> Token {
        let token = Token::new(
            TokenKind::Illegal,
            err.to_string(),
            self.start,
            self.start_line,
            self.start_column,
        );
        self.buffer.clear();
        self.mark();
        token
    }

    pub fn lexeme(&self) -> &str {
        &self.buffer
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    fn mark(&mut self) {
        self.start = self.pos;
        self.start_line = self.line;
        self.start_column = self.column;
    }

    fn advance(&mut self) -> Result<Option<char>, ScanError> {
        let Some((c, width)) = self.decode()? else {
            return Ok(None);
        };
        self.window.advance(width);
        self.pos += width;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Ok(Some(c))
    }

    fn decode(&mut self) -> Result<Option<(char, usize)>, ScanError> {
        self.fill(1)?;
        let Some(&lead) = self.window.first() else {
            return Ok(None);
        };
        let width = utf8_width(lead);
        self.fill(width)?;
        let bytes = &self.window[..width.min(self.window.len())];
        match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.chars().next().map(|c| (c, width))),
            Err(_) => Err(ScanError::InvalidUtf8 { offset: self.pos }),
        }
    }

    /// Reads until at least `n` bytes are buffered or the source ends.
    fn fill(&mut self, n: usize) -> Result<(), ScanError> {
        while self.window.len() < n && !self.exhausted {
            let len = self.window.len();
            self.window.resize(len + self.chunk_size, 0);
            match self.reader.read(&mut self.window[len..]) {
                Ok(0) => {
                    self.window.truncate(len);
                    self.exhausted = true;
                }
                Ok(read) => self.window.truncate(len + read),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => self.window.truncate(len),
                Err(e) => {
                    self.window.truncate(len);
                    return Err(e.into());
                }
            }
        }
        Ok(())
    }
}

// Width of a UTF-8 sequence from its lead byte. Stray continuation bytes
// report 1 and are rejected by the decoder.
fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0xBF => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    }
}

use std::io;

use thiserror::Error;

/// A fatal scanning failure. Its message becomes the literal of the
/// ILLEGAL token that ends the stream.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("unsupported escape character")]
    UnsupportedEscape,
    #[error("expected 4 hexadecimal digits")]
    ExpectedHexDigits,
    #[error("cannot contain control characters in strings")]
    ControlCharacter,
    #[error("unclosed string")]
    UnclosedString,
    #[error("unclosed quoted string")]
    UnclosedQuotedIdentifier,
    #[error("quoted identifier cannot be empty")]
    EmptyQuotedIdentifier,
    #[error("bad digit for number")]
    BadDigit,
    #[error("digit expected for number exponent")]
    ExponentDigitExpected,
    #[error("identifier expected")]
    IdentifierExpected,
    #[error("invalid utf-8 sequence at byte {offset}")]
    InvalidUtf8 { offset: usize },
    #[error("{0}")]
    Io(#[from] io::Error),
}

impl ScanError {
    /// True when the input itself is malformed, as opposed to the reader
    /// failing underneath the scanner.
    pub fn is_lexical(&self) -> bool {
        !matches!(self, ScanError::Io(_))
    }
}

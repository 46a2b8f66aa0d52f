use std::fmt;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum TokenKind {
    Illegal,
    Eof,

    // Identifiers + literals
    Ident,
    Number,
    String,

    // Operators. `-` always starts a number, so `Minus` is never scanned;
    // it is there for the parser's vocabulary.
    Assign, Plus, Minus, Bang, Asterisk, Slash,
    Lt, Gt, Eq, NotEq,

    // Delimiters
    Comma, Semicolon, Period,

    // Brackets
    LParen, RParen, LBrace, RBrace, LSquare, RSquare,

    // Keywords
    Select, From, True, False, Null, Array,

    // Types
    StringType,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Eof => "EOF",
            TokenKind::Ident => "IDENT",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING LITERAL",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Bang => "!",
            TokenKind::Asterisk => "*",
            TokenKind::Slash => "/",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Period => ".",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LSquare => "[",
            TokenKind::RSquare => "]",
            TokenKind::Select => "SELECT",
            TokenKind::From => "FROM",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Null => "NULL",
            TokenKind::Array => "ARRAY",
            TokenKind::StringType => "STRING",
        }
    }

    /// EOF and ILLEGAL end a token stream; nothing is produced after them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TokenKind::Eof | TokenKind::Illegal)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the lexeme. Delimiters of strings and quoted
    /// identifiers are not included; for ILLEGAL this is the diagnostic.
    pub literal: String,
    /// Byte offset where the lexeme starts.
    pub start: usize,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, literal: String, start: usize, line: usize, column: usize) -> Self {
        Token {
            kind,
            literal,
            start,
            line,
            column,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:?} @{}:{}",
            self.kind, self.literal, self.line, self.column
        )
    }
}

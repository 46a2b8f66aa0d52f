//! Tokenizer for BigQuery-flavoured SQL.
//!
//! [`Scanner`] turns any byte source into a stream of [`Token`]s, one per
//! request. The stream ends with exactly one EOF or ILLEGAL token; the
//! first lexical or I/O failure stops the scan.
//!
//! ```
//! use bqlex::{Scanner, TokenKind};
//!
//! let kinds: Vec<TokenKind> = Scanner::new("select * from t;".as_bytes())
//!     .map(|token| token.kind)
//!     .collect();
//! assert_eq!(
//!     kinds,
//!     [
//!         TokenKind::Select,
//!         TokenKind::Asterisk,
//!         TokenKind::From,
//!         TokenKind::Ident,
//!         TokenKind::Semicolon,
//!         TokenKind::Eof,
//!     ]
//! );
//! ```

pub mod sql;

pub use sql::{
    error::ScanError,
    scanner::{tokenize, Quote, Scanner},
    stream::TokenStream,
    token::{Token, TokenKind},
};

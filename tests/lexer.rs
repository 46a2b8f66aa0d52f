use bqlex::{tokenize, ScanError, Scanner, Token, TokenKind};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use TokenKind::{
    Array, Asterisk, Comma, Eof, False, Ident, Illegal, LSquare, NotEq, Null, Number, Period,
    RSquare, Select, Semicolon, StringType, True,
};

fn lex(input: &str) -> Vec<(TokenKind, String)> {
    Scanner::new(input.as_bytes())
        .map(|t| (t.kind, t.literal))
        .collect()
}

fn expect(tokens: &[(TokenKind, &str)]) -> Vec<(TokenKind, String)> {
    tokens.iter().map(|&(k, l)| (k, l.to_string())).collect()
}

#[track_caller]
fn check(cases: &[(&str, &[(TokenKind, &str)])]) {
    for (input, tokens) in cases {
        assert_eq!(lex(input), expect(tokens), "input: {input:?}");
    }
}

#[test]
fn empty() {
    check(&[("", &[(Eof, "")]), (" \t\r\n ", &[(Eof, "")])]);
}

#[test]
fn identifiers() {
    check(&[
        ("Customers5", &[(Ident, "Customers5"), (Eof, "")]),
        ("_dataField1", &[(Ident, "_dataField1"), (Eof, "")]),
        ("$foo", &[(Ident, "$foo"), (Eof, "")]),
        ("a1_b2", &[(Ident, "a1_b2"), (Eof, "")]),
        ("日本語 テーブル", &[(Ident, "日本語"), (Ident, "テーブル"), (Eof, "")]),
        ("\\u00e9te", &[(Ident, "\\u00e9te"), (Eof, "")]),
        ("x٣", &[(Ident, "x٣"), (Eof, "")]),
        ("ǅungla", &[(Ident, "ǅungla"), (Eof, "")]),
        (
            "foo.GROUP",
            &[(Ident, "foo"), (Period, "."), (Ident, "GROUP"), (Eof, "")],
        ),
    ]);
}

#[test]
fn quoted_identifiers() {
    check(&[
        ("`tableName~`", &[(Ident, "tableName~"), (Eof, "")]),
        ("`select`", &[(Ident, "select"), (Eof, "")]),
        ("`my table`", &[(Ident, "my table"), (Eof, "")]),
        (
            "foo.`GROUP`",
            &[(Ident, "foo"), (Period, "."), (Ident, "GROUP"), (Eof, "")],
        ),
    ]);
}

#[test]
fn keywords_keep_source_casing() {
    check(&[
        ("SELECT", &[(Select, "SELECT"), (Eof, "")]),
        ("select", &[(Select, "select"), (Eof, "")]),
        (
            "true FALSE Null aRRay String",
            &[
                (True, "true"),
                (False, "FALSE"),
                (Null, "Null"),
                (Array, "aRRay"),
                (StringType, "String"),
                (Eof, ""),
            ],
        ),
    ]);
}

#[test]
fn strings() {
    check(&[
        ("\"abc\"", &[(TokenKind::String, "abc"), (Eof, "")]),
        ("\"it's\"", &[(TokenKind::String, "it's"), (Eof, "")]),
        ("'it\\'s'", &[(TokenKind::String, "it\\'s"), (Eof, "")]),
        ("'Title: \"Boy\"'", &[(TokenKind::String, "Title: \"Boy\""), (Eof, "")]),
        ("''", &[(TokenKind::String, ""), (Eof, "")]),
        ("\"\"", &[(TokenKind::String, ""), (Eof, "")]),
        (
            "\"\"\"a \"quoted\" word\"\"\"",
            &[(TokenKind::String, "a \"quoted\" word"), (Eof, "")],
        ),
        ("\"\"\"\"\"\"", &[(TokenKind::String, ""), (Eof, "")]),
        ("'a' 'b'", &[(TokenKind::String, "a"), (TokenKind::String, "b"), (Eof, "")]),
    ]);
}

#[test]
fn string_escapes_stay_raw() {
    for escape in [
        "\\\"", "\\\\", "\\/", "\\b", "\\f", "\\n", "\\r", "\\t", "\\u1234", "\\uABcd",
    ] {
        let input = format!("\"{escape}\"");
        assert_eq!(lex(&input), expect(&[(TokenKind::String, escape), (Eof, "")]));
    }
}

#[test]
fn numbers() {
    for number in [
        "0", "0.12", "-0.12", "10.12", "1e2", "1e-2", "1E+99", "1.23E+99", "1.", "-7",
    ] {
        assert_eq!(lex(number), expect(&[(Number, number), (Eof, "")]));
    }
    check(&[
        ("1.2.3", &[(Number, "1.2"), (Period, "."), (Number, "3"), (Eof, "")]),
        ("12abc", &[(Number, "12"), (Ident, "abc"), (Eof, "")]),
    ]);
}

#[test]
fn statements() {
    check(&[
        (
            "SELECT * FROM table",
            &[
                (Select, "SELECT"),
                (Asterisk, "*"),
                (TokenKind::From, "FROM"),
                (Ident, "table"),
                (Eof, ""),
            ],
        ),
        (
            "select * from table",
            &[
                (Select, "select"),
                (Asterisk, "*"),
                (TokenKind::From, "from"),
                (Ident, "table"),
                (Eof, ""),
            ],
        ),
        (
            "SELECT * FROM table;",
            &[
                (Select, "SELECT"),
                (Asterisk, "*"),
                (TokenKind::From, "FROM"),
                (Ident, "table"),
                (Semicolon, ";"),
                (Eof, ""),
            ],
        ),
        (
            "SELECT name, ARRAY[1, 2] FROM `project.dataset.t` WHERE x != 'y'",
            &[
                (Select, "SELECT"),
                (Ident, "name"),
                (Comma, ","),
                (Array, "ARRAY"),
                (LSquare, "["),
                (Number, "1"),
                (Comma, ","),
                (Number, "2"),
                (RSquare, "]"),
                (TokenKind::From, "FROM"),
                (Ident, "project.dataset.t"),
                (Ident, "WHERE"),
                (Ident, "x"),
                (NotEq, "!="),
                (TokenKind::String, "y"),
                (Eof, ""),
            ],
        ),
    ]);
}

#[test]
fn whitespace_does_not_change_tokens() {
    assert_eq!(lex("SELECT\t*\n\nFROM   t ;"), lex("SELECT * FROM t;"));
    assert_eq!(lex("  a  "), lex("a"));
}

#[test]
fn errors() {
    check(&[
        ("\"\\x23\"", &[(Illegal, "unsupported escape character")]),
        ("\"\\u123g\"", &[(Illegal, "expected 4 hexadecimal digits")]),
        ("\"foo", &[(Illegal, "unclosed string")]),
        ("'foo\\'", &[(Illegal, "unclosed string")]),
        (
            "\"foo\tbar\"",
            &[(Illegal, "cannot contain control characters in strings")],
        ),
        ("'a\nb'", &[(Illegal, "cannot contain control characters in strings")]),
        // Rejected even when the closing quote follows right away.
        ("\"a\t\"", &[(Illegal, "cannot contain control characters in strings")]),
        ("'\t'", &[(Illegal, "cannot contain control characters in strings")]),
        ("`abc", &[(Illegal, "unclosed quoted string")]),
        ("``", &[(Illegal, "quoted identifier cannot be empty")]),
        ("0123", &[(Illegal, "bad digit for number")]),
        ("-", &[(Illegal, "bad digit for number")]),
        ("1e", &[(Illegal, "digit expected for number exponent")]),
        ("1E+", &[(Illegal, "digit expected for number exponent")]),
        ("@", &[(Illegal, "identifier expected")]),
        ("\\x", &[(Illegal, "identifier expected")]),
        ("\\u12", &[(Illegal, "expected 4 hexadecimal digits")]),
        ("x²", &[(Ident, "x"), (Illegal, "identifier expected")]),
        ("a½", &[(Ident, "a"), (Illegal, "identifier expected")]),
        ("Ⅻ", &[(Illegal, "identifier expected")]),
        ("\u{93F}", &[(Illegal, "identifier expected")]),
        ("\u{345}", &[(Illegal, "identifier expected")]),
        ("a\u{345}", &[(Ident, "a"), (Illegal, "identifier expected")]),
        (
            "SELECT a FROM 'oops",
            &[
                (Select, "SELECT"),
                (Ident, "a"),
                (TokenKind::From, "FROM"),
                (Illegal, "unclosed string"),
            ],
        ),
    ]);
}

#[test]
fn invalid_utf8_is_illegal() {
    let bytes: &[u8] = b"abc \xff def";
    let tokens: Vec<Token> = Scanner::new(bytes).collect();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].literal, "abc");
    assert_eq!(tokens[1].kind, Illegal);
    assert_eq!(tokens[1].literal, "invalid utf-8 sequence at byte 4");
    assert_eq!(tokens[1].start, 4);
}

#[test]
fn positions() {
    let tokens: Vec<(TokenKind, usize, usize, usize)> =
        Scanner::new("SELECT\n  a,\n`b`".as_bytes())
            .map(|t| (t.kind, t.start, t.line, t.column))
            .collect();
    assert_eq!(
        tokens,
        vec![
            (Select, 0, 1, 1),
            (Ident, 9, 2, 3),
            (Comma, 10, 2, 4),
            (Ident, 13, 3, 2),
            (Eof, 15, 3, 4),
        ]
    );
}

#[test]
fn error_position_is_lexeme_start() {
    let tokens: Vec<Token> = Scanner::new("a 'unterminated".as_bytes()).collect();
    let last = &tokens[tokens.len() - 1];
    assert_eq!(last.kind, Illegal);
    assert_eq!((last.start, last.line, last.column), (3, 1, 4));
}

#[test]
fn tokenize_returns_structured_error() {
    assert!(matches!(tokenize("``"), Err(ScanError::EmptyQuotedIdentifier)));
    assert!(matches!(tokenize("1e"), Err(ScanError::ExponentDigitExpected)));
    let kinds: Vec<TokenKind> = tokenize("`t`.c")
        .map(|tokens| tokens.into_iter().map(|t| t.kind).collect())
        .unwrap_or_default();
    assert_eq!(kinds, vec![Ident, Period, Ident, Eof]);
}

fn assert_single_terminal(tokens: &[Token]) -> Result<(), TestCaseError> {
    prop_assert!(!tokens.is_empty());
    let terminals = tokens.iter().filter(|t| t.kind.is_terminal()).count();
    prop_assert_eq!(terminals, 1);
    prop_assert!(tokens[tokens.len() - 1].kind.is_terminal());
    Ok(())
}

proptest! {
    #[test]
    fn stream_ends_with_one_terminal(input in "\\PC{0,64}") {
        let tokens: Vec<Token> = Scanner::new(input.as_bytes()).collect();
        assert_single_terminal(&tokens)?;
    }

    #[test]
    fn stream_ends_with_one_terminal_sql_alphabet(
        input in proptest::collection::vec(
            prop_oneof![
                Just("SELECT"), Just(" "), Just("'"), Just("\""), Just("`"),
                Just("\\"), Just("u"), Just("0"), Just("1"), Just("-"),
                Just("e"), Just("."), Just(";"), Just("*"), Just("\n"),
            ],
            0..32,
        ).prop_map(|parts| parts.concat())
    ) {
        let tokens: Vec<Token> = Scanner::new(input.as_bytes()).collect();
        assert_single_terminal(&tokens)?;
    }

    #[test]
    fn arbitrary_bytes_terminate(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let tokens: Vec<Token> = Scanner::with_chunk_size(bytes.as_slice(), 3).collect();
        assert_single_terminal(&tokens)?;
    }
}

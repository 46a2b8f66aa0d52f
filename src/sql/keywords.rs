use std::{collections::HashMap, sync::LazyLock};

use super::token::TokenKind;

// Keys are case-folded; callers fold before looking up.
static KEYWORDS: LazyLock<HashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    HashMap::from([
        ("select", TokenKind::Select),
        ("from", TokenKind::From),
        ("true", TokenKind::True),
        ("false", TokenKind::False),
        ("null", TokenKind::Null),
        ("array", TokenKind::Array),
        ("string", TokenKind::StringType),
    ])
});

/// Resolves an identifier to its reserved-word kind, or `Ident` when it
/// isn't reserved. Matching is case-insensitive.
pub fn lookup(ident: &str) -> TokenKind {
    KEYWORDS
        .get(ident.to_lowercase().as_str())
        .copied()
        .unwrap_or(TokenKind::Ident)
}

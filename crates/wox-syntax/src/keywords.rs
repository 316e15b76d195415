//! Reserved words of the wox language.
//!
//! [`KEYWORDS`] is the closed list; [`lookup`] classifies an identifier
//! through a table built from that list on first use and never modified.

use crate::token::TokenKind;
use hashbrown::HashMap;
use std::sync::OnceLock;
use wox_mem::StringInterner;

/// Every reserved word, in a fixed order.
///
/// The scanner pre-interns these, so their symbols are `0..KEYWORDS.len()`
/// in every interner it creates.
pub const KEYWORDS: &[&str] = &[
    "class", "this", "super", "fn", "if", "then", "else", "do", "loop", "for",
    "while", "case", "of", "let", "in", "var", "false", "true", "nil", "and",
    "or", "print", "return",
];

const KINDS: &[TokenKind] = &[
    TokenKind::Class,
    TokenKind::This,
    TokenKind::Super,
    TokenKind::Fn,
    TokenKind::If,
    TokenKind::Then,
    TokenKind::Else,
    TokenKind::Do,
    TokenKind::Loop,
    TokenKind::For,
    TokenKind::While,
    TokenKind::Case,
    TokenKind::Of,
    TokenKind::Let,
    TokenKind::In,
    TokenKind::Var,
    TokenKind::False,
    TokenKind::True,
    TokenKind::Nil,
    TokenKind::And,
    TokenKind::Or,
    TokenKind::Print,
    TokenKind::Return,
];

static TABLE: OnceLock<HashMap<&'static str, TokenKind>> = OnceLock::new();

fn table() -> &'static HashMap<&'static str, TokenKind> {
    TABLE.get_or_init(|| KEYWORDS.iter().copied().zip(KINDS.iter().copied()).collect())
}

/// Returns the keyword kind for `text`, or `None` for an ordinary identifier.
///
/// ```
/// use wox_syntax::keywords::lookup;
/// use wox_syntax::token::TokenKind;
///
/// assert_eq!(lookup("case"), Some(TokenKind::Case));
/// assert_eq!(lookup("cases"), None);
/// ```
#[must_use]
pub fn lookup(text: &str) -> Option<TokenKind> {
    table().get(text).copied()
}

/// Creates an interner seeded with [`KEYWORDS`].
///
/// Use one of these per interpreter session and pass it to every
/// [`Lexer`](crate::lexer::Lexer) so symbols stay valid across inputs.
#[must_use]
pub fn interner() -> StringInterner {
    StringInterner::with_pre_interned(KEYWORDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_line_up() {
        assert_eq!(KEYWORDS.len(), KINDS.len());
        for (word, kind) in KEYWORDS.iter().zip(KINDS) {
            assert_eq!(kind.to_string(), *word);
            assert!(kind.is_keyword());
        }
    }

    #[test]
    fn test_no_duplicates() {
        let unique: std::collections::HashSet<_> = KEYWORDS.iter().collect();
        assert_eq!(unique.len(), KEYWORDS.len());
    }

    #[test]
    fn test_interner_seeds_keywords() {
        let mut interner = interner();
        assert_eq!(interner.len(), KEYWORDS.len());
        assert_eq!(interner.intern("class").as_u32(), 0);
        let ret = interner.intern("return");
        assert!(interner.is_pre_interned(ret));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(lookup("nil"), Some(TokenKind::Nil));
        assert_eq!(lookup("Nil"), None);
        assert_eq!(lookup("_"), None);
    }
}

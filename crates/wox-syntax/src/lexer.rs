//! The scanner: source text in, tokens out.
//!
//! Scanning never fails as a whole. An unexpected character or an
//! unterminated string is recorded as a [`LexerError`] and scanning picks up
//! again at the next character, so a single pass reports every lexical
//! problem in the input. The token list always ends with exactly one
//! [`TokenKind::EOF`].
//!
//! # Examples
//!
//! ```
//! use wox_syntax::keywords;
//! use wox_syntax::lexer::Lexer;
//! use wox_syntax::token::TokenKind;
//!
//! let mut interner = keywords::interner();
//! let (tokens, errors) = Lexer::new("x != 1.5", &mut interner).lex();
//!
//! assert!(errors.is_empty());
//! assert_eq!(tokens.len(), 4); // x, !=, 1.5, EOF
//! assert_eq!(tokens[1].kind, TokenKind::BangEq);
//! assert_eq!(tokens[2].kind, TokenKind::Number(1.5));
//! ```

use crate::error::{LexerError, LexerResult};
use crate::keywords;
use crate::span::{Span, Spanned};
use crate::token::{Token, TokenKind};
use std::iter::Peekable;
use std::str::Chars;
use wox_mem::StringInterner;

/// Scanner over one unit of source text (a file or a REPL line).
///
/// Identifiers and string contents are interned into the caller's
/// interner, which must outlive the tokens.
pub struct Lexer<'input, 'int> {
    /// The source being scanned
    input: &'input str,

    /// Remaining characters
    chars: Peekable<Chars<'input>>,

    /// Byte offset of the next character
    position: usize,

    /// Line of the next character (1-based)
    line: usize,

    /// Column of the next character (1-based)
    column: usize,

    tokens: Vec<Token>,
    errors: Vec<LexerError>,
    interner: &'int mut StringInterner,
}

impl<'input, 'int> Lexer<'input, 'int> {
    /// Creates a scanner over `input`.
    #[must_use]
    pub fn new(input: &'input str, interner: &'int mut StringInterner) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
            interner,
        }
    }

    /// Scans the whole input.
    ///
    /// Returns every token that could be formed, terminated by `EOF`, and
    /// every error met on the way, both in source order.
    #[must_use]
    pub fn lex(mut self) -> (Vec<Token>, Vec<LexerError>) {
        loop {
            self.skip_trivia();
            if self.peek().is_none() {
                break;
            }

            match self.next_token() {
                Ok(token) => self.tokens.push(token),
                Err(err) => {
                    wox_log::trace!("{err} at {}", err.span());
                    self.errors.push(err);
                }
            }
        }

        let eof = Span::point(self.position, self.line, self.column);
        self.tokens.push(Token::new(TokenKind::EOF, eof));

        wox_log::debug!(
            "scanned {} tokens, {} errors",
            self.tokens.len(),
            self.errors.len()
        );
        (self.tokens, self.errors)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek2(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next()
    }

    /// Consumes one character, keeping line and column current.
    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Consumes the next character if it is `expected`.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Skips whitespace and `//` comments.
    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' | '\r' | '\n' => {
                    self.bump();
                }
                '/' if self.peek2() == Some('/') => self.read_line_comment(),
                _ => break,
            }
        }
    }

    fn read_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn next_token(&mut self) -> LexerResult<Token> {
        let start = self.position;
        let line = self.line;
        let column = self.column;

        let Some(ch) = self.bump() else {
            return Ok(Token::new(
                TokenKind::EOF,
                Span::point(start, line, column),
            ));
        };

        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ';' => TokenKind::Semicolon,
            '@' => TokenKind::At,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '+' => {
                if self.eat('+') {
                    TokenKind::PlusPlus
                } else {
                    TokenKind::Plus
                }
            }
            '!' => {
                if self.eat('=') {
                    TokenKind::BangEq
                } else {
                    TokenKind::Bang
                }
            }
            '=' => {
                if self.eat('=') {
                    TokenKind::EqEq
                } else {
                    TokenKind::Eq
                }
            }
            '<' => {
                if self.eat('=') {
                    TokenKind::LtEq
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.eat('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '"' => self.read_string(start, line, column)?,
            '0'..='9' => self.read_number(start),
            'a'..='z' | 'A'..='Z' | '_' => self.read_identifier(start),
            _ => {
                return Err(LexerError::UnexpectedChar {
                    ch,
                    span: Span::new(start, self.position, line, column),
                });
            }
        };

        Ok(Token::new(
            kind,
            Span::new(start, self.position, line, column),
        ))
    }

    /// Reads an identifier, keyword or lone `_`. The first character is
    /// already consumed.
    fn read_identifier(&mut self, start: usize) -> TokenKind {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.bump();
            } else {
                break;
            }
        }

        let text = &self.input[start..self.position];
        if text == "_" {
            return TokenKind::Underscore;
        }
        keywords::lookup(text).unwrap_or_else(|| TokenKind::Ident(self.interner.intern(text)))
    }

    /// Reads `digits ( '.' digits )?`. A `.` not followed by a digit is left
    /// for the next token.
    fn read_number(&mut self, start: usize) -> TokenKind {
        while self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
            self.bump();
        }

        if self.peek() == Some('.') && self.peek2().is_some_and(|ch| ch.is_ascii_digit()) {
            self.bump();
            while self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
                self.bump();
            }
        }

        let text = &self.input[start..self.position];
        // Only ASCII digits and at most one interior dot reach here.
        TokenKind::Number(text.parse().unwrap_or(f64::NAN))
    }

    /// Reads a string literal. The opening quote is already consumed.
    /// There are no escape sequences; newlines are kept verbatim.
    fn read_string(&mut self, start: usize, line: usize, column: usize) -> LexerResult<TokenKind> {
        loop {
            match self.bump() {
                Some('"') => break,
                Some(_) => {}
                None => {
                    return Err(LexerError::UnterminatedString {
                        span: Span::new(start, self.position, line, column),
                    });
                }
            }
        }

        let contents = &self.input[start + 1..self.position - 1];
        Ok(TokenKind::Str(self.interner.intern(contents)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wox_mem::Symbol;

    fn lex(source: &str) -> (Vec<Token>, Vec<LexerError>, StringInterner) {
        let mut interner = keywords::interner();
        let (tokens, errors) = Lexer::new(source, &mut interner).lex();
        (tokens, errors, interner)
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, errors, _) = lex(source);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lexer_empty() {
        assert_eq!(kinds(""), vec![TokenKind::EOF]);
        assert_eq!(kinds("  \t\r\n "), vec![TokenKind::EOF]);
    }

    #[test]
    fn test_lexer_single_char_tokens() {
        assert_eq!(
            kinds("(){}[],.;-+*/@"),
            vec![
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Semicolon,
                TokenKind::Minus,
                TokenKind::Plus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::At,
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn test_lexer_two_char_operators_are_greedy() {
        assert_eq!(
            kinds("!= == <= >= ++"),
            vec![
                TokenKind::BangEq,
                TokenKind::EqEq,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::PlusPlus,
                TokenKind::EOF,
            ]
        );
        assert_eq!(
            kinds("! = < > +"),
            vec![
                TokenKind::Bang,
                TokenKind::Eq,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Plus,
                TokenKind::EOF,
            ]
        );
        assert_eq!(
            kinds("+++"),
            vec![TokenKind::PlusPlus, TokenKind::Plus, TokenKind::EOF]
        );
        assert_eq!(
            kinds("==="),
            vec![TokenKind::EqEq, TokenKind::Eq, TokenKind::EOF]
        );
    }

    #[test]
    fn test_lexer_numbers() {
        assert_eq!(
            kinds("0 42 3.25"),
            vec![
                TokenKind::Number(0.0),
                TokenKind::Number(42.0),
                TokenKind::Number(3.25),
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn test_lexer_trailing_dot_is_not_part_of_number() {
        assert_eq!(
            kinds("7.foo"),
            vec![
                TokenKind::Number(7.0),
                TokenKind::Dot,
                kinds("foo")[0],
                TokenKind::EOF,
            ]
        );
        assert_eq!(
            kinds("1."),
            vec![TokenKind::Number(1.0), TokenKind::Dot, TokenKind::EOF]
        );
    }

    #[test]
    fn test_lexer_identifiers_and_keywords() {
        let (tokens, errors, interner) = lex("let in_scope _tmp x1 _");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Let);

        let TokenKind::Ident(sym) = tokens[1].kind else {
            panic!("expected identifier, got {:?}", tokens[1].kind);
        };
        assert_eq!(interner.resolve(sym), Some("in_scope"));

        assert!(matches!(tokens[2].kind, TokenKind::Ident(_)));
        assert!(matches!(tokens[3].kind, TokenKind::Ident(_)));
        assert_eq!(tokens[4].kind, TokenKind::Underscore);
    }

    #[test]
    fn test_lexer_all_keywords() {
        let source = keywords::KEYWORDS.join(" ");
        let (tokens, errors, _) = lex(&source);
        assert!(errors.is_empty());
        assert_eq!(tokens.len(), keywords::KEYWORDS.len() + 1);
        for (token, word) in tokens.iter().zip(keywords::KEYWORDS) {
            assert!(token.is_keyword(), "{word} did not scan as a keyword");
            assert_eq!(token.kind.to_string(), *word);
        }
    }

    #[test]
    fn test_lexer_identifiers_share_symbols() {
        let (tokens, _, _) = lex("count count other");
        assert_eq!(tokens[0].kind, tokens[1].kind);
        assert_ne!(tokens[0].kind, tokens[2].kind);
    }

    #[test]
    fn test_lexer_string_literal() {
        let (tokens, errors, interner) = lex("\"hello world\"");
        assert!(errors.is_empty());
        let TokenKind::Str(sym) = tokens[0].kind else {
            panic!("expected string, got {:?}", tokens[0].kind);
        };
        assert_eq!(interner.resolve(sym), Some("hello world"));
        assert_eq!(tokens[0].span, Span::new(0, 13, 1, 1));
    }

    #[test]
    fn test_lexer_string_has_no_escapes() {
        let (tokens, _, interner) = lex(r#""a\nb""#);
        let TokenKind::Str(sym) = tokens[0].kind else {
            panic!("expected string");
        };
        assert_eq!(interner.resolve(sym), Some(r"a\nb"));
    }

    #[test]
    fn test_lexer_multiline_string_tracks_lines() {
        let (tokens, errors, _) = lex("\"one\ntwo\" x");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].span.line, 1);
        assert_eq!(tokens[1].span.line, 2);
        assert_eq!(tokens[1].span.column, 6);
    }

    #[test]
    fn test_lexer_unterminated_string() {
        let (tokens, errors, _) = lex("print \"oops");
        assert_eq!(tokens.len(), 2); // print, EOF
        assert_eq!(tokens[0].kind, TokenKind::Print);
        assert_eq!(
            errors,
            vec![LexerError::UnterminatedString {
                span: Span::new(6, 11, 1, 7),
            }]
        );
    }

    #[test]
    fn test_lexer_unexpected_char_continues() {
        let (tokens, errors, _) = lex("1 # 2 $ 3");
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], LexerError::UnexpectedChar { ch: '#', .. }));
        assert!(matches!(errors[1], LexerError::UnexpectedChar { ch: '$', .. }));
        let numbers: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            numbers,
            vec![
                TokenKind::Number(1.0),
                TokenKind::Number(2.0),
                TokenKind::Number(3.0),
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn test_lexer_non_ascii_is_unexpected() {
        let (_, errors, _) = lex("é");
        assert_eq!(
            errors,
            vec![LexerError::UnexpectedChar {
                ch: 'é',
                span: Span::new(0, 2, 1, 1),
            }]
        );
    }

    #[test]
    fn test_lexer_line_comment() {
        assert_eq!(
            kinds("1 // ignored ++ \"\n2 / 3"),
            vec![
                TokenKind::Number(1.0),
                TokenKind::Number(2.0),
                TokenKind::Slash,
                TokenKind::Number(3.0),
                TokenKind::EOF,
            ]
        );
        assert_eq!(kinds("// only a comment"), vec![TokenKind::EOF]);
    }

    #[test]
    fn test_lexer_positions() {
        let (tokens, _, _) = lex("var a = 1;\n  print a;");
        let print = tokens[5];
        assert_eq!(print.kind, TokenKind::Print);
        assert_eq!((print.span.line, print.span.column), (2, 3));

        let eof = tokens.last().copied().unwrap();
        assert!(eof.is_eof());
        assert_eq!((eof.span.line, eof.span.column), (2, 11));
    }

    #[test]
    fn test_lexer_ident_symbol_is_not_keyword_symbol() {
        let (tokens, _, interner) = lex("classy");
        let TokenKind::Ident(sym) = tokens[0].kind else {
            panic!("expected identifier");
        };
        assert!(!interner.is_pre_interned(sym));
        assert_ne!(sym, Symbol::new(0));
    }
}

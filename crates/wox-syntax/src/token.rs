//! Tokens produced by the scanner.
//!
//! Literal payloads travel inside [`TokenKind`]: identifiers and string
//! contents as interned [`Symbol`]s, numbers already decoded to `f64`. The
//! exact source text of any token can be recovered with [`Token::lexeme`].
//!
//! ```
//! use wox_syntax::span::Span;
//! use wox_syntax::token::{Token, TokenKind};
//!
//! let token = Token::new(TokenKind::PlusPlus, Span::new(2, 4, 1, 3));
//! assert!(token.is_operator());
//! assert_eq!(token.lexeme("a ++ b"), "++");
//! ```

use crate::span::{Span, Spanned};
use std::fmt;
use wox_mem::Symbol;

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    // ===== Punctuation =====
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `;`
    Semicolon,
    /// `@`, binds a name to a whole matched value in a pattern
    At,
    /// `_` on its own, the wildcard pattern
    Underscore,

    // ===== Operators =====
    /// `-`
    Minus,
    /// `+`
    Plus,
    /// `++`, string append
    PlusPlus,
    /// `/`
    Slash,
    /// `*`
    Star,
    /// `!`
    Bang,
    /// `!=`
    BangEq,
    /// `=`
    Eq,
    /// `==`
    EqEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,

    // ===== Literals =====
    /// Identifier
    Ident(Symbol),
    /// String literal; the symbol names the contents without quotes
    Str(Symbol),
    /// Number literal, decoded at scan time
    Number(f64),

    // ===== Keywords =====
    /// `class`
    Class,
    /// `this`
    This,
    /// `super`
    Super,
    /// `fn`
    Fn,
    /// `if`
    If,
    /// `then`
    Then,
    /// `else`
    Else,
    /// `do`
    Do,
    /// `loop`
    Loop,
    /// `for`
    For,
    /// `while`
    While,
    /// `case`
    Case,
    /// `of`
    Of,
    /// `let`
    Let,
    /// `in`
    In,
    /// `var`
    Var,
    /// `false`
    False,
    /// `true`
    True,
    /// `nil`
    Nil,
    /// `and`
    And,
    /// `or`
    Or,
    /// `print`
    Print,
    /// `return`
    Return,

    /// End of input
    EOF,
}

impl TokenKind {
    /// Returns `true` for reserved words.
    ///
    /// ```
    /// use wox_syntax::token::TokenKind;
    ///
    /// assert!(TokenKind::Case.is_keyword());
    /// assert!(!TokenKind::Underscore.is_keyword());
    /// ```
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(
            self,
            Self::Class
                | Self::This
                | Self::Super
                | Self::Fn
                | Self::If
                | Self::Then
                | Self::Else
                | Self::Do
                | Self::Loop
                | Self::For
                | Self::While
                | Self::Case
                | Self::Of
                | Self::Let
                | Self::In
                | Self::Var
                | Self::False
                | Self::True
                | Self::Nil
                | Self::And
                | Self::Or
                | Self::Print
                | Self::Return
        )
    }

    /// Returns `true` for tokens that denote a constant value.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::Str(_) | Self::Number(_) | Self::True | Self::False | Self::Nil
        )
    }

    /// Returns `true` for unary and binary operators.
    #[must_use]
    pub const fn is_operator(&self) -> bool {
        matches!(
            self,
            Self::Minus
                | Self::Plus
                | Self::PlusPlus
                | Self::Slash
                | Self::Star
                | Self::Bang
                | Self::BangEq
                | Self::Eq
                | Self::EqEq
                | Self::Gt
                | Self::GtEq
                | Self::Lt
                | Self::LtEq
                | Self::And
                | Self::Or
        )
    }

    /// Returns `true` if an expression may start with this token.
    ///
    /// The parser uses this to decide whether `return` carries a value.
    #[must_use]
    pub const fn begins_expr(&self) -> bool {
        matches!(
            self,
            Self::LParen
                | Self::LBracket
                | Self::Ident(_)
                | Self::Str(_)
                | Self::Number(_)
                | Self::True
                | Self::False
                | Self::Nil
                | Self::Do
                | Self::Let
                | Self::Case
                | Self::If
                | Self::Bang
                | Self::This
                | Self::Super
                | Self::Minus
        )
    }

    /// Returns `true` if a declaration or statement keyword starts here.
    ///
    /// These are the restart points for parser synchronization.
    #[must_use]
    pub const fn begins_decl(&self) -> bool {
        matches!(
            self,
            Self::Class
                | Self::Fn
                | Self::Var
                | Self::For
                | Self::Loop
                | Self::While
                | Self::Print
                | Self::Return
        )
    }

    /// Returns `true` for the end-of-input marker.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EOF)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Semicolon => ";",
            Self::At => "@",
            Self::Underscore => "_",
            Self::Minus => "-",
            Self::Plus => "+",
            Self::PlusPlus => "++",
            Self::Slash => "/",
            Self::Star => "*",
            Self::Bang => "!",
            Self::BangEq => "!=",
            Self::Eq => "=",
            Self::EqEq => "==",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Ident(_) => "identifier",
            Self::Str(_) => "string",
            Self::Number(_) => "number",
            Self::Class => "class",
            Self::This => "this",
            Self::Super => "super",
            Self::Fn => "fn",
            Self::If => "if",
            Self::Then => "then",
            Self::Else => "else",
            Self::Do => "do",
            Self::Loop => "loop",
            Self::For => "for",
            Self::While => "while",
            Self::Case => "case",
            Self::Of => "of",
            Self::Let => "let",
            Self::In => "in",
            Self::Var => "var",
            Self::False => "false",
            Self::True => "true",
            Self::Nil => "nil",
            Self::And => "and",
            Self::Or => "or",
            Self::Print => "print",
            Self::Return => "return",
            Self::EOF => "end of input",
        };
        f.write_str(text)
    }
}

/// A token and where it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    /// Category and literal payload
    pub kind: TokenKind,
    /// Source location
    pub span: Span,
}

impl Token {
    /// Creates a token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the exact source text of this token.
    #[must_use]
    pub fn lexeme<'src>(&self, source: &'src str) -> &'src str {
        self.span.slice(source)
    }

    /// See [`TokenKind::is_keyword`].
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }

    /// See [`TokenKind::is_literal`].
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        self.kind.is_literal()
    }

    /// See [`TokenKind::is_operator`].
    #[must_use]
    pub const fn is_operator(&self) -> bool {
        self.kind.is_operator()
    }

    /// See [`TokenKind::is_eof`].
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        self.kind.is_eof()
    }
}

impl Spanned for Token {
    fn span(&self) -> Span {
        self.span
    }
}

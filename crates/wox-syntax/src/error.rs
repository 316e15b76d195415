//! Error types for the scanner and parser.
//!
//! Neither phase stops at its first error: the scanner skips the offending
//! character, the parser synchronizes to the next declaration. Errors are
//! collected and handed to a [`DiagnosticSink`](crate::diagnostic::DiagnosticSink).

use crate::span::{Span, Spanned};
use std::fmt;

/// Errors found while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexerError {
    /// A character that starts no token.
    ///
    /// ```text
    /// var x = 4 # 2;
    ///           ^
    /// ```
    UnexpectedChar {
        /// The offending character
        ch: char,
        /// Location in source
        span: Span,
    },

    /// A string whose closing quote never arrives. No token is produced.
    UnterminatedString {
        /// From the opening quote to end of input
        span: Span,
    },
}

impl LexerError {
    /// Stable diagnostic code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnexpectedChar { .. } => "E0101",
            Self::UnterminatedString { .. } => "E0102",
        }
    }
}

impl fmt::Display for LexerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedChar { ch, .. } => write!(f, "unexpected character '{ch}'"),
            Self::UnterminatedString { .. } => write!(f, "unterminated string"),
        }
    }
}

impl std::error::Error for LexerError {}

impl Spanned for LexerError {
    fn span(&self) -> Span {
        match self {
            Self::UnexpectedChar { span, .. } | Self::UnterminatedString { span } => *span,
        }
    }
}

/// What a [`ParserError::TooManyItems`] was counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// Function or method parameters
    Parameters,
    /// Call arguments
    Arguments,
    /// Tuple elements
    TupleElements,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parameters => write!(f, "parameters"),
            Self::Arguments => write!(f, "arguments"),
            Self::TupleElements => write!(f, "tuple elements"),
        }
    }
}

/// Errors found while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    /// A specific token was required here.
    UnexpectedToken {
        /// What was required, e.g. "`)` after arguments"
        expected: String,
        /// Source text of the token found (empty at end of input)
        found: String,
        /// Location of the token found
        span: Span,
    },

    /// No expression can start with the token found.
    ExpectedExpression {
        /// Source text of the token found
        found: String,
        /// Location in source
        span: Span,
    },

    /// A name was required here.
    ExpectedIdentifier {
        /// What the name is for, e.g. "class name"
        context: &'static str,
        /// Source text of the token found
        found: String,
        /// Location in source
        span: Span,
    },

    /// The left side of `=` is neither a variable nor a property.
    /// Reported without abandoning the expression.
    InvalidAssignmentTarget {
        /// Location of the `=`
        span: Span,
    },

    /// More than [`MAX_ITEMS`](crate::parser::MAX_ITEMS) parameters,
    /// arguments or tuple elements. Reported without abandoning the list.
    TooManyItems {
        /// What was being counted
        kind: ItemKind,
        /// Location of the first item past the limit
        span: Span,
    },

    /// A `case` arm pattern that cannot be parsed.
    InvalidPattern {
        /// Description of the problem
        message: String,
        /// Location in source
        span: Span,
    },
}

impl ParserError {
    /// Stable diagnostic code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnexpectedToken { .. } => "E0201",
            Self::ExpectedExpression { .. } => "E0202",
            Self::ExpectedIdentifier { .. } => "E0203",
            Self::InvalidAssignmentTarget { .. } => "E0204",
            Self::TooManyItems { .. } => "E0205",
            Self::InvalidPattern { .. } => "E0206",
        }
    }

    /// Returns `true` for errors the parser reports without unwinding the
    /// current production.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidAssignmentTarget { .. } | Self::TooManyItems { .. }
        )
    }
}

fn describe_found(found: &str) -> String {
    if found.is_empty() {
        "end of input".to_string()
    } else {
        format!("'{found}'")
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken {
                expected, found, ..
            } => write!(f, "expected {expected}, found {}", describe_found(found)),
            Self::ExpectedExpression { found, .. } => {
                write!(f, "expected expression, found {}", describe_found(found))
            }
            Self::ExpectedIdentifier { context, found, .. } => {
                write!(f, "expected {context}, found {}", describe_found(found))
            }
            Self::InvalidAssignmentTarget { .. } => write!(f, "invalid assignment target"),
            Self::TooManyItems { kind, .. } => {
                write!(
                    f,
                    "cannot have more than {} {kind}",
                    crate::parser::MAX_ITEMS
                )
            }
            Self::InvalidPattern { message, .. } => write!(f, "invalid pattern: {message}"),
        }
    }
}

impl std::error::Error for ParserError {}

impl Spanned for ParserError {
    fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::ExpectedExpression { span, .. }
            | Self::ExpectedIdentifier { span, .. }
            | Self::InvalidAssignmentTarget { span }
            | Self::TooManyItems { span, .. }
            | Self::InvalidPattern { span, .. } => *span,
        }
    }
}

/// Either phase's error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// Scanner error
    Lexer(LexerError),
    /// Parser error
    Parser(ParserError),
}

impl SyntaxError {
    /// Stable diagnostic code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Lexer(err) => err.code(),
            Self::Parser(err) => err.code(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexer(err) => write!(f, "{err}"),
            Self::Parser(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SyntaxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lexer(err) => Some(err),
            Self::Parser(err) => Some(err),
        }
    }
}

impl Spanned for SyntaxError {
    fn span(&self) -> Span {
        match self {
            Self::Lexer(err) => err.span(),
            Self::Parser(err) => err.span(),
        }
    }
}

impl From<LexerError> for SyntaxError {
    fn from(err: LexerError) -> Self {
        Self::Lexer(err)
    }
}

impl From<ParserError> for SyntaxError {
    fn from(err: ParserError) -> Self {
        Self::Parser(err)
    }
}

/// Result of a scanner operation.
pub type LexerResult<T> = Result<T, LexerError>;

/// Result of a parser production.
pub type ParserResult<T> = Result<T, ParserError>;

/// Result of either phase.
pub type SyntaxResult<T> = Result<T, SyntaxError>;

//! Patterns tried by `case` arms.

use crate::ast::Ident;
use crate::ast::expr::Literal;
use crate::span::{Span, Spanned};

/// A pattern.
///
/// Matching never fails with an error: a pattern either matches (and
/// produces bindings) or it does not.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// `()` or `nil`: matches only the unit value
    Unit {
        /// Source location
        span: Span,
    },

    /// `name`: matches anything and binds it
    Var {
        /// The bound name
        name: Ident,
    },

    /// `42`, `-1`, `"text"`, `true`: matches an equal value
    Literal {
        /// The constant compared against
        value: Literal,
        /// Source location
        span: Span,
    },

    /// `_`: matches anything, binds nothing
    Wild {
        /// Source location
        span: Span,
    },

    /// `name @ pattern`: matches when `pattern` does and also binds the
    /// whole value to `name`
    At {
        /// Name bound to the whole value
        name: Ident,
        /// Pattern the value must also match
        pattern: Box<Pattern>,
    },

    /// `(p1, p2, ...)`: a tuple of the same arity
    Tuple {
        /// Element patterns
        elements: Vec<Pattern>,
        /// Location of the opening parenthesis
        span: Span,
    },

    /// `[p1, p2, ...]`: a vector of exactly this length
    Vector {
        /// Element patterns
        elements: Vec<Pattern>,
        /// Location of the opening bracket
        span: Span,
    },
}

impl Pattern {
    /// Returns `true` for patterns that match every value.
    #[must_use]
    pub const fn is_irrefutable(&self) -> bool {
        matches!(self, Self::Var { .. } | Self::Wild { .. })
    }
}

impl Spanned for Pattern {
    fn span(&self) -> Span {
        match self {
            Self::Unit { span }
            | Self::Literal { span, .. }
            | Self::Wild { span }
            | Self::Tuple { span, .. }
            | Self::Vector { span, .. } => *span,
            Self::Var { name } | Self::At { name, .. } => name.span,
        }
    }
}

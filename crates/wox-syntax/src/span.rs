//! Source locations.
//!
//! Every token, AST node and error carries a [`Span`]: the byte range it
//! covers plus the 1-based line and column where it starts. The line/column
//! pair is what diagnostics show to the user; the byte range is what the
//! emitter and [`Token::lexeme`](crate::token::Token::lexeme) slice with.
//!
//! ```
//! use wox_syntax::span::Span;
//!
//! let name = Span::new(4, 7, 1, 5);
//! let value = Span::new(10, 12, 1, 11);
//! let both = Span::merge(name, value);
//!
//! assert_eq!((both.start, both.end), (4, 12));
//! assert_eq!(both.to_string(), "line 1, column 5");
//! ```

use std::fmt;

/// A byte range in the source together with its starting line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// Line of the first character (1-based)
    pub line: usize,
    /// Column of the first character (1-based, counted in characters)
    pub column: usize,
}

impl Span {
    /// Creates a span.
    #[must_use]
    pub const fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Creates an empty span at a single position.
    #[must_use]
    pub const fn point(offset: usize, line: usize, column: usize) -> Self {
        Self::new(offset, offset, line, column)
    }

    /// Covers everything from the start of `left` to the end of `right`.
    ///
    /// The position reported is `left`'s.
    #[must_use]
    pub const fn merge(left: Span, right: Span) -> Self {
        Self {
            start: left.start,
            end: right.end,
            line: left.line,
            column: left.column,
        }
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` for a zero-width span such as the end-of-input marker.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the source text this span covers, or `""` if it is out of range.
    #[must_use]
    pub fn slice<'src>(&self, source: &'src str) -> &'src str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Anything that knows where it came from in the source.
pub trait Spanned {
    /// Returns the span used to locate this item in diagnostics.
    fn span(&self) -> Span;
}

impl Spanned for Span {
    fn span(&self) -> Span {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_merge_keeps_left_position() {
        let left = Span::new(0, 3, 2, 1);
        let right = Span::new(8, 9, 3, 4);
        let merged = Span::merge(left, right);

        assert_eq!(merged, Span::new(0, 9, 2, 1));
        assert_eq!(merged.len(), 9);
    }

    #[test]
    fn test_span_point_is_empty() {
        let eof = Span::point(12, 4, 7);
        assert!(eof.is_empty());
        assert_eq!(eof.to_string(), "line 4, column 7");
    }

    #[test]
    fn test_span_slice() {
        let source = "var answer = 42;";
        assert_eq!(Span::new(4, 10, 1, 5).slice(source), "answer");
        assert_eq!(Span::new(40, 50, 1, 41).slice(source), "");
    }
}

//! Expression nodes.
//!
//! Everything in wox that produces a value is an expression, including
//! `let`, `do`, `if` and `case`. Operator nodes are located at their
//! operator token, which is where runtime errors about operands point.

use crate::ast::Ident;
use crate::ast::pat::Pattern;
use crate::span::{Span, Spanned};
use crate::token::TokenKind;
use std::fmt;
use wox_mem::Symbol;

/// A constant written in the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    /// `42`, `3.5`
    Number(f64),
    /// `"text"`; the symbol names the contents
    Str(Symbol),
    /// `true` or `false`
    Bool(bool),
    /// `nil` or `()`
    Nil,
}

/// An expression.
///
/// # Examples
///
/// ```
/// use wox_syntax::ast::{Expr, Literal};
/// use wox_syntax::span::{Span, Spanned};
///
/// let one = Expr::Literal {
///     value: Literal::Number(1.0),
///     span: Span::new(0, 1, 1, 1),
/// };
/// assert_eq!(one.span().column, 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Constant value
    Literal {
        /// The constant
        value: Literal,
        /// Source location
        span: Span,
    },

    /// Parenthesized expression: `(a + b)`
    Grouping {
        /// The wrapped expression
        inner: Box<Expr>,
        /// Location of the opening parenthesis
        span: Span,
    },

    /// Prefix operator: `-x`, `!flag`
    Unary {
        /// The operator
        op: UnaryOp,
        /// The operand
        operand: Box<Expr>,
        /// Location of the operator
        span: Span,
    },

    /// Infix operator: `a + b`, `x and y`, `s ++ t`
    Binary {
        /// Left operand
        left: Box<Expr>,
        /// The operator
        op: BinaryOp,
        /// Right operand
        right: Box<Expr>,
        /// Location of the operator
        span: Span,
    },

    /// Variable reference: `x`
    Variable {
        /// Name and location
        name: Ident,
    },

    /// Assignment to an existing variable: `x = value`
    Assign {
        /// The variable assigned
        name: Ident,
        /// The new value
        value: Box<Expr>,
    },

    /// Call: `f(a, b)`
    Call {
        /// The callee
        callee: Box<Expr>,
        /// Arguments in source order
        args: Vec<Expr>,
        /// Location of the opening parenthesis
        span: Span,
    },

    /// Property read: `object.name`
    Get {
        /// The receiver
        object: Box<Expr>,
        /// Property name
        name: Ident,
    },

    /// Property write: `object.name = value`
    Set {
        /// The receiver
        object: Box<Expr>,
        /// Property name
        name: Ident,
        /// The new value
        value: Box<Expr>,
    },

    /// `this`
    This {
        /// Location of the keyword
        span: Span,
    },

    /// `super.method`
    Super {
        /// Method looked up on the superclass
        method: Ident,
        /// Location of the keyword
        span: Span,
    },

    /// `let name = definition in body`
    Let {
        /// The bound name
        name: Ident,
        /// Value bound to `name`
        definition: Box<Expr>,
        /// Evaluated with `name` in scope
        body: Box<Expr>,
        /// Location of the keyword
        span: Span,
    },

    /// `do { e1; e2; ...; en }`, valued as `en` (or `nil` when empty)
    Do {
        /// Expressions in order
        body: Vec<Expr>,
        /// Location of the keyword
        span: Span,
    },

    /// `if condition then a else b`
    If {
        /// The condition, tested for truthiness
        condition: Box<Expr>,
        /// Value when the condition is truthy
        then_branch: Box<Expr>,
        /// Value otherwise
        else_branch: Box<Expr>,
        /// Location of the keyword
        span: Span,
    },

    /// Tuple: `(a, b, ...)`, always two or more elements
    Tuple {
        /// Elements in order
        elements: Vec<Expr>,
        /// Location of the opening parenthesis
        span: Span,
    },

    /// Vector: `[a, b, ...]`, any number of elements
    Vector {
        /// Elements in order
        elements: Vec<Expr>,
        /// Location of the opening bracket
        span: Span,
    },

    /// `case scrutinee of { pattern then body, ... }`
    Case {
        /// The value matched against
        scrutinee: Box<Expr>,
        /// Arms, tried in order
        arms: Vec<CaseArm>,
        /// Location of the keyword
        span: Span,
    },
}

impl Expr {
    /// Returns `true` if this expression may appear left of `=`.
    #[must_use]
    pub const fn is_assignable(&self) -> bool {
        matches!(self, Self::Variable { .. } | Self::Get { .. })
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        match self {
            Self::Literal { span, .. }
            | Self::Grouping { span, .. }
            | Self::Unary { span, .. }
            | Self::Binary { span, .. }
            | Self::Call { span, .. }
            | Self::This { span }
            | Self::Super { span, .. }
            | Self::Let { span, .. }
            | Self::Do { span, .. }
            | Self::If { span, .. }
            | Self::Tuple { span, .. }
            | Self::Vector { span, .. }
            | Self::Case { span, .. } => *span,
            Self::Variable { name } | Self::Assign { name, .. } => name.span,
            Self::Get { name, .. } | Self::Set { name, .. } => name.span,
        }
    }
}

/// One arm of a `case` expression: `pattern (if guard)? then body`.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseArm {
    /// The pattern tried against the scrutinee
    pub pattern: Pattern,
    /// Optional guard, evaluated with the pattern's bindings in scope
    pub guard: Option<Expr>,
    /// The arm's value
    pub body: Expr,
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Logical negation: `!`
    Not,
    /// Arithmetic negation: `-`
    Neg,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Not => write!(f, "!"),
            Self::Neg => write!(f, "-"),
        }
    }
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Addition: `+`
    Add,
    /// Subtraction: `-`
    Sub,
    /// Multiplication: `*`
    Mul,
    /// Division: `/`
    Div,
    /// String append: `++`
    Append,
    /// Equality: `==`
    Eq,
    /// Inequality: `!=`
    Neq,
    /// Less than: `<`
    Lt,
    /// Greater than: `>`
    Gt,
    /// Less than or equal: `<=`
    Lte,
    /// Greater than or equal: `>=`
    Gte,
    /// Short-circuit conjunction: `and`
    And,
    /// Short-circuit disjunction: `or`
    Or,
}

impl BinaryOp {
    /// Maps an operator token to its operator, if it is an infix one.
    #[must_use]
    pub const fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Plus => Self::Add,
            TokenKind::Minus => Self::Sub,
            TokenKind::Star => Self::Mul,
            TokenKind::Slash => Self::Div,
            TokenKind::PlusPlus => Self::Append,
            TokenKind::EqEq => Self::Eq,
            TokenKind::BangEq => Self::Neq,
            TokenKind::Lt => Self::Lt,
            TokenKind::Gt => Self::Gt,
            TokenKind::LtEq => Self::Lte,
            TokenKind::GtEq => Self::Gte,
            TokenKind::And => Self::And,
            TokenKind::Or => Self::Or,
            _ => return None,
        })
    }

    /// Returns `true` for `and` and `or`, which may skip their right operand.
    #[must_use]
    pub const fn is_logical(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "+"),
            Self::Sub => write!(f, "-"),
            Self::Mul => write!(f, "*"),
            Self::Div => write!(f, "/"),
            Self::Append => write!(f, "++"),
            Self::Eq => write!(f, "=="),
            Self::Neq => write!(f, "!="),
            Self::Lt => write!(f, "<"),
            Self::Gt => write!(f, ">"),
            Self::Lte => write!(f, "<="),
            Self::Gte => write!(f, ">="),
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
        }
    }
}

//! Runtime errors.
//!
//! A [`RuntimeError`] aborts the rest of the current
//! [`interpret`](crate::Interpreter::interpret) call. Each variant carries the
//! span of the expression or token that failed, and converts into a
//! [`Diagnostic`] for the driver to render.

use std::fmt;
use wox_syntax::ast::{BinaryOp, UnaryOp};
use wox_syntax::diagnostic::{Diagnostic, DiagnosticBuilder, IntoDiagnostic};
use wox_syntax::span::{Span, Spanned};

/// Result type for evaluation.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors raised while evaluating a program.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// A name no frame on the chain binds.
    ///
    /// ```text
    /// print y;
    ///       ^ unbound variable 'y'
    /// ```
    UnboundVariable {
        /// The name as written
        name: String,
        /// Location of the reference
        span: Span,
    },

    /// Unary `-` applied to something that is not a number.
    NumberOperand {
        /// The operator
        op: UnaryOp,
        /// Type of the operand found
        found: &'static str,
        /// Location of the operator
        span: Span,
    },

    /// Arithmetic or comparison with an operand that is not a number.
    NumberOperands {
        /// The operator
        op: BinaryOp,
        /// Type of the left operand
        left: &'static str,
        /// Type of the right operand
        right: &'static str,
        /// Location of the operator
        span: Span,
    },

    /// `!` applied to something that is not a boolean.
    BooleanOperand {
        /// Type of the operand found
        found: &'static str,
        /// Location of the operator
        span: Span,
    },

    /// `++` with an operand that is not a string.
    StringOperands {
        /// Type of the left operand
        left: &'static str,
        /// Type of the right operand
        right: &'static str,
        /// Location of the operator
        span: Span,
    },

    /// A call with the wrong number of arguments.
    ArityMismatch {
        /// Name of the function or class called
        name: String,
        /// Parameters declared
        expected: usize,
        /// Arguments given
        found: usize,
        /// Location of the call's `(`
        span: Span,
    },

    /// A `case` whose arms all failed to match.
    NonExhaustiveMatch {
        /// The value that fell through, as printed
        value: String,
        /// Location of the `case` keyword
        span: Span,
    },

    /// A call whose callee is neither a function nor a class.
    NotCallable {
        /// Type of the callee
        found: &'static str,
        /// Location of the call's `(`
        span: Span,
    },

    /// `.` applied to something that is not an instance.
    NotAnInstance {
        /// Type of the receiver
        found: &'static str,
        /// Location of the property name
        span: Span,
    },

    /// A property that is neither a field nor a method.
    UndefinedProperty {
        /// The property name
        name: String,
        /// Location of the property name
        span: Span,
    },

    /// `class A < B` where `B` is not a class.
    SuperclassNotClass {
        /// The superclass name as written
        name: String,
        /// Location of the superclass name
        span: Span,
    },

    /// `return` executed outside any function body.
    ReturnOutsideFunction {
        /// Location of the `return` keyword
        span: Span,
    },

    /// Writing `print` output failed.
    Output {
        /// The I/O error, as text
        message: String,
        /// Location of the `print`
        span: Span,
    },
}

impl RuntimeError {
    /// Stable diagnostic code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnboundVariable { .. } => "E0301",
            Self::NumberOperand { .. } => "E0302",
            Self::NumberOperands { .. } => "E0303",
            Self::BooleanOperand { .. } => "E0304",
            Self::StringOperands { .. } => "E0305",
            Self::ArityMismatch { .. } => "E0306",
            Self::NonExhaustiveMatch { .. } => "E0307",
            Self::NotCallable { .. } => "E0308",
            Self::NotAnInstance { .. } => "E0309",
            Self::UndefinedProperty { .. } => "E0310",
            Self::SuperclassNotClass { .. } => "E0311",
            Self::ReturnOutsideFunction { .. } => "E0312",
            Self::Output { .. } => "E0313",
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundVariable { name, .. } => write!(f, "unbound variable '{name}'"),
            Self::NumberOperand { op, found, .. } => {
                write!(f, "operand of '{op}' must be a number, found {found}")
            }
            Self::NumberOperands {
                op, left, right, ..
            } => write!(
                f,
                "operands of '{op}' must be numbers, found {left} and {right}"
            ),
            Self::BooleanOperand { found, .. } => {
                write!(f, "operand of '!' must be a boolean, found {found}")
            }
            Self::StringOperands { left, right, .. } => write!(
                f,
                "operands of '++' must be strings, found {left} and {right}"
            ),
            Self::ArityMismatch {
                name,
                expected,
                found,
                ..
            } => write!(
                f,
                "'{name}' expects {expected} argument{}, found {found}",
                if *expected == 1 { "" } else { "s" }
            ),
            Self::NonExhaustiveMatch { value, .. } => {
                write!(f, "non-exhaustive match: no arm matches {value}")
            }
            Self::NotCallable { found, .. } => write!(f, "cannot call a value of type {found}"),
            Self::NotAnInstance { found, .. } => {
                write!(f, "only instances have properties, found {found}")
            }
            Self::UndefinedProperty { name, .. } => write!(f, "undefined property '{name}'"),
            Self::SuperclassNotClass { name, .. } => {
                write!(f, "superclass '{name}' is not a class")
            }
            Self::ReturnOutsideFunction { .. } => write!(f, "cannot return from top-level code"),
            Self::Output { message, .. } => write!(f, "failed to write output: {message}"),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl Spanned for RuntimeError {
    fn span(&self) -> Span {
        match self {
            Self::UnboundVariable { span, .. }
            | Self::NumberOperand { span, .. }
            | Self::NumberOperands { span, .. }
            | Self::BooleanOperand { span, .. }
            | Self::StringOperands { span, .. }
            | Self::ArityMismatch { span, .. }
            | Self::NonExhaustiveMatch { span, .. }
            | Self::NotCallable { span, .. }
            | Self::NotAnInstance { span, .. }
            | Self::UndefinedProperty { span, .. }
            | Self::SuperclassNotClass { span, .. }
            | Self::ReturnOutsideFunction { span }
            | Self::Output { span, .. } => *span,
        }
    }
}

impl IntoDiagnostic for RuntimeError {
    fn to_diagnostic(&self) -> Diagnostic {
        let builder = DiagnosticBuilder::error(self.to_string(), self.span()).code(self.code());
        let builder = match self {
            Self::BooleanOperand { .. } => {
                builder.suggest("'!' does not coerce; compare explicitly, e.g. `x == nil`")
            }
            Self::NonExhaustiveMatch { .. } => {
                builder.suggest("add a final `_` arm to catch every other value")
            }
            Self::StringOperands { .. } => builder.suggest("use '+' to add numbers"),
            _ => builder,
        };
        builder.build()
    }
}

//! Abstract syntax tree for the wox language.
//!
//! Three closed sets of nodes: [`Expr`], [`Stmt`] and [`Pattern`]. The tree
//! is built once by the parser and never mutated afterwards; the evaluator
//! only reads it. Every node carries the [`Span`] it is reported at.
//!
//! # Modules
//!
//! - [`expr`] - Expression nodes
//! - [`stmt`] - Statement and declaration nodes
//! - [`pat`] - Patterns used by `case` arms

pub mod expr;
pub mod pat;
pub mod stmt;

pub use expr::{BinaryOp, CaseArm, Expr, Literal, UnaryOp};
pub use pat::Pattern;
pub use stmt::{FunctionDecl, Stmt};

use crate::span::{Span, Spanned};
use wox_mem::Symbol;

/// A name as written at one place in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ident {
    /// Interned name
    pub name: Symbol,
    /// Where it was written
    pub span: Span,
}

impl Ident {
    /// Creates an identifier occurrence.
    #[must_use]
    pub const fn new(name: Symbol, span: Span) -> Self {
        Self { name, span }
    }
}

impl Spanned for Ident {
    fn span(&self) -> Span {
        self.span
    }
}

/// A parsed unit of source: a whole file or one REPL line.
///
/// Declarations that failed to parse are left out, so a program with
/// syntax errors still holds everything that parsed cleanly.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Top-level statements in source order
    pub statements: Vec<Stmt>,
}

impl Program {
    /// Returns `true` if nothing was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

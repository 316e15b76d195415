//! Statement and declaration nodes.

use crate::ast::Ident;
use crate::ast::expr::Expr;
use crate::span::{Span, Spanned};
use std::rc::Rc;

/// A statement.
///
/// Function declarations are reference counted so that every closure
/// created from one shares the same body.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// An expression evaluated for its effects: `f(x);`
    Expression {
        /// The expression
        expr: Expr,
    },

    /// `print expr;`
    Print {
        /// The value printed
        expr: Expr,
        /// Location of the keyword
        span: Span,
    },

    /// `var name = initializer;`
    Var {
        /// The declared name
        name: Ident,
        /// Initial value; `nil` when absent
        initializer: Option<Expr>,
    },

    /// `{ ... }`
    Block {
        /// Statements in order
        statements: Vec<Stmt>,
        /// Location of the opening brace
        span: Span,
    },

    /// `fn name(params) { body }`
    Function(Rc<FunctionDecl>),

    /// `class Name < Super { methods }`
    Class {
        /// Class name
        name: Ident,
        /// Superclass reference, resolved as a variable when the class is declared
        superclass: Option<Ident>,
        /// Methods in source order
        methods: Vec<Rc<FunctionDecl>>,
    },

    /// `return value;`
    Return {
        /// Returned value; `nil` when absent
        value: Option<Expr>,
        /// Location of the keyword
        span: Span,
    },

    /// `while condition body`
    While {
        /// Tested for truthiness before every iteration
        condition: Expr,
        /// Loop body
        body: Box<Stmt>,
        /// Location of the keyword
        span: Span,
    },

    /// `loop { body }`, left only by `return` or a runtime error
    Loop {
        /// Loop body
        body: Vec<Stmt>,
        /// Location of the keyword
        span: Span,
    },

    /// `for (initializer; condition; increment) body`
    For {
        /// Runs once, in the loop's own scope
        initializer: Option<Box<Stmt>>,
        /// Tested before every iteration; always true when absent
        condition: Option<Expr>,
        /// Runs after every iteration
        increment: Option<Expr>,
        /// Loop body
        body: Box<Stmt>,
        /// Location of the keyword
        span: Span,
    },
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        match self {
            Self::Expression { expr } => expr.span(),
            Self::Print { span, .. }
            | Self::Block { span, .. }
            | Self::Return { span, .. }
            | Self::While { span, .. }
            | Self::Loop { span, .. }
            | Self::For { span, .. } => *span,
            Self::Var { name, .. } | Self::Class { name, .. } => name.span,
            Self::Function(decl) => decl.name.span,
        }
    }
}

/// A named function or method.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// Function name
    pub name: Ident,
    /// Parameter names in order
    pub params: Vec<Ident>,
    /// Body statements
    pub body: Vec<Stmt>,
}

impl FunctionDecl {
    /// Number of parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

//! wox syntax: scanner, parser, AST and diagnostics
//!
//! This crate is the language frontend for wox, a small expression-oriented
//! scripting language. It turns source text into a [`Program`] and reports
//! every problem it finds along the way to a [`DiagnosticSink`].
//!
//! # Modules
//!
//! - [`span`] - Source location tracking
//! - [`token`] - Token types and definitions
//! - [`keywords`] - The reserved-word table
//! - [`lexer`] - Source text to tokens
//! - [`parser`] - Tokens to AST
//! - [`ast`] - Expression, statement and pattern nodes
//! - [`error`] - Lexer and parser error types
//! - [`diagnostic`] - Error collection and rendering
//! - [`pretty`] - AST printers
//!
//! # Examples
//!
//! ```
//! use wox_syntax::diagnostic::DiagnosticSink;
//! use wox_syntax::{keywords, scan_and_parse};
//!
//! let mut interner = keywords::interner();
//! let mut sink = DiagnosticSink::new();
//!
//! let program = scan_and_parse("var x = 1; print x + 2;", &mut interner, &mut sink);
//! assert_eq!(program.statements.len(), 2);
//! assert!(!sink.had_syntax_error());
//!
//! let program = scan_and_parse("var = 1; print 3;", &mut interner, &mut sink);
//! assert_eq!(program.statements.len(), 1);
//! assert!(sink.had_syntax_error());
//! ```

#![warn(missing_docs)]

pub mod ast;
pub mod diagnostic;
pub mod error;
pub mod keywords;
pub mod lexer;
pub mod parser;
pub mod pretty;
pub mod span;
pub mod token;

pub use ast::Program;
pub use diagnostic::{Diagnostic, DiagnosticSink, Emitter, IntoDiagnostic};
pub use error::{LexerError, LexerResult, ParserError, ParserResult, SyntaxError, SyntaxResult};
pub use lexer::Lexer;
pub use parser::Parser;
pub use span::{Span, Spanned};
pub use token::{Token, TokenKind};

use wox_mem::StringInterner;

/// Scans and parses one unit of source.
///
/// Every lexer and parser error is reported to `sink`; the returned program
/// holds the declarations that parsed cleanly. Identifiers are interned into
/// `interner`, which must be the one the interpreter resolves names with.
pub fn scan_and_parse(
    source: &str,
    interner: &mut StringInterner,
    sink: &mut DiagnosticSink,
) -> Program {
    let (tokens, lex_errors) = Lexer::new(source, interner).lex();
    for error in &lex_errors {
        sink.report_lexer(error);
    }

    let mut parser = Parser::new(tokens, source);
    let program = parser.parse_program();
    for error in parser.errors() {
        sink.report_parser(error);
    }

    program
}

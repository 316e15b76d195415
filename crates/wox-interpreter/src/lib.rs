//! wox interpreter: a tree-walking evaluator.
//!
//! Executes programs produced by [`wox_syntax`] against a persistent global
//! frame. Values are reference counted; closures keep the frames they
//! capture alive.
//!
//! # Modules
//!
//! - [`value`] - Runtime values, functions, classes and instances
//! - [`env`] - Lexical environment frames
//! - [`pattern`] - `case` pattern matching
//! - [`error`] - Runtime error types
//! - [`interpreter`] - The evaluator
//!
//! # Examples
//!
//! ```
//! use wox_interpreter::{Interpreter, Value};
//! use wox_syntax::diagnostic::DiagnosticSink;
//!
//! let mut interp = Interpreter::new(Vec::new());
//! let mut sink = DiagnosticSink::new();
//!
//! let value = interp.eval_expression("case (1, 2) of { (a, b) then a + b }", &mut sink);
//! assert_eq!(value, Some(Value::Number(3.0)));
//!
//! interp.run("print y;", &mut sink);
//! assert!(sink.had_runtime_error());
//! ```

#![warn(missing_docs)]

pub mod env;
pub mod error;
pub mod interpreter;
pub mod pattern;
pub mod value;

pub use env::Environment;
pub use error::{RuntimeError, RuntimeResult};
pub use interpreter::{Flow, Interpreter};
pub use value::{Class, Function, Instance, Value};

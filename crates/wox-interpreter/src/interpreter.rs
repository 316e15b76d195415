//! The tree-walking evaluator.
//!
//! [`Interpreter`] owns the global frame and the string interner for one
//! session. Each call to [`Interpreter::run`] or [`Interpreter::interpret`]
//! executes against the same globals, so a REPL can feed it one line at a
//! time. A runtime error stops the current call only.
//!
//! # Example
//!
//! ```
//! use wox_interpreter::Interpreter;
//! use wox_syntax::diagnostic::DiagnosticSink;
//!
//! let mut interp = Interpreter::new(Vec::new());
//! let mut sink = DiagnosticSink::new();
//!
//! interp.run("var x = 2;", &mut sink);
//! interp.run("print let y = 3 in x * y;", &mut sink);
//!
//! assert!(!sink.has_errors());
//! assert_eq!(interp.into_output(), b"6\n");
//! ```

use crate::env::Environment;
use crate::error::{RuntimeError, RuntimeResult};
use crate::pattern::match_pattern;
use crate::value::{Class, Function, Instance, Value};
use hashbrown::HashMap;
use std::io::Write;
use std::rc::Rc;
use wox_mem::{StringInterner, Symbol};
use wox_syntax::ast::{BinaryOp, Expr, FunctionDecl, Ident, Program, Stmt, UnaryOp};
use wox_syntax::diagnostic::DiagnosticSink;
use wox_syntax::span::Span;
use wox_syntax::{keywords, scan_and_parse, Lexer, Parser};

/// How a statement finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Fell through to the next statement
    Normal,
    /// A `return` is unwinding to the nearest call
    Return {
        /// The returned value (`nil` for a bare `return`)
        value: Value,
        /// Location of the `return` keyword
        span: Span,
    },
}

/// Symbols the evaluator looks up by name.
#[derive(Debug, Clone, Copy)]
struct WellKnown {
    this: Symbol,
    super_: Symbol,
    init: Symbol,
}

/// Evaluates wox programs, writing `print` output to `W`.
pub struct Interpreter<W: Write> {
    globals: Rc<Environment>,
    environment: Rc<Environment>,
    interner: StringInterner,
    names: WellKnown,
    out: W,
}

impl<W: Write> Interpreter<W> {
    /// Creates an interpreter with an empty global frame.
    pub fn new(out: W) -> Self {
        let mut interner = keywords::interner();
        let names = WellKnown {
            this: interner.intern("this"),
            super_: interner.intern("super"),
            init: interner.intern("init"),
        };
        let globals = Environment::new();
        Self {
            environment: Rc::clone(&globals),
            globals,
            interner,
            names,
            out,
        }
    }

    /// The interner every program run by this interpreter must be parsed with.
    #[must_use]
    pub const fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Mutable access to the interner, for parsing outside [`Interpreter::run`].
    pub fn interner_mut(&mut self) -> &mut StringInterner {
        &mut self.interner
    }

    /// The global frame.
    #[must_use]
    pub fn globals(&self) -> &Rc<Environment> {
        &self.globals
    }

    /// Looks up a global by name.
    #[must_use]
    pub fn global(&self, name: &str) -> Option<Value> {
        let sym = self.interner.get(name)?;
        self.globals.get(sym)
    }

    /// The output sink.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Consumes the interpreter, returning the output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Scans, parses and executes one unit of source.
    ///
    /// Nothing runs if the source has a syntax error. Errors go to `sink`.
    pub fn run(&mut self, source: &str, sink: &mut DiagnosticSink) {
        let reported = sink.diagnostics().len();
        let program = scan_and_parse(source, &mut self.interner, sink);
        if sink.diagnostics().len() > reported {
            wox_log::debug!("skipping execution: syntax errors");
            return;
        }
        self.interpret(&program, sink);
    }

    /// Parses `source` as a single expression and evaluates it. Tokens left
    /// over after the expression are a syntax error.
    ///
    /// Returns `None` after reporting a syntax or runtime error to `sink`.
    pub fn eval_expression(&mut self, source: &str, sink: &mut DiagnosticSink) -> Option<Value> {
        let (tokens, lex_errors) = Lexer::new(source, &mut self.interner).lex();
        for error in &lex_errors {
            sink.report_lexer(error);
        }
        let mut parser = Parser::new(tokens, source);
        let parsed = parser.parse_complete_expression();
        for error in parser.errors() {
            sink.report_parser(error);
        }
        let expr = match parsed {
            Ok(expr) if lex_errors.is_empty() && !parser.has_errors() => expr,
            Ok(_) => return None,
            Err(error) => {
                sink.report_parser(&error);
                return None;
            }
        };
        match self.evaluate(&expr) {
            Ok(value) => Some(value),
            Err(error) => {
                sink.report_runtime(&error);
                None
            }
        }
    }

    /// Executes `program`, reporting the first runtime error to `sink`.
    ///
    /// The error aborts the remaining statements; globals defined before it
    /// stay defined.
    pub fn interpret(&mut self, program: &Program, sink: &mut DiagnosticSink) {
        if let Err(error) = self.execute_program(program) {
            wox_log::debug!("runtime error: {error}");
            sink.report_runtime(&error);
        }
    }

    /// Executes `program`, stopping at the first runtime error.
    pub fn execute_program(&mut self, program: &Program) -> RuntimeResult<()> {
        for stmt in &program.statements {
            if let Flow::Return { span, .. } = self.execute(stmt)? {
                return Err(RuntimeError::ReturnOutsideFunction { span });
            }
        }
        Ok(())
    }

    /// Executes one statement in the current frame.
    pub fn execute(&mut self, stmt: &Stmt) -> RuntimeResult<Flow> {
        match stmt {
            Stmt::Expression { expr } => {
                self.evaluate(expr)?;
            }
            Stmt::Print { expr, span } => {
                let value = self.evaluate(expr)?;
                writeln!(self.out, "{value}").map_err(|err| RuntimeError::Output {
                    message: err.to_string(),
                    span: *span,
                })?;
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.environment.define(name.name, value);
            }
            Stmt::Block { statements, .. } => {
                let env = self.environment.extend();
                return self.execute_block(statements, env);
            }
            Stmt::Function(decl) => {
                let function = self.make_function(decl, Rc::clone(&self.environment), false);
                self.environment
                    .define(decl.name.name, Value::Function(Rc::new(function)));
            }
            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.declare_class(*name, superclass.as_ref(), methods)?,
            Stmt::Return { value, span } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                return Ok(Flow::Return { value, span: *span });
            }
            Stmt::While {
                condition, body, ..
            } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let flow @ Flow::Return { .. } = self.execute(body)? {
                        return Ok(flow);
                    }
                }
            }
            Stmt::Loop { body, .. } => loop {
                let env = self.environment.extend();
                if let flow @ Flow::Return { .. } = self.execute_block(body, env)? {
                    return Ok(flow);
                }
            },
            Stmt::For {
                initializer,
                condition,
                increment,
                body,
                ..
            } => {
                let env = self.environment.extend();
                return self.with_environment(env, |this| {
                    this.run_for(initializer.as_deref(), condition.as_ref(), increment.as_ref(), body)
                });
            }
        }
        Ok(Flow::Normal)
    }

    fn run_for(
        &mut self,
        initializer: Option<&Stmt>,
        condition: Option<&Expr>,
        increment: Option<&Expr>,
        body: &Stmt,
    ) -> RuntimeResult<Flow> {
        if let Some(init) = initializer {
            self.execute(init)?;
        }
        loop {
            if let Some(condition) = condition {
                if !self.evaluate(condition)?.is_truthy() {
                    return Ok(Flow::Normal);
                }
            }
            if let flow @ Flow::Return { .. } = self.execute(body)? {
                return Ok(flow);
            }
            if let Some(increment) = increment {
                self.evaluate(increment)?;
            }
        }
    }

    /// Runs `statements` in `env`, restoring the current frame afterwards.
    pub fn execute_block(&mut self, statements: &[Stmt], env: Rc<Environment>) -> RuntimeResult<Flow> {
        self.with_environment(env, |this| {
            for stmt in statements {
                if let flow @ Flow::Return { .. } = this.execute(stmt)? {
                    return Ok(flow);
                }
            }
            Ok(Flow::Normal)
        })
    }

    /// Runs `f` with `env` as the current frame. The previous frame is put
    /// back whether or not `f` fails.
    fn with_environment<T>(
        &mut self,
        env: Rc<Environment>,
        f: impl FnOnce(&mut Self) -> RuntimeResult<T>,
    ) -> RuntimeResult<T> {
        let previous = std::mem::replace(&mut self.environment, env);
        let result = f(self);
        self.environment = previous;
        result
    }

    fn declare_class(
        &mut self,
        name: Ident,
        superclass: Option<&Ident>,
        methods: &[Rc<FunctionDecl>],
    ) -> RuntimeResult<()> {
        let superclass = match superclass {
            Some(ident) => match self.lookup(*ident)? {
                Value::Class(class) => Some(class),
                _ => {
                    return Err(RuntimeError::SuperclassNotClass {
                        name: self.name_of(ident.name),
                        span: ident.span,
                    });
                }
            },
            None => None,
        };

        let method_env = match &superclass {
            Some(class) => {
                let env = self.environment.extend();
                env.define(self.names.super_, Value::Class(Rc::clone(class)));
                env
            }
            None => Rc::clone(&self.environment),
        };

        let mut table = HashMap::with_capacity(methods.len());
        for decl in methods {
            let is_initializer = decl.name.name == self.names.init;
            let method = self.make_function(decl, Rc::clone(&method_env), is_initializer);
            table.insert(decl.name.name, Rc::new(method));
        }

        wox_log::trace!(
            "class {} with {} methods",
            self.name_of(name.name),
            table.len()
        );
        let class = Class {
            name: self.shared_name(name.name),
            superclass,
            methods: table,
        };
        self.environment
            .define(name.name, Value::Class(Rc::new(class)));
        Ok(())
    }

    fn make_function(
        &self,
        decl: &Rc<FunctionDecl>,
        closure: Rc<Environment>,
        is_initializer: bool,
    ) -> Function {
        Function {
            name: self.shared_name(decl.name.name),
            decl: Rc::clone(decl),
            closure,
            is_initializer,
        }
    }

    /// Evaluates an expression in the current frame.
    pub fn evaluate(&mut self, expr: &Expr) -> RuntimeResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(Value::from_literal(*value, &self.interner)),
            Expr::Grouping { inner, .. } => self.evaluate(inner),
            Expr::Unary { op, operand, span } => {
                let value = self.evaluate(operand)?;
                unary(*op, value, *span)
            }
            Expr::Binary {
                left,
                op,
                right,
                span,
            } => {
                let left = self.evaluate(left)?;
                match op {
                    BinaryOp::And if !left.is_truthy() => Ok(left),
                    BinaryOp::Or if left.is_truthy() => Ok(left),
                    BinaryOp::And | BinaryOp::Or => self.evaluate(right),
                    _ => {
                        let right = self.evaluate(right)?;
                        binary(*op, left, right, *span)
                    }
                }
            }
            Expr::Variable { name } => self.lookup(*name),
            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;
                if self.environment.assign(name.name, value.clone()) {
                    Ok(value)
                } else {
                    Err(self.unbound(*name))
                }
            }
            Expr::Call { callee, args, span } => {
                let callee = self.evaluate(callee)?;
                let args = args
                    .iter()
                    .map(|arg| self.evaluate(arg))
                    .collect::<RuntimeResult<Vec<_>>>()?;
                self.call(callee, args, *span)
            }
            Expr::Get { object, name } => {
                let object = self.evaluate(object)?;
                self.get_property(object, *name)
            }
            Expr::Set {
                object,
                name,
                value,
            } => {
                let instance = match self.evaluate(object)? {
                    Value::Instance(instance) => instance,
                    other => {
                        return Err(RuntimeError::NotAnInstance {
                            found: other.type_name(),
                            span: name.span,
                        });
                    }
                };
                let value = self.evaluate(value)?;
                instance.set_field(name.name, value.clone());
                Ok(value)
            }
            Expr::This { span } => self.lookup(Ident::new(self.names.this, *span)),
            Expr::Super { method, span } => self.super_method(*method, *span),
            Expr::Let {
                name,
                definition,
                body,
                ..
            } => {
                let value = self.evaluate(definition)?;
                let env = self.environment.extend();
                env.define(name.name, value);
                self.with_environment(env, |this| this.evaluate(body))
            }
            Expr::Do { body, .. } => {
                let env = self.environment.extend();
                self.with_environment(env, |this| {
                    let mut last = Value::Nil;
                    for expr in body {
                        last = this.evaluate(expr)?;
                    }
                    Ok(last)
                })
            }
            Expr::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.evaluate(then_branch)
                } else {
                    self.evaluate(else_branch)
                }
            }
            Expr::Tuple { elements, .. } => Ok(Value::Tuple(self.evaluate_all(elements)?.into())),
            Expr::Vector { elements, .. } => {
                Ok(Value::Vector(self.evaluate_all(elements)?.into()))
            }
            Expr::Case {
                scrutinee,
                arms,
                span,
            } => {
                let value = self.evaluate(scrutinee)?;
                for arm in arms {
                    let mut bindings = Vec::new();
                    if !match_pattern(&arm.pattern, &value, &self.interner, &mut bindings) {
                        continue;
                    }
                    let env = self.environment.extend();
                    for (name, bound) in bindings {
                        env.define(name, bound);
                    }
                    let result = self.with_environment(env, |this| {
                        if let Some(guard) = &arm.guard {
                            if !this.evaluate(guard)?.is_truthy() {
                                return Ok(None);
                            }
                        }
                        this.evaluate(&arm.body).map(Some)
                    })?;
                    if let Some(result) = result {
                        return Ok(result);
                    }
                }
                Err(RuntimeError::NonExhaustiveMatch {
                    value: value.to_string(),
                    span: *span,
                })
            }
        }
    }

    fn evaluate_all(&mut self, exprs: &[Expr]) -> RuntimeResult<Vec<Value>> {
        exprs.iter().map(|expr| self.evaluate(expr)).collect()
    }

    fn lookup(&self, name: Ident) -> RuntimeResult<Value> {
        self.environment
            .get(name.name)
            .ok_or_else(|| self.unbound(name))
    }

    fn unbound(&self, name: Ident) -> RuntimeError {
        RuntimeError::UnboundVariable {
            name: self.name_of(name.name),
            span: name.span,
        }
    }

    fn name_of(&self, sym: Symbol) -> String {
        self.interner.resolve(sym).unwrap_or("<unknown>").to_string()
    }

    fn shared_name(&self, sym: Symbol) -> Rc<str> {
        self.interner
            .resolve_shared(sym)
            .unwrap_or_else(|| Rc::from("<unknown>"))
    }

    fn get_property(&self, object: Value, name: Ident) -> RuntimeResult<Value> {
        let instance = match object {
            Value::Instance(instance) => instance,
            other => {
                return Err(RuntimeError::NotAnInstance {
                    found: other.type_name(),
                    span: name.span,
                });
            }
        };
        if let Some(value) = instance.field(name.name) {
            return Ok(value);
        }
        match instance.class.find_method(name.name) {
            Some(method) => {
                let bound = method.bind(Value::Instance(Rc::clone(&instance)), self.names.this);
                Ok(Value::Function(Rc::new(bound)))
            }
            None => Err(RuntimeError::UndefinedProperty {
                name: self.name_of(name.name),
                span: name.span,
            }),
        }
    }

    fn super_method(&self, method: Ident, span: Span) -> RuntimeResult<Value> {
        let superclass = match self.lookup(Ident::new(self.names.super_, span))? {
            Value::Class(class) => class,
            other => {
                return Err(RuntimeError::SuperclassNotClass {
                    name: other.to_string(),
                    span,
                });
            }
        };
        let receiver = self.lookup(Ident::new(self.names.this, span))?;
        match superclass.find_method(method.name) {
            Some(found) => Ok(Value::Function(Rc::new(
                found.bind(receiver, self.names.this),
            ))),
            None => Err(RuntimeError::UndefinedProperty {
                name: self.name_of(method.name),
                span: method.span,
            }),
        }
    }

    /// Calls a function or instantiates a class.
    pub fn call(&mut self, callee: Value, args: Vec<Value>, span: Span) -> RuntimeResult<Value> {
        match callee {
            Value::Function(function) => {
                check_arity(&function.name, function.arity(), args.len(), span)?;
                self.call_function(&function, args)
            }
            Value::Class(class) => {
                let instance = Value::Instance(Rc::new(Instance::new(Rc::clone(&class))));
                match class.find_method(self.names.init) {
                    Some(init) => {
                        check_arity(&class.name, init.arity(), args.len(), span)?;
                        let bound = init.bind(instance.clone(), self.names.this);
                        self.call_function(&bound, args)?;
                    }
                    None => check_arity(&class.name, 0, args.len(), span)?,
                }
                Ok(instance)
            }
            other => Err(RuntimeError::NotCallable {
                found: other.type_name(),
                span,
            }),
        }
    }

    fn call_function(&mut self, function: &Function, args: Vec<Value>) -> RuntimeResult<Value> {
        wox_log::trace!("call {} with {} args", function.name, args.len());
        let env = function.closure.extend();
        for (param, arg) in function.decl.params.iter().zip(args) {
            env.define(param.name, arg);
        }
        let flow = self.execute_block(&function.decl.body, env)?;

        if function.is_initializer {
            return Ok(function
                .closure
                .get(self.names.this)
                .unwrap_or(Value::Nil));
        }
        match flow {
            Flow::Return { value, .. } => Ok(value),
            Flow::Normal => Ok(Value::Nil),
        }
    }
}

fn unary(op: UnaryOp, value: Value, span: Span) -> RuntimeResult<Value> {
    match (op, value) {
        (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Neg, other) => Err(RuntimeError::NumberOperand {
            op,
            found: other.type_name(),
            span,
        }),
        (UnaryOp::Not, other) => Err(RuntimeError::BooleanOperand {
            found: other.type_name(),
            span,
        }),
    }
}

fn check_arity(name: &str, expected: usize, found: usize, span: Span) -> RuntimeResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(RuntimeError::ArityMismatch {
            name: name.to_string(),
            expected,
            found,
            span,
        })
    }
}

fn binary(op: BinaryOp, left: Value, right: Value, span: Span) -> RuntimeResult<Value> {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::Neq => Ok(Value::Bool(left != right)),
        BinaryOp::And => Ok(if left.is_truthy() { right } else { left }),
        BinaryOp::Or => Ok(if left.is_truthy() { left } else { right }),
        BinaryOp::Append => match (&left, &right) {
            (Value::Str(a), Value::Str(b)) => {
                let mut joined = String::with_capacity(a.len() + b.len());
                joined.push_str(a);
                joined.push_str(b);
                Ok(Value::Str(Rc::from(joined)))
            }
            _ => Err(RuntimeError::StringOperands {
                left: left.type_name(),
                right: right.type_name(),
                span,
            }),
        },
        BinaryOp::Add => numeric(op, &left, &right, span, |a, b| Value::Number(a + b)),
        BinaryOp::Sub => numeric(op, &left, &right, span, |a, b| Value::Number(a - b)),
        BinaryOp::Mul => numeric(op, &left, &right, span, |a, b| Value::Number(a * b)),
        BinaryOp::Div => numeric(op, &left, &right, span, |a, b| Value::Number(a / b)),
        BinaryOp::Lt => numeric(op, &left, &right, span, |a, b| Value::Bool(a < b)),
        BinaryOp::Gt => numeric(op, &left, &right, span, |a, b| Value::Bool(a > b)),
        BinaryOp::Lte => numeric(op, &left, &right, span, |a, b| Value::Bool(a <= b)),
        BinaryOp::Gte => numeric(op, &left, &right, span, |a, b| Value::Bool(a >= b)),
    }
}

fn numeric(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    span: Span,
    apply: fn(f64, f64) -> Value,
) -> RuntimeResult<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(apply(*a, *b)),
        _ => Err(RuntimeError::NumberOperands {
            op,
            left: left.type_name(),
            right: right.type_name(),
            span,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> (String, DiagnosticSink) {
        let mut interp = Interpreter::new(Vec::new());
        let mut sink = DiagnosticSink::new();
        interp.run(source, &mut sink);
        let out = String::from_utf8(interp.into_output()).unwrap();
        (out, sink)
    }

    fn output(source: &str) -> String {
        let (out, sink) = run(source);
        assert!(!sink.has_errors(), "unexpected errors: {:?}", sink.diagnostics());
        out
    }

    fn eval(source: &str) -> Value {
        let mut interp = Interpreter::new(Vec::new());
        let mut sink = DiagnosticSink::new();
        let value = interp.eval_expression(source, &mut sink);
        assert!(!sink.has_errors(), "unexpected errors: {:?}", sink.diagnostics());
        value.unwrap()
    }

    fn runtime_error(source: &str) -> String {
        let (_, sink) = run(source);
        assert!(sink.had_runtime_error());
        assert!(!sink.had_syntax_error());
        sink.diagnostics()[0].code.clone().unwrap()
    }

    #[test]
    fn test_arithmetic_and_precedence() {
        assert_eq!(eval("1 + 2 * 3"), Value::Number(7.0));
        assert_eq!(eval("(1 + 2) * 3"), Value::Number(9.0));
        assert_eq!(eval("10 / 4 - 1"), Value::Number(1.5));
        assert_eq!(eval("-(2 + 3)"), Value::Number(-5.0));
    }

    #[test]
    fn test_comparison_and_equality() {
        assert_eq!(eval("1 == 1"), Value::Bool(true));
        assert_eq!(eval("1 != 1"), Value::Bool(false));
        assert_eq!(eval("2 <= 2"), Value::Bool(true));
        assert_eq!(eval("nil == nil"), Value::Bool(true));
        assert_eq!(eval("nil == false"), Value::Bool(false));
        assert_eq!(eval("\"a\" == \"a\""), Value::Bool(true));
    }

    #[test]
    fn test_nan_equality() {
        assert_eq!(eval("let n = 0 / 0 in n == n"), Value::Bool(false));
        assert_eq!(eval("let n = 0 / 0 in n != n"), Value::Bool(true));
    }

    #[test]
    fn test_logical_operators_yield_operand() {
        assert_eq!(eval("nil or 3"), Value::Number(3.0));
        assert_eq!(eval("1 and 2"), Value::Number(2.0));
        assert_eq!(eval("false and undefined_name"), Value::Bool(false));
        assert_eq!(eval("true or undefined_name"), Value::Bool(true));
    }

    #[test]
    fn test_not_requires_boolean() {
        assert_eq!(eval("!false"), Value::Bool(true));
        assert_eq!(runtime_error("print !nil;"), "E0304");
    }

    #[test]
    fn test_append() {
        assert_eq!(eval("\"foo\" ++ \"bar\""), Value::Str(Rc::from("foobar")));
        assert_eq!(runtime_error("print \"a\" ++ 1;"), "E0305");
    }

    #[test]
    fn test_number_operands() {
        assert_eq!(runtime_error("print 1 + \"a\";"), "E0303");
        assert_eq!(runtime_error("print -\"a\";"), "E0302");
        assert_eq!(runtime_error("print nil < 1;"), "E0303");
    }

    #[test]
    fn test_let_scopes_binding() {
        assert_eq!(eval("let x = 3 in x + 1"), Value::Number(4.0));
        assert_eq!(runtime_error("print let x = 3 in x; print x;"), "E0301");
    }

    #[test]
    fn test_do_yields_last() {
        assert_eq!(eval("do { 1; 2; 3 }"), Value::Number(3.0));
        assert_eq!(eval("do {}"), Value::Nil);
    }

    #[test]
    fn test_if_expression() {
        assert_eq!(eval("if 0 then \"yes\" else \"no\""), Value::Str(Rc::from("yes")));
        assert_eq!(eval("if nil then 1 else 2"), Value::Number(2.0));
    }

    #[test]
    fn test_collections() {
        let value = eval("(1, [2, 3], \"s\")");
        assert_eq!(value.to_string(), "(1, [2, 3], s)");
        assert_eq!(eval("[]").to_string(), "[]");
        assert_eq!(eval("(1, 2) == (1, 2)"), Value::Bool(true));
    }

    #[test]
    fn test_print_formats() {
        let out = output("print 3.0; print 2.5; print nil; print (); print true; print \"raw\";");
        assert_eq!(out, "3\n2.5\n()\n()\ntrue\nraw\n");

        let out = output("print 1 / 0; print -1 / 0; print 0 / 0; print 1000000000000000000000;");
        assert_eq!(out, "Infinity\n-Infinity\nNaN\n1.0E21\n");
    }

    #[test]
    fn test_variables_and_assignment() {
        let out = output("var a = 1; a = a + 1; print a; var b; print b;");
        assert_eq!(out, "2\n()\n");
        assert_eq!(runtime_error("c = 1;"), "E0301");
    }

    #[test]
    fn test_blocks_shadow_and_restore() {
        let out = output("var a = 1; { var a = 2; print a; } print a;");
        assert_eq!(out, "2\n1\n");
    }

    #[test]
    fn test_functions_and_return() {
        let out = output("fn add(a, b) { return a + b; } print add(1, 2); fn none() {} print none();");
        assert_eq!(out, "3\n()\n");
    }

    #[test]
    fn test_recursion() {
        let out = output("fn fib(n) { return if n < 2 then n else fib(n - 1) + fib(n - 2); } print fib(10);");
        assert_eq!(out, "55\n");
    }

    #[test]
    fn test_closures_capture_definition_site() {
        let source = "
            fn counter() {
                var n = 0;
                fn next() { n = n + 1; return n; }
                return next;
            }
            var c = counter();
            c(); c();
            print c();
        ";
        assert_eq!(output(source), "3\n");
    }

    #[test]
    fn test_arity_mismatch() {
        assert_eq!(runtime_error("fn f(a) {} f(1, 2);"), "E0306");
    }

    #[test]
    fn test_not_callable() {
        assert_eq!(runtime_error("var x = 1; x();"), "E0308");
    }

    #[test]
    fn test_while_loop() {
        let out = output("var i = 0; while i < 3 { print i; i = i + 1; }");
        assert_eq!(out, "0\n1\n2\n");
    }

    #[test]
    fn test_loop_until_return() {
        let source = "
            fn first_over(limit) {
                var i = 0;
                loop { i = i + 1; while i > limit { return i; } }
            }
            print first_over(4);
        ";
        assert_eq!(output(source), "5\n");
    }

    #[test]
    fn test_for_loop() {
        let out = output("for (var i = 0; i < 3; i = i + 1) print i;");
        assert_eq!(out, "0\n1\n2\n");
        assert_eq!(runtime_error("for (var i = 0; i < 1; i = i + 1) {} print i;"), "E0301");
    }

    #[test]
    fn test_return_at_top_level() {
        assert_eq!(runtime_error("return 1;"), "E0312");
    }

    #[test]
    fn test_case_arms_in_order() {
        let source = "case (1, 2) of { (0, _) then \"zero\", (a, b) if a > b then \"desc\", (a, b) then a + b }";
        assert_eq!(eval(source), Value::Number(3.0));
    }

    #[test]
    fn test_case_bindings_are_scoped() {
        assert_eq!(eval("case [1, [2]] of { [x, [y]] then x + y }"), Value::Number(3.0));
        assert_eq!(
            runtime_error("print case 1 of { x then x }; print x;"),
            "E0301"
        );
    }

    #[test]
    fn test_case_at_and_literals() {
        assert_eq!(eval("case \"hi\" of { \"hi\" then 1, _ then 2 }"), Value::Number(1.0));
        assert_eq!(eval("case -3 of { -3 then true, _ then false }"), Value::Bool(true));
        assert_eq!(eval("case nil of { () then \"unit\" }"), Value::Str(Rc::from("unit")));
        let whole = eval("case (1, 2) of { t @ (1, _) then t }");
        assert_eq!(whole.to_string(), "(1, 2)");
    }

    #[test]
    fn test_non_exhaustive_match() {
        assert_eq!(runtime_error("print case 3 of { 1 then 1, 2 then 2 };"), "E0307");
    }

    #[test]
    fn test_class_fields_and_methods() {
        let source = "
            class Point {
                init(x, y) { this.x = x; this.y = y; }
                sum() { return this.x + this.y; }
            }
            var p = Point(1, 2);
            print p.sum();
            p.x = 10;
            print p.sum();
            print p;
            print Point;
        ";
        assert_eq!(output(source), "3\n12\nPoint instance\nPoint\n");
    }

    #[test]
    fn test_inherited_method_binds_receiver() {
        let source = "
            class A { m() { return this.name; } }
            class B < A { init() { this.name = \"b\"; } }
            var b = B();
            print b.m();
        ";
        assert_eq!(output(source), "b\n");
    }

    #[test]
    fn test_super_calls() {
        let source = "
            class A { greet() { return \"A\"; } }
            class B < A { greet() { return \"B\" ++ super.greet(); } }
            class C < B { greet() { return \"C\" ++ super.greet(); } }
            print C().greet();
        ";
        assert_eq!(output(source), "CBA\n");
    }

    #[test]
    fn test_init_returns_instance() {
        let source = "
            class A { init() { this.v = 1; } }
            var a = A();
            print a.init() == a;
        ";
        assert_eq!(output(source), "true\n");
    }

    #[test]
    fn test_class_arity() {
        assert_eq!(runtime_error("class A {} A(1);"), "E0306");
        assert_eq!(runtime_error("class A { init(x) {} } A();"), "E0306");
    }

    #[test]
    fn test_class_errors() {
        assert_eq!(runtime_error("var x = 1; print x.y;"), "E0309");
        assert_eq!(runtime_error("class A {} print A().missing;"), "E0310");
        assert_eq!(runtime_error("var B = 1; class A < B {}"), "E0311");
        assert_eq!(runtime_error("print this;"), "E0301");
        assert_eq!(runtime_error("class A { m() { return super.m(); } } A().m();"), "E0301");
    }

    #[test]
    fn test_error_aborts_rest_but_keeps_globals() {
        let mut interp = Interpreter::new(Vec::new());
        let mut sink = DiagnosticSink::new();
        interp.run("var a = 1; print a; print b; print 2;", &mut sink);
        assert!(sink.had_runtime_error());
        sink.reset();

        interp.run("print a + 1;", &mut sink);
        assert!(!sink.has_errors());
        assert_eq!(interp.into_output(), b"1\n2\n");
    }

    #[test]
    fn test_error_inside_scope_restores_globals() {
        let mut interp = Interpreter::new(Vec::new());
        let mut sink = DiagnosticSink::new();
        interp.run("var a = 1; fn f() { var a = 2; return missing; } f();", &mut sink);
        assert!(sink.had_runtime_error());
        assert!(Rc::ptr_eq(&interp.environment, &interp.globals));
        assert_eq!(interp.global("a"), Some(Value::Number(1.0)));
    }

    #[test]
    fn test_error_in_let_and_do_restores_globals() {
        for source in ["print let x = 1 in missing;", "print do { 1; missing };"] {
            let mut interp = Interpreter::new(Vec::new());
            let mut sink = DiagnosticSink::new();
            interp.run(source, &mut sink);
            assert!(sink.had_runtime_error(), "{source}");
            assert!(Rc::ptr_eq(&interp.environment, &interp.globals), "{source}");
            assert_eq!(interp.global("x"), None);
        }
    }

    #[test]
    fn test_eval_expression_rejects_trailing_tokens() {
        let mut interp = Interpreter::new(Vec::new());
        let mut sink = DiagnosticSink::new();
        assert_eq!(interp.eval_expression("1 2", &mut sink), None);
        assert!(sink.had_syntax_error());
        assert_eq!(sink.diagnostics().len(), 1);
        assert_eq!(sink.diagnostics()[0].code.as_deref(), Some("E0201"));
    }

    #[test]
    fn test_syntax_error_skips_execution() {
        let (out, sink) = run("print 1; var = 2;");
        assert!(sink.had_syntax_error());
        assert!(!sink.had_runtime_error());
        assert_eq!(out, "");
    }
}

//! Runtime values.
//!
//! [`Value`] is cheap to clone: every heap-backed variant is behind an
//! [`Rc`]. Tuples and vectors are immutable once built. Instances are the
//! only values with interior mutability (their field table).
//!
//! ```
//! use wox_interpreter::value::Value;
//!
//! assert_eq!(Value::Number(3.0).to_string(), "3");
//! assert_eq!(Value::Nil.to_string(), "()");
//! assert!(Value::Number(0.0).is_truthy());
//! assert!(!Value::Bool(false).is_truthy());
//! ```

use crate::env::Environment;
use hashbrown::HashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use wox_mem::{StringInterner, Symbol};
use wox_syntax::ast::{FunctionDecl, Literal};

/// A wox value.
#[derive(Debug, Clone)]
pub enum Value {
    /// The unit value, written `nil` or `()`
    Nil,
    /// `true` or `false`
    Bool(bool),
    /// A double-precision number
    Number(f64),
    /// An immutable string
    Str(Rc<str>),
    /// A fixed-arity product of two or more values
    Tuple(Rc<[Value]>),
    /// A sequence of values
    Vector(Rc<[Value]>),
    /// A user function or bound method
    Function(Rc<Function>),
    /// A class; calling it makes an instance
    Class(Rc<Class>),
    /// An object made by calling a class
    Instance(Rc<Instance>),
}

impl Value {
    /// Converts a literal from the AST, resolving string contents.
    #[must_use]
    pub fn from_literal(literal: Literal, interner: &StringInterner) -> Self {
        match literal {
            Literal::Number(n) => Self::Number(n),
            Literal::Str(sym) => {
                Self::Str(interner.resolve_shared(sym).unwrap_or_else(|| Rc::from("")))
            }
            Literal::Bool(b) => Self::Bool(b),
            Literal::Nil => Self::Nil,
        }
    }

    /// `nil` and `false` are falsy; everything else is truthy.
    #[must_use]
    pub const fn is_truthy(&self) -> bool {
        !matches!(self, Self::Nil | Self::Bool(false))
    }

    /// Name of the value's type, as used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "unit",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Str(_) => "string",
            Self::Tuple(_) => "tuple",
            Self::Vector(_) => "vector",
            Self::Function(_) => "function",
            Self::Class(_) => "class",
            Self::Instance(_) => "instance",
        }
    }
}

impl PartialEq for Value {
    /// Numbers compare as IEEE-754 doubles, so `NaN != NaN`. Tuples, vectors
    /// and strings compare by contents; functions, classes and instances by
    /// identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Tuple(a), Self::Tuple(b)) | (Self::Vector(a), Self::Vector(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Class(a), Self::Class(b)) => Rc::ptr_eq(a, b),
            (Self::Instance(a), Self::Instance(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Writes a number the way `print` shows it: whole numbers drop their
/// fraction, and magnitudes from 1e7 up or below 1e-3 use `E` notation with
/// at least one fractional mantissa digit (`1.0E21`, `1.5E-5`).
fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        return write!(f, "NaN");
    }
    if n.is_infinite() {
        return write!(f, "{}", if n > 0.0 { "Infinity" } else { "-Infinity" });
    }

    let magnitude = n.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        return write!(f, "{n}");
    }

    let scientific = format!("{n:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    if mantissa.contains('.') {
        write!(f, "{mantissa}E{exponent}")
    } else {
        write!(f, "{mantissa}.0E{exponent}")
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "()"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write_number(f, *n),
            Self::Str(s) => write!(f, "{s}"),
            Self::Tuple(items) => {
                write!(f, "(")?;
                write_joined(f, items)?;
                write!(f, ")")
            }
            Self::Vector(items) => {
                write!(f, "[")?;
                write_joined(f, items)?;
                write!(f, "]")
            }
            Self::Function(function) => write!(f, "<fn {}>", function.name),
            Self::Class(class) => write!(f, "{}", class.name),
            Self::Instance(instance) => write!(f, "{} instance", instance.class.name),
        }
    }
}

/// A function value: a declaration paired with the frame it was defined in.
#[derive(Debug)]
pub struct Function {
    /// Resolved name, for display
    pub name: Rc<str>,
    /// The declaration, shared with the AST
    pub decl: Rc<FunctionDecl>,
    /// Frame active where the function was declared
    pub closure: Rc<Environment>,
    /// `true` for a class's `init` method
    pub is_initializer: bool,
}

impl Function {
    /// Number of parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.decl.arity()
    }

    /// Returns a copy of this method whose closure binds `this` to `receiver`.
    #[must_use]
    pub fn bind(&self, receiver: Value, this: Symbol) -> Self {
        let env = self.closure.extend();
        env.define(this, receiver);
        Self {
            name: Rc::clone(&self.name),
            decl: Rc::clone(&self.decl),
            closure: env,
            is_initializer: self.is_initializer,
        }
    }
}

/// A class: a name, a method table and an optional superclass.
#[derive(Debug)]
pub struct Class {
    /// Resolved name, for display
    pub name: Rc<str>,
    /// Direct superclass
    pub superclass: Option<Rc<Class>>,
    /// Methods declared in this class body
    pub methods: HashMap<Symbol, Rc<Function>>,
}

impl Class {
    /// Finds a method on this class or the nearest superclass declaring it.
    #[must_use]
    pub fn find_method(&self, name: Symbol) -> Option<Rc<Function>> {
        let mut class = self;
        loop {
            if let Some(method) = class.methods.get(&name) {
                return Some(Rc::clone(method));
            }
            class = class.superclass.as_deref()?;
        }
    }
}

/// An object: its class and a mutable field table.
#[derive(Debug)]
pub struct Instance {
    /// The class this was made from
    pub class: Rc<Class>,
    /// Fields set on this instance
    pub fields: RefCell<HashMap<Symbol, Value>>,
}

impl Instance {
    /// Creates an instance with no fields.
    #[must_use]
    pub fn new(class: Rc<Class>) -> Self {
        Self {
            class,
            fields: RefCell::new(HashMap::new()),
        }
    }

    /// Reads a field.
    #[must_use]
    pub fn field(&self, name: Symbol) -> Option<Value> {
        self.fields.borrow().get(&name).cloned()
    }

    /// Writes a field, creating it if needed.
    pub fn set_field(&self, name: Symbol, value: Value) {
        self.fields.borrow_mut().insert(name, value);
    }
}

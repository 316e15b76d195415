//! Lexical environments.
//!
//! An [`Environment`] is one frame of bindings plus a link to the frame that
//! encloses it. Frames are shared through [`Rc`]: a closure keeps its
//! defining frame (and every frame above it) alive after the block that
//! created it has finished.
//!
//! ```
//! use wox_interpreter::env::Environment;
//! use wox_interpreter::value::Value;
//! use wox_mem::Symbol;
//!
//! let x = Symbol::new(0);
//! let globals = Environment::new();
//! globals.define(x, Value::Number(1.0));
//!
//! let inner = globals.extend();
//! assert!(inner.assign(x, Value::Number(2.0)));
//! assert_eq!(globals.get(x), Some(Value::Number(2.0)));
//! ```

use crate::value::Value;
use hashbrown::HashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use wox_mem::Symbol;

/// One scope's bindings and its enclosing scope.
#[derive(Default)]
pub struct Environment {
    values: RefCell<HashMap<Symbol, Value>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a root frame.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Creates a child frame whose parent is `self`.
    #[must_use]
    pub fn extend(self: &Rc<Self>) -> Rc<Self> {
        Rc::new(Self {
            values: RefCell::new(HashMap::new()),
            parent: Some(Rc::clone(self)),
        })
    }

    /// Binds `name` in this frame, replacing any binding it already has here.
    pub fn define(&self, name: Symbol, value: Value) {
        self.values.borrow_mut().insert(name, value);
    }

    /// Looks `name` up from this frame outwards.
    #[must_use]
    pub fn get(&self, name: Symbol) -> Option<Value> {
        let mut frame = self;
        loop {
            if let Some(value) = frame.values.borrow().get(&name) {
                return Some(value.clone());
            }
            frame = frame.parent.as_deref()?;
        }
    }

    /// Rebinds the nearest existing `name`.
    ///
    /// Returns `false`, changing nothing, when no frame on the chain binds
    /// `name`. Assignment never defines.
    pub fn assign(&self, name: Symbol, value: Value) -> bool {
        let mut frame = self;
        loop {
            if let Some(slot) = frame.values.borrow_mut().get_mut(&name) {
                *slot = value;
                return true;
            }
            match frame.parent.as_deref() {
                Some(parent) => frame = parent,
                None => return false,
            }
        }
    }

    /// Number of frames from here to the root, counting both ends.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut frame = self;
        while let Some(parent) = frame.parent.as_deref() {
            depth += 1;
            frame = parent;
        }
        depth
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("bindings", &self.values.borrow().len())
            .field("depth", &self.depth())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(id: u32) -> Symbol {
        Symbol::new(id)
    }

    #[test]
    fn test_define_and_get() {
        let env = Environment::new();
        env.define(sym(1), Value::Bool(true));
        assert_eq!(env.get(sym(1)), Some(Value::Bool(true)));
        assert_eq!(env.get(sym(2)), None);
    }

    #[test]
    fn test_define_shadows_in_same_frame() {
        let env = Environment::new();
        env.define(sym(1), Value::Number(1.0));
        env.define(sym(1), Value::Number(2.0));
        assert_eq!(env.get(sym(1)), Some(Value::Number(2.0)));
    }

    #[test]
    fn test_lookup_walks_outwards() {
        let root = Environment::new();
        root.define(sym(1), Value::Number(1.0));
        let child = root.extend().extend();
        assert_eq!(child.get(sym(1)), Some(Value::Number(1.0)));
        assert_eq!(child.depth(), 3);
    }

    #[test]
    fn test_child_shadows_parent() {
        let root = Environment::new();
        root.define(sym(1), Value::Number(1.0));
        let child = root.extend();
        child.define(sym(1), Value::Number(2.0));
        assert_eq!(child.get(sym(1)), Some(Value::Number(2.0)));
        assert_eq!(root.get(sym(1)), Some(Value::Number(1.0)));
    }

    #[test]
    fn test_assign_updates_nearest() {
        let root = Environment::new();
        root.define(sym(1), Value::Number(1.0));
        let child = root.extend();
        assert!(child.assign(sym(1), Value::Number(5.0)));
        assert_eq!(root.get(sym(1)), Some(Value::Number(5.0)));
    }

    #[test]
    fn test_assign_never_defines() {
        let root = Environment::new();
        let child = root.extend();
        assert!(!child.assign(sym(3), Value::Nil));
        assert_eq!(child.get(sym(3)), None);
        assert_eq!(root.get(sym(3)), None);
    }

    #[test]
    fn test_frame_outlives_creator() {
        let captured = {
            let root = Environment::new();
            let block = root.extend();
            block.define(sym(9), Value::Bool(false));
            block
        };
        assert_eq!(captured.get(sym(9)), Some(Value::Bool(false)));
    }
}

//! Bidirectional string interning.
//!
//! Strings are stored once as `Rc<str>`; the same allocation backs both the
//! lookup table and the id-indexed vector, and is handed out again by
//! [`StringInterner::resolve_shared`] when the interpreter needs an owned
//! runtime string.
//!
//! ```
//! use wox_mem::StringInterner;
//!
//! let mut interner = StringInterner::new();
//! let a = interner.intern("counter");
//! let b = interner.intern("counter");
//!
//! assert_eq!(a, b);
//! assert_eq!(interner.resolve(a), Some("counter"));
//! ```

use crate::symbol::Symbol;
use hashbrown::HashMap;
use std::rc::Rc;

/// Maps strings to [`Symbol`]s and back.
#[derive(Debug, Clone, Default)]
pub struct StringInterner {
    strings: Vec<Rc<str>>,
    symbols: HashMap<Rc<str>, Symbol>,
    pre_interned: u32,
}

impl StringInterner {
    /// Creates an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an interner whose first ids are `words`, in order.
    ///
    /// The scanner seeds its interner with the keyword list so that keyword
    /// symbols are identical across every interner in the process.
    ///
    /// ```
    /// use wox_mem::StringInterner;
    ///
    /// let mut interner = StringInterner::with_pre_interned(&["class", "fn"]);
    /// assert_eq!(interner.intern("fn").as_u32(), 1);
    /// let class = interner.intern("class");
    /// assert!(interner.is_pre_interned(class));
    /// ```
    #[must_use]
    pub fn with_pre_interned(words: &[&str]) -> Self {
        let mut interner = Self {
            strings: Vec::with_capacity(words.len()),
            symbols: HashMap::with_capacity(words.len()),
            pre_interned: 0,
        };
        for word in words {
            interner.intern(word);
        }
        interner.pre_interned = u32::try_from(interner.strings.len()).unwrap_or(u32::MAX);
        interner
    }

    /// Returns the symbol for `s`, allocating one on first sight.
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&sym) = self.symbols.get(s) {
            return sym;
        }

        let id = u32::try_from(self.strings.len()).unwrap_or(u32::MAX - 1);
        let sym = Symbol::new(id);
        let shared: Rc<str> = Rc::from(s);
        self.strings.push(Rc::clone(&shared));
        self.symbols.insert(shared, sym);
        sym
    }

    /// Returns the symbol for `s` without interning it.
    #[must_use]
    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.symbols.get(s).copied()
    }

    /// Resolves a symbol to its text.
    #[must_use]
    pub fn resolve(&self, sym: Symbol) -> Option<&str> {
        self.strings.get(sym.as_usize()).map(|s| &**s)
    }

    /// Resolves a symbol to a shared handle on its text.
    #[must_use]
    pub fn resolve_shared(&self, sym: Symbol) -> Option<Rc<str>> {
        self.strings.get(sym.as_usize()).cloned()
    }

    /// Returns `true` if `sym` was one of the words given to
    /// [`with_pre_interned`](Self::with_pre_interned).
    #[must_use]
    pub const fn is_pre_interned(&self, sym: Symbol) -> bool {
        sym.as_u32() < self.pre_interned
    }

    /// Number of distinct strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns `true` if nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

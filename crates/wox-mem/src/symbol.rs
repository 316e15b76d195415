//! Handles to interned strings.
//!
//! ```
//! use wox_mem::Symbol;
//!
//! let a = Symbol::new(7);
//! assert_eq!(a, Symbol::new(7));
//! assert_eq!(a.as_usize(), 7);
//! ```

use std::fmt;

/// A 32-bit handle to a string owned by a [`StringInterner`](crate::StringInterner).
///
/// Two symbols from the same interner are equal exactly when the strings they
/// name are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Wraps a raw id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the raw id as an index.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// A sentinel that no interner ever hands out.
    #[must_use]
    pub const fn invalid() -> Self {
        Self(u32::MAX)
    }

    /// Returns `true` for [`Symbol::invalid`].
    #[must_use]
    pub const fn is_invalid(self) -> bool {
        self.0 == u32::MAX
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for Symbol {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashMap;

    #[test]
    fn test_symbol_roundtrip() {
        let sym = Symbol::from(42);
        assert_eq!(sym.as_u32(), 42);
        assert_eq!(sym.as_usize(), 42);
        assert_eq!(sym.to_string(), "#42");
    }

    #[test]
    fn test_symbol_invalid() {
        assert!(Symbol::invalid().is_invalid());
        assert!(!Symbol::new(0).is_invalid());
    }

    #[test]
    fn test_symbol_as_map_key() {
        let mut frame = HashMap::new();
        frame.insert(Symbol::new(1), "first");
        frame.insert(Symbol::new(1), "shadowed");
        frame.insert(Symbol::new(2), "second");

        assert_eq!(frame.len(), 2);
        assert_eq!(frame[&Symbol::new(1)], "shadowed");
    }
}

//! Interned names for the wox interpreter.
//!
//! Every identifier and string literal the scanner sees is interned once and
//! referred to by a [`Symbol`] from then on. The interpreter keys its
//! environment frames by symbol, so variable lookup never hashes a string.

#![warn(missing_docs)]

pub mod interner;
pub mod symbol;

pub use interner::StringInterner;
pub use symbol::Symbol;

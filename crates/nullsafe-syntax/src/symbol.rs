//! Interned identifiers.
//!
//! A [`Symbol`] is a 32-bit handle into a [`StringInterner`]. The host parser
//! interns every identifier it produces, and the rewrite engine interns the
//! names it introduces (temporaries, runtime entry points) into the same
//! table so the printer and the backend can resolve both alike.
//!
//! ```
//! use nullsafe_syntax::StringInterner;
//!
//! let mut interner = StringInterner::new();
//! let a = interner.intern("receiver");
//! let b = interner.intern("receiver");
//! assert_eq!(a, b);
//! assert_eq!(interner.resolve(a), Some("receiver"));
//! ```

use hashbrown::HashMap;
use std::fmt;

/// Handle to an interned string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Creates a symbol from a raw ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// Bidirectional string table.
#[derive(Debug, Clone, Default)]
pub struct StringInterner {
    strings: Vec<Box<str>>,
    symbols: HashMap<Box<str>, Symbol>,
}

impl StringInterner {
    /// Creates an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `s`, returning the existing symbol if it was seen before.
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&sym) = self.symbols.get(s) {
            return sym;
        }

        #[allow(clippy::cast_possible_truncation)]
        let sym = Symbol::new(self.strings.len() as u32);
        let owned: Box<str> = s.into();
        self.strings.push(owned.clone());
        self.symbols.insert(owned, sym);
        sym
    }

    /// Looks up an already interned string without inserting it.
    #[must_use]
    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.symbols.get(s).copied()
    }

    /// Resolves a symbol back to its text.
    #[must_use]
    pub fn resolve(&self, sym: Symbol) -> Option<&str> {
        self.strings.get(sym.index()).map(AsRef::as_ref)
    }

    /// Resolves a symbol, substituting `<unknown>` for foreign symbols.
    #[must_use]
    pub fn display(&self, sym: Symbol) -> &str {
        self.resolve(sym).unwrap_or("<unknown>")
    }

    /// Returns the number of interned strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns `true` if nothing has been interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

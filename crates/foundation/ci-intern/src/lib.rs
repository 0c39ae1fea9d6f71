//! Identifier interning
//!
//! Symbol names are interned once per compilation unit so scopes can key
//! their tables on a small `Copy` handle instead of owned strings.

pub use lasso::Spur as Name;
use lasso::Rodeo;

/// String interner for identifiers
///
/// The tree is built and resolved on a single thread, so the plain
/// [`Rodeo`] is enough here.
#[derive(Debug, Default)]
pub struct Interner {
    inner: Rodeo,
}

impl Interner {
    /// Creates an empty interner
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `text`, returning the existing handle if it was seen before
    pub fn intern(&mut self, text: &str) -> Name {
        self.inner.get_or_intern(text)
    }

    /// Looks up `text` without interning it
    pub fn get(&self, text: &str) -> Option<Name> {
        self.inner.get(text)
    }

    /// Returns the text behind `name`
    pub fn resolve(&self, name: Name) -> &str {
        self.inner.resolve(&name)
    }

    /// Returns the text behind `name`, or `None` if it belongs to another interner
    pub fn try_resolve(&self, name: Name) -> Option<&str> {
        self.inner.try_resolve(&name)
    }

    /// Number of distinct names interned so far
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether nothing has been interned yet
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

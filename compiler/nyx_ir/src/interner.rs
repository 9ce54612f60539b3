//! String interning for identifier names.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

/// Deduplicating string-to-`Name` table.
///
/// Interning the same string twice yields the same `Name`; lookup is a plain
/// index into the backing vector.
#[derive(Default, Debug)]
pub struct StringInterner {
    strings: Vec<Box<str>>,
    map: FxHashMap<Box<str>, Name>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning its stable `Name`.
    pub fn intern(&mut self, s: &str) -> Name {
        if let Some(&name) = self.map.get(s) {
            return name;
        }
        let name = Name::from_raw(
            u32::try_from(self.strings.len()).expect("interner exceeded u32::MAX strings"),
        );
        let boxed: Box<str> = s.into();
        self.strings.push(boxed.clone());
        self.map.insert(boxed, name);
        name
    }

    /// Resolve a `Name` back to its string.
    ///
    /// # Panics
    /// Panics if `name` was not produced by this interner.
    pub fn lookup(&self, name: Name) -> &str {
        &self.strings[name.raw() as usize]
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// Cheaply clonable interner shared across compilation stages.
#[derive(Clone, Default, Debug)]
pub struct SharedInterner {
    inner: Arc<RwLock<StringInterner>>,
}

impl SharedInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning its stable `Name`.
    pub fn intern(&self, s: &str) -> Name {
        self.inner.write().intern(s)
    }

    /// Resolve a `Name` to an owned copy of its string.
    pub fn lookup(&self, name: Name) -> String {
        self.inner.read().lookup(name).to_owned()
    }
}

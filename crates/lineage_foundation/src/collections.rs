//! Insertion-ordered persistent tables with structural sharing.
//!
//! A thin wrapper around the `im` crate's persistent vector and hash map.
//! Cloning a table is O(1), so a derived analysis can take a snapshot of
//! its parent's table and fold new entries over it without ever touching
//! the parent's copy.

use std::fmt;
use std::sync::Arc;

/// Name-keyed table that remembers insertion order.
///
/// Inserting a name that is already present replaces the entry in place,
/// keeping its original position; new names are appended.
#[derive(Clone)]
pub struct OrderedTable<T>
where
    T: Clone,
{
    entries: im::Vector<(Arc<str>, T)>,
    index: im::HashMap<Arc<str>, usize>,
}

impl<T: Clone> OrderedTable<T> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: im::Vector::new(),
            index: im::HashMap::new(),
        }
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the table has an entry for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Gets an entry by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        let position = *self.index.get(name)?;
        self.entries.get(position).map(|(_, value)| value)
    }

    /// Returns the position of `name` in insertion order.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns a new table with `value` stored under `name`.
    ///
    /// An existing entry keeps its position; a new one is appended.
    #[must_use]
    pub fn insert(&self, name: impl Into<Arc<str>>, value: T) -> Self {
        let name = name.into();
        let mut new = self.clone();
        if let Some(&position) = new.index.get(&name) {
            new.entries.set(position, (name, value));
        } else {
            new.index.insert(name.clone(), new.entries.len());
            new.entries.push_back((name, value));
        }
        new
    }

    /// Returns the names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_ref())
    }

    /// Returns the entries in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Returns `(name, entry)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(name, value)| (name.as_ref(), value))
    }
}

impl<T: Clone> Default for OrderedTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for OrderedTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T: Clone + PartialEq> PartialEq for OrderedTable<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<T: Clone + Eq> Eq for OrderedTable<T> {}

impl<N: Into<Arc<str>>, T: Clone> FromIterator<(N, T)> for OrderedTable<T> {
    fn from_iter<I: IntoIterator<Item = (N, T)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |table, (name, value)| table.insert(name, value))
    }
}

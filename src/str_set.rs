use alloc::borrow::Cow;
use core::fmt;
use core::fmt::Debug;
use core::hash::BuildHasher;

use crate::DefaultHashBuilder;
use crate::table::AllocError;
use crate::table::Probe;
use crate::table::Table;

/// A set of strings backed by the same open-addressing table as
/// [`StrMap`](crate::StrMap).
///
/// Like the map, each insertion chooses between borrowing the string
/// (`&'a str`) and owning it (`String`). Inserting a string that is
/// already present keeps the stored copy and drops the new one.
///
/// # Example
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use strmap::StrSet;
///
/// let mut set: StrSet = StrSet::new();
/// assert!(set.insert("a").unwrap());
/// assert!(!set.insert("a").unwrap());
/// assert!(set.contains("a"));
/// assert!(set.remove("a"));
/// assert!(set.is_empty());
/// # }
/// ```
#[derive(Clone)]
pub struct StrSet<'a, S = DefaultHashBuilder> {
    table: Table<Cow<'a, str>>,
    hash_builder: S,
}

impl<'a, S> StrSet<'a, S>
where
    S: BuildHasher + Default,
{
    /// Creates an empty set using the default hash builder.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates a set that can hold at least `capacity` strings without
    /// growing, or fails if the bucket array cannot be allocated.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
        Ok(Self {
            table: Table::try_with_capacity(capacity)?,
            hash_builder: S::default(),
        })
    }
}

impl<'a, S> Default for StrSet<'a, S>
where
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, S> StrSet<'a, S>
where
    S: BuildHasher,
{
    /// Creates an empty set using the given hash builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: Table::new(),
            hash_builder,
        }
    }

    fn index_of(&self, value: &str) -> Option<usize> {
        let hash = self.hash_builder.hash_one(value);
        self.table.find(hash, |k| &**k == value)
    }

    /// Returns `true` if the set contains `value`.
    pub fn contains(&self, value: &str) -> bool {
        self.index_of(value).is_some()
    }

    /// Adds a string to the set.
    ///
    /// Returns `true` if the string was not already present. On `Err` the
    /// set is unchanged.
    pub fn insert(&mut self, value: impl Into<Cow<'a, str>>) -> Result<bool, AllocError> {
        let value = value.into();
        let hash = self.hash_builder.hash_one(&*value);
        match self.table.probe(hash, |k| *k == value)? {
            Probe::Occupied(_) => Ok(false),
            Probe::Vacant(index) => {
                self.table.occupy(index, hash, value);
                Ok(true)
            }
        }
    }

    /// Removes a string from the set. Returns `true` if it was present.
    pub fn remove(&mut self, value: &str) -> bool {
        match self.index_of(value) {
            Some(index) => {
                self.table.remove_at(index);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the stored string, recovering ownership if it
    /// was inserted as a `String`.
    pub fn take(&mut self, value: &str) -> Option<Cow<'a, str>> {
        let index = self.index_of(value)?;
        Some(self.table.remove_at(index))
    }
}

impl<'a, S> StrSet<'a, S> {
    /// Number of strings in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no strings.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Removes all strings without shrinking the bucket array.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the stored strings, in bucket order.
    pub fn iter(&self) -> Iter<'_, 'a> {
        Iter {
            inner: self.table.iter(),
        }
    }
}

impl<S> Debug for StrSet<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// An iterator over the strings of a [`StrSet`].
pub struct Iter<'s, 'a> {
    inner: crate::table::Iter<'s, Cow<'a, str>>,
}

impl<'s> Iterator for Iter<'s, '_> {
    type Item = &'s str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|k| &**k)
    }
}

impl<'s, 'a, S> IntoIterator for &'s StrSet<'a, S> {
    type Item = &'s str;
    type IntoIter = Iter<'s, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

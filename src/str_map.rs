use alloc::borrow::Cow;
use core::fmt;
use core::fmt::Debug;
use core::hash::BuildHasher;

use crate::DefaultHashBuilder;
use crate::table::AllocError;
use crate::table::Probe;
use crate::table::Table;

/// A hash map from strings to values of type `V`.
///
/// Keys are stored as `Cow<'a, str>`: each insertion decides whether the
/// map borrows the key from the caller (a `&'a str`, the common zero-copy
/// path) or takes ownership of a `String`. Owned keys are dropped when
/// their entry is removed, overwritten, or cleared; borrowed keys never
/// are.
///
/// The API has two tiers. The key-based tier (`get`, `insert`, `remove`,
/// `contains_key`) hashes the key on every call. The index-based tier
/// (`lookup_index`, `has_data`, `key_at`, `value_at`, `remove_at`, and the
/// `begin`/`next`/`end` cursor protocol) works on raw bucket indices so a
/// key resolved once can be inspected, mutated, or deleted repeatedly
/// without re-hashing.
///
/// # Index validity
///
/// A bucket index is valid until the bucket array is rebuilt: any insert
/// may grow the table, and [`clear`](StrMap::clear) resets it. Removals
/// never move buckets, so deleting entries (by key or by index) keeps all
/// other indices valid. Using an index across a rebuild is caught by the
/// accessors' occupancy checks at best and yields another entry's data at
/// worst; it is the caller's responsibility to re-resolve indices after
/// any insert.
///
/// # Example
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use strmap::StrMap;
///
/// let mut map: StrMap<_> = StrMap::new();
/// map.insert("alpha", 1).unwrap();
/// map.insert("beta", 2).unwrap();
///
/// let index = map.lookup_index("alpha");
/// assert!(map.valid_index(index) && map.has_data(index));
/// assert_eq!(map.key_at(index), "alpha");
/// *map.value_at_mut(index) += 10;
/// assert_eq!(map.get("alpha"), Some(&11));
/// # }
/// ```
#[derive(Clone)]
pub struct StrMap<'a, V, S = DefaultHashBuilder> {
    table: Table<(Cow<'a, str>, V)>,
    hash_builder: S,
}

impl<'a, V, S> StrMap<'a, V, S>
where
    S: BuildHasher + Default,
{
    /// Creates an empty map using the default hash builder.
    ///
    /// No allocation happens until the first insertion.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use strmap::StrMap;
    ///
    /// let map: StrMap<i32> = StrMap::new();
    /// assert!(map.is_empty());
    /// # }
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates a map that can hold at least `capacity` entries without
    /// growing, or fails if the bucket array cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use strmap::StrMap;
    ///
    /// let map: StrMap<i32> = StrMap::try_with_capacity(100).unwrap();
    /// assert!(map.bucket_count() >= 100);
    /// # }
    /// ```
    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
        Self::try_with_capacity_and_hasher(capacity, S::default())
    }
}

impl<'a, V, S> Default for StrMap<'a, V, S>
where
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, V, S> StrMap<'a, V, S>
where
    S: BuildHasher,
{
    /// Creates an empty map using the given hash builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: Table::new(),
            hash_builder,
        }
    }

    /// Creates a map with the given hash builder and room for at least
    /// `capacity` entries.
    pub fn try_with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Result<Self, AllocError> {
        Ok(Self {
            table: Table::try_with_capacity(capacity)?,
            hash_builder,
        })
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        let hash = self.hash_builder.hash_one(key);
        self.table.find(hash, |(k, _)| &**k == key)
    }

    /// Returns a reference to the value stored for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use strmap::StrMap;
    ///
    /// let mut map: StrMap<_> = StrMap::new();
    /// map.insert("a", 1).unwrap();
    /// assert_eq!(map.get("a"), Some(&1));
    /// assert_eq!(map.get("b"), None);
    /// # }
    /// ```
    pub fn get(&self, key: &str) -> Option<&V> {
        let index = self.index_of(key)?;
        Some(&self.table.get_at(index).1)
    }

    /// Returns a mutable reference to the value stored for `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.index_of(key)?;
        Some(&mut self.table.get_at_mut(index).1)
    }

    /// Returns the stored key and value for `key`.
    ///
    /// The returned key is the one the map holds, which after an overwrite
    /// is the most recently inserted one.
    pub fn get_key_value(&self, key: &str) -> Option<(&str, &V)> {
        let index = self.index_of(key)?;
        let (k, v) = self.table.get_at(index);
        Some((&**k, v))
    }

    /// Returns `true` if the map contains `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use strmap::StrMap;
    ///
    /// let mut map: StrMap<_> = StrMap::new();
    /// map.insert("a", 1).unwrap();
    /// assert!(map.contains_key("a"));
    /// assert!(!map.contains_key("b"));
    /// # }
    /// ```
    pub fn contains_key(&self, key: &str) -> bool {
        self.index_of(key).is_some()
    }

    /// Resolves `key` to its bucket index, or [`end`](StrMap::end) if the
    /// key is absent.
    ///
    /// This is the primitive that `get`, `contains_key`, and `remove` are
    /// built on; callers that will touch the entry more than once can
    /// resolve the index once and use the `_at` accessors.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use strmap::StrMap;
    ///
    /// let mut map: StrMap<_> = StrMap::new();
    /// map.insert("a", 1).unwrap();
    ///
    /// let index = map.lookup_index("a");
    /// assert!(map.valid_index(index));
    /// assert_eq!(map.value_at(index), &1);
    ///
    /// assert!(!map.valid_index(map.lookup_index("missing")));
    /// # }
    /// ```
    pub fn lookup_index(&self, key: &str) -> usize {
        self.index_of(key).unwrap_or_else(|| self.end())
    }

    /// Inserts a key-value pair, returning the previous value if the key
    /// was already present.
    ///
    /// The key may be a `&'a str` (the map borrows it) or a `String` (the
    /// map takes ownership). On an overwrite both the stored key and the
    /// value are replaced by the caller-supplied ones, so an owned key
    /// displaced by a borrowed one is freed at that point rather than
    /// lingering.
    ///
    /// Grows the bucket array first if this insertion could push the load
    /// factor past its limit; growth invalidates all bucket indices. On
    /// `Err` the map is unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use strmap::StrMap;
    ///
    /// let mut map: StrMap<_> = StrMap::new();
    /// assert_eq!(map.insert("a", 1).unwrap(), None);
    /// assert_eq!(map.insert("a", 2).unwrap(), Some(1));
    /// assert_eq!(map.len(), 1);
    ///
    /// // Owned keys outlive the string they were built from.
    /// let name = String::from("b");
    /// map.insert(name, 3).unwrap();
    /// assert_eq!(map.get("b"), Some(&3));
    /// # }
    /// ```
    pub fn insert(&mut self, key: impl Into<Cow<'a, str>>, value: V) -> Result<Option<V>, AllocError> {
        let key = key.into();
        let hash = self.hash_builder.hash_one(&*key);
        match self.table.probe(hash, |(k, _)| *k == key)? {
            Probe::Occupied(index) => {
                let (_old_key, old_value) = self.table.replace_at(index, (key, value));
                Ok(Some(old_value))
            }
            Probe::Vacant(index) => {
                self.table.occupy(index, hash, (key, value));
                Ok(None)
            }
        }
    }

    /// Removes `key` from the map, returning its value.
    ///
    /// Returns `None` if the key was not present. The removed bucket is
    /// tombstoned, so other bucket indices stay valid.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use strmap::StrMap;
    ///
    /// let mut map: StrMap<_> = StrMap::new();
    /// map.insert("a", 1).unwrap();
    /// assert_eq!(map.remove("a"), Some(1));
    /// assert_eq!(map.remove("a"), None);
    /// # }
    /// ```
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.index_of(key)?;
        Some(self.table.remove_at(index).1)
    }

    /// Removes `key` from the map, returning the stored key and value.
    ///
    /// Useful to recover ownership of a key that was inserted as a
    /// `String`.
    pub fn remove_entry(&mut self, key: &str) -> Option<(Cow<'a, str>, V)> {
        let index = self.index_of(key)?;
        Some(self.table.remove_at(index))
    }

    /// Ensures the map can take `additional` more entries without growing.
    ///
    /// On `Err` the map is unchanged.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        self.table.try_reserve(additional)
    }
}

impl<'a, V, S> StrMap<'a, V, S> {
    /// Number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Total number of buckets. Zero before the first insertion; a power
    /// of two afterwards.
    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    /// Removes all entries without shrinking the bucket array.
    ///
    /// Owned keys are dropped. All previously obtained bucket indices are
    /// invalidated.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// The first index of a bucket traversal: always `0`.
    pub fn begin(&self) -> usize {
        0
    }

    /// The past-the-end bucket index.
    ///
    /// Doubles as the "not found" sentinel returned by
    /// [`lookup_index`](StrMap::lookup_index).
    pub fn end(&self) -> usize {
        self.table.bucket_count()
    }

    /// Returns `true` if `index` is within the bucket array. The
    /// [`end`](StrMap::end) sentinel is not valid.
    pub fn valid_index(&self, index: usize) -> bool {
        index < self.table.bucket_count()
    }

    /// Returns `true` if the bucket at `index` holds an entry.
    ///
    /// Empty buckets, tombstones, and out-of-range indices all report
    /// `false`.
    pub fn has_data(&self, index: usize) -> bool {
        self.table.is_occupied(index)
    }

    /// The key stored in the bucket at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the bucket has no data; guard with
    /// [`has_data`](StrMap::has_data).
    pub fn key_at(&self, index: usize) -> &str {
        let (k, _) = self.table.get_at(index);
        &**k
    }

    /// The value stored in the bucket at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the bucket has no data; guard with
    /// [`has_data`](StrMap::has_data).
    pub fn value_at(&self, index: usize) -> &V {
        &self.table.get_at(index).1
    }

    /// Mutable access to the value stored in the bucket at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the bucket has no data; guard with
    /// [`has_data`](StrMap::has_data).
    pub fn value_at_mut(&mut self, index: usize) -> &mut V {
        &mut self.table.get_at_mut(index).1
    }

    /// Replaces the value in the bucket at `index`, returning the old one.
    ///
    /// The stored key is untouched; this is the in-place update for
    /// callers holding an index from [`lookup_index`](StrMap::lookup_index)
    /// or a traversal.
    ///
    /// # Panics
    ///
    /// Panics if the bucket has no data; guard with
    /// [`has_data`](StrMap::has_data).
    pub fn set_value_at(&mut self, index: usize, value: V) -> V {
        core::mem::replace(self.value_at_mut(index), value)
    }

    /// Removes the entry in the bucket at `index` without re-hashing the
    /// key, returning the stored key and value.
    ///
    /// The bucket is tombstoned; no other bucket moves, so all other
    /// indices stay valid. This is the removal to use mid-traversal.
    ///
    /// # Panics
    ///
    /// Panics if the bucket has no data; guard with
    /// [`has_data`](StrMap::has_data).
    pub fn remove_at(&mut self, index: usize) -> (Cow<'a, str>, V) {
        self.table.remove_at(index)
    }

    /// Advances `cursor` to the next occupied bucket and yields its value,
    /// leaving the cursor one past the yielded bucket. Returns `None` once
    /// the cursor reaches [`end`](StrMap::end).
    ///
    /// Start a traversal with `begin()`; restarting is just resetting the
    /// cursor. Because the cursor is a plain bucket index, the bucket just
    /// yielded (`cursor - 1`) may be deleted with
    /// [`remove_at`](StrMap::remove_at) without disturbing the rest of the
    /// traversal. Inserting during a traversal is not supported: it may
    /// grow the table and invalidate the cursor.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use strmap::StrMap;
    ///
    /// let mut map: StrMap<_> = StrMap::new();
    /// map.insert("a", 1).unwrap();
    /// map.insert("b", 2).unwrap();
    /// map.insert("c", 3).unwrap();
    ///
    /// // Delete every even value while traversing.
    /// let mut cursor = map.begin();
    /// while let Some(&value) = map.next(&mut cursor) {
    ///     if value % 2 == 0 {
    ///         map.remove_at(cursor - 1);
    ///     }
    /// }
    /// assert_eq!(map.len(), 2);
    /// assert!(!map.contains_key("b"));
    /// # }
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn next<'s>(&'s self, cursor: &mut usize) -> Option<&'s V> {
        while *cursor < self.end() {
            let index = *cursor;
            *cursor += 1;
            if self.has_data(index) {
                return Some(self.value_at(index));
            }
        }
        None
    }

    /// Returns an iterator over `(key, value)` pairs in bucket order.
    pub fn iter(&self) -> Iter<'_, 'a, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over pairs with mutable access to the values.
    pub fn iter_mut(&mut self) -> IterMut<'_, 'a, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> Keys<'_, 'a, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values.
    pub fn values(&self) -> Values<'_, 'a, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable references to the values.
    pub fn values_mut(&mut self) -> ValuesMut<'_, 'a, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }
}

impl<V, S> Debug for StrMap<'_, V, S>
where
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// An iterator over the entries of a [`StrMap`].
pub struct Iter<'s, 'a, V> {
    inner: crate::table::Iter<'s, (Cow<'a, str>, V)>,
}

impl<'s, V> Iterator for Iter<'s, '_, V> {
    type Item = (&'s str, &'s V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (&**k, v))
    }
}

/// An iterator over the entries of a [`StrMap`] with mutable values.
pub struct IterMut<'s, 'a, V> {
    inner: crate::table::IterMut<'s, (Cow<'a, str>, V)>,
}

impl<'s, V> Iterator for IterMut<'s, '_, V> {
    type Item = (&'s str, &'s mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| {
            let (k, v) = entry;
            (&**k, v)
        })
    }
}

/// An iterator over the keys of a [`StrMap`].
pub struct Keys<'s, 'a, V> {
    inner: Iter<'s, 'a, V>,
}

impl<'s, V> Iterator for Keys<'s, '_, V> {
    type Item = &'s str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

/// An iterator over the values of a [`StrMap`].
pub struct Values<'s, 'a, V> {
    inner: Iter<'s, 'a, V>,
}

impl<'s, V> Iterator for Values<'s, '_, V> {
    type Item = &'s V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// An iterator over mutable references to the values of a [`StrMap`].
pub struct ValuesMut<'s, 'a, V> {
    inner: IterMut<'s, 'a, V>,
}

impl<'s, V> Iterator for ValuesMut<'s, '_, V> {
    type Item = &'s mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

impl<'s, 'a, V, S> IntoIterator for &'s StrMap<'a, V, S> {
    type Item = (&'s str, &'s V);
    type IntoIter = Iter<'s, 'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'s, 'a, V, S> IntoIterator for &'s mut StrMap<'a, V, S> {
    type Item = (&'s str, &'s mut V);
    type IntoIter = IterMut<'s, 'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

//! The low-level open-addressing table underlying [`StrMap`] and [`StrSet`].
//!
//! [`Table`] stores opaque entries in a bucket array and never hashes or
//! compares anything itself: every operation takes the entry's 64-bit hash
//! and, where needed, an equality predicate. Buckets are addressed by raw
//! `usize` indices, which stay valid until the table rebuilds its bucket
//! array (a growth triggered by an insert, or [`Table::clear`]). This is
//! the tier to use when repeated hashing must be avoided; most callers
//! want the key-based API of [`StrMap`] instead.
//!
//! [`StrMap`]: crate::StrMap
//! [`StrSet`]: crate::StrSet

use alloc::vec::Vec;
use core::fmt;
use core::fmt::Debug;
use core::mem::MaybeUninit;

/// Smallest non-zero bucket count. Bucket counts are always powers of two
/// so the probe sequence can mask instead of taking a modulus.
const MIN_BUCKETS: usize = 4;

/// Maximum load factor, as a percentage of the bucket count. Counts both
/// occupied and tombstoned buckets, which bounds probe-chain length even
/// under delete-heavy churn.
const MAX_LOAD_PERCENT: u128 = 77;

#[inline(always)]
fn max_population(buckets: usize) -> usize {
    ((buckets as u128 * MAX_LOAD_PERCENT) / 100) as usize
}

/// Error returned when the table cannot obtain memory from the allocator.
///
/// The operation that reported this leaves the table exactly as it was:
/// growth allocates the replacement bucket array in full before any entry
/// is moved, so a failed insert never partially mutates the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocError;

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("hash table allocation failed")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AllocError {}

/// Per-bucket occupancy marker.
///
/// A deleted bucket becomes a tombstone rather than reverting to empty:
/// probe chains that ran through it before the deletion must still reach
/// entries stored beyond it. Only a rebuild turns tombstones back into
/// empty buckets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BucketState {
    Empty,
    Occupied,
    Tombstone,
}

/// Outcome of [`Table::probe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Probe {
    /// A bucket holding an entry equal to the probed one. Read or replace
    /// it via [`Table::get_at`], [`Table::get_at_mut`], or
    /// [`Table::replace_at`].
    Occupied(usize),
    /// The bucket a new entry should be installed into with
    /// [`Table::occupy`]. Valid only until the next mutation of the table.
    Vacant(usize),
}

/// A low-level open-addressing hash table with explicit bucket indices.
///
/// `Table<T>` owns a power-of-two bucket array. Each bucket is empty,
/// occupied, or a tombstone. Collisions are resolved by a triangular probe
/// sequence (`slot = (slot + step) & mask` with `step` incremented each
/// collision), which visits every bucket exactly once before cycling.
/// Lookups stop at the first empty bucket; insertions reuse the first
/// tombstone they passed. The hash of every occupied bucket is cached so
/// growth never re-hashes entries.
///
/// # Example
///
/// ```rust
/// use strmap::Table;
/// use strmap::table::Probe;
///
/// let mut table: Table<(u64, &str)> = Table::new();
/// let hash = 0x9e37_79b9_7f4a_7c15;
///
/// match table.probe(hash, |&(id, _)| id == 7)? {
///     Probe::Vacant(index) => table.occupy(index, hash, (7, "seven")),
///     Probe::Occupied(_) => unreachable!(),
/// }
///
/// let index = table.find(hash, |&(id, _)| id == 7).unwrap();
/// assert_eq!(table.get_at(index).1, "seven");
/// # Ok::<(), strmap::AllocError>(())
/// ```
pub struct Table<T> {
    states: Vec<BucketState>,
    hashes: Vec<u64>,
    entries: Vec<MaybeUninit<T>>,
    occupied: usize,
    tombstoned: usize,
}

impl<T> Table<T> {
    /// Creates an empty table without allocating.
    ///
    /// The bucket array is allocated lazily by the first insertion, so
    /// construction itself cannot fail.
    pub const fn new() -> Self {
        Self {
            states: Vec::new(),
            hashes: Vec::new(),
            entries: Vec::new(),
            occupied: 0,
            tombstoned: 0,
        }
    }

    /// Creates a table that can hold at least `capacity` entries without
    /// growing, or fails if the bucket array cannot be allocated.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
        let mut table = Self::new();
        table.try_reserve(capacity)?;
        Ok(table)
    }

    /// Number of occupied buckets.
    pub fn len(&self) -> usize {
        self.occupied
    }

    /// Returns `true` if the table contains no entries.
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Total number of buckets, occupied or not. Zero until the first
    /// insertion; a power of two afterwards. Equal to the past-the-end
    /// index for bucket-index traversal.
    pub fn bucket_count(&self) -> usize {
        self.states.len()
    }

    #[inline(always)]
    fn mask(&self) -> usize {
        debug_assert!(!self.states.is_empty());
        self.states.len() - 1
    }

    /// Returns `true` if `index` names an occupied bucket.
    ///
    /// Out-of-range, empty, and tombstoned indices all report `false`.
    pub fn is_occupied(&self, index: usize) -> bool {
        matches!(self.states.get(index), Some(BucketState::Occupied))
    }

    /// Finds the bucket holding an entry with the given hash for which
    /// `eq` returns `true`.
    ///
    /// Probing skips tombstones and stops at the first empty bucket, so an
    /// entry is found even if it was displaced past since-deleted buckets.
    pub fn find(&self, hash: u64, mut eq: impl FnMut(&T) -> bool) -> Option<usize> {
        if self.states.is_empty() {
            return None;
        }

        let mask = self.mask();
        let mut slot = (hash as usize) & mask;
        let mut step = 0;
        loop {
            match self.states[slot] {
                BucketState::Empty => return None,
                BucketState::Occupied => {
                    if self.hashes[slot] == hash {
                        // SAFETY: Occupied buckets always hold initialized
                        // entries.
                        let entry = unsafe { self.entries[slot].assume_init_ref() };
                        if eq(entry) {
                            return Some(slot);
                        }
                    }
                }
                BucketState::Tombstone => {}
            }

            step += 1;
            if step > mask {
                // Probed every bucket without hitting an empty one.
                return None;
            }
            slot = (slot + step) & mask;
        }
    }

    /// Probes for the entry with the given hash, growing the table first
    /// if the insertion could push the load factor past its limit.
    ///
    /// Returns [`Probe::Occupied`] when `eq` matched an existing entry, or
    /// [`Probe::Vacant`] naming the bucket where the new entry belongs:
    /// the first tombstone along the probe path if one was passed,
    /// otherwise the empty bucket that terminated it. A vacant bucket is
    /// claimed with [`Table::occupy`].
    ///
    /// On `Err` the table is unchanged. Note that growth runs before the
    /// probe, so even an overwrite of an existing entry can invalidate
    /// previously obtained indices.
    pub fn probe(
        &mut self,
        hash: u64,
        mut eq: impl FnMut(&T) -> bool,
    ) -> Result<Probe, AllocError> {
        self.ensure_room()?;

        let mask = self.mask();
        let mut slot = (hash as usize) & mask;
        let mut step = 0;
        let mut reuse = None;
        loop {
            match self.states[slot] {
                BucketState::Empty => return Ok(Probe::Vacant(reuse.unwrap_or(slot))),
                BucketState::Occupied => {
                    if self.hashes[slot] == hash {
                        // SAFETY: Occupied buckets always hold initialized
                        // entries.
                        let entry = unsafe { self.entries[slot].assume_init_ref() };
                        if eq(entry) {
                            return Ok(Probe::Occupied(slot));
                        }
                    }
                }
                BucketState::Tombstone => {
                    if reuse.is_none() {
                        reuse = Some(slot);
                    }
                }
            }

            step += 1;
            debug_assert!(step <= mask, "probe cycled: no empty bucket after ensure_room");
            slot = (slot + step) & mask;
        }
    }

    /// Installs `entry` into a vacant bucket previously returned by
    /// [`Table::probe`].
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range or names an occupied bucket.
    pub fn occupy(&mut self, index: usize, hash: u64, entry: T) {
        assert!(
            !self.is_occupied(index),
            "occupy called on bucket {index}, which already has data"
        );
        if self.states[index] == BucketState::Tombstone {
            self.tombstoned -= 1;
        }
        self.states[index] = BucketState::Occupied;
        self.hashes[index] = hash;
        self.entries[index] = MaybeUninit::new(entry);
        self.occupied += 1;
        debug_assert!(self.occupied + self.tombstoned <= self.bucket_count());
    }

    /// Replaces the entry in an occupied bucket, returning the old entry.
    ///
    /// The cached hash is left as is: the replacement must be equal (under
    /// the table's hashing scheme) to the entry it displaces.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not name an occupied bucket.
    pub fn replace_at(&mut self, index: usize, entry: T) -> T {
        assert!(
            self.is_occupied(index),
            "replace_at called on bucket {index}, which has no data"
        );
        // SAFETY: Occupied buckets always hold initialized entries.
        unsafe { core::mem::replace(self.entries[index].assume_init_mut(), entry) }
    }

    /// Returns a reference to the entry in an occupied bucket.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not name an occupied bucket.
    pub fn get_at(&self, index: usize) -> &T {
        assert!(
            self.is_occupied(index),
            "get_at called on bucket {index}, which has no data"
        );
        // SAFETY: Occupied buckets always hold initialized entries.
        unsafe { self.entries[index].assume_init_ref() }
    }

    /// Returns a mutable reference to the entry in an occupied bucket.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not name an occupied bucket.
    pub fn get_at_mut(&mut self, index: usize) -> &mut T {
        assert!(
            self.is_occupied(index),
            "get_at_mut called on bucket {index}, which has no data"
        );
        // SAFETY: Occupied buckets always hold initialized entries.
        unsafe { self.entries[index].assume_init_mut() }
    }

    /// Removes the entry at `index`, tombstoning the bucket and returning
    /// the entry.
    ///
    /// The bucket array never shrinks on removal, and no other bucket
    /// moves, so all other indices remain valid.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not name an occupied bucket.
    pub fn remove_at(&mut self, index: usize) -> T {
        assert!(
            self.is_occupied(index),
            "remove_at called on bucket {index}, which has no data"
        );
        self.states[index] = BucketState::Tombstone;
        self.occupied -= 1;
        self.tombstoned += 1;
        // SAFETY: The bucket was occupied, so the entry is initialized,
        // and the state change above means it will not be read again.
        unsafe { self.entries[index].assume_init_read() }
    }

    /// Resets every bucket to empty without shrinking the bucket array.
    ///
    /// All previously obtained indices are invalidated.
    pub fn clear(&mut self) {
        if core::mem::needs_drop::<T>() && self.occupied > 0 {
            for (index, state) in self.states.iter().enumerate() {
                if *state == BucketState::Occupied {
                    // SAFETY: Occupied buckets always hold initialized
                    // entries; the fill below marks them empty.
                    unsafe { self.entries[index].assume_init_drop() };
                }
            }
        }
        self.states.fill(BucketState::Empty);
        self.occupied = 0;
        self.tombstoned = 0;
    }

    /// Ensures the table can take `additional` more entries without
    /// growing, rebuilding the bucket array if needed.
    ///
    /// On `Err` the table is unchanged.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        let required = self.occupied.checked_add(additional).ok_or(AllocError)?;
        if required + self.tombstoned <= max_population(self.bucket_count()) {
            return Ok(());
        }

        let mut buckets = MIN_BUCKETS.max(self.bucket_count());
        while required > max_population(buckets) {
            buckets = buckets.checked_mul(2).ok_or(AllocError)?;
        }
        self.rebuild(buckets)
    }

    /// Returns an iterator over references to all entries, in bucket
    /// order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.states.iter().zip(self.entries.iter()),
        }
    }

    /// Returns an iterator over mutable references to all entries, in
    /// bucket order.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            inner: self.states.iter().zip(self.entries.iter_mut()),
        }
    }

    /// Grows the bucket array before an insertion if the incoming entry
    /// would push `occupied + tombstoned` past the load limit.
    fn ensure_room(&mut self) -> Result<(), AllocError> {
        let buckets = self.bucket_count();
        if buckets == 0 {
            return self.rebuild(MIN_BUCKETS);
        }
        if self.occupied + self.tombstoned < max_population(buckets) {
            return Ok(());
        }

        let new_buckets = if buckets > 2 * self.occupied {
            // The load is mostly tombstones: rebuilding at the same size
            // purges them without growing.
            buckets
        } else {
            let mut n = buckets * 2;
            while self.occupied + 1 > max_population(n) {
                n *= 2;
            }
            n
        };
        self.rebuild(new_buckets)
    }

    /// Replaces the bucket array with a freshly allocated one of
    /// `new_buckets` buckets and re-seats every occupied entry using its
    /// cached hash. Tombstones are discarded.
    ///
    /// The new storage is fully allocated before any entry moves, so on
    /// `Err` the table is untouched.
    fn rebuild(&mut self, new_buckets: usize) -> Result<(), AllocError> {
        debug_assert!(new_buckets.is_power_of_two() && new_buckets >= MIN_BUCKETS);
        debug_assert!(self.occupied <= max_population(new_buckets));

        let (mut states, mut hashes, mut entries) = Self::allocate(new_buckets)?;

        let mask = new_buckets - 1;
        for index in 0..self.states.len() {
            if self.states[index] != BucketState::Occupied {
                continue;
            }
            let hash = self.hashes[index];
            // SAFETY: The bucket is occupied, so the entry is initialized.
            // The old storage is dropped as a whole below without reading
            // any entry again, so this move cannot double-drop.
            let entry = unsafe { self.entries[index].assume_init_read() };

            let mut slot = (hash as usize) & mask;
            let mut step = 0;
            while states[slot] != BucketState::Empty {
                step += 1;
                slot = (slot + step) & mask;
            }
            states[slot] = BucketState::Occupied;
            hashes[slot] = hash;
            entries[slot] = MaybeUninit::new(entry);
        }

        self.states = states;
        self.hashes = hashes;
        self.entries = entries;
        self.tombstoned = 0;
        Ok(())
    }

    fn allocate(
        buckets: usize,
    ) -> Result<(Vec<BucketState>, Vec<u64>, Vec<MaybeUninit<T>>), AllocError> {
        let mut states = Vec::new();
        states.try_reserve_exact(buckets).map_err(|_| AllocError)?;
        states.resize(buckets, BucketState::Empty);

        let mut hashes = Vec::new();
        hashes.try_reserve_exact(buckets).map_err(|_| AllocError)?;
        hashes.resize(buckets, 0);

        let mut entries = Vec::new();
        entries.try_reserve_exact(buckets).map_err(|_| AllocError)?;
        entries.resize_with(buckets, MaybeUninit::uninit);

        Ok((states, hashes, entries))
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("occupied", &self.occupied)
            .field("tombstoned", &self.tombstoned)
            .field("buckets", &self.bucket_count())
            .finish()
    }
}

impl<T> Clone for Table<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        let mut entries = Vec::with_capacity(self.entries.len());
        entries.resize_with(self.entries.len(), MaybeUninit::uninit);
        for (index, state) in self.states.iter().enumerate() {
            if *state == BucketState::Occupied {
                // SAFETY: Occupied buckets always hold initialized entries.
                let entry = unsafe { self.entries[index].assume_init_ref() };
                entries[index] = MaybeUninit::new(entry.clone());
            }
        }
        Self {
            states: self.states.clone(),
            hashes: self.hashes.clone(),
            entries,
            occupied: self.occupied,
            tombstoned: self.tombstoned,
        }
    }
}

impl<T> Drop for Table<T> {
    fn drop(&mut self) {
        if core::mem::needs_drop::<T>() && self.occupied > 0 {
            for (index, state) in self.states.iter().enumerate() {
                if *state == BucketState::Occupied {
                    // SAFETY: Occupied buckets always hold initialized
                    // entries, and nothing reads them after this.
                    unsafe { self.entries[index].assume_init_drop() };
                }
            }
        }
    }
}

/// An iterator over references to the entries of a [`Table`].
pub struct Iter<'t, T> {
    inner: core::iter::Zip<core::slice::Iter<'t, BucketState>, core::slice::Iter<'t, MaybeUninit<T>>>,
}

impl<'t, T> Iterator for Iter<'t, T> {
    type Item = &'t T;

    fn next(&mut self) -> Option<Self::Item> {
        for (state, entry) in self.inner.by_ref() {
            if *state == BucketState::Occupied {
                // SAFETY: Occupied buckets always hold initialized entries.
                return Some(unsafe { entry.assume_init_ref() });
            }
        }
        None
    }
}

/// An iterator over mutable references to the entries of a [`Table`].
pub struct IterMut<'t, T> {
    inner:
        core::iter::Zip<core::slice::Iter<'t, BucketState>, core::slice::IterMut<'t, MaybeUninit<T>>>,
}

impl<'t, T> Iterator for IterMut<'t, T> {
    type Item = &'t mut T;

    fn next(&mut self) -> Option<Self::Item> {
        for (state, entry) in self.inner.by_ref() {
            if *state == BucketState::Occupied {
                // SAFETY: Occupied buckets always hold initialized entries.
                return Some(unsafe { entry.assume_init_mut() });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use core::hash::Hasher;
    use core::sync::atomic::AtomicUsize;
    use core::sync::atomic::Ordering;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;

    struct HashState {
        k0: u64,
        k1: u64,
    }

    impl HashState {
        fn random() -> Self {
            let mut rng = OsRng;
            Self {
                k0: rng.try_next_u64().unwrap(),
                k1: rng.try_next_u64().unwrap(),
            }
        }

        fn hash(&self, key: u64) -> u64 {
            let mut hasher = SipHasher::new_with_keys(self.k0, self.k1);
            hasher.write_u64(key);
            hasher.finish()
        }
    }

    fn put(table: &mut Table<(u64, i32)>, hash: u64, key: u64, value: i32) -> usize {
        match table.probe(hash, |&(k, _)| k == key).unwrap() {
            Probe::Occupied(index) => {
                table.replace_at(index, (key, value));
                index
            }
            Probe::Vacant(index) => {
                table.occupy(index, hash, (key, value));
                index
            }
        }
    }

    fn get(table: &Table<(u64, i32)>, hash: u64, key: u64) -> Option<i32> {
        table
            .find(hash, |&(k, _)| k == key)
            .map(|index| table.get_at(index).1)
    }

    #[test]
    fn empty_table_allocates_nothing() {
        let table: Table<(u64, i32)> = Table::new();
        assert_eq!(table.len(), 0);
        assert!(table.is_empty());
        assert_eq!(table.bucket_count(), 0);
        assert_eq!(table.find(42, |_| true), None);
    }

    #[test]
    fn insert_and_find() {
        let state = HashState::random();
        let mut table = Table::new();
        for key in 0..64u64 {
            put(&mut table, state.hash(key), key, key as i32 * 2);
        }
        assert_eq!(table.len(), 64);
        for key in 0..64u64 {
            assert_eq!(get(&table, state.hash(key), key), Some(key as i32 * 2));
        }
        assert_eq!(get(&table, state.hash(999), 999), None);
    }

    #[test]
    fn load_factor_stays_bounded() {
        let state = HashState::random();
        let mut table = Table::new();
        for key in 0..1000u64 {
            put(&mut table, state.hash(key), key, 0);
            let buckets = table.bucket_count();
            assert!(buckets.is_power_of_two());
            assert!(
                table.len() as u128 * 100 <= buckets as u128 * MAX_LOAD_PERCENT,
                "{} entries in {} buckets",
                table.len(),
                buckets,
            );
        }
    }

    #[test]
    fn overwrite_keeps_index_and_len() {
        let mut table = Table::new();
        let first = put(&mut table, 7, 1, 10);
        let second = put(&mut table, 7, 1, 20);
        assert_eq!(first, second);
        assert_eq!(table.len(), 1);
        assert_eq!(get(&table, 7, 1), Some(20));
    }

    #[test]
    fn tombstone_keeps_probe_chain_alive() {
        // Identical hashes force a collision chain: key 2's entry sits
        // past key 1's bucket.
        let mut table = Table::new();
        let first = put(&mut table, 0, 1, 10);
        put(&mut table, 0, 2, 20);

        table.remove_at(first);
        assert_eq!(get(&table, 0, 1), None);
        assert_eq!(get(&table, 0, 2), Some(20));
    }

    #[test]
    fn reinsertion_reuses_tombstoned_bucket() {
        let mut table = Table::new();
        let first = put(&mut table, 0, 1, 10);
        put(&mut table, 0, 2, 20);
        let buckets = table.bucket_count();

        table.remove_at(first);
        let reused = put(&mut table, 0, 3, 30);
        assert_eq!(reused, first);
        assert_eq!(table.len(), 2);
        assert_eq!(table.bucket_count(), buckets);
        assert_eq!(get(&table, 0, 2), Some(20));
        assert_eq!(get(&table, 0, 3), Some(30));
    }

    #[test]
    fn growth_preserves_entries() {
        let state = HashState::random();
        let mut table = Table::new();
        put(&mut table, state.hash(0), 0, 0);
        let initial = table.bucket_count();

        for key in 1..200u64 {
            put(&mut table, state.hash(key), key, key as i32);
        }
        assert!(table.bucket_count() >= initial * 4, "expected two growths");
        for key in 0..200u64 {
            assert_eq!(get(&table, state.hash(key), key), Some(key as i32));
        }
    }

    #[test]
    fn churn_rebuilds_in_place() {
        // Insert-then-delete churn keeps the live population at one, so
        // rebuilds purge tombstones instead of growing the array.
        let mut table = Table::new();
        for round in 0..100u64 {
            let index = put(&mut table, round, round, 0);
            table.remove_at(index);
        }
        assert_eq!(table.bucket_count(), MIN_BUCKETS);
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn clear_empties_without_shrinking() {
        let state = HashState::random();
        let mut table = Table::new();
        for key in 0..50u64 {
            put(&mut table, state.hash(key), key, 1);
        }
        let buckets = table.bucket_count();

        table.clear();
        assert_eq!(table.len(), 0);
        assert_eq!(table.bucket_count(), buckets);
        assert_eq!(get(&table, state.hash(0), 0), None);

        put(&mut table, state.hash(0), 0, 5);
        assert_eq!(get(&table, state.hash(0), 0), Some(5));
    }

    #[test]
    fn try_with_capacity_avoids_growth() {
        let state = HashState::random();
        let mut table = Table::try_with_capacity(100).unwrap();
        let buckets = table.bucket_count();
        assert!(buckets.is_power_of_two());
        assert!(max_population(buckets) >= 100);

        for key in 0..100u64 {
            put(&mut table, state.hash(key), key, 0);
        }
        assert_eq!(table.bucket_count(), buckets);
    }

    #[test]
    fn iter_visits_each_entry_once() {
        let state = HashState::random();
        let mut table = Table::new();
        for key in 0..32u64 {
            put(&mut table, state.hash(key), key, key as i32);
        }

        let mut seen = [false; 32];
        for &(key, value) in table.iter() {
            assert_eq!(key as i32, value);
            assert!(!seen[key as usize], "key {key} yielded twice");
            seen[key as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn iter_mut_updates_entries() {
        let state = HashState::random();
        let mut table = Table::new();
        for key in 0..16u64 {
            put(&mut table, state.hash(key), key, 0);
        }
        for entry in table.iter_mut() {
            entry.1 = entry.0 as i32 + 1;
        }
        for key in 0..16u64 {
            assert_eq!(get(&table, state.hash(key), key), Some(key as i32 + 1));
        }
    }

    #[test]
    fn drops_run_for_owned_entries() {
        static DROPS: AtomicUsize = AtomicUsize::new(0);

        struct Counted(u64);
        impl Drop for Counted {
            fn drop(&mut self) {
                DROPS.fetch_add(1, Ordering::Relaxed);
            }
        }

        let state = HashState::random();
        let mut table = Table::new();
        for key in 0..10u64 {
            match table.probe(state.hash(key), |e: &Counted| e.0 == key).unwrap() {
                Probe::Vacant(index) => table.occupy(index, state.hash(key), Counted(key)),
                Probe::Occupied(_) => panic!("unexpected duplicate"),
            }
        }

        let removed_at = table.find(state.hash(3), |e| e.0 == 3).unwrap();
        drop(table.remove_at(removed_at));
        assert_eq!(DROPS.load(Ordering::Relaxed), 1);

        drop(table);
        assert_eq!(DROPS.load(Ordering::Relaxed), 10);
    }

    #[test]
    fn clone_is_independent() {
        let state = HashState::random();
        let mut table = Table::new();
        for key in 0..20u64 {
            put(&mut table, state.hash(key), key, key as i32);
        }

        let mut cloned = table.clone();
        put(&mut cloned, state.hash(100), 100, 100);
        assert_eq!(get(&table, state.hash(100), 100), None);
        assert_eq!(get(&cloned, state.hash(100), 100), Some(100));
        for key in 0..20u64 {
            assert_eq!(get(&cloned, state.hash(key), key), Some(key as i32));
        }
    }
}

//! The Robin Hood open-addressing engine behind [`HashMap`] and [`HashSet`].
//!
//! [`HashTable`] is a raw table: it stores values of any type and is addressed
//! by a precomputed hash plus an equality predicate, so the caller decides how
//! keys are hashed and compared.
//!
//! [`HashMap`]: crate::HashMap
//! [`HashSet`]: crate::HashSet

use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;
use core::marker::PhantomData;

use crate::hashing::HashWidth;

/// Capacity of a table created with [`HashTable::new`].
pub const INITIAL_CAPACITY: usize = 32;

/// Inserts grow the table before `len * 100` would reach `capacity * 75`.
const MAX_LOAD_PERCENT: usize = 75;

#[derive(Clone)]
struct Bucket<T, H> {
    hash: H,
    distance: u32,
    value: T,
}

fn empty_buckets<T, H>(capacity: usize) -> Vec<Option<Bucket<T, H>>> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, || None);
    buckets
}

/// Probe-distance histogram of a table.
///
/// `counts[d]` is the number of elements stored `d` slots after their home
/// slot.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProbeHistogram {
    /// Element counts indexed by probe distance.
    pub counts: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Number of elements covered by the histogram.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Largest probe distance of any element, `0` for an empty table.
    pub fn max_distance(&self) -> usize {
        self.counts.len().saturating_sub(1)
    }

    /// Mean probe distance, `0.0` for an empty table.
    pub fn mean_distance(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let weighted: usize = self
            .counts
            .iter()
            .enumerate()
            .map(|(distance, count)| distance * count)
            .sum();
        weighted as f64 / total as f64
    }

    /// Pretty-prints the histogram as a horizontal bar chart.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        println!("probe histogram ({} entries):", self.total());
        for (distance, &count) in self.counts.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            println!("{distance:>4} | {:<max_bar$} {count}", "█".repeat(width));
        }
    }
}

/// Utilization statistics for a table.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of elements currently in the table
    pub populated: usize,
    /// Number of slots allocated
    pub capacity: usize,
    /// populated / capacity
    pub load_factor: f64,
    /// Largest probe distance of any element
    pub max_distance: usize,
    /// Mean probe distance over all elements
    pub mean_distance: f64,
    /// Total memory in bytes used by the slot array
    pub total_bytes: usize,
    /// Memory in bytes held by unoccupied slots
    pub wasted_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Probe distance: max {} / mean {:.3}",
            self.max_distance, self.mean_distance
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
        println!(
            "Memory: {} bytes wasted ({:.02}%)",
            self.wasted_bytes,
            if self.total_bytes == 0 {
                0.0
            } else {
                (self.wasted_bytes as f64 / self.total_bytes as f64) * 100.0
            }
        );
    }
}

/// An open-addressing hash table using Robin Hood displacement.
///
/// `HashTable<T, H>` stores values of type `T` in a power-of-two array of
/// slots. Each occupied slot caches the element's hash (of width `H`) and its
/// probe distance from its home slot `hash & (capacity - 1)`. On insert, an
/// element that has travelled further than a resident takes the resident's
/// slot, which keeps probe sequences short and lets a failed lookup stop as
/// soon as it meets a resident closer to home than the probe. Removal uses
/// backward-shift deletion, so no tombstones are ever left behind.
///
/// The caller supplies the hash and an equality predicate for every
/// operation.
///
/// ## Example
///
/// ```rust
/// # use core::hash::BuildHasher;
/// #
/// # use hood_hash::hash_table::Entry;
/// # use hood_hash::hash_table::HashTable;
/// # use hood_hash::hashing::FnvBuildHasher;
/// #
/// # #[derive(Debug, PartialEq)]
/// # struct Person {
/// #     id: u64,
/// #     name: String,
/// # }
/// #
/// let hasher = FnvBuildHasher::<u64>::default();
/// let mut table: HashTable<Person, u64> = HashTable::new();
/// let hash = hasher.hash_one(123u64);
///
/// match table.entry(hash, |p| p.id == 123) {
///     Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     Entry::Occupied(_) => unreachable!(),
/// }
///
/// assert_eq!(table.find(hash, |p| p.id == 123).map(|p| p.name.as_str()), Some("Alice"));
/// ```
#[derive(Clone)]
pub struct HashTable<T, H: HashWidth = u32> {
    buckets: Vec<Option<Bucket<T, H>>>,
    mask: usize,
    len: usize,
}

impl<T, H: HashWidth> Debug for HashTable<T, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let distances: Vec<Option<u32>> = self
            .buckets
            .iter()
            .map(|slot| slot.as_ref().map(|bucket| bucket.distance))
            .collect();
        f.debug_struct("HashTable")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("distances", &distances)
            .finish()
    }
}

impl<T, H: HashWidth> Default for HashTable<T, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, H: HashWidth> HashTable<T, H> {
    /// Creates an empty table with [`INITIAL_CAPACITY`] slots.
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Creates an empty table with at least `capacity` slots.
    ///
    /// The slot count is rounded up to the next power of two, with a minimum
    /// of one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use hood_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(100);
    /// assert_eq!(table.capacity(), 128);
    ///
    /// let tiny: HashTable<String> = HashTable::with_capacity(0);
    /// assert_eq!(tiny.capacity(), 1);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1).next_power_of_two();
        Self {
            buckets: empty_buckets(capacity),
            mask: capacity - 1,
            len: 0,
        }
    }

    /// Returns the number of elements in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Removes every element, keeping the allocated slots.
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|slot| *slot = None);
        self.len = 0;
    }

    /// Grows the table to at least `min_capacity` slots.
    ///
    /// Does nothing if the table already has that many slots. Otherwise every
    /// element is moved into a new array of `min_capacity.next_power_of_two()`
    /// slots.
    pub fn reserve(&mut self, min_capacity: usize) {
        if min_capacity > self.capacity() {
            self.resize(min_capacity.next_power_of_two());
        }
    }

    /// Returns a reference to the element matching `hash` and `eq`.
    ///
    /// `eq` is only called for slots whose cached hash equals `hash`.
    pub fn find(&self, hash: H, eq: impl Fn(&T) -> bool) -> Option<&T> {
        let index = self.find_index(hash, eq)?;
        Some(self.value_at(index))
    }

    /// Returns a mutable reference to the element matching `hash` and `eq`.
    pub fn find_mut(&mut self, hash: H, eq: impl Fn(&T) -> bool) -> Option<&mut T> {
        let index = self.find_index(hash, eq)?;
        Some(self.value_at_mut(index))
    }

    /// Looks up the entry for `hash` and `eq`, for in-place manipulation.
    ///
    /// If the table would exceed its load factor with one more element, it
    /// grows before probing, so inserting through the returned
    /// [`VacantEntry`] never reallocates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// #
    /// # use hood_hash::hash_table::HashTable;
    /// # use hood_hash::hashing::FnvBuildHasher;
    /// #
    /// let hasher = FnvBuildHasher::<u64>::default();
    /// let mut table: HashTable<(String, u32), u64> = HashTable::new();
    ///
    /// for word in ["a", "b", "a"] {
    ///     let hash = hasher.hash_one(word);
    ///     table
    ///         .entry(hash, |(k, _)| k == word)
    ///         .and_modify(|(_, count)| *count += 1)
    ///         .or_insert_with(|| (word.to_string(), 1));
    /// }
    ///
    /// let hash = hasher.hash_one("a");
    /// assert_eq!(table.find(hash, |(k, _)| k == "a").map(|(_, c)| *c), Some(2));
    /// ```
    pub fn entry(&mut self, hash: H, eq: impl Fn(&T) -> bool) -> Entry<'_, T, H> {
        self.grow_for_insert();
        match self.find_index(hash, eq) {
            Some(index) => Entry::Occupied(OccupiedEntry { table: self, index }),
            None => Entry::Vacant(VacantEntry { table: self, hash }),
        }
    }

    /// Removes and returns the element matching `hash` and `eq`.
    pub fn remove(&mut self, hash: H, eq: impl Fn(&T) -> bool) -> Option<T> {
        let index = self.find_index(hash, eq)?;
        self.erase_at(index)
    }

    /// Keeps only the elements for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&mut T) -> bool) {
        let mut cursor = self.cursor_mut();
        while let Some(value) = cursor.current_mut() {
            if keep(value) {
                cursor.move_next();
            } else {
                cursor.remove_current();
            }
        }
    }

    /// Returns a cursor over every element, for erasing by position.
    ///
    /// The cursor visits each element exactly once, even while elements are
    /// removed through it.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, T, H> {
        let start = self.chain_head();
        let remaining = self.capacity();
        let mut cursor = CursorMut {
            table: self,
            index: start,
            remaining,
        };
        cursor.skip_vacant();
        cursor
    }

    /// Returns a cursor positioned at the element matching `hash` and `eq`.
    ///
    /// The cursor walks from that element toward the end of the slot array
    /// and stops there.
    pub fn cursor_mut_at(
        &mut self,
        hash: H,
        eq: impl Fn(&T) -> bool,
    ) -> Option<CursorMut<'_, T, H>> {
        let index = self.find_index(hash, eq)?;
        let remaining = self.capacity() - index;
        Some(CursorMut {
            table: self,
            index,
            remaining,
        })
    }

    /// Returns an iterator over the elements in slot order.
    pub fn iter(&self) -> Iter<'_, T, H> {
        Iter {
            buckets: self.buckets.iter(),
            remaining: self.len,
        }
    }

    /// Returns an iterator over mutable references to the elements.
    pub fn iter_mut(&mut self) -> IterMut<'_, T, H> {
        IterMut {
            buckets: self.buckets.iter_mut(),
            remaining: self.len,
        }
    }

    /// Removes every element, returning them in slot order.
    ///
    /// The table keeps its capacity. Elements not consumed by the iterator
    /// are dropped with it.
    pub fn drain(&mut self) -> Drain<'_, T, H> {
        let capacity = self.capacity();
        let buckets = core::mem::replace(&mut self.buckets, empty_buckets(capacity));
        let remaining = core::mem::take(&mut self.len);
        Drain {
            inner: IntoIter {
                buckets: buckets.into_iter(),
                remaining,
            },
            _marker: PhantomData,
        }
    }

    /// Computes a histogram of probe distances for the current table state.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let mut counts = Vec::new();
        for bucket in self.buckets.iter().flatten() {
            let distance = bucket.distance as usize;
            if counts.len() <= distance {
                counts.resize(distance + 1, 0);
            }
            counts[distance] += 1;
        }
        ProbeHistogram { counts }
    }

    /// Returns utilization statistics for debugging and tuning.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let histogram = self.probe_histogram();
        let slot_bytes = core::mem::size_of::<Option<Bucket<T, H>>>();
        let capacity = self.capacity();
        DebugStats {
            populated: self.len,
            capacity,
            load_factor: self.len as f64 / capacity as f64,
            max_distance: histogram.max_distance(),
            mean_distance: histogram.mean_distance(),
            total_bytes: capacity * slot_bytes,
            wasted_bytes: (capacity - self.len) * slot_bytes,
        }
    }

    fn value_at(&self, index: usize) -> &T {
        match &self.buckets[index] {
            Some(bucket) => &bucket.value,
            None => unreachable!("slot {index} is not occupied"),
        }
    }

    fn value_at_mut(&mut self, index: usize) -> &mut T {
        match &mut self.buckets[index] {
            Some(bucket) => &mut bucket.value,
            None => unreachable!("slot {index} is not occupied"),
        }
    }

    fn find_index(&self, hash: H, eq: impl Fn(&T) -> bool) -> Option<usize> {
        let mut index = hash.low_bits(self.mask);
        let mut distance = 0u32;
        loop {
            let bucket = self.buckets[index].as_ref()?;
            if distance > bucket.distance {
                return None;
            }
            if bucket.hash == hash && eq(&bucket.value) {
                return Some(index);
            }
            distance += 1;
            index = (index + 1) & self.mask;
        }
    }

    /// Places `value` without checking for an existing equal element.
    ///
    /// Returns the slot `value` ended up in. The caller must have made room.
    fn insert_unique(&mut self, hash: H, value: T) -> usize {
        let mut incoming = Bucket {
            hash,
            distance: 0,
            value,
        };
        let mut index = hash.low_bits(self.mask);
        let mut placed_at = None;
        loop {
            let Some(resident) = &mut self.buckets[index] else {
                self.buckets[index] = Some(incoming);
                self.len += 1;
                return placed_at.unwrap_or(index);
            };
            if incoming.distance > resident.distance {
                core::mem::swap(resident, &mut incoming);
                if placed_at.is_none() {
                    placed_at = Some(index);
                }
            }
            incoming.distance += 1;
            index = (index + 1) & self.mask;
        }
    }

    /// Backward-shift deletion of the element in slot `index`.
    fn erase_at(&mut self, index: usize) -> Option<T> {
        let removed = self.buckets[index].take()?;
        self.len -= 1;

        let mut hole = index;
        loop {
            let next = (hole + 1) & self.mask;
            match &mut self.buckets[next] {
                Some(bucket) if bucket.distance > 0 => bucket.distance -= 1,
                _ => break,
            }
            self.buckets.swap(hole, next);
            hole = next;
        }

        Some(removed.value)
    }

    fn grow_for_insert(&mut self) {
        let mut capacity = self.capacity();
        while (self.len + 1) * 100 >= capacity * MAX_LOAD_PERCENT {
            capacity *= 2;
        }
        if capacity != self.capacity() {
            self.resize(capacity);
        }
    }

    fn resize(&mut self, capacity: usize) {
        debug_assert!(capacity.is_power_of_two());
        debug_assert!(capacity > self.len);
        log::trace!(
            "resizing table from {} to {} slots with {} entries",
            self.capacity(),
            capacity,
            self.len
        );

        let old = core::mem::replace(&mut self.buckets, empty_buckets(capacity));
        self.mask = capacity - 1;
        self.len = 0;
        for bucket in old.into_iter().flatten() {
            self.insert_unique(bucket.hash, bucket.value);
        }
    }

    /// First slot that no probe run crosses: empty, or holding an element in
    /// its home slot.
    fn chain_head(&self) -> usize {
        self.buckets
            .iter()
            .position(|slot| slot.as_ref().is_none_or(|bucket| bucket.distance == 0))
            .unwrap_or(0)
    }
}

/// A view into a single entry in a [`HashTable`], which may either be vacant
/// or occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, T, H: HashWidth> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, T, H>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, T, H>),
}

impl<'a, T, H: HashWidth> Entry<'a, T, H> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the entry's value.
    pub fn or_insert(self, default: T) -> &'a mut T {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant. The closure is
    /// not called for an occupied entry.
    pub fn or_insert_with(self, default: impl FnOnce() -> T) -> &'a mut T {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to the value of an occupied entry.
    pub fn and_modify(mut self, f: impl FnOnce(&mut T)) -> Self {
        if let Entry::Occupied(entry) = &mut self {
            f(entry.get_mut());
        }
        self
    }

    /// Inserts `T::default()` if the entry is vacant.
    pub fn or_default(self) -> &'a mut T
    where
        T: Default,
    {
        self.or_insert_with(T::default)
    }
}

/// A view into a vacant entry in a [`HashTable`].
pub struct VacantEntry<'a, T, H: HashWidth> {
    table: &'a mut HashTable<T, H>,
    hash: H,
}

impl<'a, T, H: HashWidth> VacantEntry<'a, T, H> {
    /// Inserts `value` and returns a mutable reference to it.
    pub fn insert(self, value: T) -> &'a mut T {
        let index = self.table.insert_unique(self.hash, value);
        self.table.value_at_mut(index)
    }
}

/// A view into an occupied entry in a [`HashTable`].
pub struct OccupiedEntry<'a, T, H: HashWidth> {
    table: &'a mut HashTable<T, H>,
    index: usize,
}

impl<'a, T, H: HashWidth> OccupiedEntry<'a, T, H> {
    /// Returns a reference to the entry's value.
    pub fn get(&self) -> &T {
        self.table.value_at(self.index)
    }

    /// Returns a mutable reference to the entry's value.
    pub fn get_mut(&mut self) -> &mut T {
        self.table.value_at_mut(self.index)
    }

    /// Converts the entry into a mutable reference bound to the table's
    /// lifetime.
    pub fn into_mut(self) -> &'a mut T {
        self.table.value_at_mut(self.index)
    }

    /// Removes the entry and returns its value.
    pub fn remove(self) -> T {
        match self.table.erase_at(self.index) {
            Some(value) => value,
            None => unreachable!("occupied entry points at an empty slot"),
        }
    }
}

/// A cursor over a [`HashTable`] that can remove the element it points at.
///
/// Created by [`HashTable::cursor_mut`] and [`HashTable::cursor_mut_at`].
/// After a removal the cursor points at the next element, which may be one
/// that backward-shift deletion just moved into the current slot.
pub struct CursorMut<'a, T, H: HashWidth> {
    table: &'a mut HashTable<T, H>,
    index: usize,
    remaining: usize,
}

impl<T, H: HashWidth> CursorMut<'_, T, H> {
    /// The element under the cursor, or `None` once the cursor is exhausted.
    pub fn current(&self) -> Option<&T> {
        if self.remaining == 0 {
            return None;
        }
        self.table.buckets[self.index]
            .as_ref()
            .map(|bucket| &bucket.value)
    }

    /// Mutable access to the element under the cursor.
    pub fn current_mut(&mut self) -> Option<&mut T> {
        if self.remaining == 0 {
            return None;
        }
        self.table.buckets[self.index]
            .as_mut()
            .map(|bucket| &mut bucket.value)
    }

    /// Advances to the next element.
    pub fn move_next(&mut self) {
        if self.remaining > 0 {
            self.step();
            self.skip_vacant();
        }
    }

    /// Removes the element under the cursor and moves to the next one.
    pub fn remove_current(&mut self) -> Option<T> {
        if self.remaining == 0 {
            return None;
        }
        let value = self.table.erase_at(self.index)?;
        self.skip_vacant();
        Some(value)
    }

    /// Removes up to `n` elements starting at the cursor. Returns how many
    /// were removed.
    pub fn remove_n(&mut self, n: usize) -> usize {
        let mut removed = 0;
        while removed < n && self.remove_current().is_some() {
            removed += 1;
        }
        removed
    }

    /// Removes every element from the cursor to its end. Returns how many
    /// were removed.
    pub fn remove_rest(&mut self) -> usize {
        self.remove_n(usize::MAX)
    }

    fn step(&mut self) {
        self.index = (self.index + 1) & self.table.mask;
        self.remaining -= 1;
    }

    fn skip_vacant(&mut self) {
        while self.remaining > 0 && self.table.buckets[self.index].is_none() {
            self.step();
        }
    }
}

/// An iterator over the elements of a [`HashTable`], in slot order.
pub struct Iter<'a, T, H> {
    buckets: core::slice::Iter<'a, Option<Bucket<T, H>>>,
    remaining: usize,
}

impl<T, H> Clone for Iter<'_, T, H> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, T, H> Iterator for Iter<'a, T, H> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let bucket = self.buckets.by_ref().flatten().next()?;
        self.remaining -= 1;
        Some(&bucket.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, H> ExactSizeIterator for Iter<'_, T, H> {}
impl<T, H> FusedIterator for Iter<'_, T, H> {}

/// A mutable iterator over the elements of a [`HashTable`].
pub struct IterMut<'a, T, H> {
    buckets: core::slice::IterMut<'a, Option<Bucket<T, H>>>,
    remaining: usize,
}

impl<'a, T, H> Iterator for IterMut<'a, T, H> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        let bucket = self.buckets.by_ref().flatten().next()?;
        self.remaining -= 1;
        Some(&mut bucket.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, H> ExactSizeIterator for IterMut<'_, T, H> {}
impl<T, H> FusedIterator for IterMut<'_, T, H> {}

/// An owning iterator over the elements of a [`HashTable`].
pub struct IntoIter<T, H> {
    buckets: alloc::vec::IntoIter<Option<Bucket<T, H>>>,
    remaining: usize,
}

impl<T, H> Iterator for IntoIter<T, H> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let bucket = self.buckets.by_ref().flatten().next()?;
        self.remaining -= 1;
        Some(bucket.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, H> ExactSizeIterator for IntoIter<T, H> {}
impl<T, H> FusedIterator for IntoIter<T, H> {}

impl<T, H: HashWidth> IntoIterator for HashTable<T, H> {
    type Item = T;
    type IntoIter = IntoIter<T, H>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            buckets: self.buckets.into_iter(),
            remaining: self.len,
        }
    }
}

impl<'a, T, H: HashWidth> IntoIterator for &'a HashTable<T, H> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, H>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A draining iterator over the elements of a [`HashTable`].
///
/// Created by [`HashTable::drain`]. The table is already empty when this is
/// returned; the iterator owns the removed elements.
pub struct Drain<'a, T, H> {
    inner: IntoIter<T, H>,
    _marker: PhantomData<&'a mut T>,
}

impl<T, H> Iterator for Drain<'_, T, H> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, H> ExactSizeIterator for Drain<'_, T, H> {}
impl<T, H> FusedIterator for Drain<'_, T, H> {}

#[cfg(test)]
impl<T, H: HashWidth> HashTable<T, H> {
    /// Panics unless the structural invariants hold.
    pub(crate) fn assert_invariants(&self) {
        let capacity = self.capacity();
        assert!(capacity.is_power_of_two(), "{self:?}");
        assert_eq!(self.mask, capacity - 1);
        assert_eq!(self.len, self.buckets.iter().flatten().count(), "{self:?}");
        assert!(self.len * 100 < capacity * MAX_LOAD_PERCENT, "{self:?}");

        for (index, slot) in self.buckets.iter().enumerate() {
            let Some(bucket) = slot else { continue };
            let home = bucket.hash.low_bits(self.mask);
            assert_eq!(
                bucket.distance as usize,
                index.wrapping_sub(home) & self.mask,
                "slot {index}: {self:?}"
            );
            if bucket.distance > 0 {
                let prev = self.buckets[(index + capacity - 1) & self.mask].as_ref();
                let prev = prev.unwrap_or_else(|| panic!("gap before slot {index}: {self:?}"));
                assert!(prev.distance + 1 >= bucket.distance, "slot {index}: {self:?}");
            }
        }
    }

    pub(crate) fn distance_at(&self, index: usize) -> Option<u32> {
        self.buckets[index].as_ref().map(|bucket| bucket.distance)
    }
}

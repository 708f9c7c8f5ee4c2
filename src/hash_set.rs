use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::error::KeyNotFound;
use crate::hash_table;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
pub use crate::hash_table::Drain;
pub use crate::hash_table::IntoIter;
pub use crate::hash_table::Iter;
use crate::hashing::DefaultHashBuilder;
use crate::hashing::Equivalent;
use crate::hashing::HashWidth;
use crate::hashing::make_hash;

/// A hash set backed by the Robin Hood [`HashTable`].
///
/// `HashSet<T, H, S>` has the same layout as [`HashMap`](crate::HashMap)
/// without the value column: each slot holds a value, its cached hash of
/// width `H`, and its probe distance.
///
/// # Examples
///
/// ```rust
/// use hood_hash::HashSet;
///
/// let mut set: HashSet<String> = HashSet::new();
/// assert!(set.insert("apple".to_string()));
/// assert!(!set.insert("apple".to_string()));
/// assert!(set.contains("apple"));
/// assert!(set.remove("apple"));
/// assert!(set.is_empty());
/// ```
#[derive(Clone)]
pub struct HashSet<T, H: HashWidth = u32, S = DefaultHashBuilder<H>> {
    table: HashTable<T, H>,
    hash_builder: S,
}

impl<T, H, S> PartialEq for HashSet<T, H, S>
where
    T: Hash + Eq,
    H: HashWidth,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }
}

impl<T, H, S> Eq for HashSet<T, H, S>
where
    T: Hash + Eq,
    H: HashWidth,
    S: BuildHasher,
{
}

impl<T, H, S> Debug for HashSet<T, H, S>
where
    T: Debug,
    H: HashWidth,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> HashSet<T> {
    /// Creates an empty set with the default 32-bit hasher and 32 slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashSet;
    ///
    /// let set: HashSet<i32> = HashSet::new();
    /// assert!(set.is_empty());
    /// assert_eq!(set.capacity(), 32);
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Creates an empty set with at least `capacity` slots, rounded up to a
    /// power of two.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashSet;
    ///
    /// let set: HashSet<i32> = HashSet::with_capacity(100);
    /// assert_eq!(set.capacity(), 128);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<T, H, S> Default for HashSet<T, H, S>
where
    H: HashWidth,
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T, H, S> HashSet<T, H, S>
where
    H: HashWidth,
{
    /// Creates an empty set that hashes values with `hash_builder`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashSet;
    ///
    /// use hood_hash::hashing::FnvBuildHasher;
    ///
    /// let mut set: HashSet<&str, u32, FnvBuildHasher<u32>> = HashSet::with_hasher(FnvBuildHasher::default());
    /// set.insert("fnv");
    /// assert!(set.contains("fnv"));
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::new(),
            hash_builder,
        }
    }

    /// Creates an empty set with at least `capacity` slots that hashes values
    /// with `hash_builder`.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Returns the set's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the number of values in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no values.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the set. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes all values, keeping the allocated slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = (0..50).collect();
    /// let capacity = set.capacity();
    /// set.clear();
    /// assert!(set.is_empty());
    /// assert_eq!(set.capacity(), capacity);
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Grows the set to at least `min_capacity` slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::new();
    /// set.reserve(1000);
    /// assert_eq!(set.capacity(), 1024);
    /// ```
    pub fn reserve(&mut self, min_capacity: usize) {
        self.table.reserve(min_capacity);
    }

    /// Swaps the contents of two sets.
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Keeps only the values for which `keep` returns `true`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = (0..10).collect();
    /// set.retain(|&x| x % 3 == 0);
    /// assert_eq!(set.len(), 4);
    /// assert!(set.contains(&9));
    /// ```
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.table.retain(|value| keep(value));
    }

    /// Returns a cursor over every value that can erase values by position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = (0..6).collect();
    /// let mut cursor = set.cursor_mut();
    /// while let Some(&value) = cursor.current() {
    ///     if value % 2 == 1 {
    ///         cursor.remove_current();
    ///     } else {
    ///         cursor.move_next();
    ///     }
    /// }
    /// assert_eq!(set.len(), 3);
    /// ```
    pub fn cursor_mut(&mut self) -> CursorMut<'_, T, H> {
        CursorMut {
            inner: self.table.cursor_mut(),
        }
    }

    /// Returns an iterator over the values, in slot order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashSet;
    ///
    /// let set: HashSet<i32> = HashSet::from([1, 2, 3]);
    /// assert_eq!(set.iter().sum::<i32>(), 6);
    /// ```
    pub fn iter(&self) -> Iter<'_, T, H> {
        self.table.iter()
    }

    /// Removes all values, returning them as an iterator. The set keeps its
    /// capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::from([1, 2, 3]);
    /// let mut drained: Vec<i32> = set.drain().collect();
    /// drained.sort();
    /// assert_eq!(drained, [1, 2, 3]);
    /// assert!(set.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, T, H> {
        self.table.drain()
    }

    /// Probe-distance histogram of the underlying table.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> crate::hash_table::ProbeHistogram {
        self.table.probe_histogram()
    }

    /// Utilization statistics of the underlying table.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats()
    }
}

impl<T, H, S> HashSet<T, H, S>
where
    T: Hash + Eq,
    H: HashWidth,
    S: BuildHasher,
{
    /// Adds `value` to the set. Returns `true` if it was not already present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::new();
    /// assert!(set.insert(1));
    /// assert!(!set.insert(1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let hash = make_hash(&self.hash_builder, &value);
        match self.table.entry(hash, |v| *v == value) {
            TableEntry::Occupied(_) => false,
            TableEntry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    /// Adds `value`, replacing and returning an equal value already present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashSet;
    ///
    /// let mut set: HashSet<String> = HashSet::new();
    /// assert_eq!(set.replace("a".to_string()), None);
    /// assert_eq!(set.replace("a".to_string()), Some("a".to_string()));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn replace(&mut self, value: T) -> Option<T> {
        let hash = make_hash(&self.hash_builder, &value);
        match self.table.entry(hash, |v| *v == value) {
            TableEntry::Occupied(mut entry) => Some(core::mem::replace(entry.get_mut(), value)),
            TableEntry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        }
    }

    /// Adds `value` if absent and returns the stored value, plus whether it
    /// was inserted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashSet;
    ///
    /// let mut set: HashSet<&str> = HashSet::new();
    /// assert_eq!(set.get_or_insert("a"), (&"a", true));
    /// assert_eq!(set.get_or_insert("a"), (&"a", false));
    /// ```
    pub fn get_or_insert(&mut self, value: T) -> (&T, bool) {
        let hash = make_hash(&self.hash_builder, &value);
        match self.table.entry(hash, |v| *v == value) {
            TableEntry::Occupied(entry) => (&*entry.into_mut(), false),
            TableEntry::Vacant(entry) => (&*entry.insert(value), true),
        }
    }

    /// Returns `true` if the set contains `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashSet;
    ///
    /// let set: HashSet<String> = HashSet::from(["x".to_string()]);
    /// assert!(set.contains("x"));
    /// assert!(!set.contains("y"));
    /// ```
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        self.get(value).is_some()
    }

    /// Returns the stored value equal to `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashSet;
    ///
    /// let set: HashSet<String> = HashSet::from(["x".to_string()]);
    /// assert_eq!(set.get("x").map(String::as_str), Some("x"));
    /// assert_eq!(set.get("y"), None);
    /// ```
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        let hash = make_hash(&self.hash_builder, value);
        self.table.find(hash, |v| value.equivalent(v))
    }

    /// Returns the stored value equal to `value`, or [`KeyNotFound`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashSet;
    ///
    /// use hood_hash::KeyNotFound;
    ///
    /// let set: HashSet<i32> = HashSet::from([7]);
    /// assert_eq!(set.at(&7), Ok(&7));
    /// assert_eq!(set.at(&8), Err(KeyNotFound));
    /// ```
    pub fn at<Q>(&self, value: &Q) -> Result<&T, KeyNotFound>
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        self.get(value).ok_or(KeyNotFound)
    }

    /// Removes `value`. Returns `true` if it was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::from([1, 2]);
    /// assert!(set.remove(&1));
    /// assert!(!set.remove(&1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        self.take(value).is_some()
    }

    /// Removes and returns the stored value equal to `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashSet;
    ///
    /// let mut set: HashSet<String> = HashSet::from(["x".to_string()]);
    /// assert_eq!(set.take("x"), Some("x".to_string()));
    /// assert_eq!(set.take("x"), None);
    /// ```
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        let hash = make_hash(&self.hash_builder, value);
        self.table.remove(hash, |v| value.equivalent(v))
    }

    /// Returns a cursor positioned at `value`, walking toward the end of the
    /// slot array.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = (0..10).collect();
    /// let mut cursor = set.cursor_mut_at(&4).unwrap();
    /// assert_eq!(cursor.remove_current(), Some(4));
    /// assert!(!set.contains(&4));
    /// assert!(set.cursor_mut_at(&42).is_none());
    /// ```
    pub fn cursor_mut_at<Q>(&mut self, value: &Q) -> Option<CursorMut<'_, T, H>>
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        let hash = make_hash(&self.hash_builder, value);
        let inner = self.table.cursor_mut_at(hash, |v| value.equivalent(v))?;
        Some(CursorMut { inner })
    }
}

impl<T, H, S> FromIterator<T> for HashSet<T, H, S>
where
    T: Hash + Eq,
    H: HashWidth,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_hasher(S::default());
        set.extend(iter);
        set
    }
}

impl<T, H, S> Extend<T> for HashSet<T, H, S>
where
    T: Hash + Eq,
    H: HashWidth,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        // A lower bound too large to turn into a slot count is ignored; the
        // table still grows as elements arrive.
        let expected = self.len().saturating_add(iter.size_hint().0);
        if let Some(slots) = expected.checked_mul(4) {
            self.reserve(slots / 3 + 1);
        }
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, H, S, const N: usize> From<[T; N]> for HashSet<T, H, S>
where
    T: Hash + Eq,
    H: HashWidth,
    S: BuildHasher + Default,
{
    fn from(values: [T; N]) -> Self {
        Self::from_iter(values)
    }
}

impl<T, H: HashWidth, S> IntoIterator for HashSet<T, H, S> {
    type Item = T;
    type IntoIter = IntoIter<T, H>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.into_iter()
    }
}

impl<'a, T, H: HashWidth, S> IntoIterator for &'a HashSet<T, H, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, H>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A cursor over a [`HashSet`] that can erase the value it points at.
pub struct CursorMut<'a, T, H: HashWidth> {
    inner: hash_table::CursorMut<'a, T, H>,
}

impl<T, H: HashWidth> CursorMut<'_, T, H> {
    /// The value under the cursor.
    pub fn current(&self) -> Option<&T> {
        self.inner.current()
    }

    /// Advances to the next value.
    pub fn move_next(&mut self) {
        self.inner.move_next();
    }

    /// Removes the value under the cursor and moves to the next one.
    pub fn remove_current(&mut self) -> Option<T> {
        self.inner.remove_current()
    }

    /// Removes up to `n` values from the cursor on.
    pub fn remove_n(&mut self, n: usize) -> usize {
        self.inner.remove_n(n)
    }

    /// Removes every value from the cursor to its end.
    pub fn remove_rest(&mut self) -> usize {
        self.inner.remove_rest()
    }
}

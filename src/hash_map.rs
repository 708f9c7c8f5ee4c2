use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::iter::FusedIterator;
use core::ops::Index;

use crate::error::KeyNotFound;
use crate::hash_table;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::hashing::DefaultHashBuilder;
use crate::hashing::Equivalent;
use crate::hashing::HashWidth;
use crate::hashing::make_hash;

/// A hash map backed by the Robin Hood [`HashTable`].
///
/// `HashMap<K, V, H, S>` stores key-value pairs where keys implement
/// `Hash + Eq`. Keys are hashed with the builder `S`, and the result is folded
/// to the hash width `H` (`u32` or `u64`) and cached next to each entry, so
/// lookups compare hashes before keys and resizing never rehashes a key.
///
/// Lookups accept any type that is [`Equivalent`] to `K` and hashes the same
/// way, so a `HashMap<String, _>` can be queried with a `&str`.
///
/// # Examples
///
/// ```rust
/// use hood_hash::HashMap;
///
/// let mut map: HashMap<String, i32> = HashMap::with_capacity(32);
/// map.insert("apple".to_string(), 1);
/// map.insert("banana".to_string(), 2);
/// map.insert("cherry".to_string(), 3);
///
/// assert_eq!(map.len(), 3);
/// assert_eq!(map.get("apple"), Some(&1));
/// assert_eq!(map.get("missing"), None);
/// assert_eq!(map.capacity(), 32);
///
/// assert_eq!(map.remove("banana"), Some(2));
/// assert_eq!(map.len(), 2);
/// assert!(!map.contains_key("banana"));
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, H: HashWidth = u32, S = DefaultHashBuilder<H>> {
    table: HashTable<(K, V), H>,
    hash_builder: S,
}

impl<K, V, H, S> Debug for HashMap<K, V, H, S>
where
    K: Debug,
    V: Debug,
    H: HashWidth,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> HashMap<K, V> {
    /// Creates an empty map with the default 32-bit hasher and 32 slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let map: HashMap<i32, String> = HashMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 32);
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Creates an empty map with at least `capacity` slots, rounded up to a
    /// power of two.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let map: HashMap<i32, i32> = HashMap::with_capacity(100);
    /// assert_eq!(map.capacity(), 128);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<K, V, H, S> Default for HashMap<K, V, H, S>
where
    H: HashWidth,
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, H, S> HashMap<K, V, H, S>
where
    H: HashWidth,
{
    /// Creates an empty map that hashes keys with `hash_builder`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    /// use hood_hash::hashing::DefaultHashBuilder;
    ///
    /// let hasher = DefaultHashBuilder::<u64>::with_seed(0x1234_5678_9ABC_DEF0);
    /// let mut map: HashMap<&str, i32, u64> = HashMap::with_hasher(hasher);
    /// map.insert("answer", 42);
    /// assert_eq!(map["answer"], 42);
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::new(),
            hash_builder,
        }
    }

    /// Creates an empty map with at least `capacity` slots that hashes keys
    /// with `hash_builder`.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Returns the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let mut map: HashMap<i32, i32> = HashMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.insert(1, 10);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the map. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes all entries, keeping the allocated slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let mut map: HashMap<i32, i32> = (0..50).map(|i| (i, i)).collect();
    /// let capacity = map.capacity();
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), capacity);
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Grows the map to at least `min_capacity` slots.
    ///
    /// The argument is a slot count, not a number of additional entries.
    /// Nothing happens if the map already has that many slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let mut map: HashMap<i32, i32> = HashMap::new();
    /// map.reserve(100);
    /// assert_eq!(map.capacity(), 128);
    ///
    /// // Never shrinks.
    /// map.reserve(10);
    /// assert_eq!(map.capacity(), 128);
    /// ```
    pub fn reserve(&mut self, min_capacity: usize) {
        self.table.reserve(min_capacity);
    }

    /// Swaps the contents of two maps.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let mut a: HashMap<i32, char> = HashMap::from([(1, 'a')]);
    /// let mut b: HashMap<i32, char> = HashMap::from([(2, 'b'), (3, 'c')]);
    /// a.swap(&mut b);
    /// assert_eq!(a.len(), 2);
    /// assert_eq!(b[&1], 'a');
    /// ```
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Keeps only the entries for which `keep` returns `true`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let mut map: HashMap<i32, i32> = (0..8).map(|x| (x, x * 10)).collect();
    /// map.retain(|&k, _| k % 2 == 0);
    /// assert_eq!(map.len(), 4);
    /// ```
    pub fn retain(&mut self, mut keep: impl FnMut(&K, &mut V) -> bool) {
        self.table.retain(|(k, v)| keep(k, v));
    }

    /// Returns a cursor over every entry that can erase entries by position.
    ///
    /// Every entry is visited exactly once, including entries that erasure
    /// shifts into the cursor's slot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let mut map: HashMap<i32, &str> = HashMap::from([(1, "a"), (2, "b"), (3, "c")]);
    /// let mut cursor = map.cursor_mut();
    /// while let Some((&key, _)) = cursor.current() {
    ///     if key == 2 {
    ///         cursor.remove_current();
    ///     } else {
    ///         cursor.move_next();
    ///     }
    /// }
    /// assert_eq!(map.len(), 2);
    /// assert!(!map.contains_key(&2));
    /// ```
    pub fn cursor_mut(&mut self) -> CursorMut<'_, K, V, H> {
        CursorMut {
            inner: self.table.cursor_mut(),
        }
    }

    /// Returns an iterator over the entries, in slot order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let map: HashMap<i32, char> = HashMap::from([(1, 'a'), (2, 'b')]);
    /// let mut entries: Vec<(i32, char)> = map.iter().map(|(&k, &v)| (k, v)).collect();
    /// entries.sort();
    /// assert_eq!(entries, [(1, 'a'), (2, 'b')]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V, H> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the entries with mutable values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let mut map: HashMap<i32, i32> = HashMap::from([(1, 1), (2, 2)]);
    /// for (_, value) in map.iter_mut() {
    ///     *value *= 10;
    /// }
    /// assert_eq!(map[&2], 20);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V, H> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Returns an iterator over the keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let map: HashMap<i32, char> = HashMap::from([(1, 'a'), (2, 'b')]);
    /// assert_eq!(map.keys().sum::<i32>(), 3);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V, H> {
        Keys {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let map: HashMap<&str, i32> = HashMap::from([("a", 1), ("b", 2)]);
    /// assert_eq!(map.values().sum::<i32>(), 3);
    /// ```
    pub fn values(&self) -> Values<'_, K, V, H> {
        Values {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over mutable references to the values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let mut map: HashMap<&str, i32> = HashMap::from([("a", 1), ("b", 2)]);
    /// map.values_mut().for_each(|v| *v += 1);
    /// assert_eq!(map["a"], 2);
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V, H> {
        ValuesMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Removes all entries, returning them as an iterator. The map keeps its
    /// capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let mut map: HashMap<i32, i32> = HashMap::from([(1, 10), (2, 20)]);
    /// let mut drained: Vec<(i32, i32)> = map.drain().collect();
    /// drained.sort();
    /// assert_eq!(drained, [(1, 10), (2, 20)]);
    /// assert!(map.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, K, V, H> {
        Drain {
            inner: self.table.drain(),
        }
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

impl<K, V, H, S> HashMap<K, V, H, S>
where
    K: Hash + Eq,
    H: HashWidth,
    S: BuildHasher,
{
    /// Inserts `key` with `value` if the key is absent.
    ///
    /// Returns `true` if the entry was inserted. An existing entry is left
    /// untouched and `value` is dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let mut map: HashMap<&str, i32> = HashMap::new();
    /// assert!(map.insert("k", 1));
    /// assert!(!map.insert("k", 2));
    /// assert_eq!(map["k"], 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> bool {
        match self.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    /// Inserts `key` with `value`, replacing the value of an existing entry.
    ///
    /// Returns the previous value, if any. The stored key is kept when the
    /// entry already exists.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let mut map: HashMap<&str, i32> = HashMap::new();
    /// assert_eq!(map.insert_or_assign("k", 1), None);
    /// assert_eq!(map.insert_or_assign("k", 2), Some(1));
    /// assert_eq!(map["k"], 2);
    /// ```
    pub fn insert_or_assign(&mut self, key: K, value: V) -> Option<V> {
        match self.entry(key) {
            Entry::Occupied(mut entry) => Some(entry.insert(value)),
            Entry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        }
    }

    /// Inserts or assigns the value built by `make`, returning a reference to
    /// the stored value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let mut map: HashMap<&str, String> = HashMap::new();
    /// map.emplace_with("k", || "first".to_string());
    /// map.emplace_with("k", || "second".to_string()).push('!');
    /// assert_eq!(map["k"], "second!");
    /// ```
    pub fn emplace_with(&mut self, key: K, make: impl FnOnce() -> V) -> &mut V {
        match self.entry(key) {
            Entry::Occupied(entry) => {
                let slot = entry.into_mut();
                *slot = make();
                slot
            }
            Entry::Vacant(entry) => entry.insert(make()),
        }
    }

    /// Inserts the value built by `make` only if `key` is absent.
    ///
    /// `make` is not called when the key is already present. Returns the
    /// stored value and whether it was inserted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let mut map: HashMap<&str, Vec<i32>> = HashMap::new();
    /// let (list, inserted) = map.try_emplace("k", || vec![1]);
    /// assert!(inserted);
    /// list.push(2);
    ///
    /// let (list, inserted) = map.try_emplace("k", || unreachable!());
    /// assert!(!inserted);
    /// assert_eq!(*list, [1, 2]);
    /// ```
    pub fn try_emplace(&mut self, key: K, make: impl FnOnce() -> V) -> (&mut V, bool) {
        match self.entry(key) {
            Entry::Occupied(entry) => (entry.into_mut(), false),
            Entry::Vacant(entry) => (entry.insert(make()), true),
        }
    }

    /// Gets the entry for `key` for in-place manipulation.
    ///
    /// Grows the map first if one more entry would exceed the load factor.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let mut counts: HashMap<char, usize> = HashMap::new();
    /// for c in "hello".chars() {
    ///     *counts.entry(c).or_default() += 1;
    /// }
    /// assert_eq!(counts[&'l'], 2);
    /// assert_eq!(counts[&'h'], 1);
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, H> {
        let hash = make_hash(&self.hash_builder, &key);
        match self.table.entry(hash, |(k, _)| *k == key) {
            TableEntry::Occupied(inner) => Entry::Occupied(OccupiedEntry { inner }),
            TableEntry::Vacant(inner) => Entry::Vacant(VacantEntry { inner, key }),
        }
    }

    /// Returns a reference to the value for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let mut map: HashMap<String, i32> = HashMap::new();
    /// map.insert("apple".to_string(), 1);
    /// assert_eq!(map.get("apple"), Some(&1));
    /// assert_eq!(map.get("pear"), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and value for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let map: HashMap<String, i32> = HashMap::from([("apple".to_string(), 1)]);
    /// assert_eq!(map.get_key_value("apple"), Some((&"apple".to_string(), &1)));
    /// ```
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        let hash = make_hash(&self.hash_builder, key);
        self.table
            .find(hash, |(k, _)| key.equivalent(k))
            .map(|(k, v)| (k, v))
    }

    /// Returns a mutable reference to the value for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let mut map: HashMap<&str, i32> = HashMap::from([("a", 1)]);
    /// if let Some(value) = map.get_mut("a") {
    ///     *value = 5;
    /// }
    /// assert_eq!(map["a"], 5);
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        let hash = make_hash(&self.hash_builder, key);
        self.table
            .find_mut(hash, |(k, _)| key.equivalent(k))
            .map(|(_, v)| v)
    }

    /// Returns the value for `key`, or [`KeyNotFound`] if it is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    /// use hood_hash::KeyNotFound;
    ///
    /// let map: HashMap<&str, i32> = HashMap::from([("red", 1)]);
    /// assert_eq!(map.at("red"), Ok(&1));
    /// assert_eq!(map.at("blue"), Err(KeyNotFound));
    /// ```
    pub fn at<Q>(&self, key: &Q) -> Result<&V, KeyNotFound>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.get(key).ok_or(KeyNotFound)
    }

    /// Returns a mutable reference to the value for `key`, or
    /// [`KeyNotFound`] if it is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let mut map: HashMap<&str, i32> = HashMap::from([("a", 1)]);
    /// *map.at_mut("a")? += 1;
    /// assert_eq!(map["a"], 2);
    /// assert!(map.at_mut("b").is_err());
    /// # Ok::<(), hood_hash::KeyNotFound>(())
    /// ```
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V, KeyNotFound>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.get_mut(key).ok_or(KeyNotFound)
    }

    /// Returns `true` if the map contains `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let map: HashMap<i32, i32> = HashMap::from([(1, 10)]);
    /// assert!(map.contains_key(&1));
    /// assert!(!map.contains_key(&2));
    /// ```
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.get(key).is_some()
    }

    /// Removes `key`, returning its value if it was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let mut map: HashMap<&str, i32> = HashMap::from([("a", 1), ("b", 2)]);
    /// assert_eq!(map.remove("a"), Some(1));
    /// assert_eq!(map.remove("a"), None);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key`, returning the stored key and value if it was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let mut map: HashMap<String, i32> = HashMap::from([("a".to_string(), 1)]);
    /// assert_eq!(map.remove_entry("a"), Some(("a".to_string(), 1)));
    /// assert!(map.is_empty());
    /// ```
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        let hash = make_hash(&self.hash_builder, key);
        self.table.remove(hash, |(k, _)| key.equivalent(k))
    }

    /// Returns a cursor positioned at `key`, for erasing a run of entries
    /// starting there.
    ///
    /// The cursor walks toward the end of the slot array. Returns `None` if
    /// the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::HashMap;
    ///
    /// let mut map: HashMap<i32, i32> = (0..10).map(|i| (i, i * 10)).collect();
    /// let mut cursor = map.cursor_mut_at(&3).unwrap();
    /// assert_eq!(cursor.key(), Some(&3));
    /// assert_eq!(cursor.remove_current(), Some((3, 30)));
    /// assert!(!map.contains_key(&3));
    /// assert!(map.cursor_mut_at(&42).is_none());
    /// ```
    pub fn cursor_mut_at<Q>(&mut self, key: &Q) -> Option<CursorMut<'_, K, V, H>>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        let hash = make_hash(&self.hash_builder, key);
        let inner = self.table.cursor_mut_at(hash, |(k, _)| key.equivalent(k))?;
        Some(CursorMut { inner })
    }
}

impl<K, V, H, S> PartialEq for HashMap<K, V, H, S>
where
    K: Hash + Eq,
    V: PartialEq,
    H: HashWidth,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|other_v| v == other_v))
    }
}

impl<K, V, H, S> Eq for HashMap<K, V, H, S>
where
    K: Hash + Eq,
    V: Eq,
    H: HashWidth,
    S: BuildHasher,
{
}

impl<K, Q, V, H, S> Index<&Q> for HashMap<K, V, H, S>
where
    K: Hash + Eq,
    Q: ?Sized + Hash + Equivalent<K>,
    H: HashWidth,
    S: BuildHasher,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present. Use [`HashMap::at`] for a checked
    /// lookup.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key not found in HashMap"),
        }
    }
}

impl<K, V, H, S> FromIterator<(K, V)> for HashMap<K, V, H, S>
where
    K: Hash + Eq,
    H: HashWidth,
    S: BuildHasher + Default,
{
    /// Builds a map from `(key, value)` pairs. Later pairs overwrite earlier
    /// pairs with the same key.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, H, S> Extend<(K, V)> for HashMap<K, V, H, S>
where
    K: Hash + Eq,
    H: HashWidth,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        // A lower bound too large to turn into a slot count is ignored; the
        // table still grows as elements arrive.
        let expected = self.len().saturating_add(iter.size_hint().0);
        if let Some(slots) = expected.checked_mul(4) {
            self.reserve(slots / 3 + 1);
        }
        for (key, value) in iter {
            self.insert_or_assign(key, value);
        }
    }
}

impl<K, V, H, S, const N: usize> From<[(K, V); N]> for HashMap<K, V, H, S>
where
    K: Hash + Eq,
    H: HashWidth,
    S: BuildHasher + Default,
{
    fn from(entries: [(K, V); N]) -> Self {
        Self::from_iter(entries)
    }
}

impl<K, V, H: HashWidth, S> IntoIterator for HashMap<K, V, H, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, H>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K, V, H: HashWidth, S> IntoIterator for &'a HashMap<K, V, H, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, H>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, H: HashWidth, S> IntoIterator for &'a mut HashMap<K, V, H, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V, H>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A view into a single entry in a [`HashMap`], which may either be vacant
/// or occupied.
///
/// Created by [`HashMap::entry`].
pub enum Entry<'a, K, V, H: HashWidth> {
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V, H>),
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V, H>),
}

impl<'a, K, V, H: HashWidth> Entry<'a, K, V, H> {
    /// Returns the entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }

    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Inserts the result of `default`, called with the key, if the entry is
    /// vacant.
    pub fn or_insert_with_key(self, default: impl FnOnce(&K) -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let value = default(entry.key());
                entry.insert(value)
            }
        }
    }

    /// Applies `f` to the value of an occupied entry.
    pub fn and_modify(mut self, f: impl FnOnce(&mut V)) -> Self {
        if let Entry::Occupied(entry) = &mut self {
            f(entry.get_mut());
        }
        self
    }

    /// Inserts `V::default()` if the entry is vacant.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }
}

/// A view into an occupied entry in a [`HashMap`].
pub struct OccupiedEntry<'a, K, V, H: HashWidth> {
    inner: hash_table::OccupiedEntry<'a, (K, V), H>,
}

impl<'a, K, V, H: HashWidth> OccupiedEntry<'a, K, V, H> {
    /// Returns the stored key.
    pub fn key(&self) -> &K {
        &self.inner.get().0
    }

    /// Returns a reference to the value.
    pub fn get(&self) -> &V {
        &self.inner.get().1
    }

    /// Returns a mutable reference to the value.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.inner.get_mut().1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.inner.into_mut().1
    }

    /// Replaces the value, returning the old one.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(self.get_mut(), value)
    }

    /// Removes the entry, returning its value.
    pub fn remove(self) -> V {
        self.inner.remove().1
    }

    /// Removes the entry, returning the stored key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.inner.remove()
    }
}

/// A view into a vacant entry in a [`HashMap`].
pub struct VacantEntry<'a, K, V, H: HashWidth> {
    inner: hash_table::VacantEntry<'a, (K, V), H>,
    key: K,
}

impl<'a, K, V, H: HashWidth> VacantEntry<'a, K, V, H> {
    /// Returns the key that would be inserted.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Takes ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts `value` under the entry's key.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.inner.insert((self.key, value)).1
    }
}

/// A cursor over a [`HashMap`] that can erase the entry it points at.
///
/// Created by [`HashMap::cursor_mut`] and [`HashMap::cursor_mut_at`].
pub struct CursorMut<'a, K, V, H: HashWidth> {
    inner: hash_table::CursorMut<'a, (K, V), H>,
}

impl<K, V, H: HashWidth> CursorMut<'_, K, V, H> {
    /// The entry under the cursor.
    pub fn current(&self) -> Option<(&K, &V)> {
        self.inner.current().map(|(k, v)| (k, v))
    }

    /// The entry under the cursor, with a mutable value.
    pub fn current_mut(&mut self) -> Option<(&K, &mut V)> {
        self.inner.current_mut().map(|(k, v)| (&*k, v))
    }

    /// The key under the cursor.
    pub fn key(&self) -> Option<&K> {
        self.inner.current().map(|(k, _)| k)
    }

    /// Advances to the next entry.
    pub fn move_next(&mut self) {
        self.inner.move_next();
    }

    /// Removes the entry under the cursor and moves to the next one.
    pub fn remove_current(&mut self) -> Option<(K, V)> {
        self.inner.remove_current()
    }

    /// Removes up to `n` entries from the cursor on. Returns how many were
    /// removed.
    pub fn remove_n(&mut self, n: usize) -> usize {
        self.inner.remove_n(n)
    }

    /// Removes every entry from the cursor to its end.
    pub fn remove_rest(&mut self) -> usize {
        self.inner.remove_rest()
    }
}

/// An iterator over the entries of a [`HashMap`].
pub struct Iter<'a, K, V, H> {
    inner: hash_table::Iter<'a, (K, V), H>,
}

impl<K, V, H> Clone for Iter<'_, K, V, H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V, H> Iterator for Iter<'a, K, V, H> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, H> ExactSizeIterator for Iter<'_, K, V, H> {}
impl<K, V, H> FusedIterator for Iter<'_, K, V, H> {}

/// A mutable iterator over the entries of a [`HashMap`].
pub struct IterMut<'a, K, V, H> {
    inner: hash_table::IterMut<'a, (K, V), H>,
}

impl<'a, K, V, H> Iterator for IterMut<'a, K, V, H> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (&*k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, H> ExactSizeIterator for IterMut<'_, K, V, H> {}
impl<K, V, H> FusedIterator for IterMut<'_, K, V, H> {}

/// An iterator over the keys of a [`HashMap`].
pub struct Keys<'a, K, V, H> {
    inner: hash_table::Iter<'a, (K, V), H>,
}

impl<'a, K, V, H> Iterator for Keys<'a, K, V, H> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, H> ExactSizeIterator for Keys<'_, K, V, H> {}
impl<K, V, H> FusedIterator for Keys<'_, K, V, H> {}

/// An iterator over the values of a [`HashMap`].
pub struct Values<'a, K, V, H> {
    inner: hash_table::Iter<'a, (K, V), H>,
}

impl<'a, K, V, H> Iterator for Values<'a, K, V, H> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, H> ExactSizeIterator for Values<'_, K, V, H> {}
impl<K, V, H> FusedIterator for Values<'_, K, V, H> {}

/// A mutable iterator over the values of a [`HashMap`].
pub struct ValuesMut<'a, K, V, H> {
    inner: hash_table::IterMut<'a, (K, V), H>,
}

impl<'a, K, V, H> Iterator for ValuesMut<'a, K, V, H> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, H> ExactSizeIterator for ValuesMut<'_, K, V, H> {}
impl<K, V, H> FusedIterator for ValuesMut<'_, K, V, H> {}

/// A draining iterator over the entries of a [`HashMap`].
pub struct Drain<'a, K, V, H> {
    inner: hash_table::Drain<'a, (K, V), H>,
}

impl<K, V, H> Iterator for Drain<'_, K, V, H> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, H> ExactSizeIterator for Drain<'_, K, V, H> {}
impl<K, V, H> FusedIterator for Drain<'_, K, V, H> {}

/// An owning iterator over the entries of a [`HashMap`].
pub struct IntoIter<K, V, H> {
    inner: hash_table::IntoIter<(K, V), H>,
}

impl<K, V, H> Iterator for IntoIter<K, V, H> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, H> ExactSizeIterator for IntoIter<K, V, H> {}
impl<K, V, H> FusedIterator for IntoIter<K, V, H> {}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use core::hash::BuildHasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;
    use crate::hashing::FnvBuildHasher;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap_or(0),
                k2: rng.try_next_u64().unwrap_or(0),
            }
        }
    }

    type SipMap<K, V> = HashMap<K, V, u32, SipHashBuilder>;

    #[test]
    fn test_new_and_with_hasher() {
        let map: HashMap<i32, String> = HashMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.capacity(), 32);

        let map2 = SipMap::<i32, String>::with_hasher(SipHashBuilder::default());
        assert!(map2.is_empty());
        assert_eq!(map2.capacity(), 32);
    }

    #[test]
    fn test_with_capacity() {
        let map: HashMap<i32, String> = HashMap::with_capacity(100);
        assert_eq!(map.capacity(), 128);
        assert!(map.is_empty());

        let map2 = SipMap::<i32, String>::with_capacity_and_hasher(200, SipHashBuilder::default());
        assert_eq!(map2.capacity(), 256);
    }

    #[test]
    fn fruit_scenario() {
        let mut map: HashMap<String, i32> = HashMap::with_capacity(32);
        map.insert("apple".to_string(), 1);
        map.insert("banana".to_string(), 2);
        map.insert("cherry".to_string(), 3);

        assert_eq!(map.len(), 3);
        assert_eq!(map.get("apple"), Some(&1));
        assert_eq!(map.get("missing"), None);
        assert_eq!(map.capacity(), 32);

        assert_eq!(map.remove("banana"), Some(2));
        assert_eq!(map.len(), 2);
        assert!(map.get("banana").is_none());
        assert_eq!(map.get("apple"), Some(&1));
        assert_eq!(map.get("cherry"), Some(&3));
    }

    #[test]
    fn test_insert_and_get() {
        let mut map = SipMap::with_hasher(SipHashBuilder::default());

        assert!(map.insert(1, "hello".to_string()));
        assert_eq!(map.len(), 1);
        assert!(!map.is_empty());

        assert_eq!(map.get(&1), Some(&"hello".to_string()));
        assert_eq!(map.get(&2), None);

        assert!(!map.insert(1, "world".to_string()));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&"hello".to_string()));
    }

    #[test]
    fn test_insert_or_assign() {
        let mut map = SipMap::with_hasher(SipHashBuilder::default());
        assert_eq!(map.insert_or_assign(1, "hello".to_string()), None);
        assert_eq!(
            map.insert_or_assign(1, "world".to_string()),
            Some("hello".to_string())
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1).map(String::as_str), Some("world"));
    }

    #[test]
    fn test_emplace_and_try_emplace() {
        let mut map: HashMap<&str, i32> = HashMap::new();
        *map.emplace_with("a", || 1) += 10;
        assert_eq!(map["a"], 11);
        assert_eq!(*map.emplace_with("a", || 5), 5);

        let (value, inserted) = map.try_emplace("b", || 7);
        assert!(inserted);
        assert_eq!(*value, 7);

        let mut calls = 0;
        let (value, inserted) = map.try_emplace("b", || {
            calls += 1;
            8
        });
        assert!(!inserted);
        assert_eq!(*value, 7);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_get_mut() {
        let mut map = SipMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "hello".to_string());

        if let Some(value) = map.get_mut(&1) {
            value.push_str(" world");
        }

        assert_eq!(map.get(&1), Some(&"hello world".to_string()));
        assert_eq!(map.get_mut(&2), None);
    }

    #[test]
    fn test_at() {
        let mut map: HashMap<String, i32> = HashMap::new();
        map.insert("x".to_string(), 1);
        assert_eq!(map.at("x"), Ok(&1));
        assert_eq!(map.at("y"), Err(KeyNotFound));

        *map.at_mut("x").unwrap() = 5;
        assert_eq!(map["x"], 5);
        assert!(map.at_mut("y").is_err());
    }

    #[test]
    #[should_panic(expected = "key not found")]
    fn index_missing_key_panics() {
        let map: HashMap<i32, i32> = HashMap::new();
        let _value = map[&1];
    }

    #[test]
    fn heterogeneous_lookup() {
        let mut map: HashMap<String, usize> = HashMap::new();
        map.insert("abc".to_string(), 1);

        let owned = String::from("abc");
        assert_eq!(map.get("abc"), map.get(&owned));
        assert_eq!(map.get_key_value("abc").map(|(k, _)| k.as_str()), Some("abc"));
        assert!(map.contains_key("abc"));
        assert_eq!(map.remove("abc"), Some(1));
        assert!(!map.contains_key(&owned));
    }

    #[test]
    fn test_remove() {
        let mut map = SipMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "hello".to_string());
        map.insert(2, "world".to_string());

        assert_eq!(map.remove(&1), Some("hello".to_string()));
        assert_eq!(map.len(), 1);
        assert!(!map.contains_key(&1));
        assert!(map.contains_key(&2));

        assert_eq!(map.remove(&1), None);
        assert_eq!(map.remove(&3), None);
        assert_eq!(map.remove_entry(&2), Some((2, "world".to_string())));
        assert!(map.is_empty());
    }

    #[test]
    fn test_entry_api() {
        let mut map = SipMap::with_hasher(SipHashBuilder::default());

        *map.entry("a").or_insert(0) += 1;
        *map.entry("a").or_insert(0) += 1;
        map.entry("b").or_insert_with_key(|k| k.len() as i32);
        map.entry("b").and_modify(|v| *v *= 10).or_insert(-1);

        assert_eq!(map.get("a"), Some(&2));
        assert_eq!(map.get("b"), Some(&10));

        match map.entry("a") {
            Entry::Occupied(mut entry) => {
                assert_eq!(entry.key(), &"a");
                assert_eq!(entry.insert(7), 2);
                assert_eq!(entry.remove_entry(), ("a", 7));
            }
            Entry::Vacant(_) => panic!("expected occupied"),
        }

        match map.entry("c") {
            Entry::Vacant(entry) => assert_eq!(entry.into_key(), "c"),
            Entry::Occupied(_) => panic!("expected vacant"),
        }
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_many_inserts_and_resize() {
        let mut map = SipMap::with_hasher(SipHashBuilder::default());
        for i in 0..5000 {
            map.insert(i, i * 2);
            assert!(map.len() * 100 < map.capacity() * 75);
        }
        assert_eq!(map.len(), 5000);
        for i in 0..5000 {
            assert_eq!(map.get(&i), Some(&(i * 2)));
        }
        for i in (0..5000).step_by(3) {
            assert_eq!(map.remove(&i), Some(i * 2));
        }
        for i in 0..5000 {
            assert_eq!(map.contains_key(&i), i % 3 != 0);
        }
    }

    #[test]
    fn test_reserve() {
        let mut map: HashMap<i32, i32> = HashMap::new();
        map.insert(1, 1);
        map.reserve(10);
        assert_eq!(map.capacity(), 32);
        map.reserve(1000);
        assert_eq!(map.capacity(), 1024);
        assert_eq!(map.get(&1), Some(&1));
    }

    #[test]
    fn custom_seeds_and_widths() {
        let hasher32 = DefaultHashBuilder::<u32>::with_seed(0xABCD_EF01);
        let mut narrow: HashMap<&str, i32> = HashMap::with_hasher(hasher32);
        let hasher64 = DefaultHashBuilder::<u64>::with_seed(0x1234_5678_9ABC_DEF0);
        let mut wide: HashMap<&str, i32, u64> = HashMap::with_hasher(hasher64);
        for (i, key) in ["one", "two", "three"].into_iter().enumerate() {
            narrow.insert(key, i as i32);
            wide.insert(key, i as i32);
        }
        assert_eq!(narrow.get("two"), Some(&1));
        assert_eq!(wide.get("three"), Some(&2));
        assert_eq!(wide.hasher().seed(), 0x1234_5678_9ABC_DEF0);
    }

    #[test]
    fn fnv_and_identity_like_hashers() {
        let mut fnv: HashMap<u64, u64, u64, FnvBuildHasher<u64>> = HashMap::default();
        for i in 0..1000 {
            fnv.insert(i, i + 1);
        }
        assert!((0..1000).all(|i| fnv.get(&i) == Some(&(i + 1))));

        let constant = core::hash::BuildHasherDefault::<ConstantHasher>::default();
        let mut degenerate: HashMap<u32, u32, u32, _> = HashMap::with_hasher(constant);
        for i in 0..200 {
            degenerate.insert(i, i);
        }
        assert_eq!(degenerate.len(), 200);
        assert!((0..200).all(|i| degenerate.get(&i) == Some(&i)));
        for i in 0..100 {
            assert_eq!(degenerate.remove(&i), Some(i));
        }
        assert!((100..200u32).all(|i| degenerate.contains_key(&i)));
    }

    #[derive(Default)]
    struct ConstantHasher;

    impl core::hash::Hasher for ConstantHasher {
        fn finish(&self) -> u64 {
            0
        }

        fn write(&mut self, _bytes: &[u8]) {}
    }

    #[test]
    fn test_iterators() {
        let mut map: HashMap<i32, i32> = (0..10).map(|i| (i, i * i)).collect();

        let mut pairs: Vec<(i32, i32)> = map.iter().map(|(&k, &v)| (k, v)).collect();
        pairs.sort_unstable();
        assert_eq!(pairs, (0..10).map(|i| (i, i * i)).collect::<Vec<_>>());

        let mut keys: Vec<i32> = map.keys().copied().collect();
        keys.sort_unstable();
        assert_eq!(keys, (0..10).collect::<Vec<_>>());

        for value in map.values_mut() {
            *value += 1;
        }
        for (_, value) in map.iter_mut() {
            *value *= 2;
        }
        let total: i32 = map.values().sum();
        assert_eq!(total, (0..10).map(|i| (i * i + 1) * 2).sum::<i32>());
        assert_eq!(map.iter().len(), 10);

        let mut owned: Vec<(i32, i32)> = map.clone().into_iter().collect();
        owned.sort_unstable();
        assert_eq!(owned.len(), 10);

        let drained: Vec<(i32, i32)> = map.drain().collect();
        assert_eq!(drained.len(), 10);
        assert!(map.is_empty());
        assert!(map.get(&1).is_none());
    }

    #[test]
    fn test_from_array_last_value_wins() {
        let map: HashMap<&str, i32> = HashMap::from([("a", 1), ("b", 2), ("a", 3)]);
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], 3);
    }

    #[test]
    fn test_equality_ignores_layout() {
        let a: HashMap<i32, i32> = (0..50).map(|i| (i, i)).collect();
        let mut b: HashMap<i32, i32> = HashMap::with_capacity(1024);
        for i in (0..50).rev() {
            b.insert(i, i);
        }
        assert_eq!(a, b);

        b.insert_or_assign(3, 4);
        assert_ne!(a, b);
        b.remove(&3);
        assert_ne!(a, b);
    }

    #[test]
    fn test_clone_and_swap() {
        let mut a: HashMap<i32, String> = HashMap::new();
        a.insert(1, "one".to_string());
        let mut b = a.clone();
        b.insert(2, "two".to_string());
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 2);

        a.swap(&mut b);
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 1);
        assert!(a.contains_key(&2));
    }

    #[test]
    fn test_clear_and_retain() {
        let mut map: HashMap<i32, i32> = (0..100).map(|i| (i, i)).collect();
        map.retain(|k, v| {
            *v += 1;
            k % 10 == 0
        });
        assert_eq!(map.len(), 10);
        assert_eq!(map.get(&20), Some(&21));

        let capacity = map.capacity();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.capacity(), capacity);
    }

    #[test]
    fn cursor_erases_all() {
        let mut map: HashMap<i32, i32> = (0..64).map(|i| (i, i)).collect();
        let mut cursor = map.cursor_mut();
        assert_eq!(cursor.remove_rest(), 64);
        assert!(map.is_empty());
    }

    #[test]
    fn cursor_erase_by_position() {
        let mut map: HashMap<i32, i32> = (0..64).map(|i| (i, i)).collect();
        let mut cursor = map.cursor_mut();
        let mut visited = 0;
        while let Some((&key, value)) = cursor.current_mut() {
            visited += 1;
            *value = -*value;
            if key % 2 == 0 {
                assert_eq!(cursor.remove_current().map(|(k, _)| k), Some(key));
            } else {
                cursor.move_next();
            }
        }
        assert_eq!(visited, 64);
        assert_eq!(map.len(), 32);
        assert!(map.iter().all(|(k, v)| k % 2 == 1 && *v == -k));
    }

    #[test]
    fn cursor_at_key() {
        let mut map: HashMap<i32, i32> = (0..16).map(|i| (i, i)).collect();
        assert!(map.cursor_mut_at(&99).is_none());

        let mut cursor = map.cursor_mut_at(&5).unwrap();
        assert_eq!(cursor.key(), Some(&5));
        assert_eq!(cursor.current(), Some((&5, &5)));
        assert_eq!(cursor.remove_n(1), 1);
        assert_eq!(map.len(), 15);
        assert!(!map.contains_key(&5));
    }

    #[test]
    fn debug_output() {
        let map: HashMap<i32, i32> = HashMap::from([(1, 2)]);
        assert_eq!(alloc::format!("{map:?}"), "{1: 2}");
    }

    #[test]
    fn stats_reflect_contents() {
        let map: HashMap<i32, i32> = (0..20).map(|i| (i, i)).collect();
        let stats = map.debug_stats();
        assert_eq!(stats.populated, 20);
        assert_eq!(map.probe_histogram().total(), 20);
    }

    struct OverstatedHint<I>(I);

    impl<I: Iterator> Iterator for OverstatedHint<I> {
        type Item = I::Item;

        fn next(&mut self) -> Option<Self::Item> {
            self.0.next()
        }

        fn size_hint(&self) -> (usize, Option<usize>) {
            (usize::MAX, None)
        }
    }

    #[test]
    fn extend_reserves_for_size_hint() {
        let mut map: HashMap<i32, i32> = HashMap::new();
        map.extend((0..100).map(|i| (i, i)));
        assert_eq!(map.len(), 100);
        assert_eq!(map.capacity(), 256);
    }

    #[test]
    fn extend_ignores_oversized_hint() {
        let mut map: HashMap<i32, i32> = HashMap::from([(0, 0)]);
        map.extend(OverstatedHint((1..4).map(|i| (i, i))));
        assert_eq!(map.len(), 4);
        assert_eq!(map.capacity(), 32);
        assert!((0..4).all(|i| map.get(&i) == Some(&i)));
    }
}

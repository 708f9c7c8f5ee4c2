//! An immutable map with single-probe lookups, built with
//! Compress-Hash-Displace (CHD).
//!
//! Keys are grouped into buckets by the low bits of their hash. Buckets are
//! placed largest first: a bucket holding one key goes to its home slot,
//! while a larger bucket searches for a displacement seed that scatters all
//! of its keys to free slots at once. Lookups read the bucket's seed and go
//! straight to the one slot the key can occupy.

use alloc::vec::Vec;
use core::cmp::Reverse;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::iter::FusedIterator;
use core::marker::PhantomData;

use crate::error::BuildError;
use crate::error::KeyNotFound;
use crate::hash_table::Entry;
use crate::hash_table::HashTable;
use crate::hashing::DefaultHashBuilder;
use crate::hashing::Equivalent;
use crate::hashing::HashWidth;
use crate::hashing::make_hash;

/// Seeds tried for one bucket before the build grows the table.
pub const MAX_SEED_ATTEMPTS: u64 = 1 << 16;

/// Number of times a build may double the table before giving up.
pub const MAX_TABLE_GROWTH: u32 = 4;

/// An immutable hash map with a perfect hash function for its key set.
///
/// Built once from a list of distinct keys; every lookup then costs one hash,
/// one seed read, and one key comparison. The table has
/// `next_power_of_two(n) * 2` slots for `n` keys.
///
/// # Examples
///
/// ```rust
/// use hood_hash::PerfectHashMap;
///
/// let colors = PerfectHashMap::new(vec![("red", 1), ("green", 2), ("blue", 3)])?;
/// assert_eq!(colors.count(), 3);
/// assert_eq!(colors.size(), 8);
/// assert_eq!(colors.at("red"), Ok(&1));
/// assert!(!colors.contains_key("yellow"));
/// # Ok::<(), hood_hash::BuildError>(())
/// ```
#[derive(Clone)]
pub struct PerfectHashMap<K, V, H: HashWidth = u32, S = DefaultHashBuilder<H>> {
    entries: Vec<Option<(K, V)>>,
    seeds: Vec<i64>,
    len: usize,
    hash_builder: S,
    _width: PhantomData<H>,
}

impl<K, V> PerfectHashMap<K, V>
where
    K: Hash + Eq,
{
    /// Builds a map from `items` with the default 32-bit hasher.
    ///
    /// Fails with [`BuildError::DuplicateKey`] if a key appears twice.
    pub fn new(items: Vec<(K, V)>) -> Result<Self, BuildError> {
        Self::with_hasher(items, DefaultHashBuilder::default())
    }
}

impl<K, V, H, S> PerfectHashMap<K, V, H, S>
where
    K: Hash + Eq,
    H: HashWidth,
    S: BuildHasher,
{
    /// Builds a map from `items`, hashing keys with `hash_builder`.
    ///
    /// # Errors
    ///
    /// - [`BuildError::DuplicateKey`] if a key appears twice. Checked before
    ///   any placement work.
    /// - [`BuildError::HashCollision`] if two distinct keys hash to the same
    ///   value. A wider hash or another seed avoids this.
    /// - [`BuildError::Unplaceable`] if a bucket finds no seed even after the
    ///   table has been grown [`MAX_TABLE_GROWTH`] times.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hood_hash::PerfectHashMap;
    /// use hood_hash::hashing::DefaultHashBuilder;
    ///
    /// let items: Vec<(u64, u64)> = (0..10_000).map(|i| (i, i * i)).collect();
    /// let hasher = DefaultHashBuilder::<u64>::with_seed(0x1234_5678_9ABC_DEF0);
    /// let squares: PerfectHashMap<u64, u64, u64> = PerfectHashMap::with_hasher(items, hasher)?;
    /// assert_eq!(squares.get(&99), Some(&9801));
    /// assert_eq!(squares.get(&10_000), None);
    /// # Ok::<(), hood_hash::BuildError>(())
    /// ```
    pub fn with_hasher(items: Vec<(K, V)>, hash_builder: S) -> Result<Self, BuildError> {
        Self::build(items, hash_builder, MAX_SEED_ATTEMPTS)
    }

    fn build(
        items: Vec<(K, V)>,
        hash_builder: S,
        max_seed_attempts: u64,
    ) -> Result<Self, BuildError> {
        let hashes: Vec<H> = items
            .iter()
            .map(|(key, _)| make_hash(&hash_builder, key))
            .collect();
        reject_duplicates(&items, &hashes)?;

        if items.is_empty() {
            return Ok(Self {
                entries: Vec::new(),
                seeds: Vec::new(),
                len: 0,
                hash_builder,
                _width: PhantomData,
            });
        }

        let len = items.len();
        let mut table_size = len.next_power_of_two() * 2;
        let mut growth = 0;
        let placement = loop {
            match place(&hashes, table_size, max_seed_attempts) {
                Ok(placement) => break placement,
                Err(BuildError::Unplaceable { bucket_len, .. }) if growth < MAX_TABLE_GROWTH => {
                    log::debug!(
                        "no seed for a bucket of {bucket_len} keys in {table_size} slots, retrying with {}",
                        table_size * 2
                    );
                    table_size *= 2;
                    growth += 1;
                }
                Err(err) => {
                    log::warn!("perfect hash build of {len} keys failed: {err}");
                    return Err(err);
                }
            }
        };

        let mut entries = Vec::with_capacity(table_size);
        entries.resize_with(table_size, || None);
        for (item, slot) in items.into_iter().zip(placement.slots) {
            entries[slot] = Some(item);
        }

        log::debug!("built perfect hash table: {len} keys in {table_size} slots");
        Ok(Self {
            entries,
            seeds: placement.seeds,
            len,
            hash_builder,
            _width: PhantomData,
        })
    }

    /// Returns a reference to the value for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and value for `key`.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        let slot = self.slot_of(key)?;
        self.entries[slot].as_ref().map(|(k, v)| (k, v))
    }

    /// Returns the value for `key`, or [`KeyNotFound`] if it is absent.
    pub fn at<Q>(&self, key: &Q) -> Result<&V, KeyNotFound>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.get(key).ok_or(KeyNotFound)
    }

    /// Returns `true` if `key` was part of the build input.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.slot_of(key).is_some()
    }

    fn slot_of<Q>(&self, key: &Q) -> Option<usize>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        let table_size = self.entries.len();
        if table_size == 0 {
            return None;
        }

        let hash: H = make_hash(&self.hash_builder, key);
        let seed = self.seeds[hash.low_bits(table_size - 1)];
        let slot = if seed < 0 {
            (-(seed + 1)) as usize
        } else {
            H::seed_mix(seed as u64, hash, table_size)
        };

        match &self.entries[slot] {
            Some((k, _)) if key.equivalent(k) => Some(slot),
            _ => None,
        }
    }
}

impl<K, V, H, S> PerfectHashMap<K, V, H, S>
where
    H: HashWidth,
{
    /// Number of slots in the table.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Number of keys in the map.
    pub fn count(&self) -> usize {
        self.len
    }

    /// Number of keys in the map. Same as [`count`](Self::count).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map was built from no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns an iterator over the entries, in slot order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            entries: self.entries.iter(),
            remaining: self.len,
        }
    }

    /// Returns an iterator over the keys, in slot order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Returns an iterator over the values, in slot order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }
}

impl<K, V, H, S> PartialEq for PerfectHashMap<K, V, H, S>
where
    K: Hash + Eq,
    V: PartialEq,
    H: HashWidth,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|other_v| v == other_v))
    }
}

impl<K, V, H, S> Eq for PerfectHashMap<K, V, H, S>
where
    K: Hash + Eq,
    V: Eq,
    H: HashWidth,
    S: BuildHasher,
{
}

impl<K, V, H, S> Debug for PerfectHashMap<K, V, H, S>
where
    K: Debug,
    V: Debug,
    H: HashWidth,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, H, S> TryFrom<Vec<(K, V)>> for PerfectHashMap<K, V, H, S>
where
    K: Hash + Eq,
    H: HashWidth,
    S: BuildHasher + Default,
{
    type Error = BuildError;

    fn try_from(items: Vec<(K, V)>) -> Result<Self, Self::Error> {
        Self::with_hasher(items, S::default())
    }
}

impl<K, V, H, S, const N: usize> TryFrom<[(K, V); N]> for PerfectHashMap<K, V, H, S>
where
    K: Hash + Eq,
    H: HashWidth,
    S: BuildHasher + Default,
{
    type Error = BuildError;

    fn try_from(items: [(K, V); N]) -> Result<Self, Self::Error> {
        Self::with_hasher(Vec::from(items), S::default())
    }
}

impl<'a, K, V, H: HashWidth, S> IntoIterator for &'a PerfectHashMap<K, V, H, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the entries of a [`PerfectHashMap`].
pub struct Iter<'a, K, V> {
    entries: core::slice::Iter<'a, Option<(K, V)>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let (k, v) = self.entries.by_ref().flatten().next()?;
        self.remaining -= 1;
        Some((k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

fn reject_duplicates<K: Eq, V, H: HashWidth>(
    items: &[(K, V)],
    hashes: &[H],
) -> Result<(), BuildError> {
    let mut seen: HashTable<usize, H> = HashTable::with_capacity(items.len() * 2);
    for (index, ((key, _), &hash)) in items.iter().zip(hashes).enumerate() {
        match seen.entry(hash, |&other| items[other].0 == *key) {
            Entry::Occupied(_) => return Err(BuildError::DuplicateKey { index }),
            Entry::Vacant(entry) => {
                entry.insert(index);
            }
        }
    }
    Ok(())
}

struct Placement {
    /// Per home bucket: `-(slot + 1)` for a single key, the displacement seed
    /// otherwise, `0` when empty.
    seeds: Vec<i64>,
    /// Final slot of each input item.
    slots: Vec<usize>,
}

fn place<H: HashWidth>(
    hashes: &[H],
    table_size: usize,
    max_seed_attempts: u64,
) -> Result<Placement, BuildError> {
    let mask = table_size - 1;
    let mut buckets: Vec<Vec<usize>> = Vec::with_capacity(table_size);
    buckets.resize_with(table_size, Vec::new);
    for (item, hash) in hashes.iter().enumerate() {
        buckets[hash.low_bits(mask)].push(item);
    }

    let mut order: Vec<usize> = (0..table_size)
        .filter(|&home| !buckets[home].is_empty())
        .collect();
    order.sort_by_key(|&home| Reverse(buckets[home].len()));

    let mut seeds = alloc::vec![0i64; table_size];
    let mut taken = alloc::vec![false; table_size];
    let mut slots = alloc::vec![0usize; hashes.len()];
    let mut candidates = Vec::new();

    for home in order {
        let members = &buckets[home];
        if let &[item] = members.as_slice() {
            taken[home] = true;
            slots[item] = home;
            seeds[home] = -(home as i64 + 1);
            continue;
        }

        if let Some((first, second)) = identical_hashes(members, hashes) {
            return Err(BuildError::HashCollision { first, second });
        }

        let seed = find_seed(
            members,
            hashes,
            &buckets,
            &taken,
            max_seed_attempts,
            &mut candidates,
        )
        .ok_or(BuildError::Unplaceable {
            bucket_len: members.len(),
            table_size,
        })?;

        for (&item, &slot) in members.iter().zip(&candidates) {
            taken[slot] = true;
            slots[item] = slot;
        }
        seeds[home] = seed as i64;
    }

    Ok(Placement { seeds, slots })
}

/// First seed that sends every member to a distinct slot that is neither
/// taken nor the home of a single-key bucket. Leaves the chosen slots in
/// `candidates`.
fn find_seed<H: HashWidth>(
    members: &[usize],
    hashes: &[H],
    buckets: &[Vec<usize>],
    taken: &[bool],
    max_seed_attempts: u64,
    candidates: &mut Vec<usize>,
) -> Option<u64> {
    let table_size = buckets.len();
    'seeds: for seed in 1..=max_seed_attempts {
        candidates.clear();
        for &item in members {
            let slot = H::seed_mix(seed, hashes[item], table_size);
            if taken[slot] || buckets[slot].len() == 1 || candidates.contains(&slot) {
                continue 'seeds;
            }
            candidates.push(slot);
        }
        return Some(seed);
    }
    None
}

fn identical_hashes<H: HashWidth>(members: &[usize], hashes: &[H]) -> Option<(usize, usize)> {
    members.iter().enumerate().find_map(|(i, &first)| {
        members[i + 1..]
            .iter()
            .find(|&&second| hashes[first] == hashes[second])
            .map(|&second| (first, second))
    })
}

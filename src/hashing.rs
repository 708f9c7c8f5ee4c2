use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hasher;

mod sealed {
    pub trait Sealed {}

    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// The integer width of the hashes cached by the tables in this crate.
///
/// Implemented for `u32` and `u64` only. Every table stores one hash of this
/// width per element, so `u32` keeps the table compact while `u64` makes full
/// hash collisions between distinct keys vanishingly rare, which matters for
/// very large [`PerfectHashMap`](crate::PerfectHashMap) builds.
pub trait HashWidth: sealed::Sealed + Copy + Eq + Debug + Send + Sync + 'static {
    /// The FNV-1a offset basis at this width. Also the default hasher seed.
    const FNV_OFFSET_BASIS: Self;
    /// The FNV-1a prime at this width.
    const FNV_PRIME: Self;

    /// Folds a 64-bit [`Hasher::finish`] output down to this width.
    fn from_u64(hash: u64) -> Self;

    /// Widens this hash back to a `u64`.
    fn to_u64(self) -> u64;

    /// Returns `self & mask` as an index.
    fn low_bits(self, mask: usize) -> usize;

    /// One FNV-1a round: xor in `byte`, then multiply by the prime.
    fn fnv_round(self, byte: u8) -> Self;

    /// Mixes `seed` into `hash` and reduces the result to `[0, table_size)`.
    ///
    /// `table_size` must be a non-zero power of two.
    fn seed_mix(seed: u64, hash: Self, table_size: usize) -> usize;
}

impl HashWidth for u32 {
    const FNV_OFFSET_BASIS: Self = 0x811C_9DC5;
    const FNV_PRIME: Self = 0x0100_0193;

    #[inline]
    fn from_u64(hash: u64) -> Self {
        (hash ^ (hash >> 32)) as u32
    }

    #[inline]
    fn to_u64(self) -> u64 {
        self as u64
    }

    #[inline]
    fn low_bits(self, mask: usize) -> usize {
        self as usize & mask
    }

    #[inline]
    fn fnv_round(self, byte: u8) -> Self {
        (self ^ byte as u32).wrapping_mul(Self::FNV_PRIME)
    }

    #[inline]
    fn seed_mix(seed: u64, hash: Self, table_size: usize) -> usize {
        // murmur3 fmix32
        let mut x = hash ^ (seed as u32).wrapping_mul(0x9E37_79B9);
        x ^= x >> 16;
        x = x.wrapping_mul(0x85EB_CA6B);
        x ^= x >> 13;
        x = x.wrapping_mul(0xC2B2_AE35);
        x ^= x >> 16;
        x as usize & (table_size - 1)
    }
}

impl HashWidth for u64 {
    const FNV_OFFSET_BASIS: Self = 0xCBF2_9CE4_8422_2325;
    const FNV_PRIME: Self = 0x0000_0100_0000_01B3;

    #[inline]
    fn from_u64(hash: u64) -> Self {
        hash
    }

    #[inline]
    fn to_u64(self) -> u64 {
        self
    }

    #[inline]
    fn low_bits(self, mask: usize) -> usize {
        self as usize & mask
    }

    #[inline]
    fn fnv_round(self, byte: u8) -> Self {
        (self ^ byte as u64).wrapping_mul(Self::FNV_PRIME)
    }

    #[inline]
    fn seed_mix(seed: u64, hash: Self, table_size: usize) -> usize {
        // splitmix64 finalizer
        let mut x = hash ^ seed.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        x ^= x >> 31;
        x as usize & (table_size - 1)
    }
}

/// Mixes a displacement seed into a hash, producing a slot in
/// `[0, table_size)`.
///
/// This is the slot function used by [`PerfectHashMap`] for multi-key
/// buckets. Different seeds scatter the same set of hashes to independent
/// slots.
///
/// # Examples
///
/// ```rust
/// use hood_hash::hashing::seed_mix;
///
/// let slot = seed_mix::<u32>(7, 0xDEAD_BEEF, 64);
/// assert!(slot < 64);
/// assert_eq!(slot, seed_mix::<u32>(7, 0xDEAD_BEEF, 64));
/// ```
///
/// [`PerfectHashMap`]: crate::PerfectHashMap
#[inline]
pub fn seed_mix<H: HashWidth>(seed: u64, hash: H, table_size: usize) -> usize {
    debug_assert!(table_size.is_power_of_two());
    H::seed_mix(seed, hash, table_size)
}

/// Hashes `key` with `hash_builder` and folds the result to width `H`.
#[inline]
pub(crate) fn make_hash<H, S, Q>(hash_builder: &S, key: &Q) -> H
where
    H: HashWidth,
    S: BuildHasher,
    Q: ?Sized + core::hash::Hash,
{
    H::from_u64(hash_builder.hash_one(key))
}

/// Key equivalence used by lookups.
///
/// Lets a table keyed by `K` be queried with any `Q` that hashes the same way
/// and can be compared against a stored `K`. The blanket implementation covers
/// every `Borrow` relationship, so a `HashMap<String, _>` can be queried with
/// a `&str` without allocating.
pub trait Equivalent<K: ?Sized> {
    /// Returns `true` if `self` is equal to the stored `key`.
    fn equivalent(&self, key: &K) -> bool;
}

impl<Q, K> Equivalent<K> for Q
where
    Q: ?Sized + Eq,
    K: ?Sized + Borrow<Q>,
{
    #[inline]
    fn equivalent(&self, key: &K) -> bool {
        PartialEq::eq(self, key.borrow())
    }
}

/// An FNV-1a [`Hasher`] producing hashes of width `H`.
#[derive(Clone, Copy, Debug)]
pub struct FnvHasher<H: HashWidth = u32> {
    state: H,
}

impl<H: HashWidth> FnvHasher<H> {
    /// Creates a hasher starting from `seed`.
    pub const fn with_seed(seed: H) -> Self {
        Self { state: seed }
    }
}

impl<H: HashWidth> Default for FnvHasher<H> {
    fn default() -> Self {
        Self::with_seed(H::FNV_OFFSET_BASIS)
    }
}

impl<H: HashWidth> Hasher for FnvHasher<H> {
    #[inline]
    fn finish(&self) -> u64 {
        self.state.to_u64()
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state = self.state.fnv_round(byte);
        }
    }
}

/// Builds seeded [`FnvHasher`]s.
///
/// Fully deterministic and portable: the same seed and key always produce the
/// same hash, on every platform and every run.
///
/// # Examples
///
/// ```rust
/// use core::hash::BuildHasher;
///
/// use hood_hash::hashing::FnvBuildHasher;
///
/// let fnv = FnvBuildHasher::<u64>::default();
/// // FNV-1a of the empty input is the offset basis.
/// assert_eq!(fnv.hash_one(()), 0xCBF2_9CE4_8422_2325);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FnvBuildHasher<H: HashWidth = u32> {
    seed: H,
}

impl<H: HashWidth> FnvBuildHasher<H> {
    /// Creates a builder whose hashers start from `seed`.
    pub const fn with_seed(seed: H) -> Self {
        Self { seed }
    }

    /// The seed every built hasher starts from.
    pub fn seed(&self) -> H {
        self.seed
    }
}

impl<H: HashWidth> Default for FnvBuildHasher<H> {
    fn default() -> Self {
        Self::with_seed(H::FNV_OFFSET_BASIS)
    }
}

impl<H: HashWidth> BuildHasher for FnvBuildHasher<H> {
    type Hasher = FnvHasher<H>;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        FnvHasher::with_seed(self.seed)
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        type SeededState = foldhash::fast::FixedState;

        fn seeded_state(seed: u64) -> SeededState {
            foldhash::fast::FixedState::with_seed(seed)
        }
    } else {
        type SeededState = FnvBuildHasher<u64>;

        fn seeded_state(seed: u64) -> SeededState {
            FnvBuildHasher::with_seed(seed)
        }
    }
}

/// The hasher builder used when none is specified.
///
/// Deterministic for a given seed. The default seed is the FNV offset basis
/// of the selected width. With the `foldhash` feature (on by default) keys are
/// hashed with foldhash; otherwise with 64-bit FNV-1a.
///
/// # Examples
///
/// ```rust
/// use core::hash::BuildHasher;
///
/// use hood_hash::hashing::DefaultHashBuilder;
///
/// let a = DefaultHashBuilder::<u64>::with_seed(0x1234_5678_9ABC_DEF0);
/// let b = DefaultHashBuilder::<u64>::with_seed(0x1234_5678_9ABC_DEF0);
/// assert_eq!(a.hash_one("key"), b.hash_one("key"));
/// ```
#[derive(Clone)]
pub struct DefaultHashBuilder<H: HashWidth = u32> {
    seed: H,
    state: SeededState,
}

impl<H: HashWidth> DefaultHashBuilder<H> {
    /// Creates a builder seeded with `seed`.
    pub fn with_seed(seed: H) -> Self {
        Self {
            seed,
            state: seeded_state(seed.to_u64()),
        }
    }

    /// The seed this builder was created with.
    pub fn seed(&self) -> H {
        self.seed
    }
}

impl<H: HashWidth> Default for DefaultHashBuilder<H> {
    fn default() -> Self {
        Self::with_seed(H::FNV_OFFSET_BASIS)
    }
}

impl<H: HashWidth> Debug for DefaultHashBuilder<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DefaultHashBuilder")
            .field("seed", &self.seed)
            .finish()
    }
}

impl<H: HashWidth> BuildHasher for DefaultHashBuilder<H> {
    type Hasher = <SeededState as BuildHasher>::Hasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        self.state.build_hasher()
    }
}

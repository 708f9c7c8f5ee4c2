#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod error;

/// A HashMap implementation using Robin Hood hashing.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a standard key-value map interface with configurable hashers and hash
/// widths.
pub mod hash_map;

/// A hash set implementation using Robin Hood hashing.
///
/// This module provides a `HashSet` that wraps the `HashTable` and provides
/// a standard set interface with configurable hashers and hash widths.
pub mod hash_set;

pub mod hash_table;

/// Hash widths, hasher builders, and key equivalence.
///
/// Every table caches one hash per element, `u32` or `u64` wide. The default
/// hasher builder is seeded and deterministic, so two builds from the same
/// seed lay out identically.
pub mod hashing;

pub mod perfect_hash_map;

pub use error::BuildError;
pub use error::KeyNotFound;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
pub use hashing::DefaultHashBuilder;
pub use hashing::Equivalent;
pub use hashing::HashWidth;
pub use perfect_hash_map::PerfectHashMap;

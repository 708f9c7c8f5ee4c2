//! Error types returned by the tables in this crate.
//!
//! A missing key is usually not an error: lookups return `Option` and
//! removals return `Option` or `bool`. The types here cover the two cases
//! where failure has to be reported explicitly.

use thiserror::Error;

/// Returned by the checked accessors (`at`, `at_mut`) when the key is absent.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("key not found")]
pub struct KeyNotFound;

/// Failure to build a [`PerfectHashMap`](crate::PerfectHashMap).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// The input contained the same key more than once.
    #[error("duplicate key at input position {index}")]
    DuplicateKey {
        /// Position of the repeated occurrence in the input.
        index: usize,
    },

    /// Two distinct keys produced the same full-width hash, so no
    /// displacement seed can ever separate them. Building with a `u64` hash
    /// width or a different seed avoids this.
    #[error("keys at input positions {first} and {second} have identical hashes")]
    HashCollision {
        /// Position of the first key.
        first: usize,
        /// Position of the second key.
        second: usize,
    },

    /// No collision-free seed was found for a bucket, even after growing the
    /// table.
    #[error("no collision-free seed for a bucket of {bucket_len} keys in a table of {table_size} slots")]
    Unplaceable {
        /// Number of keys in the bucket that could not be placed.
        bucket_len: usize,
        /// Table size at the final attempt.
        table_size: usize,
    },
}

//! # Cuckoo Filter
//!
//! This implementation is based on the paper _Cuckoo Filter: Practically Better Than Bloom_, by Fan et. al.
//!
//! We use a (2, 4) CF: 2 candidate buckets for each item, and 4 one-byte fingerprints in each bucket. The partner bucket is `index ^ mix(fingerprint)`, so either candidate can be recovered from the other plus the fingerprint. That is what lets us relocate a fingerprint without knowing which item it came from.

use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::bucket::{Bucket, BUCKET_SIZE};
use crate::config::FilterConfig;
use crate::hash::{self, DefaultIdentityHasher, Fingerprint};

type BucketIndex = usize;

/// Relocation budget for a single insert
pub const MAX_KICKS: usize = 500;
/// Upper bound on the number of buckets
pub const MAX_CAPACITY: usize = 1 << 30;

/// Possible errors for the Cuckoo Filter
#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
pub enum CuckooFilterError {
    /// Requested capacity at initialization was zero
    #[error("requested capacity must be greater than zero")]
    ZeroCapacity,
    /// Too many collisions, the relocation budget ran out
    #[error("filter is out of space, relocation budget exhausted")]
    OutOfSpace,
    /// For `try_insert_unique`, when item already exists
    #[error("item already exists in the filter")]
    ItemAlreadyExists,
    /// For `try_delete`, when item doesn't exist
    #[error("item does not exist in the filter")]
    ItemDoesNotExist,
}

/// Round `requested` up to the next power of two, clamped to [`MAX_CAPACITY`]
///
/// The bucket count must be a power of two so that `hash & (capacity - 1)` is a uniform index.
pub fn table_size_for(requested: usize) -> usize {
    if requested >= MAX_CAPACITY {
        return MAX_CAPACITY;
    }
    // Smear the highest set bit of (n - 1) into every lower bit
    let mut n = requested.saturating_sub(1) as u32;
    n |= n >> 1;
    n |= n >> 2;
    n |= n >> 4;
    n |= n >> 8;
    n |= n >> 16;
    n as usize + 1
}

/// Approximate membership filter for items of type `T`
///
/// - `S` turns an item into its identity hash. Equal items must hash equally, otherwise lookups can miss.
/// - `R` drives the random walk on insert. Seed it to make the filter's layout reproducible.
///
/// The filter is not synchronized. Wrap it in a lock (including `insert_unique`, which is a check-then-act) if several threads need it.
pub struct CuckooFilter<T: ?Sized, S = DefaultIdentityHasher, R = ChaCha8Rng> {
    buckets: Vec<Bucket>,
    size: usize,
    build_hasher: S,
    rng: R,
    _item: PhantomData<fn(&T)>,
}

impl<T: Hash + ?Sized> CuckooFilter<T> {
    /// Create a filter with at least `capacity` buckets, seeding relocation from OS entropy
    pub fn new(capacity: usize) -> Result<Self, CuckooFilterError> {
        Self::with_hasher_and_rng(
            capacity,
            DefaultIdentityHasher::default(),
            ChaCha8Rng::from_entropy(),
        )
    }

    /// Create a filter whose relocation choices are fully determined by `seed`
    pub fn with_seed(capacity: usize, seed: u64) -> Result<Self, CuckooFilterError> {
        Self::with_hasher_and_rng(
            capacity,
            DefaultIdentityHasher::default(),
            ChaCha8Rng::seed_from_u64(seed),
        )
    }

    pub fn from_config(config: &FilterConfig) -> Result<Self, CuckooFilterError> {
        config.validate()?;
        match config.seed {
            Some(seed) => Self::with_seed(config.capacity, seed),
            None => Self::new(config.capacity),
        }
    }
}

impl<T, S, R> CuckooFilter<T, S, R>
where
    T: Hash + ?Sized,
    S: BuildHasher,
    R: Rng,
{
    /// Create a filter with an injected identity hasher and random source
    ///
    /// The table is allocated once here and never resized.
    pub fn with_hasher_and_rng(
        capacity: usize,
        build_hasher: S,
        rng: R,
    ) -> Result<Self, CuckooFilterError> {
        if capacity == 0 {
            return Err(CuckooFilterError::ZeroCapacity);
        }
        let normalized = table_size_for(capacity);
        debug!(requested = capacity, buckets = normalized, "allocating cuckoo filter");
        Ok(CuckooFilter {
            buckets: vec![Bucket::new(); normalized],
            size: 0,
            build_hasher,
            rng,
            _item: PhantomData,
        })
    }

    /// Add item to filter. False means the filter is (probabilistically) full
    ///
    /// Inserting an item twice stores two fingerprints.
    pub fn insert(&mut self, item: &T) -> bool {
        self.try_insert(item).is_ok()
    }

    /// Add item to filter, reporting why it failed
    ///
    /// A failed insert is not rolled back: the new fingerprint stays somewhere on the kick path and the last displaced fingerprint is dropped instead. Size is unchanged and the filter stays consistent, but one previously inserted item may no longer be found.
    pub fn try_insert(&mut self, item: &T) -> Result<(), CuckooFilterError> {
        let (fingerprint, candidate_1, candidate_2) = self.candidates(item);

        if self.buckets[candidate_1].insert(fingerprint)
            || self.buckets[candidate_2].insert(fingerprint)
        {
            self.size += 1;
            return Ok(());
        }

        // Both candidates are full, begin eviction process
        self.relocate_and_insert(candidate_1, candidate_2, fingerprint)
    }

    /// Add item only if it isn't already (possibly) present
    pub fn insert_unique(&mut self, item: &T) -> bool {
        self.try_insert_unique(item).is_ok()
    }

    pub fn try_insert_unique(&mut self, item: &T) -> Result<(), CuckooFilterError> {
        if self.contains(item) {
            return Err(CuckooFilterError::ItemAlreadyExists);
        }
        self.try_insert(item)
    }

    /// Check if item is (possibly) in filter
    pub fn contains(&self, item: &T) -> bool {
        let (fingerprint, candidate_1, candidate_2) = self.candidates(item);
        self.buckets[candidate_1].contains(fingerprint)
            || self.buckets[candidate_2].contains(fingerprint)
    }

    /// Delete an item from the filter
    ///
    /// Only delete items that were actually inserted. Deleting anything else can remove a fingerprint that belongs to a different item.
    pub fn delete(&mut self, item: &T) -> bool {
        self.try_delete(item).is_ok()
    }

    pub fn try_delete(&mut self, item: &T) -> Result<(), CuckooFilterError> {
        let (fingerprint, candidate_1, candidate_2) = self.candidates(item);
        if self.buckets[candidate_1].delete(fingerprint)
            || self.buckets[candidate_2].delete(fingerprint)
        {
            self.size -= 1;
            return Ok(());
        }
        Err(CuckooFilterError::ItemDoesNotExist)
    }

    /// Fingerprint and both candidate buckets for an item
    fn candidates(&self, item: &T) -> (Fingerprint, BucketIndex, BucketIndex) {
        let identity = hash::identity_hash(&self.build_hasher, item);
        let fingerprint = hash::fingerprint(identity);
        let candidate_1 = hash::index_mix(identity) as usize & self.mask();
        let candidate_2 = self.partner_index(candidate_1, fingerprint);
        (fingerprint, candidate_1, candidate_2)
    }

    /// Random walk: kick a random resident out, move it to its other bucket, repeat
    fn relocate_and_insert(
        &mut self,
        candidate_1: BucketIndex,
        candidate_2: BucketIndex,
        mut fingerprint: Fingerprint,
    ) -> Result<(), CuckooFilterError> {
        let mut current = if self.rng.gen_bool(0.5) {
            candidate_1
        } else {
            candidate_2
        };

        for kick in 1..=MAX_KICKS {
            let position = self.rng.gen_range(0..BUCKET_SIZE);
            fingerprint = self.buckets[current].swap(position, fingerprint);
            current = self.partner_index(current, fingerprint);
            if self.buckets[current].insert(fingerprint) {
                self.size += 1;
                trace!(kicks = kick, "relocation succeeded");
                return Ok(());
            }
        }

        debug!(
            size = self.size,
            buckets = self.buckets.len(),
            dropped = fingerprint,
            "relocation budget exhausted"
        );
        Err(CuckooFilterError::OutOfSpace)
    }
}

impl<T: ?Sized, S, R> CuckooFilter<T, S, R> {
    /// Number of successful inserts minus successful deletes
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of buckets (always a power of two)
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn slot_count(&self) -> usize {
        self.buckets.len() * BUCKET_SIZE
    }

    /// Fraction of slots in use, in `[0, 1]`
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.slot_count() as f64
    }

    /// Approximately how many bytes is this CF using?
    pub fn estimate_size(&self) -> usize {
        self.buckets.len() * core::mem::size_of::<Bucket>()
    }

    /// Upper bound on the false positive rate once the filter is near full
    pub fn expected_false_positive_rate(&self) -> f64 {
        let fingerprint_space = (1usize << (8 * core::mem::size_of::<Fingerprint>())) as f64;
        ((2 * BUCKET_SIZE) as f64 / fingerprint_space).min(1.0)
    }

    /// Empty every bucket. The random source keeps its current state
    pub fn clear(&mut self) {
        self.buckets.fill(Bucket::new());
        self.size = 0;
    }

    fn mask(&self) -> usize {
        self.buckets.len() - 1
    }

    /// We can calculate the other bucket for a fingerprint without knowing the item
    ///
    /// This is Equation 2 in Section 3.1 of the paper
    fn partner_index(&self, index: BucketIndex, fingerprint: Fingerprint) -> BucketIndex {
        index ^ (hash::index_mix(u32::from(fingerprint)) as usize & self.mask())
    }

    #[cfg(test)]
    fn occupied_slots(&self) -> usize {
        self.buckets.iter().map(Bucket::len).sum()
    }
}

impl<T: ?Sized, S, R> fmt::Debug for CuckooFilter<T, S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CuckooFilter")
            .field("capacity", &self.capacity())
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/* -------------------- Unit Tests -------------------- */

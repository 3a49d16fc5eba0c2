//! Fixed-width fingerprint bucket

use crate::hash::{Fingerprint, EMPTY};

/// Each bucket holds 4 fingerprints
pub const BUCKET_SIZE: usize = 4;

/// An unordered multiset of up to [`BUCKET_SIZE`] fingerprints
///
/// Slots holding [`EMPTY`] are free. Duplicate fingerprints are allowed, since two distinct items can share a fingerprint and a bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct Bucket([Fingerprint; BUCKET_SIZE]);

impl Bucket {
    pub const fn new() -> Bucket {
        Bucket([EMPTY; BUCKET_SIZE])
    }

    /// Write `fingerprint` into the first free slot. False means the bucket was full
    pub fn insert(&mut self, fingerprint: Fingerprint) -> bool {
        for slot in self.0.iter_mut() {
            if *slot == EMPTY {
                *slot = fingerprint;
                return true;
            }
        }
        false
    }

    pub fn contains(&self, fingerprint: Fingerprint) -> bool {
        self.0.contains(&fingerprint)
    }

    /// Clear the first slot holding `fingerprint`. Only one copy is removed per call
    pub fn delete(&mut self, fingerprint: Fingerprint) -> bool {
        for slot in self.0.iter_mut() {
            if *slot == fingerprint {
                *slot = EMPTY;
                return true;
            }
        }
        false
    }

    /// Overwrite the slot at `position` and hand back what was there (the cuckoo mechanism)
    ///
    /// # Panics
    ///
    /// If `position >= BUCKET_SIZE`.
    pub fn swap(&mut self, position: usize, fingerprint: Fingerprint) -> Fingerprint {
        core::mem::replace(&mut self.0[position], fingerprint)
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.0.iter().filter(|&&slot| slot != EMPTY).count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&slot| slot == EMPTY)
    }

    pub fn is_full(&self) -> bool {
        !self.0.contains(&EMPTY)
    }
}

/* -------------------- Unit Tests -------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_until_full() {
        let mut bucket = Bucket::new();
        assert!(bucket.is_empty());
        for fp in 1..=BUCKET_SIZE as u8 {
            assert!(bucket.insert(fp));
        }
        assert!(bucket.is_full());
        assert!(!bucket.insert(9));
        assert!(!bucket.contains(9));
        assert_eq!(bucket.len(), BUCKET_SIZE);
    }

    #[test]
    fn insert_uses_first_free_slot() {
        let mut bucket = Bucket::new();
        for fp in [1, 2, 3] {
            assert!(bucket.insert(fp));
        }
        assert!(bucket.delete(2));
        assert!(bucket.insert(7));
        assert_eq!(bucket.swap(1, 7), 7);
    }

    #[test]
    fn duplicates_are_kept_and_deleted_one_at_a_time() {
        let mut bucket = Bucket::new();
        assert!(bucket.insert(5));
        assert!(bucket.insert(5));
        assert_eq!(bucket.len(), 2);
        assert!(bucket.delete(5));
        assert!(bucket.contains(5));
        assert!(bucket.delete(5));
        assert!(!bucket.contains(5));
        assert!(!bucket.delete(5));
    }

    #[test]
    fn swap_returns_previous_value() {
        let mut bucket = Bucket::new();
        assert_eq!(bucket.swap(3, 11), EMPTY);
        assert_eq!(bucket.swap(3, 12), 11);
        assert!(bucket.contains(12));
        assert!(!bucket.contains(11));
    }

    #[test]
    #[should_panic]
    fn swap_out_of_range_panics() {
        let mut bucket = Bucket::new();
        bucket.swap(BUCKET_SIZE, 1);
    }
}

//! Hashing primitives for the filter
//!
//! Items are reduced to a 32-bit identity hash by a caller-supplied [`BuildHasher`]. Two independent integer mixers then derive everything the filter needs from that identity hash: the fingerprint and the primary bucket index.

use core::hash::{BuildHasher, BuildHasherDefault, Hash, Hasher};
use std::collections::hash_map::DefaultHasher;

/// One byte stored per slot
pub type Fingerprint = u8;

/// Slot value meaning "nothing stored here"
pub const EMPTY: Fingerprint = 0;

/// Stand-in for fingerprints that would otherwise collide with [`EMPTY`]
pub const SENTINEL_FINGERPRINT: Fingerprint = 40;

/// Identity hasher used when the caller doesn't inject one
///
/// `DefaultHasher::default()` uses fixed keys, so it is deterministic for the life of a build (unlike `RandomState`).
pub type DefaultIdentityHasher = BuildHasherDefault<DefaultHasher>;

/// Hash an item with the injected hasher and fold the digest down to 32 bits
pub fn identity_hash<T, S>(build_hasher: &S, item: &T) -> u32
where
    T: Hash + ?Sized,
    S: BuildHasher,
{
    let mut hasher = build_hasher.build_hasher();
    item.hash(&mut hasher);
    let digest = hasher.finish();
    (digest ^ (digest >> 32)) as u32
}

/// Avalanche mixer used for fingerprints (Jenkins' six-step integer hash)
pub fn fingerprint_mix(hash: u32) -> u32 {
    let mut h = hash;
    h = h.wrapping_add(0x7ed5_5d16).wrapping_add(h << 12);
    h = (h ^ 0xc761_c23c) ^ (h >> 19);
    h = h.wrapping_add(0x1656_67b1).wrapping_add(h << 5);
    h = h.wrapping_add(0xd3a2_646c) ^ (h << 9);
    h = h.wrapping_add(0xfd70_46c5).wrapping_add(h << 3);
    (h ^ 0xb55a_4f09) ^ (h >> 16)
}

/// Mixer used for bucket indices, both for items and for fingerprints
///
/// Every step is invertible, so this is a bijection on `u32`.
pub fn index_mix(hash: u32) -> u32 {
    let mut h = hash;
    h = h.wrapping_sub(h << 6);
    h ^= h >> 17;
    h = h.wrapping_sub(h << 9);
    h ^= h << 4;
    h = h.wrapping_sub(h << 3);
    h ^= h << 10;
    h ^= h >> 15;
    h
}

/// Truncate the mixed hash to one byte, never returning [`EMPTY`]
pub fn fingerprint(hash: u32) -> Fingerprint {
    match fingerprint_mix(hash) as Fingerprint {
        EMPTY => SENTINEL_FINGERPRINT,
        fp => fp,
    }
}

/* -------------------- Unit Tests -------------------- */

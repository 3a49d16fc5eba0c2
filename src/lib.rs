//! # Cuckoo Filter implementation
//!
//! A Cuckoo Filter answers "have I possibly seen this thing before?" with no false negatives and a small false positive rate. It is similar to a Bloom Filter, but unlike a Bloom Filter, Cuckoo Filters support item deletion.
//!
//! This crate implements a (2, 4) Cuckoo Filter with one-byte fingerprints, stored in a single flat table sized once at construction. The false positive rate of a nearly full filter is about `2 * 4 / 256`.
//!
//! ```
//! use cuckoo_amq::CuckooFilter;
//!
//! let mut filter = CuckooFilter::<str>::with_seed(1024, 7).unwrap();
//! assert!(filter.insert("alice"));
//! assert!(filter.contains("alice"));
//! assert!(filter.delete("alice"));
//! assert!(!filter.contains("alice"));
//! ```

mod bucket;
mod config;
mod filter;
mod hash;

pub use bucket::{Bucket, BUCKET_SIZE};
pub use config::{FilterConfig, DEFAULT_CAPACITY};
pub use filter::{table_size_for, CuckooFilter, CuckooFilterError, MAX_CAPACITY, MAX_KICKS};
pub use hash::{
    fingerprint, fingerprint_mix, identity_hash, index_mix, DefaultIdentityHasher, Fingerprint,
    EMPTY, SENTINEL_FINGERPRINT,
};

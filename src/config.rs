//! Construction parameters for a [`CuckooFilter`](crate::CuckooFilter)

use serde::{Deserialize, Serialize};

use crate::filter::CuckooFilterError;

/// Default number of buckets requested when none is configured
pub const DEFAULT_CAPACITY: usize = 1024;

/// Declarative filter parameters, loadable from any serde format
///
/// Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Requested number of buckets, rounded up to a power of two at construction
    pub capacity: usize,

    /// Seed for the relocation RNG. `None` seeds from OS entropy
    pub seed: Option<u64>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            seed: None,
        }
    }
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Fix the relocation RNG seed, making every operation reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Capacities above the maximum are clamped later, so only zero is rejected
    pub fn validate(&self) -> Result<(), CuckooFilterError> {
        if self.capacity == 0 {
            return Err(CuckooFilterError::ZeroCapacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let config = FilterConfig::new().with_capacity(10).with_seed(7);
        assert_eq!(config.capacity, 10);
        assert_eq!(config.seed, Some(7));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_capacity_is_invalid() {
        let config = FilterConfig::new().with_capacity(0);
        assert_eq!(config.validate(), Err(CuckooFilterError::ZeroCapacity));
    }

    #[test]
    fn deserialize_with_defaults() {
        let config: FilterConfig = serde_json::from_str(r#"{ "seed": 42 }"#).unwrap();
        assert_eq!(config.capacity, DEFAULT_CAPACITY);
        assert_eq!(config.seed, Some(42));

        let config: FilterConfig = serde_json::from_str(r#"{ "capacity": 10 }"#).unwrap();
        assert_eq!(config, FilterConfig::new().with_capacity(10));
    }
}

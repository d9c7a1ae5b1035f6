use crate::algorithm::bitset::VariantSet;
use crate::io::configuration::MAX_SUPPORT_CACHE_ENTRIES;
use crate::spatial::geometry::Direction;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Key for caching neighbor support computations
///
/// Identifies a full slot domain and the direction support is projected in.
/// Domains repeat heavily across branches of the search, so the same union
/// over compatibility sets is requested many times.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SupportKey {
    domain: VariantSet,
    direction: Direction,
}

impl SupportKey {
    /// Key for the support of `domain` one cell over in `direction`
    pub fn new(domain: &VariantSet, direction: Direction) -> Self {
        Self {
            domain: domain.clone(),
            direction,
        }
    }
}

/// Supports already computed during this solve
///
/// Wiped wholesale once it reaches [`MAX_SUPPORT_CACHE_ENTRIES`].
#[derive(Default)]
pub struct SupportCache {
    supports: HashMap<SupportKey, VariantSet>,

    /// Hit and miss counters, reported in solve stats
    pub stats: CacheStats,
}

/// Counters for [`SupportCache`]
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the table
    pub hits: usize,
    /// Lookups that ran the computation
    pub misses: usize,
    /// Times the table was wiped for size
    pub evictions: usize,
}

impl SupportCache {
    /// Empty cache with zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Support for `key`, running `compute` only on a miss
    pub fn get_or_compute<F>(&mut self, key: SupportKey, compute: F) -> &VariantSet
    where
        F: FnOnce() -> VariantSet,
    {
        if self.supports.len() >= MAX_SUPPORT_CACHE_ENTRIES && !self.supports.contains_key(&key) {
            self.supports.clear();
            self.stats.evictions += 1;
        }

        match self.supports.entry(key) {
            Entry::Occupied(entry) => {
                self.stats.hits += 1;
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                self.stats.misses += 1;
                entry.insert(compute())
            }
        }
    }

    /// Supports currently stored
    pub fn len(&self) -> usize {
        self.supports.len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.supports.is_empty()
    }
}

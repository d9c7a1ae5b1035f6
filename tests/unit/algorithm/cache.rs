//! Tests for the neighbor support cache

#[cfg(test)]
mod tests {
    use pipeloop::algorithm::bitset::VariantSet;
    use pipeloop::algorithm::cache::{SupportCache, SupportKey};
    use pipeloop::analysis::variants::VariantKey;
    use pipeloop::io::configuration::MAX_SUPPORT_CACHE_ENTRIES;
    use pipeloop::spatial::geometry::Direction;

    fn domain(keys: &[u16]) -> VariantSet {
        VariantSet::from_keys(64, keys.iter().map(|&raw| VariantKey(raw)))
    }

    // Tests cache returns stored supports without recomputing
    // Verified by always calling the compute closure
    #[test]
    fn test_hit_and_miss() {
        let mut cache = SupportCache::new();
        let key = SupportKey::new(&domain(&[1, 2]), Direction::PosX);

        let first = cache.get_or_compute(key.clone(), || domain(&[5])).clone();
        let second = cache.get_or_compute(key, || domain(&[6])).clone();

        assert_eq!(first, domain(&[5]));
        assert_eq!(second, domain(&[5]));
        assert_eq!(cache.stats.hits, 1);
        assert_eq!(cache.stats.misses, 1);
        assert_eq!(cache.len(), 1);
    }

    // Tests keys differ by direction as well as domain
    // Verified by hashing only the domain
    #[test]
    fn test_direction_is_part_of_key() {
        let mut cache = SupportCache::new();
        let members = domain(&[3]);
        cache.get_or_compute(SupportKey::new(&members, Direction::PosX), || domain(&[1]));
        let other = cache
            .get_or_compute(SupportKey::new(&members, Direction::NegX), || domain(&[2]))
            .clone();

        assert_eq!(other, domain(&[2]));
        assert_eq!(cache.stats.misses, 2);
        assert_eq!(cache.len(), 2);
    }

    // Tests cache is cleared once it reaches its entry limit
    // Verified by never evicting
    #[test]
    fn test_eviction_at_limit() {
        let mut cache = SupportCache::new();
        assert!(cache.is_empty());

        let universe = 256;
        let mut keys = (0..256u16)
            .flat_map(|a| (a + 1..256).map(move |b| (a, b)))
            .flat_map(|(a, b)| Direction::ALL.map(move |direction| (a, b, direction)));

        for (a, b, direction) in keys.by_ref().take(MAX_SUPPORT_CACHE_ENTRIES) {
            let members = VariantSet::from_keys(universe, [VariantKey(a), VariantKey(b)]);
            cache.get_or_compute(SupportKey::new(&members, direction), || {
                VariantSet::new(universe)
            });
        }
        assert_eq!(cache.len(), MAX_SUPPORT_CACHE_ENTRIES);
        assert_eq!(cache.stats.evictions, 0);

        let (a, b, direction) = keys.next().unwrap();
        let members = VariantSet::from_keys(universe, [VariantKey(a), VariantKey(b)]);
        cache.get_or_compute(SupportKey::new(&members, direction), || {
            VariantSet::new(universe)
        });
        assert_eq!(cache.stats.evictions, 1);
        assert_eq!(cache.len(), 1);
    }
}

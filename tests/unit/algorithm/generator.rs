//! Tests for network and puzzle generation

#[cfg(test)]
mod tests {
    use pipeloop::algorithm::generator::{
        GeneratorConfig, Generator, SizeRange, generate_solution,
    };
    use pipeloop::algorithm::puzzle::{Difficulty, PuzzleMode};
    use pipeloop::algorithm::validation::validate_solution;
    use std::time::Duration;

    // Tests size ranges reject networks too small to close
    // Verified by accepting a minimum of one
    #[test]
    fn test_size_range_validation() {
        assert!(SizeRange::new(1, 5).is_err());
        assert!(SizeRange::new(6, 5).is_err());
        assert_eq!(SizeRange::new(2, 2).ok(), Some(SizeRange { min: 2, max: 2 }));

        let range = SizeRange::default();
        assert_eq!((range.min, range.max), (4, 10));
        assert!(range.contains(4));
        assert!(range.contains(10));
        assert!(!range.contains(11));
        assert!(!range.contains(3));
    }

    // Tests an exact four-tile request always yields a valid network
    // Verified by skipping the size check on accepted networks
    #[test]
    fn test_generate_exact_size() {
        let size = SizeRange { min: 4, max: 4 };
        for seed in 0..10 {
            let mut generator = Generator::new(seed);
            let network = generator.generate(&size, false).unwrap();
            assert_eq!(network.len(), 4);
            assert!(validate_solution(&network));
            assert!(network.windows(2).all(|pair| pair.first() < pair.get(1)));
            assert_eq!(generator.stats().accepted, 1);
            assert!(generator.stats().attempts >= 1);
        }
    }

    // Tests equal seeds give equal networks
    // Verified by seeding from the clock
    #[test]
    fn test_generate_deterministic() {
        let size = SizeRange::default();
        for seed in [1, 42, 1234] {
            assert_eq!(
                generate_solution(&size, false, seed),
                generate_solution(&size, false, seed)
            );
        }
    }

    // Tests networks with walls stay closed and supported
    // Verified by dropping the support check from growth
    #[test]
    fn test_generate_3d_networks_validate() {
        let size = SizeRange { min: 4, max: 8 };
        let mut generated = 0;
        for seed in 0..10 {
            if let Some(network) = generate_solution(&size, true, seed) {
                generated += 1;
                assert!(size.contains(network.len()));
                assert!(validate_solution(&network), "seed {seed}");
            }
        }
        assert!(generated > 0);
    }

    // Tests impossible ranges fail without attempting anything
    // Verified by clamping min to max
    #[test]
    fn test_generate_invalid_range() {
        let mut generator = Generator::new(3);
        assert!(generator.generate(&SizeRange { min: 6, max: 4 }, false).is_none());
        assert!(generator.generate(&SizeRange { min: 1, max: 4 }, false).is_none());
        assert_eq!(generator.stats().attempts, 0);
    }

    // Tests an exhausted time budget stops generation
    // Verified by checking the budget only after the first attempt
    #[test]
    fn test_generate_time_budget() {
        let config = GeneratorConfig {
            time_budget: Some(Duration::ZERO),
            ..GeneratorConfig::default()
        };
        let mut generator = Generator::with_config(5, config);
        assert!(generator.generate(&SizeRange::default(), false).is_none());
        assert_eq!(generator.stats().attempts, 0);
    }

    // Tests puzzles are derived from the generated network
    // Verified by deriving from a second, unrelated network
    #[test]
    fn test_generate_puzzle() {
        let mut generator = Generator::new(11);
        let size = SizeRange { min: 4, max: 6 };
        let generated = generator.generate_puzzle(&size, false, Difficulty::Medium);
        assert!(generated.is_some());
        let (solution, puzzle) = generated.unwrap();

        assert_eq!(puzzle.mode, PuzzleMode::Complete);
        assert_eq!(puzzle.tile_count(), solution.len() as u64);
        assert!(puzzle.validate().is_ok());
        assert!(puzzle.fixed.iter().all(|placement| solution.contains(placement)));
    }
}

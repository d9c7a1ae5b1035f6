//! Tests for structured loop and line construction

#[cfg(test)]
mod tests {
    use pipeloop::algorithm::construction::{Structure, build_structure, candidate_structures};
    use pipeloop::algorithm::generator::SizeRange;
    use pipeloop::algorithm::validation::{validate_closure, validate_solution};
    use pipeloop::math::probability::RandomSelector;
    use pipeloop::spatial::geometry::Orientation;
    use std::collections::HashSet;

    // Tests loop paths visit the perimeter once with adjacent steps
    // Verified by revisiting the start cell at the end of the path
    #[test]
    fn test_loop_path() {
        let structure = Structure::Loop { width: 3, depth: 4 };
        let path = structure.path();
        assert_eq!(path.len(), structure.tile_count());
        assert_eq!(path.len(), 10);
        assert_eq!(path.first(), Some(&[0, 0, 0]));
        assert_eq!(path.get(1), Some(&[1, 0, 0]));

        let unique: HashSet<[i32; 3]> = path.iter().copied().collect();
        assert_eq!(unique.len(), path.len());

        let mut cyclic = path.clone();
        cyclic.push(*path.first().unwrap());
        for pair in cyclic.windows(2) {
            if let [a, b] = pair {
                let distance: i32 = (0..3)
                    .map(|axis| (a.get(axis).copied().unwrap_or(0) - b.get(axis).copied().unwrap_or(0)).abs())
                    .sum();
                assert_eq!(distance, 1);
            }
        }
        assert!(structure.is_closed());
    }

    // Tests line paths run along x
    // Verified by stepping along z
    #[test]
    fn test_line_path() {
        let structure = Structure::Line { length: 3 };
        assert_eq!(structure.path(), vec![[0, 0, 0], [1, 0, 0], [2, 0, 0]]);
        assert_eq!(structure.tile_count(), 3);
        assert!(!structure.is_closed());
    }

    // Tests candidates match the size range exactly
    // Verified by using an exclusive upper bound
    #[test]
    fn test_candidate_structures() {
        let size = SizeRange { min: 4, max: 4 };
        let structures = candidate_structures(&size);
        assert!(structures.contains(&Structure::Loop { width: 2, depth: 2 }));
        assert!(structures.contains(&Structure::Line { length: 4 }));
        assert!(structures.iter().all(|structure| structure.tile_count() == 4));

        let wider = SizeRange { min: 6, max: 8 };
        for structure in candidate_structures(&wider) {
            assert!(wider.contains(structure.tile_count()));
        }
    }

    // Tests every built loop closes and stays on the ground
    // Verified by leaving the incoming slot unmirrored
    #[test]
    fn test_built_loops_close() {
        let mut built = 0;
        for seed in 0..20 {
            let mut selector = RandomSelector::new(seed);
            for structure in [
                Structure::Loop { width: 2, depth: 2 },
                Structure::Loop { width: 3, depth: 2 },
                Structure::Loop { width: 3, depth: 3 },
            ] {
                let Some(placements) = build_structure(structure, &mut selector) else {
                    continue;
                };
                built += 1;
                assert_eq!(placements.len(), structure.tile_count());
                assert!(validate_closure(&placements).valid, "seed {seed} {structure:?}");
                assert!(
                    placements
                        .iter()
                        .all(|placement| placement.orientation() == Orientation::Flat)
                );
            }
        }
        assert!(built > 0);
    }

    // Tests capped lines close at both ends
    // Verified by allowing extra connectors on the end tiles
    #[test]
    fn test_built_lines_close() {
        let mut selector = RandomSelector::new(9);
        for length in 2..6 {
            let placements = build_structure(Structure::Line { length }, &mut selector).unwrap();
            assert_eq!(placements.len(), usize::try_from(length).unwrap());
            assert!(validate_solution(&placements));
        }
    }

    // Tests the smallest loop is always buildable
    // Verified by giving up after the first shuffled candidate
    #[test]
    fn test_small_loop_always_builds() {
        for seed in 0..10 {
            let mut selector = RandomSelector::new(seed);
            assert!(build_structure(Structure::Loop { width: 2, depth: 2 }, &mut selector).is_some());
        }
    }

    // Tests degenerate structures are rejected
    // Verified by building a single tile
    #[test]
    fn test_degenerate_structure() {
        let mut selector = RandomSelector::new(1);
        assert!(build_structure(Structure::Line { length: 1 }, &mut selector).is_none());
    }
}

//! Generation of closed networks and puzzles derived from them

use std::time::{Duration, Instant};

use crate::algorithm::construction::{build_structure, candidate_structures};
use crate::algorithm::growth::grow_network;
use crate::algorithm::puzzle::{Difficulty, PuzzleSpec, derive_puzzle};
use crate::algorithm::validation::validate_solution;
use crate::io::configuration::{
    DEFAULT_MAX_TILES, DEFAULT_MIN_TILES, GENERATION_HEIGHT, MAX_EXTRA_TILES,
    MAX_GENERATION_ATTEMPTS,
};
use crate::io::error::{Result, invalid_parameter};
use crate::math::probability::RandomSelector;
use crate::spatial::geometry::Orientation;
use crate::spatial::grid::{Placement, Region};

/// Inclusive bounds on the number of tiles in a network
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeRange {
    /// Fewest tiles
    pub min: usize,
    /// Most tiles
    pub max: usize,
}

impl SizeRange {
    /// Create a validated range
    ///
    /// # Errors
    ///
    /// Returns an error if `min` exceeds `max` or `min` is below two, the
    /// smallest closed network.
    pub fn new(min: usize, max: usize) -> Result<Self> {
        if min < 2 {
            return Err(invalid_parameter(
                "min",
                &min,
                &"a closed network needs at least two tiles",
            ));
        }
        if min > max {
            return Err(invalid_parameter(
                "max",
                &max,
                &format!("must be at least min ({min})"),
            ));
        }
        Ok(Self { min, max })
    }

    /// Whether a tile count falls inside the range
    pub const fn contains(&self, count: usize) -> bool {
        count >= self.min && count <= self.max
    }
}

impl Default for SizeRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_TILES,
            max: DEFAULT_MAX_TILES,
        }
    }
}

/// Limits for one generation request
#[derive(Clone, Copy, Debug)]
pub struct GeneratorConfig {
    /// Attempts before giving up
    pub max_attempts: usize,
    /// Tiles the closing pass may add
    pub max_extra_tiles: usize,
    /// Wall-clock budget, `None` for unlimited
    pub time_budget: Option<Duration>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_attempts: MAX_GENERATION_ATTEMPTS,
            max_extra_tiles: MAX_EXTRA_TILES,
            time_budget: None,
        }
    }
}

/// Way of producing a candidate network
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Rectangle loops and capped lines
    Structured,
    /// Seeded random walk with a closing pass
    RandomWalk,
}

/// Counters from generation requests
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Strategy attempts made
    pub attempts: usize,
    /// Attempts producing no network
    pub failures: usize,
    /// Networks rejected by validation
    pub rejected: usize,
    /// Networks accepted
    pub accepted: usize,
}

/// Seeded generator of closed networks
pub struct Generator {
    selector: RandomSelector,
    config: GeneratorConfig,
    stats: GenerationStats,
}

impl Generator {
    /// Generator with default limits
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, GeneratorConfig::default())
    }

    /// Generator with custom limits
    pub fn with_config(seed: u64, config: GeneratorConfig) -> Self {
        Self {
            selector: RandomSelector::new(seed),
            config,
            stats: GenerationStats::default(),
        }
    }

    /// Counters accumulated so far
    pub const fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    /// Produce one closed, connected, supported network
    ///
    /// Strategies are tried in a random order on every attempt until one
    /// yields a network that passes validation or the attempt budget runs
    /// out. Placements are returned sorted by slot.
    pub fn generate(&mut self, size: &SizeRange, allow_3d: bool) -> Option<Vec<Placement>> {
        if size.min < 2 || size.min > size.max {
            log::warn!("Invalid size range {}..={}", size.min, size.max);
            return None;
        }

        let started = Instant::now();
        let region = walk_region(size, allow_3d);
        let structures = candidate_structures(size);

        for attempt in 0..self.config.max_attempts {
            if self
                .config
                .time_budget
                .is_some_and(|budget| started.elapsed() >= budget)
            {
                log::debug!("Generation time budget exhausted after {attempt} attempts");
                break;
            }

            let mut strategies = [Strategy::Structured, Strategy::RandomWalk];
            self.selector.shuffle(&mut strategies);

            for strategy in strategies {
                self.stats.attempts += 1;
                let network = match strategy {
                    Strategy::Structured => {
                        let choice = self.selector.index(structures.len());
                        match choice.and_then(|i| structures.get(i)) {
                            Some(&structure) => build_structure(structure, &mut self.selector),
                            None => None,
                        }
                    }
                    Strategy::RandomWalk => {
                        grow_network(&region, size, &self.config, &mut self.selector)
                    }
                };

                let Some(mut placements) = network else {
                    self.stats.failures += 1;
                    continue;
                };
                if !size.contains(placements.len()) || !validate_solution(&placements) {
                    self.stats.rejected += 1;
                    continue;
                }

                placements.sort();
                self.stats.accepted += 1;
                log::debug!(
                    "Generated {} tiles with {strategy:?} on attempt {}",
                    placements.len(),
                    attempt + 1
                );
                return Some(placements);
            }
        }

        log::warn!(
            "No network of {}..={} tiles after {} attempts",
            size.min,
            size.max,
            self.stats.attempts
        );
        None
    }

    /// Generate a network and derive a puzzle of the given difficulty from it
    pub fn generate_puzzle(
        &mut self,
        size: &SizeRange,
        allow_3d: bool,
        difficulty: Difficulty,
    ) -> Option<(Vec<Placement>, PuzzleSpec)> {
        let solution = self.generate(size, allow_3d)?;
        let puzzle = derive_puzzle(&solution, difficulty, &mut self.selector)?;
        Some((solution, puzzle))
    }
}

/// Region the random walk grows in
fn walk_region(size: &SizeRange, allow_3d: bool) -> Region {
    let side = ((size.max as f64).sqrt().ceil() as i32 + 1).max(3);
    if allow_3d {
        Region::new(
            [0, 0, 0],
            [side - 1, GENERATION_HEIGHT - 1, side - 1],
            &Orientation::ALL,
        )
    } else {
        Region::new([0, 0, 0], [side - 1, 0, side - 1], &[Orientation::Flat])
    }
}

/// Generate one closed network from a seed
pub fn generate_solution(size: &SizeRange, allow_3d: bool, seed: u64) -> Option<Vec<Placement>> {
    Generator::new(seed).generate(size, allow_3d)
}

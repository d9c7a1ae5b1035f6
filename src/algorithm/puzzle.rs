//! Puzzle descriptions and their derivation from a solved network

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::io::configuration::{
    EASY_REMOVAL_FRACTION, HARD_REMOVAL_FRACTION, MEDIUM_REMOVAL_FRACTION,
};
use crate::io::error::{PuzzleError, Result, invalid_parameter};
use crate::math::probability::RandomSelector;
use crate::spatial::grid::{Placement, Region};
use crate::spatial::tiles::{ShapeId, tile_catalog};

/// How the player interacts with the puzzle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PuzzleMode {
    /// Place every inventory tile anywhere in the region
    Arrange,
    /// Fill in around tiles that are already fixed
    Complete,
}

/// Multiset of shapes available to place
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    counts: BTreeMap<ShapeId, u32>,
}

impl Inventory {
    /// Empty inventory
    pub fn new() -> Self {
        Self::default()
    }

    /// Inventory holding one copy of each placement's shape
    pub fn from_placements<'a>(placements: impl IntoIterator<Item = &'a Placement>) -> Self {
        let mut inventory = Self::new();
        for placement in placements {
            inventory.add(placement.shape, 1);
        }
        inventory
    }

    /// Add copies of a shape
    pub fn add(&mut self, shape: ShapeId, count: u32) {
        if count > 0 {
            *self.counts.entry(shape).or_insert(0) += count;
        }
    }

    /// Copies of a shape still available
    pub fn remaining(&self, shape: ShapeId) -> u32 {
        self.counts.get(&shape).copied().unwrap_or(0)
    }

    /// Take one copy of a shape, returning whether one was available
    pub fn take(&mut self, shape: ShapeId) -> bool {
        match self.counts.get_mut(&shape) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    /// Total copies across all shapes
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&count| u64::from(count)).sum()
    }

    /// Whether no copies remain
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Shapes with their counts, including exhausted ones
    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, u32)> + '_ {
        self.counts.iter().map(|(&shape, &count)| (shape, count))
    }
}

impl FromIterator<(ShapeId, u32)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (ShapeId, u32)>>(iter: I) -> Self {
        let mut inventory = Self::new();
        for (shape, count) in iter {
            inventory.add(shape, count);
        }
        inventory
    }
}

/// Everything a solver needs to know about one puzzle
#[derive(Clone, Debug, PartialEq)]
pub struct PuzzleSpec {
    /// Slots tiles may occupy
    pub region: Region,
    /// Shapes that must all be placed
    pub inventory: Inventory,
    /// Tiles already on the board, exempt from the inventory
    pub fixed: Vec<Placement>,
    /// Interaction mode
    pub mode: PuzzleMode,
}

impl PuzzleSpec {
    /// Arrange-mode puzzle with no fixed tiles
    pub const fn arrange(region: Region, inventory: Inventory) -> Self {
        Self {
            region,
            inventory,
            fixed: Vec::new(),
            mode: PuzzleMode::Arrange,
        }
    }

    /// Complete-mode puzzle around fixed tiles
    pub const fn complete(region: Region, inventory: Inventory, fixed: Vec<Placement>) -> Self {
        Self {
            region,
            inventory,
            fixed,
            mode: PuzzleMode::Complete,
        }
    }

    /// Check the description is well formed
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The region bounds are inverted, below ground, or too large
    /// - No orientation is allowed
    /// - A shape is missing from the catalog
    /// - A fixed placement is outside the region or shares a slot with another
    /// - An arrange-mode puzzle has nothing to place
    pub fn validate(&self) -> Result<()> {
        self.region.validate()?;

        let catalog = tile_catalog();
        let known = |shape: ShapeId| -> Result<()> {
            catalog
                .get(shape)
                .map(|_| ())
                .ok_or(PuzzleError::UnknownShape {
                    shape: shape.0,
                    catalog_size: catalog.len(),
                })
        };

        for (shape, _) in self.inventory.iter() {
            known(shape)?;
        }

        let mut claimed = HashSet::new();
        for placement in &self.fixed {
            known(placement.shape)?;
            if !self.region.contains(&placement.slot) {
                return Err(PuzzleError::FixedPlacementOutsideRegion {
                    slot: placement.slot,
                });
            }
            if !claimed.insert(placement.slot) {
                return Err(PuzzleError::DuplicateFixedPlacement {
                    slot: placement.slot,
                });
            }
        }

        if self.mode == PuzzleMode::Arrange && self.inventory.is_empty() {
            return Err(invalid_parameter(
                "inventory",
                &"empty",
                &"arrange puzzles need at least one tile to place",
            ));
        }

        Ok(())
    }

    /// Number of tiles a solution contains
    pub fn tile_count(&self) -> u64 {
        self.inventory.total() + self.fixed.len() as u64
    }
}

/// Difficulty tier for derived puzzles
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Difficulty {
    /// A quarter of the tiles removed
    Easy,
    /// Half of the tiles removed
    Medium,
    /// Three quarters of the tiles removed
    Hard,
    /// Arrange everything, one tile given as a hint
    Expert,
    /// Arrange everything with no hints
    Master,
}

impl Difficulty {
    /// Fraction of tiles removed in complete mode, `None` for arrange tiers
    pub const fn removal_fraction(self) -> Option<f64> {
        match self {
            Self::Easy => Some(EASY_REMOVAL_FRACTION),
            Self::Medium => Some(MEDIUM_REMOVAL_FRACTION),
            Self::Hard => Some(HARD_REMOVAL_FRACTION),
            Self::Expert | Self::Master => None,
        }
    }

    /// Mode of puzzles at this tier
    pub const fn mode(self) -> PuzzleMode {
        match self {
            Self::Easy | Self::Medium | Self::Hard => PuzzleMode::Complete,
            Self::Expert | Self::Master => PuzzleMode::Arrange,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Expert => "expert",
            Self::Master => "master",
        };
        f.write_str(name)
    }
}

/// Turn a solved network into a puzzle of the requested difficulty
///
/// The region is the solution's bounding box restricted to the orientations
/// the solution uses. Complete tiers remove a share of the tiles (at least
/// one, never all) and fix the rest; arrange tiers move every tile into the
/// inventory, keeping one as a hint at expert level.
pub fn derive_puzzle(
    solution: &[Placement],
    difficulty: Difficulty,
    selector: &mut RandomSelector,
) -> Option<PuzzleSpec> {
    let region = Region::bounding(solution)?;
    let mut order: Vec<usize> = (0..solution.len()).collect();
    selector.shuffle(&mut order);

    let removed_count = match difficulty.removal_fraction() {
        Some(fraction) => {
            if solution.len() < 2 {
                return None;
            }
            let target = (solution.len() as f64 * fraction).round() as usize;
            target.clamp(1, solution.len() - 1)
        }
        None => match difficulty {
            Difficulty::Expert => solution.len().saturating_sub(1),
            _ => solution.len(),
        },
    };

    let mut inventory = Inventory::new();
    let mut fixed = Vec::new();
    for (rank, index) in order.into_iter().enumerate() {
        let Some(placement) = solution.get(index) else {
            continue;
        };
        if rank < removed_count {
            inventory.add(placement.shape, 1);
        } else {
            fixed.push(*placement);
        }
    }
    fixed.sort();

    log::debug!(
        "Derived {difficulty} puzzle: {} to place, {} fixed",
        inventory.total(),
        fixed.len()
    );

    Some(PuzzleSpec {
        region,
        inventory,
        fixed,
        mode: difficulty.mode(),
    })
}

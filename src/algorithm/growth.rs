//! Random-walk generation: grow a network from a seed tile, then close it
//!
//! The network tracks how many connectors sit at every world point. A point
//! with exactly one connector is open. Growth repeatedly picks an open point
//! and attaches a tile with a connector landing on it; a greedy closing pass
//! then tries to leave no open point behind.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::algorithm::generator::{GeneratorConfig, SizeRange};
use crate::analysis::compatibility::compatibility_index;
use crate::analysis::variants::{VariantKey, variant_table};
use crate::io::configuration::{
    CLOSE_WEIGHT, EARLY_OPEN_PENALTY, LOOP_BONUS, MAX_CLOSES_PER_TILE, OPEN_PENALTY,
    SEED_TWO_CONNECTOR_BIAS,
};
use crate::math::probability::RandomSelector;
use crate::spatial::geometry::{Orientation, QuantizedPoint};
use crate::spatial::grid::{Placement, Region, Slot};
use crate::spatial::tiles::{ShapeId, tile_catalog, transform_combinations};

/// A tile that could be attached, with its effect on open points
#[derive(Clone, Debug)]
struct Candidate {
    placement: Placement,
    points: Vec<QuantizedPoint>,
    closes: usize,
    opens: usize,
}

/// Partially grown network inside a bounded region
struct Network<'a> {
    region: &'a Region,
    placements: Vec<Placement>,
    occupied: HashSet<Slot>,
    points: HashMap<QuantizedPoint, u8>,
    open: BTreeMap<QuantizedPoint, Slot>,
}

impl<'a> Network<'a> {
    fn new(region: &'a Region) -> Self {
        Self {
            region,
            placements: Vec::new(),
            occupied: HashSet::new(),
            points: HashMap::new(),
            open: BTreeMap::new(),
        }
    }

    fn len(&self) -> usize {
        self.placements.len()
    }

    fn place(&mut self, candidate: &Candidate) {
        let slot = candidate.placement.slot;
        for &point in &candidate.points {
            let count = self.points.entry(point).or_insert(0);
            *count += 1;
            if *count == 1 {
                self.open.insert(point, slot);
            } else {
                self.open.remove(&point);
            }
        }
        self.occupied.insert(slot);
        self.placements.push(candidate.placement);
    }

    /// Tiles above ground must rest on a tile already placed below
    fn is_supported(&self, slot: &Slot) -> bool {
        let [x, y, z] = slot.cell;
        if y <= 0 {
            return true;
        }
        let below = [x, y - 1, z];
        if slot.orientation.is_edge_mounted() {
            self.occupied.contains(&Slot::new(below, Orientation::Flat))
        } else {
            Orientation::ALL
                .into_iter()
                .filter(|orientation| orientation.is_edge_mounted())
                .any(|orientation| self.occupied.contains(&Slot::new(below, orientation)))
        }
    }

    fn candidate_for(&self, slot: Slot, key: VariantKey) -> Option<Candidate> {
        let variant = variant_table().get(key)?;
        let mut closes = 0;
        let mut opens = 0;
        let mut points = Vec::with_capacity(variant.connectors.len());
        for connector in &variant.connectors {
            let point = connector.world_position(slot.cell);
            match self.points.get(&point).copied().unwrap_or(0) {
                0 => opens += 1,
                1 => closes += 1,
                _ => return None,
            }
            points.push(point);
        }
        if !self.is_supported(&slot) {
            return None;
        }
        Some(Candidate {
            placement: variant.placement(slot),
            points,
            closes,
            opens,
        })
    }

    /// Every tile with a connector landing exactly on `point`
    fn candidates_at(&self, point: QuantizedPoint) -> Vec<Candidate> {
        let index = compatibility_index();
        let mut candidates = Vec::new();
        for cell in point.touching_cells() {
            for &orientation in &self.region.orientations {
                let slot = Slot::new(cell, orientation);
                if !self.region.contains(&slot) || self.occupied.contains(&slot) {
                    continue;
                }
                let local = point.sub(QuantizedPoint::from_cell(cell));
                for &(key, _) in index.variants_at(orientation, local) {
                    if let Some(candidate) = self.candidate_for(slot, key) {
                        candidates.push(candidate);
                    }
                }
            }
        }
        candidates
    }
}

/// Place a seed tile near the middle of the ground level
fn seed(network: &mut Network<'_>, selector: &mut RandomSelector) -> bool {
    let catalog = tile_catalog();
    let two_connector: Vec<ShapeId> = catalog
        .iter()
        .filter(|(_, shape)| shape.connector_count() == 2)
        .map(|(id, _)| id)
        .collect();
    let pool: Vec<ShapeId> = if !two_connector.is_empty() && selector.chance(SEED_TWO_CONNECTOR_BIAS) {
        two_connector
    } else {
        catalog.iter().map(|(id, _)| id).collect()
    };

    let Some(shape) = selector.index(pool.len()).and_then(|i| pool.get(i).copied()) else {
        return false;
    };
    let combinations: Vec<_> = transform_combinations().collect();
    let Some(&(rotation, mirrored)) = selector
        .index(combinations.len())
        .and_then(|i| combinations.get(i))
    else {
        return false;
    };

    let region = network.region;
    let cell = [
        (region.min[0] + region.max[0]) / 2,
        region.min[1],
        (region.min[2] + region.max[2]) / 2,
    ];
    let Some(key) = variant_table().lookup(shape, Orientation::Flat, rotation, mirrored) else {
        return false;
    };
    match network.candidate_for(Slot::new(cell, Orientation::Flat), key) {
        Some(candidate) => {
            network.place(&candidate);
            true
        }
        None => false,
    }
}

/// Sampling weight of a growth candidate, zero when it must be ruled out
fn growth_weight(network: &Network<'_>, candidate: &Candidate, size: &SizeRange) -> f64 {
    let placed_after = network.len() + 1;
    let open_after = (network.open.len() + candidate.opens).saturating_sub(candidate.closes);
    let remaining = size.max.saturating_sub(placed_after);

    if open_after == 0 && placed_after < size.min {
        return 0.0;
    }
    if open_after > MAX_CLOSES_PER_TILE * remaining {
        return 0.0;
    }

    candidate_weight(candidate.closes, candidate.opens, placed_after >= size.min)
}

/// Sampling weight of a tile closing `closes` open connectors and opening `opens` new ones
///
/// Every tile attached at an open point closes at least that one. Each
/// further close adds [`CLOSE_WEIGHT`], and closing two or more at once earns
/// [`LOOP_BONUS`]. New connectors cost [`EARLY_OPEN_PENALTY`] each while the
/// network is below its minimum size and [`OPEN_PENALTY`] each after.
pub fn candidate_weight(closes: usize, opens: usize, reached_min: bool) -> f64 {
    let extra_closes = closes.saturating_sub(1) as f64;
    let mut weight = CLOSE_WEIGHT.mul_add(extra_closes, 1.0);
    if closes >= 2 {
        weight += LOOP_BONUS;
    }
    let penalty = if reached_min {
        OPEN_PENALTY
    } else {
        EARLY_OPEN_PENALTY
    };
    weight * penalty.powi(i32::try_from(opens).unwrap_or(i32::MAX))
}

/// Grow a network inside `region` and try to close it
///
/// Returns the placements only if no connector is left open and the tile
/// count lies within `size`.
pub fn grow_network(
    region: &Region,
    size: &SizeRange,
    config: &GeneratorConfig,
    selector: &mut RandomSelector,
) -> Option<Vec<Placement>> {
    let mut network = Network::new(region);
    if !seed(&mut network, selector) {
        return None;
    }
    let target = selector.range_inclusive(size.min, size.max);

    while network.len() < target {
        let mut open: Vec<QuantizedPoint> = network.open.keys().copied().collect();
        if open.is_empty() {
            break;
        }
        selector.shuffle(&mut open);

        let mut attached = false;
        for point in open {
            let candidates = network.candidates_at(point);
            let weights: Vec<f64> = candidates
                .iter()
                .map(|candidate| growth_weight(&network, candidate, size))
                .collect();
            if let Some(candidate) = selector
                .weighted_choice(&weights)
                .and_then(|choice| candidates.get(choice))
            {
                network.place(candidate);
                attached = true;
                break;
            }
        }
        if !attached {
            log::trace!("Growth stuck at {} tiles", network.len());
            break;
        }
    }

    let budget = config.max_extra_tiles.min(size.max.saturating_sub(network.len()));
    for _ in 0..budget {
        if network.open.is_empty() {
            break;
        }
        let points: Vec<QuantizedPoint> = network.open.keys().copied().collect();
        let mut candidates: Vec<Candidate> = points
            .into_iter()
            .flat_map(|point| network.candidates_at(point))
            .collect();
        selector.shuffle(&mut candidates);
        candidates.sort_by_key(|candidate| {
            let net = candidate.closes as i64 - candidate.opens as i64;
            (std::cmp::Reverse(net), candidate.opens)
        });
        let Some(best) = candidates.first() else {
            break;
        };
        network.place(best);
    }

    let closed = network.open.is_empty() && size.contains(network.len());
    log::trace!(
        "Random walk finished with {} tiles, {} open connectors",
        network.len(),
        network.open.len()
    );
    closed.then_some(network.placements)
}

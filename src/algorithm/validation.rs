//! Post hoc checks on a finished set of placements
//!
//! Closure is judged purely on world positions: two connectors coinciding
//! within tolerance are matched, regardless of which orientations their
//! tiles are mounted in. That lets a floor tile meet a wall tile along the
//! crease they share.

use std::collections::{BTreeMap, HashSet};

use crate::algorithm::connectivity::DisjointSets;
use crate::analysis::variants::variant_table;
use crate::spatial::geometry::{Direction, Orientation, Point, QuantizedPoint};
use crate::spatial::grid::{Placement, Slot};

/// A connector resolved to world space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConnector {
    /// Slot of the owning tile
    pub slot: Slot,
    /// Quantized world position
    pub position: QuantizedPoint,
    /// Continuous world position
    pub point: Point,
    /// Direction the connector faces
    pub facing: Direction,
}

/// Result of checking a network for closure
#[derive(Clone, Debug, Default)]
pub struct ClosureReport {
    /// Every connector matched, one component, no overlaps
    pub valid: bool,
    /// Connectors without exactly one partner
    pub open_connectors: Vec<WorldConnector>,
    /// Number of connected groups of tiles
    pub components: usize,
    /// Slots claimed by more than one placement
    pub overlapping: Vec<Slot>,
    /// Placements whose combination is not in the variant table
    pub unknown: Vec<Placement>,
}

/// World connectors of a placement, or `None` if its combination is unknown
pub fn world_connectors(placement: &Placement) -> Option<Vec<WorldConnector>> {
    let table = variant_table();
    let variant = table.get(table.key_of(placement)?)?;
    Some(
        variant
            .connectors
            .iter()
            .map(|connector| WorldConnector {
                slot: placement.slot,
                position: connector.world_position(placement.cell()),
                point: connector.world_point(placement.cell()),
                facing: connector.facing,
            })
            .collect(),
    )
}

/// Check that every connector meets exactly one partner and the network is connected
pub fn validate_closure(placements: &[Placement]) -> ClosureReport {
    let mut report = ClosureReport::default();
    let mut seen = HashSet::new();
    let mut by_position: BTreeMap<QuantizedPoint, Vec<(usize, WorldConnector)>> = BTreeMap::new();

    for (index, placement) in placements.iter().enumerate() {
        if !seen.insert(placement.slot) {
            report.overlapping.push(placement.slot);
        }
        match world_connectors(placement) {
            Some(connectors) => {
                for connector in connectors {
                    by_position
                        .entry(connector.position)
                        .or_default()
                        .push((index, connector));
                }
            }
            None => report.unknown.push(*placement),
        }
    }

    let mut sets = DisjointSets::new(placements.len());
    for index in 0..placements.len() {
        sets.activate(index);
    }

    for group in by_position.values() {
        match group.as_slice() {
            [(a, _), (b, _)] => {
                sets.union(*a, *b);
            }
            others => report
                .open_connectors
                .extend(others.iter().map(|(_, connector)| *connector)),
        }
    }

    report.components = sets.component_count();
    report.valid = !placements.is_empty()
        && report.open_connectors.is_empty()
        && report.components == 1
        && report.overlapping.is_empty()
        && report.unknown.is_empty();
    report
}

/// Placements above ground level lacking the tile they must rest on
///
/// A wall needs a floor tile in the cell below; a floor tile above ground
/// needs some wall in the cell below.
pub fn unsupported_placements(placements: &[Placement]) -> Vec<Slot> {
    let occupied: HashSet<Slot> = placements.iter().map(|placement| placement.slot).collect();

    placements
        .iter()
        .filter(|placement| placement.cell()[1] > 0)
        .filter(|placement| {
            let [x, y, z] = placement.cell();
            let below = [x, y - 1, z];
            let supported = if placement.orientation().is_edge_mounted() {
                occupied.contains(&Slot::new(below, Orientation::Flat))
            } else {
                Orientation::ALL
                    .into_iter()
                    .filter(|orientation| orientation.is_edge_mounted())
                    .any(|orientation| occupied.contains(&Slot::new(below, orientation)))
            };
            !supported
        })
        .map(|placement| placement.slot)
        .collect()
}

/// Closed, connected, overlap-free and physically supported
pub fn validate_solution(placements: &[Placement]) -> bool {
    validate_closure(placements).valid && unsupported_placements(placements).is_empty()
}

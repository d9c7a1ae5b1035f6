//! Structured generation: closed rectangles and capped lines on the ground
//!
//! A path of cells is fixed up front and each cell is given a tile whose
//! connectors point exactly along the path. Each connector must sit where
//! the previous tile's outgoing connector landed, which in the shared frame
//! means the mirrored slot on the facing edge.

use crate::algorithm::generator::SizeRange;
use crate::math::probability::RandomSelector;
use crate::spatial::geometry::{Cell, Direction, Edge, Orientation, Rotation};
use crate::spatial::grid::Placement;
use crate::spatial::tiles::{EdgeSlot, ShapeId, tile_catalog, transform_combinations};

/// Shape of a structured network
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Structure {
    /// Closed loop around a `width` by `depth` rectangle of cells
    Loop {
        /// Cells along x
        width: i32,
        /// Cells along z
        depth: i32,
    },
    /// Straight run along x closed by two end caps
    Line {
        /// Cells in the run
        length: i32,
    },
}

impl Structure {
    /// Number of tiles the structure uses
    pub fn tile_count(&self) -> usize {
        match *self {
            Self::Loop { width, depth } => usize::try_from(2 * width + 2 * depth - 4).unwrap_or(0),
            Self::Line { length } => usize::try_from(length).unwrap_or(0),
        }
    }

    /// Whether the path wraps around to its start
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Loop { .. })
    }

    /// Cells visited in order, all at ground level
    pub fn path(&self) -> Vec<Cell> {
        match *self {
            Self::Loop { width, depth } => {
                let mut cells = Vec::new();
                for x in 0..width {
                    cells.push([x, 0, 0]);
                }
                for z in 1..depth {
                    cells.push([width - 1, 0, z]);
                }
                for x in (0..width - 1).rev() {
                    cells.push([x, 0, depth - 1]);
                }
                for z in (1..depth - 1).rev() {
                    cells.push([0, 0, z]);
                }
                cells
            }
            Self::Line { length } => (0..length).map(|x| [x, 0, 0]).collect(),
        }
    }
}

/// Structures whose tile count falls inside the size range
pub fn candidate_structures(size: &SizeRange) -> Vec<Structure> {
    let mut structures = Vec::new();
    let Ok(max) = i32::try_from(size.max) else {
        return structures;
    };

    for width in 2..=max {
        for depth in 2..=max {
            let structure = Structure::Loop { width, depth };
            if size.contains(structure.tile_count()) {
                structures.push(structure);
            }
        }
    }
    for length in 2..=max {
        let structure = Structure::Line { length };
        if size.contains(structure.tile_count()) {
            structures.push(structure);
        }
    }
    structures
}

/// Chosen tile with its slots on the incoming and outgoing edges
struct Step {
    placement: Placement,
    incoming: Option<EdgeSlot>,
    outgoing: Option<EdgeSlot>,
}

/// Direction from one cell to an adjacent one on the ground plane
fn direction_between(from: Cell, to: Cell) -> Option<Direction> {
    let delta = [to[0] - from[0], to[1] - from[1], to[2] - from[2]];
    Direction::ALL
        .into_iter()
        .find(|direction| direction.unit() == delta)
}

/// Edge slots of a transformed shape keyed by world direction when flat
fn world_slots(shape_id: ShapeId, rotation: Rotation, mirrored: bool) -> Option<[(Direction, EdgeSlot); 4]> {
    let shape = tile_catalog().get(shape_id)?;
    let edges = shape.transformed(rotation, mirrored);
    Some(Edge::ALL.map(|edge| (Orientation::Flat.edge_direction(edge), edges.edge(edge))))
}

fn slot_towards(slots: &[(Direction, EdgeSlot); 4], direction: Direction) -> EdgeSlot {
    slots
        .iter()
        .find(|(facing, _)| *facing == direction)
        .map_or(EdgeSlot::None, |(_, slot)| *slot)
}

/// Search shuffled shape and transform combinations for a tile matching the path
fn choose_step(
    cell: Cell,
    incoming: Option<(Direction, Option<EdgeSlot>)>,
    outgoing: Option<(Direction, Option<EdgeSlot>)>,
    selector: &mut RandomSelector,
) -> Option<Step> {
    let mut combinations: Vec<(ShapeId, Rotation, bool)> = tile_catalog()
        .iter()
        .flat_map(|(shape_id, _)| {
            transform_combinations().map(move |(rotation, mirrored)| (shape_id, rotation, mirrored))
        })
        .collect();
    selector.shuffle(&mut combinations);

    let required: Vec<Direction> = incoming
        .iter()
        .chain(outgoing.iter())
        .map(|(direction, _)| *direction)
        .collect();

    for (shape_id, rotation, mirrored) in combinations {
        let Some(slots) = world_slots(shape_id, rotation, mirrored) else {
            continue;
        };
        let exact = slots
            .iter()
            .all(|(direction, slot)| slot.is_connector() == required.contains(direction));
        if !exact {
            continue;
        }

        let matches = |constraint: Option<(Direction, Option<EdgeSlot>)>| match constraint {
            Some((direction, Some(wanted))) => slot_towards(&slots, direction) == wanted,
            _ => true,
        };
        if !matches(incoming) || !matches(outgoing) {
            continue;
        }

        return Some(Step {
            placement: Placement::new(cell, Orientation::Flat, shape_id, rotation, mirrored),
            incoming: incoming.map(|(direction, _)| slot_towards(&slots, direction)),
            outgoing: outgoing.map(|(direction, _)| slot_towards(&slots, direction)),
        });
    }
    None
}

/// Lay tiles along a structure's path
///
/// Returns `None` when some cell has no fitting tile or a loop fails to
/// close, in which case the caller tries another configuration.
pub fn build_structure(structure: Structure, selector: &mut RandomSelector) -> Option<Vec<Placement>> {
    let path = structure.path();
    let closed = structure.is_closed();
    let count = path.len();
    if count < 2 {
        return None;
    }

    let mut steps: Vec<Step> = Vec::with_capacity(count);
    for (i, &cell) in path.iter().enumerate() {
        let previous = if i > 0 {
            path.get(i - 1).copied()
        } else if closed {
            path.last().copied()
        } else {
            None
        };
        let next = if i + 1 < count {
            path.get(i + 1).copied()
        } else if closed {
            path.first().copied()
        } else {
            None
        };

        let incoming_slot = steps
            .last()
            .and_then(|step| step.outgoing)
            .map(EdgeSlot::mirrored);
        let incoming = match previous {
            Some(previous) => Some((direction_between(cell, previous)?, incoming_slot)),
            None => None,
        };

        let closing_slot = if closed && i + 1 == count {
            steps
                .first()
                .and_then(|step| step.incoming)
                .map(EdgeSlot::mirrored)
        } else {
            None
        };
        let outgoing = match next {
            Some(next) => Some((direction_between(cell, next)?, closing_slot)),
            None => None,
        };

        steps.push(choose_step(cell, incoming, outgoing, selector)?);
    }

    if closed {
        let first_in = steps.first().and_then(|step| step.incoming);
        let last_out = steps.last().and_then(|step| step.outgoing).map(EdgeSlot::mirrored);
        if first_in != last_out {
            log::trace!("Loop {structure:?} failed to close");
            return None;
        }
    }

    Some(steps.into_iter().map(|step| step.placement).collect())
}

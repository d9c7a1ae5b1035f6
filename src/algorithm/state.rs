//! Search context and the mutable state cloned at every branch
//!
//! [`PuzzleContext`] holds everything derived once from a puzzle: slot
//! neighbors, which faces are shared with another orientation, support
//! relations and initial domains. [`SearchState`] holds what changes while
//! searching and is cheap enough to clone per branch.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::algorithm::bitset::VariantSet;
use crate::algorithm::connectivity::DisjointSets;
use crate::algorithm::puzzle::{Inventory, PuzzleMode, PuzzleSpec};
use crate::analysis::compatibility::{CompatibilityIndex, compatibility_index};
use crate::analysis::variants::{VariantKey, VariantTable, variant_table};
use crate::io::error::{PuzzleError, Result};
use crate::spatial::geometry::{Direction, Edge, Orientation, QuantizedPoint, offset_point};
use crate::spatial::grid::{Placement, Region, Slot, SlotGrid};
use crate::spatial::tiles::{ShapeId, tile_catalog};

/// A slot ran out of candidates; the current branch cannot be completed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contradiction {
    /// Linear index of the slot that failed
    pub slot: usize,
}

/// Facts about a puzzle that stay fixed during search
pub struct PuzzleContext {
    /// Slots tiles may occupy
    pub region: Region,
    /// Interaction mode
    pub mode: PuzzleMode,
    /// Shared variant table
    pub table: &'static VariantTable,
    /// Shared compatibility index
    pub index: &'static CompatibilityIndex,
    slots: Vec<Slot>,
    neighbors: Vec<[Option<usize>; 6]>,
    exclusive: Vec<[bool; 6]>,
    floor_below: Vec<Option<usize>>,
    walls_below: Vec<Vec<usize>>,
    shape_masks: BTreeMap<ShapeId, VariantSet>,
    initial_domains: Vec<VariantSet>,
    fixed: Vec<(usize, VariantKey)>,
    inventory: Inventory,
}

impl PuzzleContext {
    /// Derive the search context of a validated puzzle
    ///
    /// # Errors
    ///
    /// Returns an error if the puzzle description fails validation or a
    /// fixed placement has no variant.
    pub fn new(spec: &PuzzleSpec) -> Result<Self> {
        spec.validate()?;

        let table = variant_table();
        let index = compatibility_index();
        let region = spec.region.clone();
        let slots: Vec<Slot> = region.slots().collect();
        let universe = table.universe();

        let neighbors: Vec<[Option<usize>; 6]> = slots
            .iter()
            .map(|slot| {
                let mut row = [None; 6];
                for direction in slot.orientation.relevant_directions() {
                    if let Some(entry) = row.get_mut(direction.index()) {
                        *entry = region.linear_index(&slot.neighbor(direction));
                    }
                }
                row
            })
            .collect();

        let exclusive = exclusive_faces(&region, &slots);

        let floor_below = slots
            .iter()
            .map(|slot| {
                let [x, y, z] = slot.cell;
                if slot.orientation.is_edge_mounted() && y > 0 {
                    region.linear_index(&Slot::new([x, y - 1, z], Orientation::Flat))
                } else {
                    None
                }
            })
            .collect();

        let walls_below = slots
            .iter()
            .map(|slot| {
                let [x, y, z] = slot.cell;
                if slot.orientation.is_edge_mounted() || y == 0 {
                    return Vec::new();
                }
                Orientation::ALL
                    .into_iter()
                    .filter(|orientation| orientation.is_edge_mounted())
                    .filter_map(|orientation| {
                        region.linear_index(&Slot::new([x, y - 1, z], orientation))
                    })
                    .collect()
            })
            .collect();

        let shape_masks: BTreeMap<ShapeId, VariantSet> = spec
            .inventory
            .iter()
            .filter(|&(_, count)| count > 0)
            .map(|(shape, _)| {
                let keys = table.variants_of(shape).iter().copied();
                (shape, VariantSet::from_keys(universe, keys))
            })
            .collect();

        let mut by_orientation = [
            VariantSet::new(universe),
            VariantSet::new(universe),
            VariantSet::new(universe),
        ];
        for mask in shape_masks.values() {
            for key in mask.iter() {
                let Some(variant) = table.get(key) else {
                    continue;
                };
                if let Some(set) = by_orientation.get_mut(variant.orientation.index()) {
                    set.insert(key);
                }
            }
        }

        let mut fixed = Vec::with_capacity(spec.fixed.len());
        let mut fixed_slots = HashMap::new();
        for placement in &spec.fixed {
            let key = table
                .key_of(placement)
                .ok_or(PuzzleError::UnknownShape {
                    shape: placement.shape.0,
                    catalog_size: tile_catalog().len(),
                })?;
            if let Some(linear) = region.linear_index(&placement.slot) {
                fixed.push((linear, key));
                fixed_slots.insert(linear, key);
            }
        }

        let initial_domains = slots
            .iter()
            .enumerate()
            .map(|(linear, slot)| match fixed_slots.get(&linear) {
                Some(&key) => VariantSet::from_keys(universe, [key]),
                None => {
                    let mut domain = by_orientation
                        .get(slot.orientation.index())
                        .cloned()
                        .unwrap_or_else(|| VariantSet::new(universe));
                    domain.insert(VariantKey::EMPTY);
                    domain
                }
            })
            .collect();

        Ok(Self {
            region,
            mode: spec.mode,
            table,
            index,
            slots,
            neighbors,
            exclusive,
            floor_below,
            walls_below,
            shape_masks,
            initial_domains,
            fixed,
            inventory: spec.inventory.clone(),
        })
    }

    /// Number of slots
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Slot at a linear index
    pub fn slot(&self, linear: usize) -> Option<Slot> {
        self.slots.get(linear).copied()
    }

    /// Same-orientation neighbor inside the region
    pub fn neighbor(&self, linear: usize, direction: Direction) -> Option<usize> {
        self.neighbors.get(linear)?.get(direction.index()).copied().flatten()
    }

    /// Whether the face towards `direction` is shared only with the
    /// same-orientation neighbor
    pub fn is_exclusive(&self, linear: usize, direction: Direction) -> bool {
        self.exclusive
            .get(linear)
            .and_then(|row| row.get(direction.index()))
            .copied()
            .unwrap_or(false)
    }

    /// Floor slot a wall above ground rests on
    pub fn floor_below(&self, linear: usize) -> Option<usize> {
        self.floor_below.get(linear).copied().flatten()
    }

    /// Wall slots a floor tile above ground may rest on
    pub fn walls_below(&self, linear: usize) -> &[usize] {
        self.walls_below.get(linear).map_or(&[], Vec::as_slice)
    }

    /// Whether the slot is above ground and must rest on something
    pub fn needs_support(&self, linear: usize) -> bool {
        self.slot(linear).is_some_and(|slot| slot.cell[1] > 0)
    }

    /// Variants of each inventory shape
    pub const fn shape_masks(&self) -> &BTreeMap<ShapeId, VariantSet> {
        &self.shape_masks
    }

    /// Fixed placements by linear index
    pub fn fixed(&self) -> &[(usize, VariantKey)] {
        &self.fixed
    }

    /// Whether the slot holds a fixed placement
    pub fn is_fixed(&self, linear: usize) -> bool {
        self.fixed.iter().any(|&(slot, _)| slot == linear)
    }

    /// Inventory at the start of search
    pub const fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Bit universe of every domain
    pub fn universe(&self) -> usize {
        self.table.universe()
    }
}

/// Mark faces whose crease is shared with a slot of another orientation
///
/// Each tile edge is identified by its midpoint. A face is exclusive when no
/// slot of a different orientation in the region has an edge with the same
/// midpoint, which means only the same-orientation neighbor can meet it.
fn exclusive_faces(region: &Region, slots: &[Slot]) -> Vec<[bool; 6]> {
    let midpoint = |slot: &Slot, edge: Edge| -> QuantizedPoint {
        let (nu, nv) = edge.normal();
        let local = slot
            .orientation
            .embed(0.5 * f64::from(nu), 0.5 * f64::from(nv));
        QuantizedPoint::from_point(offset_point(slot.cell, local))
    };

    let mut creases: HashMap<QuantizedPoint, BTreeSet<Orientation>> = HashMap::new();
    for slot in slots {
        for edge in Edge::ALL {
            creases
                .entry(midpoint(slot, edge))
                .or_default()
                .insert(slot.orientation);
        }
    }

    let shared = region.orientations.len() > 1;
    slots
        .iter()
        .map(|slot| {
            let mut row = [false; 6];
            for edge in Edge::ALL {
                let direction = slot.orientation.edge_direction(edge);
                let exclusive = !shared
                    || creases
                        .get(&midpoint(slot, edge))
                        .is_none_or(|orientations| orientations.len() == 1);
                if let Some(entry) = row.get_mut(direction.index()) {
                    *entry = exclusive;
                }
            }
            row
        })
        .collect()
}

/// Branch-local search state
#[derive(Clone, Debug)]
pub struct SearchState {
    domains: SlotGrid<VariantSet>,
    assignment: SlotGrid<Option<VariantKey>>,
    inventory: Inventory,
    exhausted: BTreeSet<ShapeId>,
    components: DisjointSets,
    anchors: HashMap<QuantizedPoint, Vec<usize>>,
    placed: usize,
    undecided: usize,
}

impl SearchState {
    /// Fresh state with every slot undecided and the initial domains
    pub fn new(context: &PuzzleContext) -> Self {
        let mut domains = SlotGrid::new(&context.region, VariantSet::new(context.universe()));
        for (linear, domain) in context.initial_domains.iter().enumerate() {
            if let Some(entry) = domains.at_mut(linear) {
                entry.clone_from(domain);
            }
        }

        Self {
            domains,
            assignment: SlotGrid::new(&context.region, None),
            inventory: context.inventory.clone(),
            exhausted: BTreeSet::new(),
            components: DisjointSets::new(context.slot_count()),
            anchors: HashMap::new(),
            placed: 0,
            undecided: context.slot_count(),
        }
    }

    /// Candidate variants of a slot
    pub fn domain(&self, linear: usize) -> Option<&VariantSet> {
        self.domains.at(linear)
    }

    /// Mutable candidates of a slot
    pub fn domain_mut(&mut self, linear: usize) -> Option<&mut VariantSet> {
        self.domains.at_mut(linear)
    }

    /// Committed variant of a slot, if decided
    pub fn assigned(&self, linear: usize) -> Option<VariantKey> {
        self.assignment.at(linear).copied().flatten()
    }

    /// Whether the slot has been committed
    pub fn is_decided(&self, linear: usize) -> bool {
        self.assigned(linear).is_some()
    }

    /// Shapes still to place
    pub const fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Record that a shape's remaining copies have been pruned from domains
    pub fn mark_exhausted(&mut self, shape: ShapeId) -> bool {
        self.exhausted.insert(shape)
    }

    /// Number of real tiles committed
    pub const fn placed_count(&self) -> usize {
        self.placed
    }

    /// Number of slots not yet committed
    pub const fn undecided_count(&self) -> usize {
        self.undecided
    }

    /// Whether every slot is committed
    pub const fn is_complete(&self) -> bool {
        self.undecided == 0
    }

    /// Connected groups among committed tiles
    pub fn component_count(&self) -> usize {
        self.components.clone().component_count()
    }

    /// Commit a variant, or the empty marker, to a slot
    ///
    /// Fixed placements do not consume inventory. Committing a tile joins it
    /// to every placed tile it shares a connector point with.
    ///
    /// # Errors
    ///
    /// Returns a contradiction if the variant is not in the slot's domain,
    /// the slot is already committed to something else, the shape has no
    /// copies left, or a third connector would land on an occupied point.
    pub fn apply_placement(
        &mut self,
        context: &PuzzleContext,
        linear: usize,
        key: VariantKey,
        fixed: bool,
    ) -> std::result::Result<(), Contradiction> {
        let contradiction = Contradiction { slot: linear };

        match self.assigned(linear) {
            Some(existing) if existing == key => return Ok(()),
            Some(_) => return Err(contradiction),
            None => {}
        }

        let domain = self.domains.at_mut(linear).ok_or(contradiction)?;
        if !domain.contains(key) {
            return Err(contradiction);
        }
        *domain = VariantSet::from_keys(context.universe(), [key]);

        if let Some(entry) = self.assignment.at_mut(linear) {
            *entry = Some(key);
        }
        self.undecided = self.undecided.saturating_sub(1);

        if key.is_empty() {
            return Ok(());
        }

        let variant = context.table.get(key).ok_or(contradiction)?;
        if !fixed && !self.inventory.take(variant.shape) {
            return Err(contradiction);
        }

        let cell = context.slot(linear).ok_or(contradiction)?.cell;
        self.placed += 1;
        self.components.activate(linear);
        for connector in &variant.connectors {
            let anchor = self
                .anchors
                .entry(connector.world_position(cell))
                .or_default();
            if anchor.len() >= 2 {
                return Err(contradiction);
            }
            for &other in anchor.iter() {
                self.components.union(linear, other);
            }
            anchor.push(linear);
        }

        Ok(())
    }

    /// Points holding exactly one committed connector, with the slot of its tile
    ///
    /// Sorted by position.
    pub fn open_points(&self) -> Vec<(QuantizedPoint, usize)> {
        let mut open: Vec<(QuantizedPoint, usize)> = self
            .anchors
            .iter()
            .filter_map(|(&point, slots)| match slots.as_slice() {
                [slot] => Some((point, *slot)),
                _ => None,
            })
            .collect();
        open.sort_unstable();
        open
    }

    /// Points where two committed connectors already meet, sorted
    pub fn joined_points(&self) -> Vec<QuantizedPoint> {
        let mut joined: Vec<QuantizedPoint> = self
            .anchors
            .iter()
            .filter(|(_, slots)| slots.len() >= 2)
            .map(|(&point, _)| point)
            .collect();
        joined.sort_unstable();
        joined
    }

    /// Slots of committed tiles with a connector on `point`
    pub fn anchored_at(&self, point: QuantizedPoint) -> &[usize] {
        self.anchors.get(&point).map_or(&[], Vec::as_slice)
    }

    /// A committed tile whose group has no open connector left although the
    /// network is unfinished
    ///
    /// Such a group can never join the rest, so the branch is dead. The
    /// network is finished when the inventory is spent and every committed
    /// tile belongs to one group.
    pub fn sealed_group(&self) -> Option<usize> {
        if self.placed == 0 {
            return None;
        }
        let mut groups = self.components.clone();
        if self.inventory.is_empty() && groups.component_count() == 1 {
            return None;
        }

        let open_roots: BTreeSet<usize> = self
            .open_points()
            .into_iter()
            .map(|(_, slot)| groups.find(slot))
            .collect();
        for slot in 0..groups.len() {
            if groups.is_active(slot) && !open_roots.contains(&groups.find(slot)) {
                return Some(slot);
            }
        }
        None
    }

    /// Committed tiles as placements in slot order
    pub fn placements(&self, context: &PuzzleContext) -> Vec<Placement> {
        (0..context.slot_count())
            .filter_map(|linear| {
                let key = self.assigned(linear)?;
                let variant = context.table.get(key)?;
                Some(variant.placement(context.slot(linear)?))
            })
            .collect()
    }
}

//! Neighbor compatibility between variants
//!
//! For a variant `A`, a direction `D` relevant to its orientation, and a
//! same-orientation variant `B` one cell over in `D`, the pair is compatible
//! when the connectors of `A` facing `D` land exactly on the connectors of
//! `B` facing the opposite way. Two faces with no connectors are trivially
//! compatible, which is how the empty marker takes part in the relation.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::algorithm::bitset::VariantSet;
use crate::analysis::variants::{Variant, VariantKey, VariantTable, variant_table};
use crate::spatial::geometry::{Direction, Orientation, QuantizedPoint};

/// Connector positions on one face, relative to the reference cell
type FaceSignature = Vec<QuantizedPoint>;

/// Precomputed compatibility sets and connector lookup
pub struct CompatibilityIndex {
    universe: usize,
    allowed: Vec<[VariantSet; 6]>,
    facing: [VariantSet; 6],
    by_position: HashMap<(Orientation, QuantizedPoint), Vec<(VariantKey, usize)>>,
}

impl CompatibilityIndex {
    /// Build the index over every variant in the table
    ///
    /// Neighbors are grouped by the signature they present towards the
    /// reference cell, so each variant's set is one hash lookup instead of a
    /// pairwise scan.
    pub fn build(table: &VariantTable) -> Self {
        let universe = table.universe();
        let empty_row = || std::array::from_fn::<_, 6, _>(|_| VariantSet::new(universe));
        let mut allowed: Vec<[VariantSet; 6]> = (0..universe).map(|_| empty_row()).collect();
        let mut facing = empty_row();
        let mut by_position: HashMap<(Orientation, QuantizedPoint), Vec<(VariantKey, usize)>> =
            HashMap::new();

        for (key, variant) in table.iter() {
            for (index, connector) in variant.connectors.iter().enumerate() {
                if let Some(set) = facing.get_mut(connector.facing.index()) {
                    set.insert(key);
                }
                by_position
                    .entry((variant.orientation, connector.position))
                    .or_default()
                    .push((key, index));
            }
        }

        let no_connectors: FaceSignature = Vec::new();
        for orientation in Orientation::ALL {
            let keys = table.with_orientation(orientation);
            for direction in orientation.relevant_directions() {
                let mut incoming: HashMap<FaceSignature, VariantSet> = HashMap::new();
                incoming
                    .entry(no_connectors.clone())
                    .or_insert_with(|| VariantSet::new(universe))
                    .insert(VariantKey::EMPTY);
                for &key in keys {
                    if let Some(variant) = table.get(key) {
                        incoming
                            .entry(incoming_signature(variant, direction))
                            .or_insert_with(|| VariantSet::new(universe))
                            .insert(key);
                    }
                }

                for &key in keys {
                    let Some(variant) = table.get(key) else {
                        continue;
                    };
                    let outgoing = outgoing_signature(variant, direction);
                    if let (Some(group), Some(row)) =
                        (incoming.get(&outgoing), allowed.get_mut(key.index()))
                    {
                        if let Some(set) = row.get_mut(direction.index()) {
                            set.union_with(group);
                        }
                    }
                }

                // The empty marker borders anything presenting no connectors back at it
                if let (Some(group), Some(row)) = (
                    incoming.get(&no_connectors),
                    allowed.get_mut(VariantKey::EMPTY.index()),
                ) {
                    if let Some(set) = row.get_mut(direction.index()) {
                        set.union_with(group);
                    }
                }
            }
        }

        if let Some(row) = allowed.first_mut() {
            for set in row.iter_mut() {
                set.insert(VariantKey::EMPTY);
            }
        }

        log::debug!(
            "Built compatibility index over {} variants ({} connector positions)",
            universe - 1,
            by_position.len()
        );

        Self {
            universe,
            allowed,
            facing,
            by_position,
        }
    }

    /// Variants allowed one cell over in `direction`
    ///
    /// Empty for directions irrelevant to the variant's orientation.
    pub fn allowed(&self, key: VariantKey, direction: Direction) -> Option<&VariantSet> {
        self.allowed.get(key.index())?.get(direction.index())
    }

    /// Whether `neighbor` may sit one cell over from `key` in `direction`
    pub fn is_compatible(&self, key: VariantKey, direction: Direction, neighbor: VariantKey) -> bool {
        self.allowed(key, direction)
            .is_some_and(|set| set.contains(neighbor))
    }

    /// Union of allowed neighbors over every member of a domain
    pub fn support_of(&self, domain: &VariantSet, direction: Direction) -> VariantSet {
        let mut support = VariantSet::new(self.universe);
        for key in domain.iter() {
            if let Some(set) = self.allowed(key, direction) {
                support.union_with(set);
            }
        }
        support
    }

    /// Every variant with a connector facing `direction`
    pub fn facing_mask(&self, direction: Direction) -> Option<&VariantSet> {
        self.facing.get(direction.index())
    }

    /// Variants of an orientation with a connector at a cell-relative position,
    /// paired with the connector's index
    pub fn variants_at(
        &self,
        orientation: Orientation,
        position: QuantizedPoint,
    ) -> &[(VariantKey, usize)] {
        self.by_position
            .get(&(orientation, position))
            .map_or(&[], Vec::as_slice)
    }

    /// Bit universe of every set in the index
    pub const fn universe(&self) -> usize {
        self.universe
    }
}

fn outgoing_signature(variant: &Variant, direction: Direction) -> FaceSignature {
    let mut signature: FaceSignature = variant
        .facing(direction)
        .map(|connector| connector.position)
        .collect();
    signature.sort_unstable();
    signature
}

fn incoming_signature(variant: &Variant, direction: Direction) -> FaceSignature {
    let shift = QuantizedPoint::from_cell(direction.unit());
    let mut signature: FaceSignature = variant
        .facing(direction.opposite())
        .map(|connector| connector.position.add(shift))
        .collect();
    signature.sort_unstable();
    signature
}

/// Build a standalone index over a table
pub fn build_index(table: &VariantTable) -> CompatibilityIndex {
    CompatibilityIndex::build(table)
}

static INDEX: LazyLock<CompatibilityIndex> =
    LazyLock::new(|| CompatibilityIndex::build(variant_table()));

/// Shared compatibility index built on first use
pub fn compatibility_index() -> &'static CompatibilityIndex {
    &INDEX
}

//! Variant precompute: every distinct placed form of every catalog shape
//!
//! A variant is a shape under one `(orientation, rotation, mirror)`
//! combination, with its connectors resolved to cell-relative positions and
//! the world direction each one faces. Combinations producing identical
//! connector sets within an orientation collapse into a single variant.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::io::configuration::{CONNECTOR_OFFSET, FACE_THRESHOLD};
use crate::spatial::geometry::{
    Cell, Direction, Edge, Orientation, Point, QuantizedPoint, Rotation, offset_point,
};
use crate::spatial::grid::{Placement, Slot};
use crate::spatial::tiles::{
    EdgeSlot, ShapeId, TileCatalog, TileShape, tile_catalog, transform_combinations,
};

/// Dense identifier of a variant
///
/// Key `0` is reserved for the empty marker meaning "no tile in this slot".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariantKey(pub u16);

impl VariantKey {
    /// Marker for a slot decided to hold nothing
    pub const EMPTY: Self = Self(0);

    /// Whether this is the empty marker
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Bit position in a [`crate::algorithm::bitset::VariantSet`]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Connector of a placed variant, relative to its cell origin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connector {
    /// Offset from the cell's minimum corner
    pub offset: Point,
    /// Quantized offset used for matching
    pub position: QuantizedPoint,
    /// Direction the connector faces
    pub facing: Direction,
    /// Slot kind on the transformed edge
    pub slot: EdgeSlot,
}

impl Connector {
    /// Quantized world position when the owning tile sits in `cell`
    pub fn world_position(&self, cell: Cell) -> QuantizedPoint {
        self.position.add(QuantizedPoint::from_cell(cell))
    }

    /// Continuous world position when the owning tile sits in `cell`
    pub fn world_point(&self, cell: Cell) -> Point {
        offset_point(cell, self.offset)
    }
}

/// A shape in one distinct placed form
#[derive(Clone, Debug)]
pub struct Variant {
    /// Catalog shape
    pub shape: ShapeId,
    /// Representative rotation
    pub rotation: Rotation,
    /// Representative mirror flag
    pub mirrored: bool,
    /// Mounting orientation
    pub orientation: Orientation,
    /// Edge slots after mirror and rotation, `[top, right, bottom, left]`
    pub edges: [EdgeSlot; 4],
    /// Connectors sorted by position
    pub connectors: Vec<Connector>,
    /// Every `(rotation, mirrored)` pair that yields this variant
    pub aliases: Vec<(Rotation, bool)>,
}

impl Variant {
    /// Connectors facing a direction
    pub fn facing(&self, direction: Direction) -> impl Iterator<Item = &Connector> + '_ {
        self.connectors
            .iter()
            .filter(move |connector| connector.facing == direction)
    }

    /// Whether some connector faces the direction
    pub fn has_connector_facing(&self, direction: Direction) -> bool {
        self.facing(direction).next().is_some()
    }

    /// Placement of this variant's representative form in a slot
    pub const fn placement(&self, slot: Slot) -> Placement {
        Placement {
            slot,
            shape: self.shape,
            rotation: self.rotation,
            mirrored: self.mirrored,
        }
    }

    fn signature(&self) -> Vec<(QuantizedPoint, Direction)> {
        self.connectors
            .iter()
            .map(|connector| (connector.position, connector.facing))
            .collect()
    }
}

/// Local-frame position of the connector on `edge`, before any transform
pub fn local_connector_position(edge: Edge, slot: EdgeSlot) -> Option<(f64, f64)> {
    if !slot.is_connector() {
        return None;
    }
    let (nu, nv) = edge.normal();
    let (lu, lv) = edge.along_left();
    let shift = slot.side_sign() * CONNECTOR_OFFSET;
    Some((
        0.5 * f64::from(nu) + shift * f64::from(lu),
        0.5 * f64::from(nv) + shift * f64::from(lv),
    ))
}

/// Direction an embedded offset faces within an orientation, if any
pub fn classify_facing(offset: Point, orientation: Orientation) -> Option<Direction> {
    orientation.relevant_directions().into_iter().find(|direction| {
        let centered = offset.get(direction.axis()).copied().unwrap_or(0.5) - 0.5;
        if direction.is_positive() {
            centered > FACE_THRESHOLD
        } else {
            centered < -FACE_THRESHOLD
        }
    })
}

fn resolve_connectors(
    shape: &TileShape,
    orientation: Orientation,
    rotation: Rotation,
    mirrored: bool,
) -> Vec<Connector> {
    let transformed = shape.transformed(rotation, mirrored);
    let mut connectors: Vec<Connector> = Edge::ALL
        .into_iter()
        .filter_map(|edge| {
            let (u, v) = local_connector_position(edge, shape.edge(edge))?;
            let u = if mirrored { -u } else { u };
            let (u, v) = rotation.apply(u, v);
            let offset = orientation.embed(u, v);
            let facing = classify_facing(offset, orientation)?;
            let position = QuantizedPoint::from_point(offset);
            let slot = Edge::ALL
                .into_iter()
                .find(|&candidate| orientation.edge_direction(candidate) == facing)
                .map_or(EdgeSlot::None, |candidate| transformed.edge(candidate));
            Some(Connector {
                offset,
                position,
                facing,
                slot,
            })
        })
        .collect();
    connectors.sort_by_key(|connector| connector.position);
    connectors
}

/// Enumerate the distinct variants of one shape across all orientations
///
/// Combinations are visited orientation by orientation, unmirrored before
/// mirrored and in increasing rotation, so the first combination reaching a
/// connector set becomes that variant's representative.
pub fn compute_variants(shape_id: ShapeId, shape: &TileShape) -> Vec<Variant> {
    let mut variants: Vec<Variant> = Vec::new();

    for orientation in Orientation::ALL {
        let first_of_orientation = variants.len();
        for (rotation, mirrored) in transform_combinations() {
            let connectors = resolve_connectors(shape, orientation, rotation, mirrored);
            let candidate = Variant {
                shape: shape_id,
                rotation,
                mirrored,
                orientation,
                edges: shape.transformed(rotation, mirrored).edges(),
                connectors,
                aliases: vec![(rotation, mirrored)],
            };
            let signature = candidate.signature();

            let existing = variants
                .iter_mut()
                .skip(first_of_orientation)
                .find(|variant| variant.signature() == signature);
            match existing {
                Some(variant) => variant.aliases.push((rotation, mirrored)),
                None => variants.push(candidate),
            }
        }
    }

    variants
}

/// All variants of the catalog with dense keys and lookup tables
pub struct VariantTable {
    variants: Vec<Variant>,
    lookup: HashMap<(ShapeId, Orientation, Rotation, bool), VariantKey>,
    by_shape: Vec<Vec<VariantKey>>,
    by_orientation: [Vec<VariantKey>; 3],
}

impl VariantTable {
    /// Precompute variants for every catalog shape
    ///
    /// Keys are assigned from `1` in catalog order, leaving `0` for the
    /// empty marker.
    pub fn build(catalog: &TileCatalog) -> Self {
        let mut variants = Vec::new();
        let mut lookup = HashMap::new();
        let mut by_shape = Vec::with_capacity(catalog.len());
        let mut by_orientation: [Vec<VariantKey>; 3] = Default::default();

        for (shape_id, shape) in catalog.iter() {
            let mut keys = Vec::new();
            for variant in compute_variants(shape_id, shape) {
                let Ok(raw) = u16::try_from(variants.len() + 1) else {
                    break;
                };
                let key = VariantKey(raw);
                for &(rotation, mirrored) in &variant.aliases {
                    lookup.insert((shape_id, variant.orientation, rotation, mirrored), key);
                }
                if let Some(bucket) = by_orientation.get_mut(variant.orientation.index()) {
                    bucket.push(key);
                }
                keys.push(key);
                variants.push(variant);
            }
            by_shape.push(keys);
        }

        log::debug!(
            "Precomputed {} variants for {} shapes",
            variants.len(),
            catalog.len()
        );

        Self {
            variants,
            lookup,
            by_shape,
            by_orientation,
        }
    }

    /// Variant stored under a key; `None` for the empty marker
    pub fn get(&self, key: VariantKey) -> Option<&Variant> {
        self.variants.get(key.index().checked_sub(1)?)
    }

    /// Key of the variant produced by a combination
    pub fn lookup(
        &self,
        shape: ShapeId,
        orientation: Orientation,
        rotation: Rotation,
        mirrored: bool,
    ) -> Option<VariantKey> {
        self.lookup
            .get(&(shape, orientation, rotation, mirrored))
            .copied()
    }

    /// Key of the variant a placement uses
    pub fn key_of(&self, placement: &Placement) -> Option<VariantKey> {
        self.lookup(
            placement.shape,
            placement.orientation(),
            placement.rotation,
            placement.mirrored,
        )
    }

    /// Keys of every variant of a shape
    pub fn variants_of(&self, shape: ShapeId) -> &[VariantKey] {
        self.by_shape.get(shape.index()).map_or(&[], Vec::as_slice)
    }

    /// Keys of every variant mounted in an orientation
    pub fn with_orientation(&self, orientation: Orientation) -> &[VariantKey] {
        self.by_orientation
            .get(orientation.index())
            .map_or(&[], Vec::as_slice)
    }

    /// Number of combinations collapsing onto each variant of a shape
    pub fn symmetry_order(&self, shape: ShapeId) -> usize {
        let count = self.variants_of(shape).len();
        if count == 0 { 0 } else { 24 / count }
    }

    /// Number of real variants
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Whether the table holds no variants
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Bit universe needed to store any key including the empty marker
    pub fn universe(&self) -> usize {
        self.variants.len() + 1
    }

    /// Keys paired with their variants
    pub fn iter(&self) -> impl Iterator<Item = (VariantKey, &Variant)> {
        self.variants
            .iter()
            .enumerate()
            .filter_map(|(index, variant)| {
                u16::try_from(index + 1)
                    .ok()
                    .map(|raw| (VariantKey(raw), variant))
            })
    }
}

static TABLE: LazyLock<VariantTable> = LazyLock::new(|| VariantTable::build(tile_catalog()));

/// Shared variant table built on first use
pub fn variant_table() -> &'static VariantTable {
    &TABLE
}

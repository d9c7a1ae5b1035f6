//! Tile shapes, symmetry transforms and the canonical catalog
//!
//! A tile is a square with four edges. Each edge carries at most one
//! connector slot, placed left of, at, or right of the edge midpoint as seen
//! looking outward through the edge. Shapes that coincide under one of the
//! eight square symmetries are the same shape; the catalog keeps one
//! canonical representative per class with a stable identifier.

use crate::spatial::geometry::{Edge, Rotation};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::LazyLock;

/// Connector slot on one tile edge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeSlot {
    /// No connector
    None,
    /// Left of the midpoint, looking outward
    Left,
    /// At the midpoint
    Middle,
    /// Right of the midpoint, looking outward
    Right,
}

impl EdgeSlot {
    /// All slot values in encoding order
    pub const ALL: [Self; 4] = [Self::None, Self::Left, Self::Middle, Self::Right];

    /// Numeric code used for canonical ordering
    pub const fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Left => 1,
            Self::Middle => 2,
            Self::Right => 3,
        }
    }

    /// Whether the edge carries a connector
    pub const fn is_connector(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Slot seen through a mirror, which swaps left and right
    #[must_use]
    pub const fn mirrored(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            other => other,
        }
    }

    /// Multiplier along the edge's left vector
    pub const fn side_sign(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
            Self::None | Self::Middle => 0.0,
        }
    }

    /// Character used in the compact notation
    pub const fn symbol(self) -> char {
        match self {
            Self::None => '.',
            Self::Left => 'L',
            Self::Middle => 'M',
            Self::Right => 'R',
        }
    }

    /// Parse a notation character
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' | 'N' => Some(Self::None),
            'L' => Some(Self::Left),
            'M' => Some(Self::Middle),
            'R' => Some(Self::Right),
            _ => None,
        }
    }
}

/// Four edge slots in `[top, right, bottom, left]` order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileShape {
    edges: [EdgeSlot; 4],
}

impl TileShape {
    /// Build a shape from its edges in `[top, right, bottom, left]` order
    pub const fn new(edges: [EdgeSlot; 4]) -> Self {
        Self { edges }
    }

    /// Parse the compact notation, e.g. `"M.M."` for a straight
    pub fn parse(notation: &str) -> Option<Self> {
        let mut edges = [EdgeSlot::None; 4];
        let mut symbols = notation.chars();
        for edge in &mut edges {
            *edge = EdgeSlot::from_symbol(symbols.next()?)?;
        }
        if symbols.next().is_some() {
            return None;
        }
        Some(Self { edges })
    }

    /// Edge slots in `[top, right, bottom, left]` order
    pub const fn edges(&self) -> [EdgeSlot; 4] {
        self.edges
    }

    /// Slot on one edge
    pub const fn edge(&self, edge: Edge) -> EdgeSlot {
        self.edges[edge.index()]
    }

    /// Number of edges carrying a connector
    pub fn connector_count(&self) -> usize {
        self.edges.iter().filter(|slot| slot.is_connector()).count()
    }

    /// Serialized key used for canonical ordering
    pub fn key(&self) -> [u8; 4] {
        self.edges.map(EdgeSlot::code)
    }

    /// Rotate a quarter turn counter-clockwise
    ///
    /// The old top edge becomes the new left edge. Slot sides are preserved
    /// because rotation keeps handedness.
    #[must_use]
    pub const fn rotated_once(&self) -> Self {
        let [top, right, bottom, left] = self.edges;
        Self {
            edges: [right, bottom, left, top],
        }
    }

    /// Rotate by an arbitrary quarter-turn count
    #[must_use]
    pub fn rotated(&self, rotation: Rotation) -> Self {
        (0..rotation.quarter_turns()).fold(*self, |shape, _| shape.rotated_once())
    }

    /// Reflect across the vertical axis
    ///
    /// Left and right edges trade places and every slot swaps handedness.
    #[must_use]
    pub const fn mirrored(&self) -> Self {
        let [top, right, bottom, left] = self.edges;
        Self {
            edges: [
                top.mirrored(),
                left.mirrored(),
                bottom.mirrored(),
                right.mirrored(),
            ],
        }
    }

    /// Apply an optional mirror followed by a rotation
    #[must_use]
    pub fn transformed(&self, rotation: Rotation, mirrored: bool) -> Self {
        let base = if mirrored { self.mirrored() } else { *self };
        base.rotated(rotation)
    }

    /// All eight images under the square's symmetry group
    pub fn symmetry_images(&self) -> [Self; 8] {
        let mut images = [*self; 8];
        for (image, (rotation, mirrored)) in images.iter_mut().zip(transform_combinations()) {
            *image = self.transformed(rotation, mirrored);
        }
        images
    }

    /// Representative with the lexicographically smallest key
    #[must_use]
    pub fn canonical(&self) -> Self {
        self.symmetry_images()
            .into_iter()
            .min_by_key(Self::key)
            .unwrap_or(*self)
    }

    /// Whether this shape is its own class representative
    pub fn is_canonical(&self) -> bool {
        self.canonical() == *self
    }

    /// Number of distinct images under rotation and mirroring
    pub fn distinct_images(&self) -> usize {
        self.symmetry_images()
            .iter()
            .map(Self::key)
            .collect::<BTreeSet<_>>()
            .len()
    }
}

impl fmt::Display for TileShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for slot in self.edges {
            write!(f, "{}", slot.symbol())?;
        }
        Ok(())
    }
}

/// All eight `(rotation, mirrored)` combinations, unmirrored first
pub fn transform_combinations() -> impl Iterator<Item = (Rotation, bool)> {
    [false, true]
        .into_iter()
        .flat_map(|mirrored| Rotation::ALL.into_iter().map(move |rotation| (rotation, mirrored)))
}

/// Stable identifier of a canonical shape within the catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u16);

impl ShapeId {
    /// Position in the catalog
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Deduplicated set of tile shapes
///
/// Identifiers follow the ascending order of canonical keys, so they are
/// stable across runs and platforms.
pub struct TileCatalog {
    shapes: Vec<TileShape>,
    ids: HashMap<TileShape, ShapeId>,
}

impl TileCatalog {
    /// Enumerate every edge assignment with at least one connector and keep one
    /// representative per symmetry class
    pub fn build() -> Self {
        let mut canonical = BTreeSet::new();
        for top in EdgeSlot::ALL {
            for right in EdgeSlot::ALL {
                for bottom in EdgeSlot::ALL {
                    for left in EdgeSlot::ALL {
                        let shape = TileShape::new([top, right, bottom, left]);
                        if shape.connector_count() > 0 {
                            canonical.insert(shape.canonical().key());
                        }
                    }
                }
            }
        }

        let shapes: Vec<TileShape> = canonical
            .into_iter()
            .map(|key| TileShape::new(key.map(decode_slot)))
            .collect();

        let ids = shapes
            .iter()
            .enumerate()
            .map(|(index, shape)| (*shape, ShapeId(index as u16)))
            .collect();

        Self { shapes, ids }
    }

    /// Canonical shapes in identifier order
    pub fn shapes(&self) -> &[TileShape] {
        &self.shapes
    }

    /// Look up a shape by identifier
    pub fn get(&self, id: ShapeId) -> Option<&TileShape> {
        self.shapes.get(id.index())
    }

    /// Identifier of the class containing `shape`, in any orientation
    pub fn id_of(&self, shape: &TileShape) -> Option<ShapeId> {
        self.ids.get(&shape.canonical()).copied()
    }

    /// Number of canonical shapes
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Identifiers paired with their shapes
    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &TileShape)> {
        self.shapes
            .iter()
            .enumerate()
            .map(|(index, shape)| (ShapeId(index as u16), shape))
    }
}

const fn decode_slot(code: u8) -> EdgeSlot {
    match code {
        1 => EdgeSlot::Left,
        2 => EdgeSlot::Middle,
        3 => EdgeSlot::Right,
        _ => EdgeSlot::None,
    }
}

static CATALOG: LazyLock<TileCatalog> = LazyLock::new(TileCatalog::build);

/// Shared catalog built on first use
pub fn tile_catalog() -> &'static TileCatalog {
    &CATALOG
}

/// Canonical shapes with stable identifiers equal to their positions
pub fn enumerate_tile_catalog() -> &'static [TileShape] {
    tile_catalog().shapes()
}

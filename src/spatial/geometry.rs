//! Coordinate frames, axis directions and the transforms between them
//!
//! Tiles are described in a local 2D frame `(u, v)` centered on the tile with
//! edges at `±0.5`. A variant applies mirror, then rotation, then embeds the
//! result into the 3D cell according to its mounting orientation. Cells are
//! unit cubes addressed by their minimum corner with `y` pointing up.

use crate::io::configuration::POSITION_SCALE;

/// Integer cell coordinate `(x, y, z)`
pub type Cell = [i32; 3];

/// Continuous 3D position or offset
pub type Point = [f64; 3];

/// One of the six axis-aligned directions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Towards increasing `x`
    PosX,
    /// Towards decreasing `x`
    NegX,
    /// Up
    PosY,
    /// Down
    NegY,
    /// Towards increasing `z`
    PosZ,
    /// Towards decreasing `z`
    NegZ,
}

impl Direction {
    /// All six directions in index order
    pub const ALL: [Self; 6] = [
        Self::PosX,
        Self::NegX,
        Self::PosY,
        Self::NegY,
        Self::PosZ,
        Self::NegZ,
    ];

    /// Stable index in `0..6`
    pub const fn index(self) -> usize {
        match self {
            Self::PosX => 0,
            Self::NegX => 1,
            Self::PosY => 2,
            Self::NegY => 3,
            Self::PosZ => 4,
            Self::NegZ => 5,
        }
    }

    /// The direction pointing the other way along the same axis
    pub const fn opposite(self) -> Self {
        match self {
            Self::PosX => Self::NegX,
            Self::NegX => Self::PosX,
            Self::PosY => Self::NegY,
            Self::NegY => Self::PosY,
            Self::PosZ => Self::NegZ,
            Self::NegZ => Self::PosZ,
        }
    }

    /// Axis index (`0` = x, `1` = y, `2` = z)
    pub const fn axis(self) -> usize {
        match self {
            Self::PosX | Self::NegX => 0,
            Self::PosY | Self::NegY => 1,
            Self::PosZ | Self::NegZ => 2,
        }
    }

    /// Whether the direction points along the positive axis
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::PosX | Self::PosY | Self::PosZ)
    }

    /// Unit step between neighboring cells
    pub const fn unit(self) -> Cell {
        match self {
            Self::PosX => [1, 0, 0],
            Self::NegX => [-1, 0, 0],
            Self::PosY => [0, 1, 0],
            Self::NegY => [0, -1, 0],
            Self::PosZ => [0, 0, 1],
            Self::NegZ => [0, 0, -1],
        }
    }

    /// Short label used in logs and rendered listings
    pub const fn label(self) -> &'static str {
        match self {
            Self::PosX => "+X",
            Self::NegX => "-X",
            Self::PosY => "+Y",
            Self::NegY => "-Y",
            Self::PosZ => "+Z",
            Self::NegZ => "-Z",
        }
    }
}

/// Offset a cell by one step in a direction
pub const fn step(cell: Cell, direction: Direction) -> Cell {
    let unit = direction.unit();
    [cell[0] + unit[0], cell[1] + unit[1], cell[2] + unit[2]]
}

/// One of the four edges of a tile in its local frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Edge {
    /// `v = +0.5`
    Top,
    /// `u = +0.5`
    Right,
    /// `v = -0.5`
    Bottom,
    /// `u = -0.5`
    Left,
}

impl Edge {
    /// Edges in serialization order
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// Position in the serialized edge tuple
    pub const fn index(self) -> usize {
        match self {
            Self::Top => 0,
            Self::Right => 1,
            Self::Bottom => 2,
            Self::Left => 3,
        }
    }

    /// Outward normal in the local frame
    pub const fn normal(self) -> (i32, i32) {
        match self {
            Self::Top => (0, 1),
            Self::Right => (1, 0),
            Self::Bottom => (0, -1),
            Self::Left => (-1, 0),
        }
    }

    /// Direction that is "left" when looking outward through this edge
    pub const fn along_left(self) -> (i32, i32) {
        let (nu, nv) = self.normal();
        (-nv, nu)
    }
}

/// Rotation of a tile about its center, counter-clockwise in the local frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rotation {
    /// No rotation
    R0,
    /// Quarter turn
    R90,
    /// Half turn
    R180,
    /// Three quarter turns
    R270,
}

impl Rotation {
    /// All rotations in increasing angle
    pub const ALL: [Self; 4] = [Self::R0, Self::R90, Self::R180, Self::R270];

    /// Number of counter-clockwise quarter turns
    pub const fn quarter_turns(self) -> u8 {
        match self {
            Self::R0 => 0,
            Self::R90 => 1,
            Self::R180 => 2,
            Self::R270 => 3,
        }
    }

    /// Build from a quarter-turn count, wrapping modulo four
    pub const fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => Self::R0,
            1 => Self::R90,
            2 => Self::R180,
            _ => Self::R270,
        }
    }

    /// Angle in degrees
    pub const fn degrees(self) -> u16 {
        self.quarter_turns() as u16 * 90
    }

    /// Rotate a local point using exact integer sine and cosine
    pub fn apply(self, u: f64, v: f64) -> (f64, f64) {
        let (cos, sin) = match self {
            Self::R0 => (1.0, 0.0),
            Self::R90 => (0.0, 1.0),
            Self::R180 => (-1.0, 0.0),
            Self::R270 => (0.0, -1.0),
        };
        (u * cos - v * sin, u * sin + v * cos)
    }
}

/// How a tile is mounted inside its cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    /// Lies in the horizontal plane at the cell's base
    Flat,
    /// Stands on the cell's low-x face, spanning y and z
    EdgeAlongX,
    /// Stands on the cell's low-z face, spanning x and y
    EdgeAlongZ,
}

impl Orientation {
    /// All mounting orientations in index order
    pub const ALL: [Self; 3] = [Self::Flat, Self::EdgeAlongX, Self::EdgeAlongZ];

    /// Stable index in `0..3`
    pub const fn index(self) -> usize {
        match self {
            Self::Flat => 0,
            Self::EdgeAlongX => 1,
            Self::EdgeAlongZ => 2,
        }
    }

    /// Whether the tile stands upright
    pub const fn is_edge_mounted(self) -> bool {
        !matches!(self, Self::Flat)
    }

    /// World direction of each local edge, in [`Edge::ALL`] order
    pub const fn edge_directions(self) -> [Direction; 4] {
        match self {
            Self::Flat => [
                Direction::PosZ,
                Direction::PosX,
                Direction::NegZ,
                Direction::NegX,
            ],
            Self::EdgeAlongX => [
                Direction::PosY,
                Direction::PosZ,
                Direction::NegY,
                Direction::NegZ,
            ],
            Self::EdgeAlongZ => [
                Direction::PosY,
                Direction::PosX,
                Direction::NegY,
                Direction::NegX,
            ],
        }
    }

    /// World direction an unrotated local edge points to
    pub const fn edge_direction(self, edge: Edge) -> Direction {
        self.edge_directions()[edge.index()]
    }

    /// The four directions a tile mounted this way can connect along
    pub const fn relevant_directions(self) -> [Direction; 4] {
        self.edge_directions()
    }

    /// Whether connectors of this orientation can face `direction`
    pub fn is_relevant(self, direction: Direction) -> bool {
        self.relevant_directions().contains(&direction)
    }

    /// Embed a local point into an offset relative to the cell origin
    pub const fn embed(self, u: f64, v: f64) -> Point {
        match self {
            Self::Flat => [0.5 + u, 0.0, 0.5 + v],
            Self::EdgeAlongX => [0.0, 0.5 + v, 0.5 + u],
            Self::EdgeAlongZ => [0.5 + u, 0.5 + v, 0.0],
        }
    }

    /// Short label used in rendered listings
    pub const fn label(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::EdgeAlongX => "wall-x",
            Self::EdgeAlongZ => "wall-z",
        }
    }
}

/// Position rounded to the comparison tolerance
///
/// Two positions closer than the tolerance quantize to the same value, so
/// quantized points can be used directly as hash keys for connector lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuantizedPoint(pub [i64; 3]);

impl QuantizedPoint {
    /// Quantize a continuous position
    pub fn from_point(point: Point) -> Self {
        Self(point.map(|coordinate| (coordinate * POSITION_SCALE).round() as i64))
    }

    /// Quantized position of a cell origin
    pub fn from_cell(cell: Cell) -> Self {
        Self(cell.map(|coordinate| i64::from(coordinate) * POSITION_SCALE as i64))
    }

    /// Continuous position this value stands for
    pub fn to_point(self) -> Point {
        self.0.map(|coordinate| coordinate as f64 / POSITION_SCALE)
    }

    /// Component-wise sum
    #[must_use]
    pub const fn add(self, other: Self) -> Self {
        Self([
            self.0[0] + other.0[0],
            self.0[1] + other.0[1],
            self.0[2] + other.0[2],
        ])
    }

    /// Component-wise difference
    #[must_use]
    pub const fn sub(self, other: Self) -> Self {
        Self([
            self.0[0] - other.0[0],
            self.0[1] - other.0[1],
            self.0[2] - other.0[2],
        ])
    }

    /// Cells whose closed unit cube contains this position
    ///
    /// A coordinate lying exactly on a cell boundary belongs to the cells on
    /// both sides, so a point on an edge line touches up to four cells and a
    /// corner up to eight.
    pub fn touching_cells(self) -> Vec<Cell> {
        let scale = POSITION_SCALE as i64;
        let per_axis: Vec<Vec<i32>> = self
            .0
            .iter()
            .map(|&coordinate| {
                let base = coordinate.div_euclid(scale) as i32;
                if coordinate.rem_euclid(scale) == 0 {
                    vec![base - 1, base]
                } else {
                    vec![base]
                }
            })
            .collect();

        let mut cells = Vec::new();
        let empty = Vec::new();
        let xs = per_axis.first().unwrap_or(&empty);
        let ys = per_axis.get(1).unwrap_or(&empty);
        let zs = per_axis.get(2).unwrap_or(&empty);
        for &x in xs {
            for &y in ys {
                for &z in zs {
                    cells.push([x, y, z]);
                }
            }
        }
        cells
    }
}

/// Add a cell origin to an offset
pub fn offset_point(cell: Cell, offset: Point) -> Point {
    [
        f64::from(cell[0]) + offset[0],
        f64::from(cell[1]) + offset[1],
        f64::from(cell[2]) + offset[2],
    ]
}


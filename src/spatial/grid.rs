//! Slots, placements and dense per-slot storage over a bounded region
//!
//! A slot is a cell paired with a mounting orientation. The region enumerates
//! its slots in a fixed linear order (x, then y, then z, then orientation,
//! outermost first), which matches the standard layout of the backing
//! `Array4` so that linear and coordinate access agree.

use ndarray::Array4;

use crate::io::configuration::MAX_REGION_SLOTS;
use crate::io::error::{PuzzleError, Result};
use crate::spatial::geometry::{Cell, Direction, Orientation, Rotation, step};
use crate::spatial::tiles::ShapeId;

/// Position a tile can occupy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    /// Cell coordinate
    pub cell: Cell,
    /// Mounting orientation within the cell
    pub orientation: Orientation,
}

impl Slot {
    /// Create a slot
    pub const fn new(cell: Cell, orientation: Orientation) -> Self {
        Self { cell, orientation }
    }

    /// Same-orientation slot one cell over
    #[must_use]
    pub const fn neighbor(&self, direction: Direction) -> Self {
        Self {
            cell: step(self.cell, direction),
            orientation: self.orientation,
        }
    }
}

/// A tile committed to a slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Placement {
    /// Where the tile sits
    pub slot: Slot,
    /// Which catalog shape it is
    pub shape: ShapeId,
    /// Counter-clockwise rotation applied after the mirror
    pub rotation: Rotation,
    /// Whether the shape is mirrored
    pub mirrored: bool,
}

impl Placement {
    /// Create a placement from its parts
    pub const fn new(
        cell: Cell,
        orientation: Orientation,
        shape: ShapeId,
        rotation: Rotation,
        mirrored: bool,
    ) -> Self {
        Self {
            slot: Slot::new(cell, orientation),
            shape,
            rotation,
            mirrored,
        }
    }

    /// Cell the tile occupies
    pub const fn cell(&self) -> Cell {
        self.slot.cell
    }

    /// Mounting orientation
    pub const fn orientation(&self) -> Orientation {
        self.slot.orientation
    }
}

/// Inclusive box of cells with the orientations allowed in each
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    /// Minimum corner (inclusive)
    pub min: Cell,
    /// Maximum corner (inclusive)
    pub max: Cell,
    /// Allowed orientations, sorted and unique
    pub orientations: Vec<Orientation>,
}

impl Region {
    /// Create a region, normalizing the orientation list
    pub fn new(min: Cell, max: Cell, orientations: &[Orientation]) -> Self {
        let mut orientations = orientations.to_vec();
        orientations.sort_unstable();
        orientations.dedup();
        Self {
            min,
            max,
            orientations,
        }
    }

    /// Single-level region of flat slots at `y = 0`
    pub fn flat(width: i32, depth: i32) -> Self {
        Self::new(
            [0, 0, 0],
            [width - 1, 0, depth - 1],
            &[Orientation::Flat],
        )
    }

    /// Smallest region covering every placement, with exactly their orientations
    pub fn bounding(placements: &[Placement]) -> Option<Self> {
        let first = placements.first()?;
        let mut min = first.cell();
        let mut max = first.cell();
        let mut orientations = Vec::new();
        for placement in placements {
            for axis in 0..3 {
                if let (Some(low), Some(high), Some(&value)) = (
                    min.get_mut(axis),
                    max.get_mut(axis),
                    placement.slot.cell.get(axis),
                ) {
                    *low = (*low).min(value);
                    *high = (*high).max(value);
                }
            }
            orientations.push(placement.orientation());
        }
        Some(Self::new(min, max, &orientations))
    }

    /// Check bounds, orientations and size limits
    pub fn validate(&self) -> Result<()> {
        if (0..3).any(|axis| self.min.get(axis) > self.max.get(axis)) {
            return Err(PuzzleError::InvalidBounds {
                min: self.min,
                max: self.max,
                reason: "minimum corner exceeds maximum corner".to_string(),
            });
        }
        if self.min[1] < 0 {
            return Err(PuzzleError::InvalidBounds {
                min: self.min,
                max: self.max,
                reason: "region extends below ground level".to_string(),
            });
        }
        if self.orientations.is_empty() {
            return Err(PuzzleError::InvalidParameter {
                parameter: "orientations",
                value: "[]".to_string(),
                reason: "at least one orientation is required".to_string(),
            });
        }
        let slots = self.checked_slot_count().unwrap_or(usize::MAX);
        if slots > MAX_REGION_SLOTS {
            return Err(PuzzleError::RegionTooLarge {
                slots,
                limit: MAX_REGION_SLOTS,
            });
        }
        Ok(())
    }

    /// Number of cells along each axis
    pub fn extents(&self) -> [usize; 3] {
        [0, 1, 2].map(|axis| {
            let low = i64::from(self.min.get(axis).copied().unwrap_or(0));
            let high = i64::from(self.max.get(axis).copied().unwrap_or(0));
            usize::try_from(high - low + 1).unwrap_or(0)
        })
    }

    fn checked_slot_count(&self) -> Option<usize> {
        let [nx, ny, nz] = self.extents();
        nx.checked_mul(ny)?
            .checked_mul(nz)?
            .checked_mul(self.orientations.len())
    }

    /// Total number of slots
    pub fn slot_count(&self) -> usize {
        self.checked_slot_count().unwrap_or(0)
    }

    /// Whether the cell lies inside the box
    pub fn contains_cell(&self, cell: Cell) -> bool {
        (0..3).all(|axis| {
            match (cell.get(axis), self.min.get(axis), self.max.get(axis)) {
                (Some(value), Some(low), Some(high)) => value >= low && value <= high,
                _ => false,
            }
        })
    }

    /// Whether the slot's cell is inside and its orientation allowed
    pub fn contains(&self, slot: &Slot) -> bool {
        self.contains_cell(slot.cell) && self.orientation_index(slot.orientation).is_some()
    }

    /// Position of an orientation in the allowed list
    pub fn orientation_index(&self, orientation: Orientation) -> Option<usize> {
        self.orientations.iter().position(|&allowed| allowed == orientation)
    }

    /// Multi-dimensional index of a slot inside the region
    pub fn grid_index(&self, slot: &Slot) -> Option<[usize; 4]> {
        if !self.contains_cell(slot.cell) {
            return None;
        }
        let orientation = self.orientation_index(slot.orientation)?;
        let offset = |axis: usize| -> usize {
            let value = slot.cell.get(axis).copied().unwrap_or(0);
            let low = self.min.get(axis).copied().unwrap_or(0);
            usize::try_from(i64::from(value) - i64::from(low)).unwrap_or(0)
        };
        Some([offset(0), offset(1), offset(2), orientation])
    }

    /// Linear index of a slot in enumeration order
    pub fn linear_index(&self, slot: &Slot) -> Option<usize> {
        let [x, y, z, o] = self.grid_index(slot)?;
        let [_, ny, nz] = self.extents();
        let no = self.orientations.len();
        Some(((x * ny + y) * nz + z) * no + o)
    }

    /// Slot at a linear index
    pub fn slot_at(&self, index: usize) -> Option<Slot> {
        if index >= self.slot_count() {
            return None;
        }
        let [_, ny, nz] = self.extents();
        let no = self.orientations.len();
        let orientation = *self.orientations.get(index % no)?;
        let rest = index / no;
        let z = rest % nz;
        let rest = rest / nz;
        let y = rest % ny;
        let x = rest / ny;
        let cell = [
            self.min[0] + i32::try_from(x).ok()?,
            self.min[1] + i32::try_from(y).ok()?,
            self.min[2] + i32::try_from(z).ok()?,
        ];
        Some(Slot::new(cell, orientation))
    }

    /// Every slot in linear order
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        (0..self.slot_count()).filter_map(|index| self.slot_at(index))
    }
}

/// Dense per-slot values over a region
#[derive(Clone, Debug)]
pub struct SlotGrid<T> {
    values: Array4<T>,
    region: Region,
}

impl<T: Clone> SlotGrid<T> {
    /// Fill every slot of the region with `value`
    pub fn new(region: &Region, value: T) -> Self {
        let [nx, ny, nz] = region.extents();
        let no = region.orientations.len();
        Self {
            values: Array4::from_elem((nx, ny, nz, no), value),
            region: region.clone(),
        }
    }
}

impl<T> SlotGrid<T> {
    /// Value stored for a slot
    pub fn get(&self, slot: &Slot) -> Option<&T> {
        let index = self.region.grid_index(slot)?;
        self.values.get(index)
    }

    /// Mutable value stored for a slot
    pub fn get_mut(&mut self, slot: &Slot) -> Option<&mut T> {
        let index = self.region.grid_index(slot)?;
        self.values.get_mut(index)
    }

    /// Value at a linear index
    pub fn at(&self, index: usize) -> Option<&T> {
        self.values.as_slice()?.get(index)
    }

    /// Mutable value at a linear index
    pub fn at_mut(&mut self, index: usize) -> Option<&mut T> {
        self.values.as_slice_mut()?.get_mut(index)
    }

    /// Values in linear order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    /// Number of slots covered
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the grid covers no slots
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Region the grid covers
    pub const fn region(&self) -> &Region {
        &self.region
    }
}

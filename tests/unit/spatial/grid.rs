//! Tests for slots, placements, regions and dense slot storage

#[cfg(test)]
mod tests {
    use pipeloop::PuzzleError;
    use pipeloop::io::configuration::MAX_REGION_SLOTS;
    use pipeloop::spatial::geometry::{Direction, Orientation, Rotation};
    use pipeloop::spatial::grid::{Placement, Region, Slot, SlotGrid};
    use pipeloop::spatial::tiles::ShapeId;

    // Tests neighbor keeps orientation and steps the cell
    // Verified by resetting orientation to Flat
    #[test]
    fn test_slot_neighbor() {
        let slot = Slot::new([1, 0, 1], Orientation::EdgeAlongX);
        let up = slot.neighbor(Direction::PosY);
        assert_eq!(up.cell, [1, 1, 1]);
        assert_eq!(up.orientation, Orientation::EdgeAlongX);
    }

    // Tests orientation lists are sorted and deduplicated
    // Verified by skipping dedup
    #[test]
    fn test_region_normalizes_orientations() {
        let region = Region::new(
            [0, 0, 0],
            [1, 1, 1],
            &[Orientation::EdgeAlongZ, Orientation::Flat, Orientation::EdgeAlongZ],
        );
        assert_eq!(
            region.orientations,
            vec![Orientation::Flat, Orientation::EdgeAlongZ]
        );
        assert_eq!(region.slot_count(), 16);
    }

    // Tests flat regions cover a single ground level
    // Verified by using width for both axes
    #[test]
    fn test_region_flat() {
        let region = Region::flat(3, 2);
        assert_eq!(region.extents(), [3, 1, 2]);
        assert_eq!(region.slot_count(), 6);
        assert!(region.contains(&Slot::new([2, 0, 1], Orientation::Flat)));
        assert!(!region.contains(&Slot::new([3, 0, 1], Orientation::Flat)));
        assert!(!region.contains(&Slot::new([0, 0, 0], Orientation::EdgeAlongX)));
    }

    // Tests linear indices round-trip through slot_at in enumeration order
    // Verified by swapping the y and z strides
    #[test]
    fn test_linear_index_round_trip() {
        let region = Region::new([-1, 0, 2], [1, 1, 3], &Orientation::ALL);
        let slots: Vec<Slot> = region.slots().collect();
        assert_eq!(slots.len(), region.slot_count());
        for (index, slot) in slots.iter().enumerate() {
            assert_eq!(region.linear_index(slot), Some(index));
            assert_eq!(region.slot_at(index), Some(*slot));
        }
        assert_eq!(region.slot_at(region.slot_count()), None);
    }

    // Tests orientation varies fastest in the linear order
    // Verified by making x the innermost axis
    #[test]
    fn test_linear_order() {
        let region = Region::new([0, 0, 0], [1, 0, 1], &[Orientation::Flat, Orientation::EdgeAlongX]);
        assert_eq!(region.slot_at(0), Some(Slot::new([0, 0, 0], Orientation::Flat)));
        assert_eq!(region.slot_at(1), Some(Slot::new([0, 0, 0], Orientation::EdgeAlongX)));
        assert_eq!(region.slot_at(2), Some(Slot::new([0, 0, 1], Orientation::Flat)));
        assert_eq!(region.slot_at(4), Some(Slot::new([1, 0, 0], Orientation::Flat)));
    }

    // Tests validation of bounds and orientations
    // Verified by allowing regions below ground
    #[test]
    fn test_region_validate() {
        assert!(Region::flat(2, 2).validate().is_ok());

        let inverted = Region::new([2, 0, 0], [1, 0, 0], &[Orientation::Flat]);
        assert!(matches!(inverted.validate(), Err(PuzzleError::InvalidBounds { .. })));

        let underground = Region::new([0, -1, 0], [1, 0, 0], &[Orientation::Flat]);
        assert!(matches!(underground.validate(), Err(PuzzleError::InvalidBounds { .. })));

        let no_orientations = Region::new([0, 0, 0], [1, 0, 1], &[]);
        assert!(matches!(
            no_orientations.validate(),
            Err(PuzzleError::InvalidParameter { .. })
        ));
    }

    // Tests oversized regions are rejected before allocation
    // Verified by comparing against the cell count instead of slots
    #[test]
    fn test_region_too_large() {
        let side = 50;
        let region = Region::new([0, 0, 0], [side - 1, side - 1, side - 1], &Orientation::ALL);
        assert!(region.slot_count() > MAX_REGION_SLOTS);
        assert!(matches!(
            region.validate(),
            Err(PuzzleError::RegionTooLarge { .. })
        ));
    }

    // Tests bounding box covers placements with exactly their orientations
    // Verified by keeping the first cell as the maximum
    #[test]
    fn test_region_bounding() {
        let placements = [
            Placement::new([2, 0, 1], Orientation::Flat, ShapeId(0), Rotation::R0, false),
            Placement::new([0, 1, 3], Orientation::EdgeAlongZ, ShapeId(1), Rotation::R90, true),
        ];
        let region = Region::bounding(&placements);
        assert_eq!(
            region,
            Some(Region::new(
                [0, 0, 1],
                [2, 1, 3],
                &[Orientation::Flat, Orientation::EdgeAlongZ]
            ))
        );
        assert_eq!(Region::bounding(&[]), None);
    }

    // Tests slot and linear access address the same storage
    // Verified by transposing the array shape
    #[test]
    fn test_slot_grid_access() {
        let region = Region::new([0, 0, 0], [2, 1, 1], &[Orientation::Flat, Orientation::EdgeAlongZ]);
        let mut grid = SlotGrid::new(&region, 0usize);
        assert_eq!(grid.len(), region.slot_count());
        assert!(!grid.is_empty());

        for slot in region.slots() {
            if let (Some(value), Some(linear)) = (grid.get_mut(&slot), region.linear_index(&slot)) {
                *value = linear + 1;
            }
        }
        for (linear, value) in grid.iter().enumerate() {
            assert_eq!(*value, linear + 1);
            assert_eq!(grid.at(linear), Some(&(linear + 1)));
        }

        assert!(grid.get(&Slot::new([3, 0, 0], Orientation::Flat)).is_none());
        assert!(grid.at(region.slot_count()).is_none());
        *grid.at_mut(0).unwrap() = 99;
        assert_eq!(grid.get(&Slot::new([0, 0, 0], Orientation::Flat)), Some(&99));
        assert_eq!(grid.region(), &region);
    }
}

//! Tests for the search context and branch-local search state

#[cfg(test)]
mod tests {
    use pipeloop::algorithm::puzzle::{Inventory, PuzzleSpec};
    use pipeloop::algorithm::state::{Contradiction, PuzzleContext, SearchState};
    use pipeloop::analysis::variants::{VariantKey, variant_table};
    use pipeloop::spatial::geometry::{Direction, Orientation, Rotation};
    use pipeloop::spatial::grid::{Placement, Region};
    use pipeloop::spatial::tiles::{ShapeId, TileShape, tile_catalog};

    fn shape_id(notation: &str) -> ShapeId {
        TileShape::parse(notation)
            .and_then(|shape| tile_catalog().id_of(&shape))
            .unwrap_or(ShapeId(u16::MAX))
    }

    fn key(notation: &str, orientation: Orientation, rotation: Rotation) -> VariantKey {
        variant_table()
            .lookup(shape_id(notation), orientation, rotation, false)
            .unwrap_or(VariantKey::EMPTY)
    }

    fn caps(count: u32) -> Inventory {
        [(shape_id("M..."), count)].into_iter().collect()
    }

    // Tests neighbor tables and face exclusivity in a single-orientation region
    // Verified by linking neighbors across the region boundary
    #[test]
    fn test_context_neighbors() {
        let spec = PuzzleSpec::arrange(Region::flat(3, 1), caps(2));
        let context = PuzzleContext::new(&spec);
        assert!(context.is_ok());
        let context = context.unwrap();

        assert_eq!(context.slot_count(), 3);
        assert_eq!(context.neighbor(0, Direction::PosX), Some(1));
        assert_eq!(context.neighbor(0, Direction::NegX), None);
        assert_eq!(context.neighbor(1, Direction::PosZ), None);
        assert_eq!(context.neighbor(1, Direction::PosY), None);
        assert!(context.is_exclusive(0, Direction::PosX));
        assert!(!context.needs_support(0));
        assert_eq!(context.floor_below(0), None);
        assert!(context.walls_below(0).is_empty());
        assert_eq!(context.universe(), variant_table().universe());
    }

    // Tests faces sharing a crease with another orientation are not exclusive
    // Verified by marking every face exclusive
    #[test]
    fn test_context_shared_creases() {
        let region = Region::new([0, 0, 0], [1, 0, 0], &[Orientation::Flat, Orientation::EdgeAlongX]);
        let spec = PuzzleSpec::arrange(region, caps(3));
        let context = PuzzleContext::new(&spec).unwrap();

        assert!(!context.is_exclusive(0, Direction::PosX));
        assert!(!context.is_exclusive(0, Direction::NegX));
        assert!(context.is_exclusive(0, Direction::PosZ));
    }

    // Tests support relations between levels
    // Verified by looking for the floor in the same cell
    #[test]
    fn test_context_support_relations() {
        let region = Region::new([0, 0, 0], [0, 1, 0], &Orientation::ALL);
        let spec = PuzzleSpec::arrange(region.clone(), caps(1));
        let context = PuzzleContext::new(&spec).unwrap();

        let upper_wall = region
            .slots()
            .position(|slot| slot.cell == [0, 1, 0] && slot.orientation == Orientation::EdgeAlongZ)
            .unwrap();
        let lower_floor = region
            .slots()
            .position(|slot| slot.cell == [0, 0, 0] && slot.orientation == Orientation::Flat)
            .unwrap();
        let upper_floor = region
            .slots()
            .position(|slot| slot.cell == [0, 1, 0] && slot.orientation == Orientation::Flat)
            .unwrap();

        assert_eq!(context.floor_below(upper_wall), Some(lower_floor));
        assert_eq!(context.walls_below(upper_floor).len(), 2);
        assert!(context.needs_support(upper_floor));
        assert!(!context.needs_support(lower_floor));
    }

    // Tests initial domains hold inventory variants of the slot's orientation plus empty
    // Verified by omitting the empty marker
    #[test]
    fn test_initial_domains() {
        let spec = PuzzleSpec::arrange(Region::flat(3, 1), caps(2));
        let context = PuzzleContext::new(&spec).unwrap();
        let state = SearchState::new(&context);

        let domain = state.domain(0);
        assert_eq!(domain.map(|domain| domain.count()), Some(5));
        assert!(domain.is_some_and(|domain| domain.contains(VariantKey::EMPTY)));
        assert_eq!(state.undecided_count(), 3);
        assert_eq!(state.placed_count(), 0);
        assert!(!state.is_complete());
        assert_eq!(context.shape_masks().len(), 1);
    }

    // Tests committing tiles consumes inventory and joins components
    // Verified by skipping the union of shared connector points
    #[test]
    fn test_apply_placement_joins_components() {
        let spec = PuzzleSpec::arrange(Region::flat(3, 1), caps(2));
        let context = PuzzleContext::new(&spec).unwrap();
        let mut state = SearchState::new(&context);
        let east = key("M...", Orientation::Flat, Rotation::R180);
        let west = key("M...", Orientation::Flat, Rotation::R0);

        assert_eq!(state.apply_placement(&context, 0, east, false), Ok(()));
        assert_eq!(state.inventory().remaining(shape_id("M...")), 1);
        assert_eq!(state.apply_placement(&context, 1, west, false), Ok(()));
        assert_eq!(state.placed_count(), 2);
        assert_eq!(state.component_count(), 1);
        assert!(state.inventory().is_empty());

        assert_eq!(
            state.apply_placement(&context, 2, east, false),
            Err(Contradiction { slot: 2 })
        );
    }

    // Tests recommitting is idempotent and conflicting commits fail
    // Verified by overwriting existing assignments
    #[test]
    fn test_apply_placement_conflicts() {
        let spec = PuzzleSpec::arrange(Region::flat(3, 1), caps(2));
        let context = PuzzleContext::new(&spec).unwrap();
        let mut state = SearchState::new(&context);
        let east = key("M...", Orientation::Flat, Rotation::R180);
        let straight = key(".M.M", Orientation::Flat, Rotation::R0);

        assert!(state.apply_placement(&context, 0, east, false).is_ok());
        assert!(state.apply_placement(&context, 0, east, false).is_ok());
        assert_eq!(state.inventory().remaining(shape_id("M...")), 1);
        assert!(state.apply_placement(&context, 0, VariantKey::EMPTY, false).is_err());
        assert!(state.apply_placement(&context, 1, straight, false).is_err());

        assert!(state.apply_placement(&context, 2, VariantKey::EMPTY, false).is_ok());
        assert_eq!(state.placed_count(), 1);
        assert_eq!(state.undecided_count(), 1);
        assert_eq!(state.assigned(2), Some(VariantKey::EMPTY));
        assert!(!state.is_decided(1));
    }

    // Tests a third connector on an occupied point is a contradiction
    // Verified by allowing any number of connectors per point
    #[test]
    fn test_third_connector_at_point() {
        let region = Region::new([0, 0, 0], [1, 0, 0], &[Orientation::Flat, Orientation::EdgeAlongX]);
        let spec = PuzzleSpec::arrange(region, caps(3));
        let context = PuzzleContext::new(&spec).unwrap();
        let mut state = SearchState::new(&context);
        let east = key("M...", Orientation::Flat, Rotation::R180);
        let west = key("M...", Orientation::Flat, Rotation::R0);
        let down = key("M...", Orientation::EdgeAlongX, Rotation::R90);

        assert!(state.apply_placement(&context, 0, east, false).is_ok());
        assert!(state.apply_placement(&context, 2, west, false).is_ok());
        assert_eq!(
            state.apply_placement(&context, 3, down, false),
            Err(Contradiction { slot: 3 })
        );
    }

    // Tests fixed placements keep their slot and skip the inventory
    // Verified by taking fixed tiles from the inventory
    #[test]
    fn test_fixed_placements() {
        let straight = Placement::new(
            [1, 0, 0],
            Orientation::Flat,
            shape_id(".M.M"),
            Rotation::R0,
            false,
        );
        let spec = PuzzleSpec::complete(Region::flat(3, 1), caps(2), vec![straight]);
        let context = PuzzleContext::new(&spec).unwrap();
        assert!(context.is_fixed(1));
        assert!(!context.is_fixed(0));
        assert_eq!(context.fixed().len(), 1);

        let mut state = SearchState::new(&context);
        assert_eq!(state.domain(1).map(|domain| domain.count()), Some(1));
        let &(slot, fixed_key) = context.fixed().first().unwrap();
        assert!(state.apply_placement(&context, slot, fixed_key, true).is_ok());
        assert_eq!(state.inventory().total(), 2);
        assert_eq!(state.placements(&context), vec![straight]);
    }

    // Tests connector points are reported as open until a second tile meets them
    // Verified by listing every anchored point as open
    #[test]
    fn test_open_and_joined_points() {
        let spec = PuzzleSpec::arrange(Region::flat(3, 1), caps(2));
        let context = PuzzleContext::new(&spec).unwrap();
        let mut state = SearchState::new(&context);
        assert!(state.open_points().is_empty());
        assert!(state.joined_points().is_empty());

        let east = key("M...", Orientation::Flat, Rotation::R180);
        let west = key("M...", Orientation::Flat, Rotation::R0);
        state.apply_placement(&context, 0, east, false).unwrap();
        let open = state.open_points();
        assert_eq!(open.len(), 1);
        let (point, owner) = *open.first().unwrap();
        assert_eq!(owner, 0);
        assert_eq!(state.anchored_at(point), &[0]);

        state.apply_placement(&context, 1, west, false).unwrap();
        assert!(state.open_points().is_empty());
        assert_eq!(state.joined_points(), vec![point]);
        assert_eq!(state.anchored_at(point), &[0, 1]);
    }

    // Tests a closed group is dead only while tiles remain to place
    // Verified by ignoring the remaining inventory
    #[test]
    fn test_sealed_group() {
        let east = key("M...", Orientation::Flat, Rotation::R180);
        let west = key("M...", Orientation::Flat, Rotation::R0);

        let spec = PuzzleSpec::arrange(Region::flat(4, 1), caps(4));
        let context = PuzzleContext::new(&spec).unwrap();
        let mut state = SearchState::new(&context);
        assert_eq!(state.sealed_group(), None);
        state.apply_placement(&context, 0, east, false).unwrap();
        assert_eq!(state.sealed_group(), None);
        state.apply_placement(&context, 1, west, false).unwrap();
        assert_eq!(state.sealed_group(), Some(0));

        let spec = PuzzleSpec::arrange(Region::flat(4, 1), caps(2));
        let context = PuzzleContext::new(&spec).unwrap();
        let mut state = SearchState::new(&context);
        state.apply_placement(&context, 0, east, false).unwrap();
        state.apply_placement(&context, 1, west, false).unwrap();
        assert!(state.inventory().is_empty());
        assert_eq!(state.sealed_group(), None);
    }
}

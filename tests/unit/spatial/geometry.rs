//! Tests for directions, local tile frames and quantized positions

#[cfg(test)]
mod tests {
    use pipeloop::spatial::geometry::{
        Direction, Edge, Orientation, QuantizedPoint, Rotation, offset_point, step,
    };
    use std::collections::HashSet;

    fn approx(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    // Tests direction indices are unique and dense
    // Verified by mapping two directions to the same index
    #[test]
    fn test_direction_indices_unique() {
        let indices: HashSet<usize> = Direction::ALL.iter().map(|d| d.index()).collect();
        assert_eq!(indices.len(), 6);
        assert!(indices.iter().all(|&index| index < 6));
    }

    // Tests opposite is an involution and flips the unit step
    // Verified by returning the same direction from opposite
    #[test]
    fn test_direction_opposite() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
            assert_eq!(direction.axis(), direction.opposite().axis());
            assert_ne!(direction.is_positive(), direction.opposite().is_positive());

            let unit = direction.unit();
            let back = direction.opposite().unit();
            assert_eq!([unit[0] + back[0], unit[1] + back[1], unit[2] + back[2]], [0, 0, 0]);
        }
    }

    // Tests stepping between neighboring cells
    // Verified by swapping the sign of the y unit
    #[test]
    fn test_step() {
        assert_eq!(step([1, 2, 3], Direction::PosX), [2, 2, 3]);
        assert_eq!(step([1, 2, 3], Direction::NegY), [1, 1, 3]);
        assert_eq!(step([1, 2, 3], Direction::PosZ), [1, 2, 4]);
    }

    // Tests left vectors are the outward normal turned a quarter counter-clockwise
    // Verified by negating along_left
    #[test]
    fn test_edge_along_left() {
        assert_eq!(Edge::Top.along_left(), (-1, 0));
        assert_eq!(Edge::Right.along_left(), (0, 1));
        assert_eq!(Edge::Bottom.along_left(), (1, 0));
        assert_eq!(Edge::Left.along_left(), (0, -1));
    }

    // Tests counter-clockwise rotation of local points
    // Verified by using a clockwise sine
    #[test]
    fn test_rotation_apply() {
        assert!(approx(Rotation::R0.apply(0.5, 0.25), (0.5, 0.25)));
        assert!(approx(Rotation::R90.apply(1.0, 0.0), (0.0, 1.0)));
        assert!(approx(Rotation::R180.apply(1.0, 0.0), (-1.0, 0.0)));
        assert!(approx(Rotation::R270.apply(1.0, 0.0), (0.0, -1.0)));
    }

    // Tests quarter turn conversions wrap modulo four
    // Verified by removing the modulo
    #[test]
    fn test_rotation_quarter_turns() {
        for rotation in Rotation::ALL {
            assert_eq!(Rotation::from_quarter_turns(rotation.quarter_turns()), rotation);
        }
        assert_eq!(Rotation::from_quarter_turns(5), Rotation::R90);
        assert_eq!(Rotation::R270.degrees(), 270);
    }

    // Tests each orientation maps its edges onto four distinct relevant directions
    // Verified by duplicating a direction in the edge table
    #[test]
    fn test_orientation_edge_directions() {
        for orientation in Orientation::ALL {
            let directions: HashSet<Direction> =
                orientation.edge_directions().into_iter().collect();
            assert_eq!(directions.len(), 4);
            for direction in Direction::ALL {
                assert_eq!(orientation.is_relevant(direction), directions.contains(&direction));
            }
        }
        assert!(!Orientation::Flat.is_relevant(Direction::PosY));
        assert!(!Orientation::EdgeAlongX.is_relevant(Direction::PosX));
        assert!(!Orientation::EdgeAlongZ.is_relevant(Direction::NegZ));
    }

    // Tests embedding places each local edge on the face its direction names
    // Verified by swapping u and v in the flat embedding
    #[test]
    fn test_orientation_embed_matches_edges() {
        for orientation in Orientation::ALL {
            for edge in Edge::ALL {
                let (nu, nv) = edge.normal();
                let point = orientation.embed(0.5 * f64::from(nu), 0.5 * f64::from(nv));
                let direction = orientation.edge_direction(edge);
                let expected = if direction.is_positive() { 1.0 } else { 0.0 };
                let on_face = point
                    .get(direction.axis())
                    .is_some_and(|coordinate| (coordinate - expected).abs() < 1e-9);
                assert!(on_face);
            }
        }
    }

    // Tests only wall orientations are edge mounted
    // Verified by marking Flat as edge mounted
    #[test]
    fn test_is_edge_mounted() {
        assert!(!Orientation::Flat.is_edge_mounted());
        assert!(Orientation::EdgeAlongX.is_edge_mounted());
        assert!(Orientation::EdgeAlongZ.is_edge_mounted());
    }

    // Tests quantization merges points within tolerance
    // Verified by truncating instead of rounding
    #[test]
    fn test_quantized_point_rounding() {
        let a = QuantizedPoint::from_point([0.2504, 0.0, 0.9996]);
        let b = QuantizedPoint::from_point([0.25, 0.0, 1.0]);
        assert_eq!(a, b);
        assert_eq!(b.0, [250, 0, 1000]);
        assert_ne!(b, QuantizedPoint::from_point([0.26, 0.0, 1.0]));
    }

    // Tests cell origins and arithmetic on quantized points
    // Verified by subtracting in add
    #[test]
    fn test_quantized_point_arithmetic() {
        let origin = QuantizedPoint::from_cell([2, -1, 3]);
        assert_eq!(origin.0, [2000, -1000, 3000]);

        let local = QuantizedPoint::from_point([1.0, 0.0, 0.5]);
        let world = local.add(origin);
        assert_eq!(world.sub(origin), local);
        assert_eq!(world.to_point(), [3.0, -1.0, 3.5]);
    }

    // Tests boundary coordinates touch the cells on both sides
    // Verified by only returning the upper cell on boundaries
    #[test]
    fn test_touching_cells() {
        let face = QuantizedPoint::from_point([1.0, 0.5, 0.5]);
        let mut cells = face.touching_cells();
        cells.sort_unstable();
        assert_eq!(cells, vec![[0, 0, 0], [1, 0, 0]]);

        let crease = QuantizedPoint::from_point([1.0, 0.0, 0.5]);
        assert_eq!(crease.touching_cells().len(), 4);

        let corner = QuantizedPoint::from_point([1.0, 1.0, 1.0]);
        assert_eq!(corner.touching_cells().len(), 8);
    }

    // Tests offsets are added to the cell origin
    // Verified by ignoring the cell
    #[test]
    fn test_offset_point() {
        assert_eq!(offset_point([1, 2, 3], [0.5, 0.0, 0.25]), [1.5, 2.0, 3.25]);
    }
}

//! Closed-loop connector tile puzzles: catalog, constraint solver and generator
//!
//! Square tiles carry connectors at fixed points along their edges. A puzzle
//! asks for an arrangement inside a bounded 3D region where every connector
//! meets exactly one partner and all tiles form one connected network.

#![forbid(unsafe_code)]

/// Constraint solving, validation and network generation
pub mod algorithm;
/// Variant precompute and neighbor compatibility
pub mod analysis;
/// Input/output, configuration and error handling
pub mod io;
/// Seeded random selection
pub mod math;
/// Geometry, tile shapes and slot grids
pub mod spatial;

pub use io::error::{PuzzleError, Result};

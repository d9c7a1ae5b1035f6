//! Spatial data structures
//!
//! This module contains spatial-related functionality including:
//! - Directions, orientations and coordinate transforms
//! - Slots, regions and per-slot storage
//! - Tile shapes and the canonical catalog

/// Directions, orientations, rotations and quantized positions
pub mod geometry;
/// Slots, placements, regions and slot grids
pub mod grid;
/// Tile shapes and the canonical catalog
pub mod tiles;

pub use grid::{Placement, Region, Slot};

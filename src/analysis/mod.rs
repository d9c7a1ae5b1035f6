//! Precomputed tables derived from the tile catalog

/// Neighbor compatibility sets and connector lookup
pub mod compatibility;
/// Distinct placed forms of every shape
pub mod variants;

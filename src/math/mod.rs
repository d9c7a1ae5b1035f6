//! Mathematical utilities for generation

/// Seeded weighted and uniform random choices
pub mod probability;

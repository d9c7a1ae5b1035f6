/// Bitset over variant keys for domains and compatibility sets
pub mod bitset;
/// Caching of neighbor support computations
pub mod cache;
/// Disjoint sets for tracking connected tiles
pub mod connectivity;
/// Rectangle loops and capped lines laid along fixed paths
pub mod construction;
/// Seeded generation of closed networks
pub mod generator;
/// Random-walk growth with a closing pass
pub mod growth;
/// Arc consistency and the other pruning passes
pub mod propagation;
/// Puzzle descriptions, inventories and difficulty tiers
pub mod puzzle;
/// Backtracking search
pub mod solver;
/// Search context and branch-local state
pub mod state;
/// Closure, connectivity and support checks on finished networks
pub mod validation;

pub use puzzle::{Difficulty, Inventory, PuzzleMode, PuzzleSpec};
pub use solver::{SolveMode, SolveOptions, SolveOutcome, solve};

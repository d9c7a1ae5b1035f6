//! Puzzle constants and runtime configuration defaults

// Connector geometry in the local tile frame
/// Distance of a side connector from its edge midpoint, as a fraction of the edge length
pub const CONNECTOR_OFFSET: f64 = 0.25;

/// A connector faces a direction when it lies this far past the cell center on that axis
pub const FACE_THRESHOLD: f64 = 0.45;

/// Positions are compared on a grid of this many steps per cell, so points
/// closer than a thousandth of a cell coincide
pub const POSITION_SCALE: f64 = 1000.0;

// Safety limit to prevent excessive memory allocation
/// Maximum number of slots in a puzzle region
pub const MAX_REGION_SLOTS: usize = 100_000;

// Solver defaults
/// Default wall-clock budget for one solve in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default cap on solutions collected in counting modes
pub const DEFAULT_MAX_SOLUTIONS: usize = 1_000;

/// Support cache is cleared once it holds this many entries
pub const MAX_SUPPORT_CACHE_ENTRIES: usize = 50_000;

// Generator settings
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Attempts per generation request before giving up
pub const MAX_GENERATION_ATTEMPTS: usize = 200;

/// Upper bound on tiles the closing pass may add
pub const MAX_EXTRA_TILES: usize = 8;

/// Weight added per connector a growth candidate closes
pub const CLOSE_WEIGHT: f64 = 6.0;

/// Extra weight for candidates closing two or more connectors at once
pub const LOOP_BONUS: f64 = 10.0;

/// Multiplier applied per newly opened connector once the minimum size is reached
pub const OPEN_PENALTY: f64 = 0.25;

/// Milder multiplier per newly opened connector while the network is still small
pub const EARLY_OPEN_PENALTY: f64 = 0.8;

/// Probability that the growth seed is drawn from two-connector shapes
pub const SEED_TWO_CONNECTOR_BIAS: f64 = 0.8;

/// Most connectors a single tile can close, used by the closability filter
pub const MAX_CLOSES_PER_TILE: usize = 3;

/// Vertical levels available to the generator when 3D output is allowed
pub const GENERATION_HEIGHT: i32 = 2;

/// Default minimum tile count for generated networks
pub const DEFAULT_MIN_TILES: usize = 4;

/// Default maximum tile count for generated networks
pub const DEFAULT_MAX_TILES: usize = 10;

// Difficulty tiers for complete mode
/// Fraction of tiles removed for easy puzzles
pub const EASY_REMOVAL_FRACTION: f64 = 0.25;
/// Fraction of tiles removed for medium puzzles
pub const MEDIUM_REMOVAL_FRACTION: f64 = 0.5;
/// Fraction of tiles removed for hard puzzles
pub const HARD_REMOVAL_FRACTION: f64 = 0.75;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 50;

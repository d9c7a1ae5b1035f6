//! Error types for puzzle construction, solving and output

use std::fmt;
use std::path::PathBuf;

use crate::spatial::geometry::Cell;
use crate::spatial::grid::Slot;

/// Everything that can go wrong before or after a search
///
/// Contradictions found while searching stay inside the solver; a puzzle
/// without solutions comes back as an outcome with a zero count.
#[derive(Debug)]
pub enum PuzzleError {
    /// Region corners inverted or below ground level
    InvalidBounds {
        /// Minimum corner as given
        min: Cell,
        /// Maximum corner as given
        max: Cell,
        /// Which constraint the corners break
        reason: String,
    },

    /// A numeric or textual argument was rejected
    InvalidParameter {
        /// Argument name as the user sees it
        parameter: &'static str,
        /// Rejected value, formatted
        value: String,
        /// Accepted range or form
        reason: String,
    },

    /// Shape id past the end of the catalog
    UnknownShape {
        /// Identifier that was looked up
        shape: u16,
        /// Shapes the catalog holds
        catalog_size: usize,
    },

    /// Fixed tile outside the region, or in an orientation the region excludes
    FixedPlacementOutsideRegion {
        /// Slot of the offending tile
        slot: Slot,
    },

    /// Two fixed tiles claim the same slot
    DuplicateFixedPlacement {
        /// Slot claimed twice
        slot: Slot,
    },

    /// Slot count over the configured cap
    RegionTooLarge {
        /// Slots the region would allocate
        slots: usize,
        /// Configured cap
        limit: usize,
    },

    /// Reading or writing a file failed
    Io {
        /// File involved, when known
        path: Option<PathBuf>,
        /// What was being attempted, phrased as a verb
        action: &'static str,
        /// Underlying failure
        source: std::io::Error,
    },
}

impl fmt::Display for PuzzleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBounds { min, max, reason } => {
                write!(f, "Invalid region bounds {min:?}..={max:?}: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => write!(f, "Rejected {parameter} = {value}: {reason}"),
            Self::UnknownShape {
                shape,
                catalog_size,
            } => write!(
                f,
                "Shape #{shape} is not in the catalog ({catalog_size} shapes)"
            ),
            Self::FixedPlacementOutsideRegion { slot } => write!(
                f,
                "Fixed placement at {:?} ({}) is outside the region",
                slot.cell,
                slot.orientation.label()
            ),
            Self::DuplicateFixedPlacement { slot } => write!(
                f,
                "Slot {:?} ({}) has more than one fixed placement",
                slot.cell,
                slot.orientation.label()
            ),
            Self::RegionTooLarge { slots, limit } => {
                write!(f, "Region has {slots} slots, more than the limit of {limit}")
            }
            Self::Io {
                path,
                action,
                source,
            } => match path {
                Some(path) => write!(f, "Could not {action} '{}': {source}", path.display()),
                None => write!(f, "Could not {action}: {source}"),
            },
        }
    }
}

impl std::error::Error for PuzzleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::Io { source, .. } = self {
            Some(source)
        } else {
            None
        }
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, PuzzleError>;

impl From<std::io::Error> for PuzzleError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: None,
            action: "complete i/o",
            source,
        }
    }
}

/// Shorthand for [`PuzzleError::InvalidParameter`]
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> PuzzleError {
    PuzzleError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

use thiserror::Error;

use crate::maze::Coord;

/// Usage errors reported by the maze engine. None of them are transient.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("coordinate {0:?} is not a cell of this maze")]
    InvalidCoordinate(Coord),
    #[error("cells {0:?} and {1:?} are not grid neighbors")]
    NonAdjacentCells(Coord, Coord),
    #[error("topology admits no cells")]
    EmptyTopology,
    #[error("no exit has been set")]
    NoExitSet,
    #[error("cell {0:?} already holds the entrance or exit")]
    RoleConflict(Coord),
    #[error("snapshot does not describe a valid maze: {0}")]
    SnapshotMismatch(String),
}

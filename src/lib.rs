pub mod app;
pub mod error;
pub mod generators;
pub mod maze;
pub mod persist;
pub mod render;
pub mod solvers;

pub use error::MazeError;
pub use generators::{Algorithm, RandomSource};
pub use maze::{Cell, Coord, Direction, Maze, Role, Topology};
pub use solvers::AncestryResult;

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::error::MazeError;
use crate::maze::{Cell, Coord, Maze, Role, Topology};

#[derive(thiserror::Error, Debug)]
pub enum PersistError {
    #[error("Failed to read/write maze file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse maze file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Maze file is inconsistent: {0}")]
    Maze(#[from] MazeError),
}

/// Stored form of one cell. Walls follow `Direction::ALL` order: top, right, bottom, left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    pub coord: Coord,
    pub walls: [bool; 4],
    pub role: Role,
}

/// Everything needed to rebuild a maze without generating it again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeSnapshot {
    pub topology: Topology,
    pub entrance: Coord,
    #[serde(default)]
    pub exit: Option<Coord>,
    pub cells: Vec<CellRecord>,
}

impl Maze {
    pub fn snapshot(&self) -> MazeSnapshot {
        MazeSnapshot {
            topology: *self.topology(),
            entrance: self.entrance(),
            exit: self.exit(),
            cells: self
                .cells()
                .map(|cell| CellRecord {
                    coord: cell.coord(),
                    walls: cell.walls(),
                    role: cell.role(),
                })
                .collect(),
        }
    }

    /// Rebuilds a maze from a snapshot, checking it against its own topology.
    pub fn from_snapshot(snapshot: MazeSnapshot) -> Result<Self, MazeError> {
        let cells = snapshot
            .cells
            .into_iter()
            .map(|record| Cell::restore(record.coord, record.walls, record.role))
            .collect();
        Maze::from_parts(snapshot.topology, cells, snapshot.entrance, snapshot.exit)
    }
}

pub fn save(path: &Path, maze: &Maze) -> Result<(), PersistError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &maze.snapshot())?;
    writer.flush()?;
    tracing::info!("saved {} maze to {}", maze.topology(), path.display());
    Ok(())
}

pub fn load(path: &Path) -> Result<Maze, PersistError> {
    let reader = BufReader::new(File::open(path)?);
    let snapshot: MazeSnapshot = serde_json::from_reader(reader)?;
    let maze = Maze::from_snapshot(snapshot)?;
    tracing::info!("loaded {} maze from {}", maze.topology(), path.display());
    Ok(maze)
}

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

mod dfs;
mod prim;

use dfs::randomized_dfs;
use prim::randomized_prim;

use crate::maze::{Coord, Direction, Maze};

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Where the generators get their randomness from.
///
/// Every [`Rng`] is a source. Tests plug in sources with a fixed order.
pub trait RandomSource {
    /// Puts `directions` in a uniformly random order.
    fn shuffle_directions(&mut self, directions: &mut [Direction]);
    /// Uniform index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn shuffle_directions(&mut self, directions: &mut [Direction]) {
        directions.shuffle(self);
    }

    fn pick(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Dfs,
    Prim,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::Dfs => write!(f, "Randomized Depth-First Search (DFS)"),
            Algorithm::Prim => write!(f, "Randomized Prim's Algorithm"),
        }
    }
}

/// Carves a spanning tree over every cell reachable from `start`.
///
/// Visited flags must be clear beforehand. Returns the number of cells visited.
pub fn generate_maze<R: RandomSource + ?Sized>(
    maze: &mut Maze,
    algorithm: Algorithm,
    start: Coord,
    rng: &mut R,
) -> usize {
    let visited = match algorithm {
        Algorithm::Dfs => randomized_dfs(maze, start, rng),
        Algorithm::Prim => randomized_prim(maze, start, rng),
    };
    tracing::debug!(
        "{} carved {} passages over {} of {} cells from {:?}",
        algorithm,
        maze.passage_count(),
        visited,
        maze.len(),
        start
    );
    visited
}

use super::RandomSource;
use crate::maze::{Coord, Direction, Maze};

/// Randomized Prim's algorithm over candidate walls.
///
/// The frontier holds `(cell, direction)` pairs. Entries are drawn uniformly and removed with
/// `swap_remove`, so the frontier order is scrambled as it goes.
pub fn randomized_prim<R: RandomSource + ?Sized>(
    maze: &mut Maze,
    start: Coord,
    rng: &mut R,
) -> usize {
    if !maze.mark_visited(start) {
        return 0;
    }
    let mut visited = 1;

    let mut frontier = Direction::ALL.map(|d| (start, d)).to_vec();
    while !frontier.is_empty() {
        let idx = rng.pick(frontier.len());
        let (current, direction) = frontier.swap_remove(idx);
        let next = direction.step(current);
        if !maze.contains(next) {
            continue;
        }
        if maze.is_visited(current) && maze.is_visited(next) {
            continue;
        }

        maze.carve(current, direction);
        for coord in [current, next] {
            if maze.mark_visited(coord) {
                visited += 1;
            }
        }
        frontier.extend(Direction::ALL.map(|d| (next, d)));
    }
    visited
}

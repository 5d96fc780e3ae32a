use super::RandomSource;
use crate::maze::{Coord, Direction, Maze};

/// A cell whose neighbors are still being walked, with its own shuffled order.
struct Frame {
    coord: Coord,
    directions: [Direction; 4],
    cursor: usize,
}

impl Frame {
    fn enter<R: RandomSource + ?Sized>(coord: Coord, rng: &mut R) -> Self {
        let mut directions = Direction::ALL;
        rng.shuffle_directions(&mut directions);
        Frame {
            coord,
            directions,
            cursor: 0,
        }
    }
}

/// Recursive backtracker with an explicit stack.
///
/// Each cell shuffles its neighbors once on entry and descends into every one that is still
/// unvisited, in that order, before the next one is considered.
pub fn randomized_dfs<R: RandomSource + ?Sized>(
    maze: &mut Maze,
    start: Coord,
    rng: &mut R,
) -> usize {
    if !maze.mark_visited(start) {
        return 0;
    }
    let mut visited = 1;

    let mut stack = vec![Frame::enter(start, rng)];
    while let Some(frame) = stack.last_mut() {
        let Some(&direction) = frame.directions.get(frame.cursor) else {
            // All neighbors explored, backtrack
            stack.pop();
            continue;
        };
        frame.cursor += 1;

        let current = frame.coord;
        let next = direction.step(current);
        if maze.contains(next) && !maze.is_visited(next) {
            maze.carve(current, direction);
            maze.mark_visited(next);
            visited += 1;
            stack.push(Frame::enter(next, rng));
        }
    }
    visited
}

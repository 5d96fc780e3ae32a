use crate::error::MazeError;
use crate::maze::{Coord, Direction, Grid, Maze};

/// Discovery and finish time of one cell in an Euler tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub discovery: u64,
    pub finish: u64,
}

impl Interval {
    /// `true` if `other` lies inside this interval, i.e. this cell is an ancestor (or the
    /// same cell) of the cell `other` belongs to.
    pub fn encloses(&self, other: &Interval) -> bool {
        self.discovery <= other.discovery && self.finish >= other.finish
    }
}

/// Euler-tour timestamps of the passage tree, rooted at one cell.
///
/// Computed fresh on every call to [`AncestryResult::compute`]; nothing is carried over
/// between roots.
#[derive(Debug, Clone)]
pub struct AncestryResult {
    root: Coord,
    times: Grid<Option<Interval>>,
    reached: usize,
}

impl AncestryResult {
    /// Walks open passages from `root` and stamps every reached cell.
    ///
    /// The clock ticks once on discovery and once on finish, so a cell's interval encloses
    /// the intervals of everything below it.
    pub fn compute(maze: &Maze, root: Coord) -> Result<Self, MazeError> {
        if !maze.contains(root) {
            return Err(MazeError::InvalidCoordinate(root));
        }
        let (width, height) = maze.topology().bounds();
        let mut times: Grid<Option<Interval>> = Grid::new(width, height, None);
        let mut clock = 1u64;
        let mut reached = 1;

        times[root] = Some(Interval {
            discovery: clock,
            finish: 0,
        });
        // (cell, index of the next direction to try)
        let mut stack = vec![(root, 0usize)];
        while let Some((coord, cursor)) = stack.last_mut() {
            let coord = *coord;
            let Some(&direction) = Direction::ALL.get(*cursor) else {
                clock += 1;
                if let Some(interval) = times[coord].as_mut() {
                    interval.finish = clock;
                }
                stack.pop();
                continue;
            };
            *cursor += 1;

            let open = maze.get(coord).is_some_and(|cell| !cell.has_wall(direction));
            let next = direction.step(coord);
            if open && maze.contains(next) && times[next].is_none() {
                clock += 1;
                times[next] = Some(Interval {
                    discovery: clock,
                    finish: 0,
                });
                reached += 1;
                stack.push((next, 0));
            }
        }

        tracing::debug!("ancestry from {:?} reached {} cells", root, reached);
        Ok(AncestryResult {
            root,
            times,
            reached,
        })
    }

    pub fn root(&self) -> Coord {
        self.root
    }

    /// Number of cells connected to the root.
    pub fn reached(&self) -> usize {
        self.reached
    }

    pub fn interval(&self, coord: Coord) -> Option<Interval> {
        self.times.get(coord).copied().flatten()
    }

    /// `true` if `ancestor` lies on the tree path from the root to `descendant` (both ends
    /// included). Cells the root never reached have no ancestors.
    pub fn is_ancestor(&self, ancestor: Coord, descendant: Coord) -> bool {
        match (self.interval(ancestor), self.interval(descendant)) {
            (Some(a), Some(d)) => a.encloses(&d),
            _ => false,
        }
    }
}

mod ancestry;

pub use ancestry::{AncestryResult, Interval};

use crate::error::MazeError;
use crate::maze::{Coord, Maze, Role};

/// Tags the tree path between `entrance` and `exit` as on-path.
///
/// Every ancestor of `exit` in the tree rooted at `entrance` lies on that path, so no search
/// is needed. Entrance and exit keep their own roles. Returns the number of cells tagged.
pub fn mark_path(maze: &mut Maze, entrance: Coord, exit: Coord) -> Result<usize, MazeError> {
    let ancestry = AncestryResult::compute(maze, entrance)?;
    mark_ancestors(maze, &ancestry, exit)
}

/// Tags every regular ancestor of `target` according to a precomputed `ancestry`.
pub fn mark_ancestors(
    maze: &mut Maze,
    ancestry: &AncestryResult,
    target: Coord,
) -> Result<usize, MazeError> {
    if !maze.contains(target) {
        return Err(MazeError::InvalidCoordinate(target));
    }
    let on_path = maze
        .cells()
        .filter(|cell| cell.role() == Role::Regular)
        .map(|cell| cell.coord())
        .filter(|&coord| ancestry.is_ancestor(coord, target))
        .collect::<Vec<_>>();
    for &coord in &on_path {
        maze.assign_role(coord, Role::OnPath);
    }
    tracing::debug!(
        "marked {} cells between {:?} and {:?}",
        on_path.len(),
        ancestry.root(),
        target
    );
    Ok(on_path.len())
}

/// Demotes every on-path cell to regular. Returns how many were demoted.
pub fn clear_path(maze: &mut Maze) -> usize {
    let on_path = maze
        .cells()
        .filter(|cell| cell.role() == Role::OnPath)
        .map(|cell| cell.coord())
        .collect::<Vec<_>>();
    for &coord in &on_path {
        maze.assign_role(coord, Role::Regular);
    }
    on_path.len()
}

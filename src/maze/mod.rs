pub mod cell;
mod grid;
mod topology;

pub use cell::{Cell, Direction, Role};
pub use grid::Grid;
pub use topology::Topology;

use crate::error::MazeError;
use crate::generators::{self, Algorithm, RandomSource};
use crate::solvers;

/// `(x, y)` position of a cell. `y` grows downwards.
pub type Coord = (u16, u16);

/// A maze over every cell of a [`Topology`], with one entrance and at most one exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    topology: Topology,
    cells: Grid<Option<Cell>>,
    len: usize,
    entrance: Coord,
    exit: Option<Coord>,
}

impl Maze {
    /// Creates a fully walled maze with the given entrance.
    pub fn new(topology: Topology, entrance: Coord) -> Result<Self, MazeError> {
        let (cells, len) = Self::blank_cells(&topology);
        if len == 0 {
            return Err(MazeError::EmptyTopology);
        }
        let mut maze = Maze {
            topology,
            cells,
            len,
            entrance,
            exit: None,
        };
        maze.cell_mut(entrance)
            .ok_or(MazeError::InvalidCoordinate(entrance))?
            .role = Role::Entrance;
        tracing::debug!("created {} maze with {} cells", topology, len);
        Ok(maze)
    }

    /// Creates a maze entered at [`Topology::default_entrance`].
    pub fn with_default_entrance(topology: Topology) -> Result<Self, MazeError> {
        Self::new(topology, topology.default_entrance())
    }

    /// Rebuilds a maze from stored cells without generating anything.
    ///
    /// `cells` must cover the topology exactly once, open walls must be mirrored by an
    /// existing neighbor, and roles must agree with `entrance` and `exit`.
    pub(crate) fn from_parts(
        topology: Topology,
        cells: Vec<Cell>,
        entrance: Coord,
        exit: Option<Coord>,
    ) -> Result<Self, MazeError> {
        // A disc covers at least a ninth of its box, so anything sparser cannot match and is
        // rejected before the box is allocated.
        let (width, height) = topology.bounds();
        let area = width as usize * height as usize;
        if area > cells.len().max(1) * 9 {
            return Err(MazeError::SnapshotMismatch(format!(
                "{} cannot hold only {} cells",
                topology,
                cells.len()
            )));
        }
        let (mut grid, len) = Self::blank_cells(&topology);
        if len == 0 {
            return Err(MazeError::EmptyTopology);
        }
        if cells.len() != len {
            return Err(MazeError::SnapshotMismatch(format!(
                "expected {} cells, found {}",
                len,
                cells.len()
            )));
        }
        let mut seen = Grid::new(grid.width(), grid.height(), false);
        for cell in cells {
            let coord = cell.coord();
            if !topology.contains(coord) {
                return Err(MazeError::InvalidCoordinate(coord));
            }
            if std::mem::replace(&mut seen[coord], true) {
                return Err(MazeError::SnapshotMismatch(format!(
                    "cell {:?} listed twice",
                    coord
                )));
            }
            grid[coord] = Some(cell);
        }

        let maze = Maze {
            topology,
            cells: grid,
            len,
            entrance,
            exit,
        };
        maze.check_walls()?;
        maze.check_roles()?;
        Ok(maze)
    }

    fn blank_cells(topology: &Topology) -> (Grid<Option<Cell>>, usize) {
        let (width, height) = topology.bounds();
        let mut grid = Grid::new(width, height, None);
        let mut len = 0;
        for coord in topology.cells() {
            grid[coord] = Some(Cell::new(coord));
            len += 1;
        }
        (grid, len)
    }

    fn check_walls(&self) -> Result<(), MazeError> {
        for cell in self.cells() {
            for direction in cell.open_directions() {
                let mirrored = self
                    .get(direction.step(cell.coord()))
                    .is_some_and(|other| !other.has_wall(direction.opposite()));
                if !mirrored {
                    return Err(MazeError::SnapshotMismatch(format!(
                        "open {:?} wall of {:?} has no matching passage",
                        direction,
                        cell.coord()
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_roles(&self) -> Result<(), MazeError> {
        let entrance = self.cell(self.entrance)?;
        if entrance.role() != Role::Entrance {
            return Err(MazeError::SnapshotMismatch(format!(
                "entrance {:?} is tagged {:?}",
                self.entrance,
                entrance.role()
            )));
        }
        if let Some(exit) = self.exit {
            if exit == self.entrance {
                return Err(MazeError::RoleConflict(exit));
            }
            let role = self.cell(exit)?.role();
            if role != Role::Exit {
                return Err(MazeError::SnapshotMismatch(format!(
                    "exit {:?} is tagged {:?}",
                    exit, role
                )));
            }
        }
        let count = |role| self.cells().filter(|c| c.role() == role).count();
        let exits_expected = usize::from(self.exit.is_some());
        if count(Role::Entrance) != 1 || count(Role::Exit) != exits_expected {
            return Err(MazeError::SnapshotMismatch(
                "entrance or exit role held by more than one cell".to_string(),
            ));
        }
        Ok(())
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.len
    }

    /// A constructed maze is never empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.get(coord).is_some()
    }

    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        self.cells.get(coord).and_then(Option::as_ref)
    }

    pub fn cell(&self, coord: Coord) -> Result<&Cell, MazeError> {
        self.get(coord).ok_or(MazeError::InvalidCoordinate(coord))
    }

    pub(crate) fn cell_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        self.cells.get_mut(coord).and_then(Option::as_mut)
    }

    /// All cells, in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    pub fn entrance(&self) -> Coord {
        self.entrance
    }

    pub fn exit(&self) -> Option<Coord> {
        self.exit
    }

    /// Neighbors of `coord` that belong to the maze, walls notwithstanding.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        Direction::ALL
            .into_iter()
            .map(move |d| d.step(coord))
            .filter(move |&c| self.contains(c))
    }

    /// Neighbors of `coord` reachable through an open wall.
    pub fn open_neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        self.get(coord)
            .into_iter()
            .flat_map(|cell| cell.open_directions().map(move |d| d.step(cell.coord())))
            .filter(move |&c| self.contains(c))
    }

    pub fn has_passage(&self, a: Coord, b: Coord) -> bool {
        match (self.get(a), Direction::between(a, b)) {
            (Some(cell), Some(direction)) => !cell.has_wall(direction) && self.contains(b),
            _ => false,
        }
    }

    /// Number of open walls between pairs of cells.
    pub fn passage_count(&self) -> usize {
        self.cells()
            .map(|cell| {
                [Direction::Right, Direction::Bottom]
                    .into_iter()
                    .filter(|&d| self.has_passage(cell.coord(), d.step(cell.coord())))
                    .count()
            })
            .sum()
    }

    /// Removes the wall between two neighboring cells, on both sides.
    ///
    /// Returns `true` if a wall was standing. Opening an existing passage again is a no-op.
    pub fn open_passage(&mut self, a: Coord, b: Coord) -> Result<bool, MazeError> {
        if !self.contains(a) {
            return Err(MazeError::InvalidCoordinate(a));
        }
        if !self.contains(b) {
            return Err(MazeError::InvalidCoordinate(b));
        }
        let direction = Direction::between(a, b).ok_or(MazeError::NonAdjacentCells(a, b))?;
        Ok(self.carve(a, direction))
    }

    /// Carves from `from` towards `direction`. Both cells must exist.
    pub(crate) fn carve(&mut self, from: Coord, direction: Direction) -> bool {
        let to = direction.step(from);
        if !self.contains(from) || !self.contains(to) {
            return false;
        }
        let mut removed = false;
        if let Some(cell) = self.cell_mut(from) {
            removed |= cell.knock_down(direction);
        }
        if let Some(cell) = self.cell_mut(to) {
            removed |= cell.knock_down(direction.opposite());
        }
        removed
    }

    pub(crate) fn is_visited(&self, coord: Coord) -> bool {
        self.get(coord).is_some_and(Cell::is_visited)
    }

    /// Marks `coord` visited. Returns `true` if it was not visited before.
    pub(crate) fn mark_visited(&mut self, coord: Coord) -> bool {
        self.cell_mut(coord)
            .is_some_and(|cell| !std::mem::replace(&mut cell.visited, true))
    }

    /// Walls every cell in again so the next carve starts from a blank grid. Entrance and exit
    /// stay; a marked path belonged to the old tree and is dropped.
    fn raise_walls(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            cell.raise_walls();
            if cell.role == Role::OnPath {
                cell.role = Role::Regular;
            }
        }
    }

    /// Moves the entrance to `coord`. The old entrance becomes a regular cell.
    pub fn set_entrance(&mut self, coord: Coord) -> Result<(), MazeError> {
        if !self.contains(coord) {
            return Err(MazeError::InvalidCoordinate(coord));
        }
        if self.exit == Some(coord) {
            return Err(MazeError::RoleConflict(coord));
        }
        let old = self.entrance;
        self.assign_role(old, Role::Regular);
        self.assign_role(coord, Role::Entrance);
        self.entrance = coord;
        Ok(())
    }

    /// Moves (or places) the exit at `coord`. A previous exit becomes a regular cell.
    pub fn set_exit(&mut self, coord: Coord) -> Result<(), MazeError> {
        if !self.contains(coord) {
            return Err(MazeError::InvalidCoordinate(coord));
        }
        if self.entrance == coord {
            return Err(MazeError::RoleConflict(coord));
        }
        if let Some(old) = self.exit.take() {
            self.assign_role(old, Role::Regular);
        }
        self.assign_role(coord, Role::Exit);
        self.exit = Some(coord);
        Ok(())
    }

    pub(crate) fn assign_role(&mut self, coord: Coord, role: Role) {
        if let Some(cell) = self.cell_mut(coord) {
            tracing::trace!("role of {:?}: {:?} -> {:?}", coord, cell.role, role);
            cell.role = role;
        }
    }

    /// Carves a fresh spanning tree from the entrance, replacing any earlier one.
    ///
    /// With `seed` set, the same maze comes out every time.
    pub fn generate(&mut self, algorithm: Algorithm, seed: Option<u64>) {
        let mut rng = generators::get_rng(seed);
        let entrance = self.entrance;
        self.raise_walls();
        generators::generate_maze(self, algorithm, entrance, &mut rng);
    }

    /// Carves a spanning tree rooted at `start`, drawing randomness from `rng`. Earlier passages
    /// are walled up first.
    ///
    /// Returns the number of cells the tree spans.
    pub fn generate_from<R: RandomSource + ?Sized>(
        &mut self,
        start: Coord,
        algorithm: Algorithm,
        rng: &mut R,
    ) -> Result<usize, MazeError> {
        if !self.contains(start) {
            return Err(MazeError::InvalidCoordinate(start));
        }
        self.raise_walls();
        Ok(generators::generate_maze(self, algorithm, start, rng))
    }

    /// Demotes every on-path cell back to regular.
    pub fn clear_path(&mut self) -> usize {
        solvers::clear_path(self)
    }

    /// Marks the tree path between entrance and exit. Returns the number of cells tagged.
    pub fn compute_path(&mut self) -> Result<usize, MazeError> {
        let exit = self.exit.ok_or(MazeError::NoExitSet)?;
        solvers::mark_path(self, self.entrance, exit)
    }

    /// Throws away every wall, visit and role over the same cell set. Only the entrance
    /// survives; the exit is cleared.
    pub fn reset(&mut self) {
        let (cells, _) = Self::blank_cells(&self.topology);
        self.cells = cells;
        self.exit = None;
        self.assign_role(self.entrance, Role::Entrance);
        tracing::debug!("reset {} maze", self.topology);
    }

    /// Resets, carves a new tree, then puts the exit back and marks the new path.
    pub fn regenerate(
        &mut self,
        algorithm: Algorithm,
        seed: Option<u64>,
    ) -> Result<(), MazeError> {
        let exit = self.exit;
        self.reset();
        self.generate(algorithm, seed);
        if let Some(exit) = exit {
            self.set_exit(exit)?;
            self.compute_path()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(length: u16, width: u16) -> Maze {
        Maze::with_default_entrance(Topology::Rectangular { length, width }).unwrap()
    }

    impl Maze {
        fn walls_of_every_cell(&self) -> Vec<[bool; 4]> {
            self.cells().map(Cell::walls).collect()
        }
    }

    #[test]
    fn test_new_maze_is_walled() {
        let maze = rect(4, 3);
        assert_eq!(maze.len(), 12);
        assert_eq!(maze.passage_count(), 0);
        assert!(maze.cells().all(|c| c.walls() == [true; 4] && !c.is_visited()));
        assert_eq!(maze.cell((0, 0)).unwrap().role(), Role::Entrance);
        assert_eq!(maze.exit(), None);
    }

    #[test]
    fn test_empty_topology_is_rejected() {
        let err = Maze::with_default_entrance(Topology::Circular { radius: 0 }).unwrap_err();
        assert_eq!(err, MazeError::EmptyTopology);
    }

    #[test]
    fn test_entrance_outside_topology() {
        let topology = Topology::Rectangular {
            length: 2,
            width: 2,
        };
        assert_eq!(
            Maze::new(topology, (2, 0)).unwrap_err(),
            MazeError::InvalidCoordinate((2, 0))
        );
    }

    #[test]
    fn test_open_passage() {
        let mut maze = rect(3, 3);
        assert!(maze.open_passage((1, 1), (2, 1)).unwrap());
        // Opening the same passage again changes nothing
        assert!(!maze.open_passage((2, 1), (1, 1)).unwrap());
        assert!(!maze.cell((1, 1)).unwrap().has_wall(Direction::Right));
        assert!(!maze.cell((2, 1)).unwrap().has_wall(Direction::Left));
        assert!(maze.has_passage((1, 1), (2, 1)));
        assert!(maze.has_passage((2, 1), (1, 1)));
        assert_eq!(maze.passage_count(), 1);
    }

    #[test]
    fn test_open_passage_errors() {
        let mut maze = rect(3, 3);
        assert_eq!(
            maze.open_passage((0, 0), (2, 0)),
            Err(MazeError::NonAdjacentCells((0, 0), (2, 0)))
        );
        assert_eq!(
            maze.open_passage((0, 0), (1, 1)),
            Err(MazeError::NonAdjacentCells((0, 0), (1, 1)))
        );
        assert_eq!(
            maze.open_passage((2, 0), (3, 0)),
            Err(MazeError::InvalidCoordinate((3, 0)))
        );
        assert_eq!(maze.passage_count(), 0);
    }

    #[test]
    fn test_open_passage_respects_circular_shape() {
        let mut maze = Maze::with_default_entrance(Topology::Circular { radius: 4 }).unwrap();
        assert_eq!(maze.entrance(), (3, 3));
        assert_eq!(
            maze.open_passage((6, 3), (7, 3)),
            Err(MazeError::InvalidCoordinate((7, 3)))
        );
        assert_eq!(maze.neighbors((6, 3)).count(), 3);
    }

    #[test]
    fn test_set_entrance_and_exit() {
        let mut maze = rect(3, 3);
        maze.set_exit((2, 2)).unwrap();
        maze.set_exit((2, 1)).unwrap();
        assert_eq!(maze.cell((2, 2)).unwrap().role(), Role::Regular);
        assert_eq!(maze.cell((2, 1)).unwrap().role(), Role::Exit);

        maze.set_entrance((1, 1)).unwrap();
        assert_eq!(maze.cell((0, 0)).unwrap().role(), Role::Regular);
        assert_eq!(maze.cell((1, 1)).unwrap().role(), Role::Entrance);
        assert_eq!(maze.entrance(), (1, 1));

        assert_eq!(maze.set_exit((1, 1)), Err(MazeError::RoleConflict((1, 1))));
        assert_eq!(maze.set_entrance((2, 1)), Err(MazeError::RoleConflict((2, 1))));
        assert_eq!(maze.set_exit((5, 5)), Err(MazeError::InvalidCoordinate((5, 5))));
        assert_eq!(maze.cells().filter(|c| c.role().is_endpoint()).count(), 2);
    }

    #[test]
    fn test_set_entrance_in_place() {
        let mut maze = rect(2, 2);
        maze.set_entrance((0, 0)).unwrap();
        assert_eq!(maze.cell((0, 0)).unwrap().role(), Role::Entrance);
    }

    #[test]
    fn test_compute_path_without_exit() {
        let mut maze = rect(3, 3);
        maze.generate(Algorithm::Dfs, Some(1));
        assert_eq!(maze.compute_path(), Err(MazeError::NoExitSet));
    }

    #[test]
    fn test_reset_keeps_cells_and_entrance() {
        let mut maze = rect(5, 4);
        maze.set_entrance((2, 2)).unwrap();
        maze.generate(Algorithm::Prim, Some(3));
        maze.set_exit((4, 3)).unwrap();
        maze.compute_path().unwrap();

        maze.reset();
        assert_eq!(maze.len(), 20);
        assert_eq!(maze.passage_count(), 0);
        assert_eq!(maze.exit(), None);
        assert_eq!(maze.entrance(), (2, 2));
        assert!(maze.cells().all(|c| !c.is_visited()));
        assert_eq!(maze.cells().filter(|c| c.role() != Role::Regular).count(), 1);
        assert_eq!(maze.cell((2, 2)).unwrap().role(), Role::Entrance);
    }

    #[test]
    fn test_reset_then_generate_is_deterministic() {
        let mut maze = rect(12, 9);
        maze.generate(Algorithm::Dfs, Some(42));
        let first = maze.clone();
        maze.reset();
        maze.generate(Algorithm::Dfs, Some(42));
        assert_eq!(maze, first);

        maze.reset();
        maze.generate(Algorithm::Prim, Some(42));
        let prim = maze.clone();
        maze.reset();
        maze.generate(Algorithm::Prim, Some(42));
        assert_eq!(maze, prim);
    }

    #[test]
    fn test_regenerate_restores_exit_and_path() {
        let mut maze = rect(6, 6);
        maze.generate(Algorithm::Dfs, Some(5));
        maze.set_exit((5, 5)).unwrap();
        maze.regenerate(Algorithm::Prim, Some(6)).unwrap();
        assert_eq!(maze.exit(), Some((5, 5)));
        assert_eq!(maze.cell((5, 5)).unwrap().role(), Role::Exit);
        assert!(maze.cells().any(|c| c.role() == Role::OnPath));
        assert_eq!(maze.passage_count(), maze.len() - 1);
    }

    #[test]
    fn test_generate_twice_keeps_a_tree() {
        let mut maze = rect(10, 10);
        maze.generate(Algorithm::Dfs, Some(1));
        assert_eq!(maze.passage_count(), 99);
        maze.set_exit((9, 9)).unwrap();
        maze.compute_path().unwrap();

        maze.generate(Algorithm::Prim, Some(2));
        assert_eq!(maze.passage_count(), maze.len() - 1);
        assert_eq!(maze.cell((0, 0)).unwrap().role(), Role::Entrance);
        assert_eq!(maze.cell((9, 9)).unwrap().role(), Role::Exit);
        assert!(maze.cells().all(|c| c.role() != Role::OnPath));

        let mut fresh = rect(10, 10);
        fresh.generate(Algorithm::Prim, Some(2));
        assert_eq!(maze.walls_of_every_cell(), fresh.walls_of_every_cell());
    }

    #[test]
    fn test_generate_from_twice_keeps_a_tree() {
        let mut maze = Maze::with_default_entrance(Topology::Circular { radius: 6 }).unwrap();
        let mut rng = generators::get_rng(Some(11));
        for (start, algorithm) in [((5, 5), Algorithm::Prim), ((0, 5), Algorithm::Dfs)] {
            assert_eq!(maze.generate_from(start, algorithm, &mut rng), Ok(maze.len()));
            assert_eq!(maze.passage_count(), maze.len() - 1);
        }
    }

    #[test]
    fn test_generate_from_invalid_start() {
        let mut maze = rect(3, 3);
        let mut rng = generators::get_rng(Some(0));
        assert_eq!(
            maze.generate_from((9, 9), Algorithm::Dfs, &mut rng),
            Err(MazeError::InvalidCoordinate((9, 9)))
        );
    }

    #[test]
    fn test_from_parts_rejects_broken_walls() {
        let maze = rect(2, 1);
        let mut cells = maze.cells().cloned().collect::<Vec<_>>();
        cells[0].knock_down(Direction::Right);
        let err = Maze::from_parts(*maze.topology(), cells, (0, 0), None).unwrap_err();
        assert!(matches!(err, MazeError::SnapshotMismatch(_)));
    }

    #[test]
    fn test_from_parts_rejects_oversized_topology() {
        let cells = rect(1, 1).cells().cloned().collect::<Vec<_>>();
        for topology in [
            Topology::Rectangular {
                length: u16::MAX,
                width: u16::MAX,
            },
            Topology::Circular { radius: 30_000 },
        ] {
            let err = Maze::from_parts(topology, cells.clone(), (0, 0), None).unwrap_err();
            assert!(matches!(err, MazeError::SnapshotMismatch(_)));
        }
    }

    #[test]
    fn test_from_parts_rejects_missing_cells() {
        let maze = rect(2, 2);
        let cells = maze.cells().take(3).cloned().collect::<Vec<_>>();
        let err = Maze::from_parts(*maze.topology(), cells, (0, 0), None).unwrap_err();
        assert!(matches!(err, MazeError::SnapshotMismatch(_)));
    }
}

use serde::{Deserialize, Serialize};

use super::Coord;

/// One of the four sides of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Top,
    Right,
    Bottom,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Right,
        Direction::Bottom,
        Direction::Left,
    ];

    /// Offset `(dx, dy)` of the neighbor on this side. `y` grows downwards.
    const OFFSETS: [(i8, i8); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn offset(self) -> (i8, i8) {
        Self::OFFSETS[self.index()]
    }

    pub fn opposite(self) -> Direction {
        Self::ALL[(self.index() + 2) % 4]
    }

    /// Coordinate of the neighbor in this direction.
    ///
    /// NOTE: stepping off the `0` edge wraps to `u16::MAX` and stepping past `u16::MAX`
    /// saturates, so out-of-range neighbors land on coordinates no topology admits.
    pub fn step(self, coord: Coord) -> Coord {
        let (x, y) = coord;
        match self {
            Direction::Top => (x, y.wrapping_sub(1)),
            Direction::Right => (x.saturating_add(1), y),
            Direction::Bottom => (x, y.saturating_add(1)),
            Direction::Left => (x.wrapping_sub(1), y),
        }
    }

    /// Side of `from` that faces `to`, if the two are grid neighbors.
    pub fn between(from: Coord, to: Coord) -> Option<Direction> {
        let dx = to.0 as i32 - from.0 as i32;
        let dy = to.1 as i32 - from.1 as i32;
        Self::ALL
            .into_iter()
            .find(|d| d.offset() == (dx.clamp(-2, 2) as i8, dy.clamp(-2, 2) as i8))
    }
}

/// What a cell stands for, besides being a piece of the maze.
///
/// Precedence when marking a path: `Entrance`/`Exit` > `OnPath` > `Regular`.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Regular,
    Entrance,
    Exit,
    OnPath,
}

impl Role {
    /// Entrance and exit are pinned; only the path extractor's own tags may be replaced.
    pub fn is_endpoint(self) -> bool {
        matches!(self, Role::Entrance | Role::Exit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    coord: Coord,
    walls: [bool; 4],
    pub(crate) visited: bool,
    pub(crate) role: Role,
}

impl Cell {
    /// A fully walled, unvisited, regular cell.
    pub fn new(coord: Coord) -> Self {
        Cell {
            coord,
            walls: [true; 4],
            visited: false,
            role: Role::Regular,
        }
    }

    pub(crate) fn restore(coord: Coord, walls: [bool; 4], role: Role) -> Self {
        Cell {
            coord,
            walls,
            visited: false,
            role,
        }
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn has_wall(&self, direction: Direction) -> bool {
        self.walls[direction.index()]
    }

    /// Wall flags in `Direction::ALL` order.
    pub fn walls(&self) -> [bool; 4] {
        self.walls
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns `true` if the wall was standing.
    pub(crate) fn knock_down(&mut self, direction: Direction) -> bool {
        std::mem::replace(&mut self.walls[direction.index()], false)
    }

    /// Puts every wall back up and forgets the visit. The role stays.
    pub(crate) fn raise_walls(&mut self) {
        self.walls = [true; 4];
        self.visited = false;
    }

    /// Directions whose wall is gone.
    pub fn open_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|&d| !self.has_wall(d))
    }
}

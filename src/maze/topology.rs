use serde::{Deserialize, Serialize};

use super::Coord;

/// Shape of the cell set a maze is built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Topology {
    /// Every `(x, y)` with `x < length` and `y < width`.
    Rectangular { length: u16, width: u16 },
    /// Disc of the given radius, centered on `(radius - 1, radius - 1)`.
    Circular { radius: u16 },
}

impl Topology {
    /// Size of the bounding box `(width, height)` that holds every admitted cell.
    pub fn bounds(&self) -> (u16, u16) {
        match *self {
            Topology::Rectangular { length, width } => (length, width),
            Topology::Circular { radius } => {
                let side = radius.saturating_mul(2).saturating_add(1);
                (side, side)
            }
        }
    }

    /// Inclusion predicate.
    pub fn contains(&self, coord: Coord) -> bool {
        let (x, y) = coord;
        match *self {
            Topology::Rectangular { length, width } => x < length && y < width,
            Topology::Circular { radius } => {
                let (w, h) = self.bounds();
                if x >= w || y >= h {
                    return false;
                }
                // The center sits at radius - 1, not radius. Keep it that way: saved mazes
                // depend on the exact cell set.
                let center = radius as i64 - 1;
                let dx = x as i64 - center;
                let dy = y as i64 - center;
                let r = radius as i64;
                dx * dx + dy * dy < r * r
            }
        }
    }

    /// All admitted coordinates, in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        let (w, h) = self.bounds();
        (0..h)
            .flat_map(move |y| (0..w).map(move |x| (x, y)))
            .filter(move |&c| self.contains(c))
    }

    pub fn default_entrance(&self) -> Coord {
        match *self {
            Topology::Rectangular { .. } => (0, 0),
            Topology::Circular { radius } => (radius.saturating_sub(1), radius.saturating_sub(1)),
        }
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Topology::Rectangular { length, width } => write!(f, "rectangle {}x{}", length, width),
            Topology::Circular { radius } => write!(f, "disc of radius {}", radius),
        }
    }
}

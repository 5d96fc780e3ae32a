use crossterm::style::{Color, Stylize};

use std::fmt;

use crate::maze::{Coord, Maze, Role};

/// One slot of the text drawing. Cells sit on odd rows and columns, walls between them and
/// posts on the even corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Wall,
    Open,
    Entrance,
    Exit,
    Path,
    /// Outside the topology.
    Void,
}

impl Glyph {
    /// The width of each glyph when rendered, in character widths.
    pub const WIDTH: usize = 2;

    pub fn symbol(self) -> &'static str {
        match self {
            Glyph::Wall => "██",
            Glyph::Open => "  ",
            Glyph::Entrance => "()",
            Glyph::Exit => "[]",
            Glyph::Path => "::",
            Glyph::Void => "  ",
        }
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Glyph::Wall => self.symbol().with(Color::White),
            Glyph::Open | Glyph::Void => self.symbol().with(Color::Reset),
            Glyph::Entrance => self.symbol().with(Color::DarkYellow),
            Glyph::Exit => self.symbol().with(Color::Red),
            Glyph::Path => self.symbol().with(Color::Blue),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Glyph::WIDTH,
                "Each glyph must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// Lays a maze out as rows of glyphs, `2w + 1` by `2h + 1` for a `w x h` bounding box.
pub fn glyphs(maze: &Maze, show_path: bool) -> Vec<Vec<Glyph>> {
    let (width, height) = maze.topology().bounds();
    let (width, height) = (width as i64, height as i64);

    let cell = |x: i64, y: i64| -> Option<Coord> {
        let inside = (0..width).contains(&x) && (0..height).contains(&y);
        inside
            .then_some((x as u16, y as u16))
            .filter(|&c| maze.contains(c))
    };
    let on_route = |coord: Coord| {
        maze.get(coord)
            .is_some_and(|c| c.role() == Role::OnPath || c.role().is_endpoint())
    };
    let between = |a: Option<Coord>, b: Option<Coord>| match (a, b) {
        (None, None) => Glyph::Void,
        (Some(a), Some(b)) if maze.has_passage(a, b) => {
            if show_path && on_route(a) && on_route(b) {
                Glyph::Path
            } else {
                Glyph::Open
            }
        }
        _ => Glyph::Wall,
    };

    (0..2 * height + 1)
        .map(|gy| {
            (0..2 * width + 1)
                .map(|gx| {
                    let (x, y) = (gx / 2, gy / 2);
                    match (gx % 2, gy % 2) {
                        (1, 1) => match cell(x, y).and_then(|c| maze.get(c)).map(|c| c.role()) {
                            None => Glyph::Void,
                            Some(Role::Entrance) => Glyph::Entrance,
                            Some(Role::Exit) => Glyph::Exit,
                            Some(Role::OnPath) if show_path => Glyph::Path,
                            Some(_) => Glyph::Open,
                        },
                        (0, 1) => between(cell(x - 1, y), cell(x, y)),
                        (1, 0) => between(cell(x, y - 1), cell(x, y)),
                        _ => {
                            let posts = [(x - 1, y - 1), (x, y - 1), (x - 1, y), (x, y)];
                            if posts.into_iter().any(|(x, y)| cell(x, y).is_some()) {
                                Glyph::Wall
                            } else {
                                Glyph::Void
                            }
                        }
                    }
                })
                .collect()
        })
        .collect()
}

/// Uncolored drawing, one line per glyph row, trailing blanks trimmed.
pub fn render_plain(maze: &Maze, show_path: bool) -> String {
    glyphs(maze, show_path)
        .into_iter()
        .map(|row| {
            let line = row.iter().map(|g| g.symbol()).collect::<String>();
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Colored drawing for a terminal.
pub fn render_styled(maze: &Maze, show_path: bool) -> String {
    glyphs(maze, show_path)
        .into_iter()
        .map(|row| row.iter().map(|g| g.to_string()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Topology;

    #[test]
    fn test_walled_row() {
        let maze = Maze::with_default_entrance(Topology::Rectangular {
            length: 2,
            width: 1,
        })
        .unwrap();
        let drawing = render_plain(&maze, false);
        assert_eq!(drawing, "██████████\n██()██  ██\n██████████");
    }

    #[test]
    fn test_path_is_drawn_only_on_request() {
        let mut maze = Maze::with_default_entrance(Topology::Rectangular {
            length: 3,
            width: 1,
        })
        .unwrap();
        maze.open_passage((0, 0), (1, 0)).unwrap();
        maze.open_passage((1, 0), (2, 0)).unwrap();
        maze.set_exit((2, 0)).unwrap();
        maze.compute_path().unwrap();

        assert_eq!(
            render_plain(&maze, true).lines().nth(1),
            Some("██()::::::[]██")
        );
        assert_eq!(
            render_plain(&maze, false).lines().nth(1),
            Some("██()      []██")
        );
    }

    #[test]
    fn test_disc_has_void_corners() {
        let maze = Maze::with_default_entrance(Topology::Circular { radius: 3 }).unwrap();
        let rows = glyphs(&maze, false);
        assert_eq!(rows.len(), 15);
        assert!(rows.iter().all(|row| row.len() == 15));
        // (0, 0) is inside the off-center disc, (6, 0) and (0, 6) are not
        assert_eq!(rows[0][0], Glyph::Wall);
        assert_eq!(rows[0][14], Glyph::Void);
        assert_eq!(rows[14][0], Glyph::Void);
        assert_eq!(rows[14][14], Glyph::Void);
        // The entrance (2, 2) sits in slot (5, 5)
        assert_eq!(rows[5][5], Glyph::Entrance);
        let cells = rows
            .iter()
            .flatten()
            .filter(|g| matches!(g, Glyph::Open | Glyph::Entrance))
            .count();
        assert_eq!(cells, maze.len());
    }

    #[test]
    fn test_styled_output_contains_symbols() {
        let maze = Maze::with_default_entrance(Topology::Circular { radius: 1 }).unwrap();
        let drawing = render_styled(&maze, false);
        assert!(drawing.contains("()"));
        assert_eq!(drawing.matches("\r\n").count(), 2);
    }
}

use std::{
    io::Write,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use clap::{Parser, Subcommand};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};

use crate::{
    error::MazeError,
    generators::{Algorithm, RandomSource, get_rng},
    maze::{Coord, Maze, Role, Topology},
    persist::{self, PersistError},
    render,
};

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Maze(#[from] MazeError),
    #[error("{0}")]
    Persist(#[from] PersistError),
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to set up logging: {0}")]
    Logging(String),
}

/// Generate a perfect maze, mark the way from entrance to exit and draw it.
#[derive(Debug, Clone, Parser)]
#[command(name = "mazetree", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub shape: Option<Shape>,

    /// Carving algorithm
    #[arg(long, value_enum, default_value_t = Algorithm::Dfs)]
    pub algorithm: Algorithm,

    /// Seed for reproducible mazes
    #[arg(long)]
    pub seed: Option<u64>,

    /// Entrance cell as `x,y` (defaults to the shape's usual entrance)
    #[arg(long, value_parser = parse_coord)]
    pub entrance: Option<Coord>,

    /// Exit cell as `x,y` (defaults to a random cell)
    #[arg(long, value_parser = parse_coord)]
    pub exit: Option<Coord>,

    /// Draw the path between entrance and exit
    #[arg(long)]
    pub show_path: bool,

    /// Draw without colors
    #[arg(long)]
    pub plain: bool,

    /// Read the maze from a file instead of generating one (the shape is then ignored)
    #[arg(long)]
    pub load: Option<PathBuf>,

    /// Write the final maze to a file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Throw the walls away and carve again, keeping entrance and exit
    #[arg(long)]
    pub regenerate: bool,

    #[arg(long, default_value = "mazetree.log")]
    pub log_file: PathBuf,

    #[arg(long, default_value_t = tracing::Level::INFO)]
    pub log_level: tracing::Level,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Shape {
    /// Rectangular grid
    Rect {
        #[arg(long, default_value_t = 30)]
        length: u16,
        #[arg(long, default_value_t = 30)]
        width: u16,
    },
    /// Disc-shaped grid
    Circle {
        #[arg(long, default_value_t = 10)]
        radius: u16,
    },
}

impl Default for Shape {
    fn default() -> Self {
        Shape::Rect {
            length: 30,
            width: 30,
        }
    }
}

impl From<Shape> for Topology {
    fn from(shape: Shape) -> Self {
        match shape {
            Shape::Rect { length, width } => Topology::Rectangular { length, width },
            Shape::Circle { radius } => Topology::Circular { radius },
        }
    }
}

fn parse_coord(s: &str) -> Result<Coord, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{}`", s))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<u16>()
            .map_err(|e| format!("invalid coordinate `{}`: {}", v, e))
    };
    Ok((parse(x)?, parse(y)?))
}

pub struct App {
    cli: Cli,
}

impl App {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Sends log records to the configured file so they never mix with the drawing on stdout.
    /// Keep the returned guard alive until exit, or buffered records are lost.
    pub fn init_logging(&self) -> Result<WorkerGuard, AppError> {
        let log_file = &self.cli.log_file;
        let directory = log_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let file_name = log_file
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| AppError::Logging(format!("{} is not a file", log_file.display())))?;

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(file_name)
            .build(directory)
            .map_err(|e| AppError::Logging(format!("{}: {}", log_file.display(), e)))?;
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_writer(writer)
            .with_ansi(false)
            .with_max_level(self.cli.log_level)
            .try_init()
            .map_err(|e| AppError::Logging(e.to_string()))?;
        Ok(guard)
    }

    /// Builds (or loads) the maze the arguments describe, with its path marked.
    pub fn build_maze(&self) -> Result<Maze, AppError> {
        let cli = &self.cli;
        let mut maze = match &cli.load {
            Some(path) => {
                let mut maze = persist::load(path)?;
                if let Some(entrance) = cli.entrance {
                    maze.clear_path();
                    maze.set_entrance(entrance)?;
                }
                maze
            }
            None => {
                let topology = Topology::from(cli.shape.unwrap_or_default());
                let entrance = cli.entrance.unwrap_or_else(|| topology.default_entrance());
                let mut maze = Maze::new(topology, entrance)?;
                maze.generate(cli.algorithm, cli.seed);
                maze
            }
        };

        let exit = match cli.exit {
            Some(exit) => Some(exit),
            None if maze.exit().is_none() => random_exit(&maze, &mut get_rng(cli.seed)),
            None => None,
        };
        if let Some(exit) = exit {
            maze.clear_path();
            maze.set_exit(exit)?;
        }

        if cli.regenerate {
            let seed = cli.seed.map(|s| s.wrapping_add(1));
            maze.regenerate(cli.algorithm, seed)?;
        }
        if maze.exit().is_some() {
            maze.clear_path();
            maze.compute_path()?;
        } else {
            tracing::warn!("single-cell maze has no room for an exit");
        }
        Ok(maze)
    }

    pub fn run(&self, out: &mut impl Write) -> Result<(), AppError> {
        let maze = self.build_maze()?;
        if let Some(path) = &self.cli.save {
            persist::save(path, &maze)?;
        }

        let drawing = if self.cli.plain {
            render::render_plain(&maze, self.cli.show_path)
        } else {
            render::render_styled(&maze, self.cli.show_path)
        };
        writeln!(out, "{}", drawing)?;

        let path_len = maze.cells().filter(|c| c.role() == Role::OnPath).count();
        writeln!(
            out,
            "{}: {} cells, entrance {:?}, exit {:?}, {} cells between them",
            maze.topology(),
            maze.len(),
            maze.entrance(),
            maze.exit(),
            path_len
        )?;
        Ok(())
    }

    /// Profiling mode: generate and solve repeatedly without drawing anything.
    ///
    /// Returns the time spent generating and the time spent marking paths.
    pub fn profile(
        length: u16,
        width: u16,
        algorithm: Algorithm,
        iterations: usize,
    ) -> Result<(Duration, Duration), AppError> {
        let topology = Topology::Rectangular { length, width };
        let mut maze = Maze::with_default_entrance(topology)?;
        let corner = (length.saturating_sub(1), width.saturating_sub(1));
        let (mut generating, mut solving) = (Duration::ZERO, Duration::ZERO);

        for seed in 0..iterations as u64 {
            maze.reset();
            let started = Instant::now();
            maze.generate(algorithm, Some(seed));
            generating += started.elapsed();

            if corner != maze.entrance() {
                maze.set_exit(corner)?;
                let started = Instant::now();
                maze.compute_path()?;
                solving += started.elapsed();
            }
        }
        tracing::info!(
            "profiled {} over {} runs on {}",
            algorithm,
            iterations,
            topology
        );
        Ok((generating, solving))
    }
}

/// Any cell other than the entrance, or `None` for a single-cell maze.
fn random_exit<R: RandomSource + ?Sized>(maze: &Maze, rng: &mut R) -> Option<Coord> {
    let candidates = maze
        .cells()
        .map(|c| c.coord())
        .filter(|&c| c != maze.entrance())
        .collect::<Vec<_>>();
    (!candidates.is_empty()).then(|| candidates[rng.pick(candidates.len())])
}

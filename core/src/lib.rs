#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Rover engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of grid rows when no configuration is provided.
pub const DEFAULT_GRID_ROWS: u32 = 21;

/// Default number of grid columns when no configuration is provided.
pub const DEFAULT_GRID_COLS: u32 = 21;

/// Default number of extra boundary exits carved beside the primary exit.
pub const DEFAULT_EXTRA_EXITS: u32 = 2;

/// Smallest grid dimension the carving algorithm accepts.
pub const MIN_GRID_DIMENSION: u32 = 5;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the world's maze with a freshly generated layout.
    InstallMaze {
        /// Generated grid, exit set, and start cell to install.
        layout: MazeLayout,
    },
    /// Records the direction the agent should attempt on the next commit.
    RequestMove {
        /// Direction of travel for subsequent step commits.
        direction: Direction,
    },
    /// Drops any pending movement direction.
    ClearMove,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Stores a freshly solved path for the agent's current position.
    SetPath {
        /// Ordered cells from the agent's cell to the nearest exit. An empty
        /// sequence records that no exit is currently reachable.
        cells: Vec<GridCoord>,
    },
    /// Arms playback of the stored path, stepping the agent along it.
    StartAutoplay,
    /// Toggles whether presentation collaborators should draw the path.
    SetPathVisible {
        /// Desired visibility of the solution overlay.
        visible: bool,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a maze layout was installed and the agent reset.
    MazeInstalled {
        /// Number of grid rows in the installed maze.
        rows: u32,
        /// Number of grid columns in the installed maze.
        cols: u32,
        /// Number of exits carved into the installed maze.
        exit_count: usize,
    },
    /// Confirms that the agent committed a step between two open cells.
    AgentMoved {
        /// Cell the agent occupied before moving.
        from: GridCoord,
        /// Cell the agent occupies after completing the move.
        to: GridCoord,
    },
    /// Requests that the solving system compute a fresh path.
    PathNeeded {
        /// Cell the path must start from, the agent's current position.
        from: GridCoord,
    },
    /// Announces that the agent reached an exit. Fires exactly once per
    /// solved maze; consumers react to the event rather than poll a flag.
    MazeCompleted {
        /// Exit cell that terminated the maze.
        exit: GridCoord,
    },
    /// Reports that path playback ran out of cells to replay.
    AutoplayFinished,
}

/// Cardinal movement directions available to the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Returns the cell one step away in this direction, or `None` when the
    /// step would leave the coordinate space entirely.
    #[must_use]
    pub fn step_from(self, cell: GridCoord) -> Option<GridCoord> {
        match self {
            Self::Up => cell
                .row()
                .checked_sub(1)
                .map(|row| GridCoord::new(row, cell.col())),
            Self::Down => Some(GridCoord::new(cell.row() + 1, cell.col())),
            Self::Left => cell
                .col()
                .checked_sub(1)
                .map(|col| GridCoord::new(cell.row(), col)),
            Self::Right => Some(GridCoord::new(cell.row(), cell.col() + 1)),
        }
    }
}

/// Location of a single grid cell expressed as row and column coordinates.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridCoord {
    row: u32,
    col: u32,
}

impl GridCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn col(&self) -> u32 {
        self.col
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: GridCoord) -> u32 {
        self.row().abs_diff(other.row()) + self.col().abs_diff(other.col())
    }
}

/// State of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Impassable cell.
    Wall,
    /// Carved, traversable cell.
    Open,
}

/// Dense rectangular grid of cell states stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: u32,
    cols: u32,
    cells: Vec<CellState>,
}

impl Grid {
    /// Creates a grid with every cell set to the provided state.
    #[must_use]
    pub fn filled(rows: u32, cols: u32, state: CellState) -> Self {
        let capacity_u64 = u64::from(rows) * u64::from(cols);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            rows,
            cols,
            cells: vec![state; capacity],
        }
    }

    /// Creates a zero-sized grid, the state of a world before any maze has
    /// been installed.
    #[must_use]
    pub fn empty() -> Self {
        Self::filled(0, 0, CellState::Wall)
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn cols(&self) -> u32 {
        self.cols
    }

    /// Reports whether the grid holds no cells at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the state of the provided cell, if it lies within bounds.
    #[must_use]
    pub fn cell(&self, cell: GridCoord) -> Option<CellState> {
        self.index(cell).and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether the cell exists within bounds and is carved open.
    #[must_use]
    pub fn is_open(&self, cell: GridCoord) -> bool {
        self.cell(cell) == Some(CellState::Open)
    }

    /// Overwrites the state of the provided cell. Out-of-bounds writes are
    /// ignored; the generator only addresses cells it allocated.
    pub fn set(&mut self, cell: GridCoord, state: CellState) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = state;
            }
        }
    }

    fn index(&self, cell: GridCoord) -> Option<usize> {
        if cell.row() < self.rows && cell.col() < self.cols {
            let row = usize::try_from(cell.row()).ok()?;
            let col = usize::try_from(cell.col()).ok()?;
            let width = usize::try_from(self.cols).ok()?;
            Some(row * width + col)
        } else {
            None
        }
    }
}

/// Generated maze ready for installation: grid, exit set, and start cell.
///
/// Invariants upheld by the generator: the start cell and every exit are
/// open, the primary exit sits at (rows − 2, cols − 2), and extra exits lie
/// on the grid border.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeLayout {
    grid: Grid,
    exits: Vec<GridCoord>,
    start: GridCoord,
}

impl MazeLayout {
    /// Assembles a layout from its parts.
    #[must_use]
    pub fn new(grid: Grid, exits: Vec<GridCoord>, start: GridCoord) -> Self {
        Self { grid, exits, start }
    }

    /// Grid carved by the generator.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Exit cells, primary exit first.
    #[must_use]
    pub fn exits(&self) -> &[GridCoord] {
        &self.exits
    }

    /// Cell the agent starts from.
    #[must_use]
    pub const fn start(&self) -> GridCoord {
        self.start
    }

    /// Consumes the layout, yielding grid, exits, and start cell.
    #[must_use]
    pub fn into_parts(self) -> (Grid, Vec<GridCoord>, GridCoord) {
        (self.grid, self.exits, self.start)
    }
}

/// Validated dimensions and exit count accepted by the maze generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    rows: u32,
    cols: u32,
    extra_exits: u32,
}

impl GeneratorConfig {
    /// Validates the requested dimensions and constructs a configuration.
    ///
    /// The carving algorithm walks odd coordinates two cells at a time, so
    /// both dimensions must be odd and at least [`MIN_GRID_DIMENSION`].
    /// Invalid requests surface [`InvalidDimension`] instead of being
    /// silently adjusted.
    pub fn new(rows: u32, cols: u32, extra_exits: u32) -> Result<Self, InvalidDimension> {
        if rows < MIN_GRID_DIMENSION || cols < MIN_GRID_DIMENSION {
            return Err(InvalidDimension::TooSmall { rows, cols });
        }
        if rows % 2 == 0 || cols % 2 == 0 {
            return Err(InvalidDimension::Even { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            extra_exits,
        })
    }

    /// Number of grid rows to generate.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of grid columns to generate.
    #[must_use]
    pub const fn cols(&self) -> u32 {
        self.cols
    }

    /// Number of extra boundary exits requested beside the primary exit.
    #[must_use]
    pub const fn extra_exits(&self) -> u32 {
        self.extra_exits
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_GRID_ROWS,
            cols: DEFAULT_GRID_COLS,
            extra_exits: DEFAULT_EXTRA_EXITS,
        }
    }
}

/// Rejected maze dimensions, surfaced at configuration time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum InvalidDimension {
    /// One or both dimensions are even; carving requires odd dimensions.
    #[error("maze dimensions must be odd, got {rows}x{cols}")]
    Even {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        cols: u32,
    },
    /// One or both dimensions fall below the supported minimum.
    #[error("maze dimensions must be at least {MIN_GRID_DIMENSION}x{MIN_GRID_DIMENSION}, got {rows}x{cols}")]
    TooSmall {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        cols: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::{
        CellState, Direction, GeneratorConfig, Grid, GridCoord, InvalidDimension, MazeLayout,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = GridCoord::new(1, 1);
        let destination = GridCoord::new(3, 4);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn direction_steps_stay_on_the_grid_lattice() {
        let cell = GridCoord::new(2, 2);
        assert_eq!(Direction::Up.step_from(cell), Some(GridCoord::new(1, 2)));
        assert_eq!(Direction::Down.step_from(cell), Some(GridCoord::new(3, 2)));
        assert_eq!(Direction::Left.step_from(cell), Some(GridCoord::new(2, 1)));
        assert_eq!(Direction::Right.step_from(cell), Some(GridCoord::new(2, 3)));
    }

    #[test]
    fn direction_steps_refuse_to_leave_coordinate_space() {
        let corner = GridCoord::new(0, 0);
        assert_eq!(Direction::Up.step_from(corner), None);
        assert_eq!(Direction::Left.step_from(corner), None);
    }

    #[test]
    fn config_rejects_even_dimensions() {
        assert_eq!(
            GeneratorConfig::new(20, 21, 0),
            Err(InvalidDimension::Even { rows: 20, cols: 21 })
        );
        assert_eq!(
            GeneratorConfig::new(21, 8, 0),
            Err(InvalidDimension::Even { rows: 21, cols: 8 })
        );
    }

    #[test]
    fn config_rejects_dimensions_below_minimum() {
        assert_eq!(
            GeneratorConfig::new(3, 3, 0),
            Err(InvalidDimension::TooSmall { rows: 3, cols: 3 })
        );
    }

    #[test]
    fn config_accepts_odd_dimensions_at_or_above_minimum() {
        let config = GeneratorConfig::new(5, 7, 3).expect("valid dimensions");
        assert_eq!(config.rows(), 5);
        assert_eq!(config.cols(), 7);
        assert_eq!(config.extra_exits(), 3);
    }

    #[test]
    fn default_config_is_valid() {
        let defaults = GeneratorConfig::default();
        let validated =
            GeneratorConfig::new(defaults.rows(), defaults.cols(), defaults.extra_exits());
        assert_eq!(validated, Ok(defaults));
    }

    #[test]
    fn grid_indexing_respects_bounds() {
        let mut grid = Grid::filled(3, 4, CellState::Wall);
        grid.set(GridCoord::new(1, 2), CellState::Open);
        assert!(grid.is_open(GridCoord::new(1, 2)));
        assert_eq!(grid.cell(GridCoord::new(2, 3)), Some(CellState::Wall));
        assert_eq!(grid.cell(GridCoord::new(3, 0)), None);
        assert_eq!(grid.cell(GridCoord::new(0, 4)), None);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn grid_coord_round_trips_through_bincode() {
        assert_round_trip(&GridCoord::new(7, 11));
    }

    #[test]
    fn cell_state_round_trips_through_bincode() {
        assert_round_trip(&CellState::Open);
        assert_round_trip(&CellState::Wall);
    }

    #[test]
    fn maze_layout_round_trips_through_bincode() {
        let mut grid = Grid::filled(5, 5, CellState::Wall);
        grid.set(GridCoord::new(1, 1), CellState::Open);
        grid.set(GridCoord::new(3, 3), CellState::Open);
        let layout = MazeLayout::new(grid, vec![GridCoord::new(3, 3)], GridCoord::new(1, 1));
        assert_round_trip(&layout);
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spawner::{SpawnedTile, TileDistribution, TileSpawner};

pub const GRID_SIZE: usize = 4;

/// Largest tile a 4x4 board can build: sixteen cells, the last one spawning a 4.
///
/// Two `MAX_TILE`s never merge, so every grid stays within `2..=MAX_TILE`.
pub const MAX_TILE: u32 = 1 << 17;

/// One row or column, ordered so that index 0 is the wall tiles slide toward.
pub type Line = [u32; GRID_SIZE];

/// `(row, col)`, row 0 at the top.
pub type Cell = (usize, usize);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("no empty cell left to spawn into")]
    NoEmptyCell,
    #[error("cell ({row}, {col}) already holds {value}")]
    CellOccupied { row: usize, col: usize, value: u32 },
    #[error("cell ({row}, {col}) is outside the 4x4 grid")]
    OutOfBounds { row: usize, col: usize },
    #[error("cell ({row}, {col}) holds {value}, which is not 0 or a power of two in 2..=131072")]
    InvalidTile { row: usize, col: usize, value: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Grid coordinates of position `k` along line `index`, read in this direction.
    fn cell(self, index: usize, k: usize) -> Cell {
        let last = GRID_SIZE - 1;
        match self {
            Direction::Left => (index, k),
            Direction::Right => (index, last - k),
            Direction::Up => (k, index),
            Direction::Down => (last - k, index),
        }
    }
}

/// Slides the non-zero tiles of `line` toward index 0 and merges equal neighbours.
///
/// Each tile merges at most once, so `[2, 2, 2, 2]` becomes `[4, 4, 0, 0]`. Returns the new line
/// and the sum of all merged values.
pub fn compress_and_merge_line(line: Line) -> (Line, u32) {
    let mut out = [0; GRID_SIZE];
    let mut len = 0;
    let mut delta = 0;
    let mut pending = None;

    for value in line.into_iter().filter(|&v| v != 0) {
        match pending.take() {
            Some(prev) if prev == value && prev < MAX_TILE => {
                out[len] = prev * 2;
                delta += prev * 2;
                len += 1;
            }
            Some(prev) => {
                out[len] = prev;
                len += 1;
                pending = Some(value);
            }
            None => pending = Some(value),
        }
    }
    if let Some(prev) = pending {
        out[len] = prev;
    }

    (out, delta)
}

fn is_tile_value(value: u32) -> bool {
    value == 0 || ((2..=MAX_TILE).contains(&value) && value.is_power_of_two())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[[u32; 4]; 4]")]
pub struct Grid([[u32; GRID_SIZE]; GRID_SIZE]);

impl TryFrom<[[u32; GRID_SIZE]; GRID_SIZE]> for Grid {
    type Error = CoreError;

    fn try_from(rows: [[u32; GRID_SIZE]; GRID_SIZE]) -> Result<Self, Self::Error> {
        Grid::from_rows(rows)
    }
}

impl Grid {
    pub const EMPTY: Grid = Grid([[0; GRID_SIZE]; GRID_SIZE]);

    /// Builds a grid, rejecting values that are neither 0 nor a power of two in `2..=MAX_TILE`.
    pub fn from_rows(rows: [[u32; GRID_SIZE]; GRID_SIZE]) -> Result<Self, CoreError> {
        for (row, values) in rows.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if !is_tile_value(value) {
                    return Err(CoreError::InvalidTile { row, col, value });
                }
            }
        }
        Ok(Self(rows))
    }

    pub fn rows(&self) -> &[[u32; GRID_SIZE]; GRID_SIZE] {
        &self.0
    }

    pub fn get(&self, (row, col): Cell) -> Option<u32> {
        self.0.get(row)?.get(col).copied()
    }

    pub(crate) fn place(&mut self, (row, col): Cell, value: u32) -> Result<(), CoreError> {
        let slot = self
            .0
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(CoreError::OutOfBounds { row, col })?;
        if *slot != 0 {
            return Err(CoreError::CellOccupied {
                row,
                col,
                value: *slot,
            });
        }
        *slot = value;
        Ok(())
    }

    pub fn line(&self, dir: Direction, index: usize) -> Line {
        std::array::from_fn(|k| {
            let (row, col) = dir.cell(index, k);
            self.0[row][col]
        })
    }

    fn set_line(&mut self, dir: Direction, index: usize, line: Line) {
        for (k, value) in line.into_iter().enumerate() {
            let (row, col) = dir.cell(index, k);
            self.0[row][col] = value;
        }
    }

    /// The grid after sliding toward `dir`, plus the merge score. `self` is untouched.
    pub fn shifted(&self, dir: Direction) -> (Grid, u32) {
        let mut next = *self;
        let mut delta = 0;
        for index in 0..GRID_SIZE {
            let (line, line_delta) = compress_and_merge_line(self.line(dir, index));
            next.set_line(dir, index, line);
            delta += line_delta;
        }
        (next, delta)
    }

    /// Coordinates holding 0, in row-major order.
    pub fn empty_cells(&self) -> Vec<Cell> {
        (0..GRID_SIZE)
            .flat_map(|row| (0..GRID_SIZE).map(move |col| (row, col)))
            .filter(|&(row, col)| self.0[row][col] == 0)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().flatten().all(|&v| v != 0)
    }

    pub fn has_horizontal_merge(&self) -> bool {
        (0..GRID_SIZE).any(|row| compress_and_merge_line(self.line(Direction::Left, row)).1 != 0)
    }

    pub fn has_vertical_merge(&self) -> bool {
        (0..GRID_SIZE).any(|col| compress_and_merge_line(self.line(Direction::Up, col)).1 != 0)
    }

    /// Each row reversed (left-right mirror).
    pub fn mirrored_rows(&self) -> Grid {
        let mut rows = self.0;
        for row in rows.iter_mut() {
            row.reverse();
        }
        Grid(rows)
    }

    /// Each column reversed (top-bottom mirror).
    pub fn mirrored_cols(&self) -> Grid {
        let mut rows = self.0;
        rows.reverse();
        Grid(rows)
    }

    pub fn max_tile(&self) -> u32 {
        self.0.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn tile_sum(&self) -> u64 {
        self.0.iter().flatten().map(|&v| u64::from(v)).sum()
    }

    pub fn tile_count(&self) -> usize {
        self.0.iter().flatten().filter(|&&v| v != 0).count()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.0 {
            let cells: Vec<String> = row.iter().map(|v| format!("{v:>5}")).collect();
            writeln!(f, "{}", cells.join(""))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    pub changed: bool,
    pub score_delta: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Twenty48Snapshot {
    pub grid: Grid,
    pub score: u64,
}

/// One game session: the grid, the running score and the RNG that feeds spawns.
#[derive(Debug, Clone)]
pub struct Twenty48Core {
    grid: Grid,
    score: u64,
    spawner: TileSpawner,
}

impl Twenty48Core {
    /// An empty grid; call [`Twenty48Core::initialize_game`] to place the starting tiles.
    pub fn new(seed: u64) -> Self {
        Self::with_distribution(seed, TileDistribution::default())
    }

    pub fn with_distribution(seed: u64, distribution: TileDistribution) -> Self {
        Self {
            grid: Grid::EMPTY,
            score: 0,
            spawner: TileSpawner::new(seed, distribution),
        }
    }

    pub fn from_grid(grid: Grid, seed: u64) -> Self {
        Self {
            grid,
            ..Self::new(seed)
        }
    }

    /// Clears the board and score, then places the two starting tiles in distinct cells.
    pub fn initialize_game(&mut self) -> Result<[SpawnedTile; 2], CoreError> {
        self.grid = Grid::EMPTY;
        self.score = 0;
        let first = self.spawn_random_tile()?;
        let second = self.spawn_random_tile()?;
        Ok([first, second])
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn distribution(&self) -> TileDistribution {
        self.spawner.distribution()
    }

    pub fn max_tile(&self) -> u32 {
        self.grid.max_tile()
    }

    pub fn snapshot(&self) -> Twenty48Snapshot {
        Twenty48Snapshot {
            grid: self.grid,
            score: self.score,
        }
    }

    pub fn move_left(&mut self) -> MoveOutcome {
        self.apply_move(Direction::Left)
    }

    pub fn move_right(&mut self) -> MoveOutcome {
        self.apply_move(Direction::Right)
    }

    pub fn move_up(&mut self) -> MoveOutcome {
        self.apply_move(Direction::Up)
    }

    pub fn move_down(&mut self) -> MoveOutcome {
        self.apply_move(Direction::Down)
    }

    /// Slides and merges every line toward `dir`, adding merged values to the score.
    pub fn apply_move(&mut self, dir: Direction) -> MoveOutcome {
        let (next, score_delta) = self.grid.shifted(dir);
        let changed = next != self.grid;
        self.grid = next;
        self.score += u64::from(score_delta);
        MoveOutcome {
            changed,
            score_delta,
        }
    }

    pub fn can_move(&self, dir: Direction) -> bool {
        self.grid.shifted(dir).0 != self.grid
    }

    pub fn available_space(&self) -> Vec<Cell> {
        self.grid.empty_cells()
    }

    /// Places a 2 or a 4 at `cell`, which must be inside the grid and empty.
    pub fn insert_2_or_4(&mut self, cell: Cell) -> Result<u32, CoreError> {
        let (row, col) = cell;
        match self.grid.get(cell) {
            None => return Err(CoreError::OutOfBounds { row, col }),
            Some(0) => {}
            Some(value) => return Err(CoreError::CellOccupied { row, col, value }),
        }
        let value = self.spawner.pick_value();
        self.grid.place(cell, value)?;
        Ok(value)
    }

    /// Places a 2 or a 4 in a uniformly chosen empty cell.
    pub fn spawn_random_tile(&mut self) -> Result<SpawnedTile, CoreError> {
        self.spawner.spawn_into(&mut self.grid)
    }

    /// No empty cell and no merge available in either orientation.
    pub fn is_game_over(&self) -> bool {
        self.grid.is_full() && !self.grid.has_horizontal_merge() && !self.grid.has_vertical_merge()
    }
}

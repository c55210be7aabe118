use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::twenty48_core::{Cell, CoreError, Grid};

/// How often a spawned tile is a 4 rather than a 2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileDistribution {
    /// 2 and 4 equally likely.
    #[default]
    Uniform,
    /// 2 nine times out of ten.
    Classic,
}

impl FromStr for TileDistribution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" | "even" => Ok(Self::Uniform),
            "classic" | "weighted" => Ok(Self::Classic),
            other => Err(format!("unknown tile distribution '{other}'")),
        }
    }
}

impl fmt::Display for TileDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uniform => "uniform",
            Self::Classic => "classic",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnedTile {
    pub row: usize,
    pub col: usize,
    pub value: u32,
}

#[derive(Debug, Clone)]
pub struct TileSpawner {
    rng: ChaCha8Rng,
    distribution: TileDistribution,
}

impl TileSpawner {
    pub fn new(seed: u64, distribution: TileDistribution) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            distribution,
        }
    }

    pub fn distribution(&self) -> TileDistribution {
        self.distribution
    }

    pub fn pick_value(&mut self) -> u32 {
        let four = match self.distribution {
            TileDistribution::Uniform => self.rng.gen_bool(0.5),
            TileDistribution::Classic => self.rng.gen_bool(0.1),
        };
        if four { 4 } else { 2 }
    }

    /// A uniformly chosen member of `cells`, or `None` when it is empty.
    pub fn pick_cell(&mut self, cells: &[Cell]) -> Option<Cell> {
        if cells.is_empty() {
            return None;
        }
        Some(cells[self.rng.gen_range(0..cells.len())])
    }

    pub fn spawn_into(&mut self, grid: &mut Grid) -> Result<SpawnedTile, CoreError> {
        let cell = self
            .pick_cell(&grid.empty_cells())
            .ok_or(CoreError::NoEmptyCell)?;
        let value = self.pick_value();
        grid.place(cell, value)?;
        let (row, col) = cell;
        Ok(SpawnedTile { row, col, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_spawns_same_tiles() {
        let mut a = TileSpawner::new(42, TileDistribution::Uniform);
        let mut b = TileSpawner::new(42, TileDistribution::Uniform);
        let mut grid_a = Grid::EMPTY;
        let mut grid_b = Grid::EMPTY;
        for _ in 0..16 {
            assert_eq!(
                a.spawn_into(&mut grid_a).unwrap(),
                b.spawn_into(&mut grid_b).unwrap()
            );
        }
        assert!(grid_a.is_full());
        assert_eq!(a.spawn_into(&mut grid_a), Err(CoreError::NoEmptyCell));
    }

    #[test]
    fn pick_cell_only_returns_given_cells() {
        let mut spawner = TileSpawner::new(7, TileDistribution::Uniform);
        assert_eq!(spawner.pick_cell(&[]), None);
        let cells = [(1, 2), (3, 0)];
        for _ in 0..50 {
            let picked = spawner.pick_cell(&cells).unwrap();
            assert!(cells.contains(&picked));
        }
    }

    #[test]
    fn uniform_produces_both_values() {
        let mut spawner = TileSpawner::new(3, TileDistribution::Uniform);
        let values: Vec<u32> = (0..200).map(|_| spawner.pick_value()).collect();
        assert!(values.iter().all(|&v| v == 2 || v == 4));
        let fours = values.iter().filter(|&&v| v == 4).count();
        assert!((50..150).contains(&fours), "fours = {fours}");
    }

    #[test]
    fn classic_is_mostly_twos() {
        let mut spawner = TileSpawner::new(3, TileDistribution::Classic);
        let fours = (0..1000).filter(|_| spawner.pick_value() == 4).count();
        assert!(fours < 200, "fours = {fours}");
        assert!(fours > 20, "fours = {fours}");
    }

    #[test]
    fn distribution_parses_names() {
        assert_eq!("Classic".parse(), Ok(TileDistribution::Classic));
        assert_eq!(" uniform ".parse(), Ok(TileDistribution::Uniform));
        assert!("sometimes".parse::<TileDistribution>().is_err());
        assert_eq!(TileDistribution::Classic.to_string(), "classic");
    }
}

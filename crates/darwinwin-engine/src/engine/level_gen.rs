use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::{Level, TileFlags};

/// Source of fresh levels for training batches.
pub trait LevelGenerator {
    /// Produces a level whose border band is collidable.
    fn generate<R>(&self, rng: &mut R) -> Level
    where
        R: Rng + ?Sized;
}

/// Scatters water and food independently over the interior.
///
/// Only the border band is collidable on a generated level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterLevelGenerator {
    /// Probability of a tile being underwater.
    pub water: f64,
    /// Probability of each food flag on a tile.
    pub food: f64,
}

impl Default for ScatterLevelGenerator {
    fn default() -> Self {
        Self {
            water: 0.15,
            food: 0.06,
        }
    }
}

impl LevelGenerator for ScatterLevelGenerator {
    fn generate<R>(&self, rng: &mut R) -> Level
    where
        R: Rng + ?Sized,
    {
        let water = self.water.clamp(0.0, 1.0);
        let food = self.food.clamp(0.0, 1.0);

        let mut level = Level::new();
        for pos in Level::interior_positions() {
            let mut flags = TileFlags::EMPTY;
            for flag in [
                TileFlags::PROTEIN,
                TileFlags::SUGAR,
                TileFlags::VITAMIN,
                TileFlags::FAT,
            ] {
                if rng.random_bool(food) {
                    flags.insert(flag);
                }
            }
            if rng.random_bool(water) {
                flags.insert(TileFlags::UNDERWATER);
            }
            level.set_tile(pos, flags);
        }
        level
    }
}

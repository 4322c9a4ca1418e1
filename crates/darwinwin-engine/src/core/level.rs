use std::{fmt, ops::Range};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{PlacementError, core::tile::TileFlags};

const LEVEL_WIDTH: usize = 32;
const LEVEL_HEIGHT: usize = 32;
const WALL_THICKNESS: usize = 3;

/// Tile coordinate. `(0, 0)` is the top-left corner.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Builds a position from grid coordinates, which always fit in `u16`.
    #[expect(clippy::cast_possible_truncation)]
    pub(crate) const fn from_grid(x: usize, y: usize) -> Self {
        debug_assert!(x < Level::WIDTH && y < Level::HEIGHT);
        Self::new(x as u16, y as u16)
    }

    /// Returns the position moved by `(dx, dy)`, or `None` if it leaves the level.
    #[must_use]
    pub fn offset(self, (dx, dy): (isize, isize)) -> Option<Self> {
        let x = usize::from(self.x).checked_add_signed(dx)?;
        let y = usize::from(self.y).checked_add_signed(dy)?;
        if x >= Level::WIDTH || y >= Level::HEIGHT {
            return None;
        }
        Some(Self::new(x.try_into().ok()?, y.try_into().ok()?))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Fixed-size tile grid.
///
/// A band of [`WALL_THICKNESS`](Self::WALL_THICKNESS) tiles around the edge is always
/// collidable. Every position an actor can reach therefore lies in the interior, and
/// all sensor and movement offsets (at most three tiles) stay inside the grid.
///
/// ```text
/// CCCCCCCC...CCCCCCCC
/// CCCCCCCC...CCCCCCCC
/// CCCCCCCC...CCCCCCCC
/// CCC     ...     CCC   <- interior starts at WALL_THICKNESS
/// ...
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Level {
    grid: [TileFlags; LEVEL_WIDTH * LEVEL_HEIGHT],
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Level")
            .field("width", &Self::WIDTH)
            .field("height", &Self::HEIGHT)
            .finish_non_exhaustive()
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::new()
    }
}

impl Level {
    pub const WIDTH: usize = LEVEL_WIDTH;
    pub const HEIGHT: usize = LEVEL_HEIGHT;
    pub const TILE_COUNT: usize = LEVEL_WIDTH * LEVEL_HEIGHT;
    pub const WALL_THICKNESS: usize = WALL_THICKNESS;
    pub const INTERIOR_X: Range<usize> = WALL_THICKNESS..(LEVEL_WIDTH - WALL_THICKNESS);
    pub const INTERIOR_Y: Range<usize> = WALL_THICKNESS..(LEVEL_HEIGHT - WALL_THICKNESS);
    /// Middle of the grid, always in the interior.
    pub const CENTER: Position = Position::from_grid(LEVEL_WIDTH / 2, LEVEL_HEIGHT / 2);

    /// Creates a level with the collidable border and an empty interior.
    #[must_use]
    pub fn new() -> Self {
        let mut grid = [TileFlags::EMPTY; Self::TILE_COUNT];
        for (i, tile) in grid.iter_mut().enumerate() {
            let (x, y) = (i % Self::WIDTH, i / Self::WIDTH);
            if !Self::INTERIOR_X.contains(&x) || !Self::INTERIOR_Y.contains(&y) {
                *tile = TileFlags::COLLIDABLE;
            }
        }
        Self { grid }
    }

    /// Returns `true` if `pos` lies inside the border band.
    #[must_use]
    pub fn is_interior(pos: Position) -> bool {
        Self::INTERIOR_X.contains(&usize::from(pos.x))
            && Self::INTERIOR_Y.contains(&usize::from(pos.y))
    }

    /// Returns `true` if `pos` is inside the grid.
    #[must_use]
    pub fn contains(pos: Position) -> bool {
        usize::from(pos.x) < Self::WIDTH && usize::from(pos.y) < Self::HEIGHT
    }

    /// Linear grid index of `pos`.
    #[must_use]
    pub fn index_of(pos: Position) -> usize {
        assert!(Self::contains(pos), "position {pos} is outside the level");
        usize::from(pos.y) * Self::WIDTH + usize::from(pos.x)
    }

    #[must_use]
    pub fn grid(&self) -> &[TileFlags] {
        &self.grid
    }

    #[must_use]
    pub fn tile(&self, pos: Position) -> TileFlags {
        self.grid[Self::index_of(pos)]
    }

    #[must_use]
    pub(crate) fn tile_at_index(&self, index: usize) -> TileFlags {
        self.grid[index]
    }

    /// Overwrites the flags of one tile.
    ///
    /// Border tiles always keep [`TileFlags::COLLIDABLE`].
    pub fn set_tile(&mut self, pos: Position, mut flags: TileFlags) {
        if !Self::is_interior(pos) {
            flags.insert(TileFlags::COLLIDABLE);
        }
        self.grid[Self::index_of(pos)] = flags;
    }

    pub fn remove_flags(&mut self, pos: Position, flags: TileFlags) {
        let mut flags = flags;
        if !Self::is_interior(pos) {
            flags.remove(TileFlags::COLLIDABLE);
        }
        self.grid[Self::index_of(pos)].remove(flags);
    }

    /// Iterates over all interior positions in row-major order.
    pub fn interior_positions() -> impl Iterator<Item = Position> {
        Self::INTERIOR_Y.flat_map(|y| Self::INTERIOR_X.map(move |x| Position::from_grid(x, y)))
    }

    /// Samples random interior tiles until a non-collidable one is found.
    pub fn find_spawn<R>(&self, rng: &mut R, attempts: usize) -> Result<Position, PlacementError>
    where
        R: Rng + ?Sized,
    {
        for _ in 0..attempts {
            let x = rng.random_range(Self::INTERIOR_X);
            let y = rng.random_range(Self::INTERIOR_Y);
            let pos = Position::from_grid(x, y);
            if !self.tile(pos).is_collidable() {
                return Ok(pos);
            }
        }
        Err(PlacementError { attempts })
    }
}

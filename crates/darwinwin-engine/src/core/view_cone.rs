use std::ops::Index;

use crate::core::{
    level::{Level, Position},
    orientation::Orientation,
    tile::TileFlags,
};

/// Cells of the view cone, relative to the actor.
///
/// ```text
///          NearLeft    MidLeft
/// Self     NearCenter  MidCenter  FarCenter   -> facing
///          NearRight   MidRight
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConePosition {
    Own,
    NearLeft,
    NearCenter,
    NearRight,
    MidLeft,
    MidCenter,
    MidRight,
    FarCenter,
}

impl ConePosition {
    pub const COUNT: usize = 8;
    pub const ALL: [Self; Self::COUNT] = [
        Self::Own,
        Self::NearLeft,
        Self::NearCenter,
        Self::NearRight,
        Self::MidLeft,
        Self::MidCenter,
        Self::MidRight,
        Self::FarCenter,
    ];

    /// `(forward, left)` distance of the cell from the actor.
    const fn relative(self) -> (isize, isize) {
        match self {
            Self::Own => (0, 0),
            Self::NearLeft => (1, 1),
            Self::NearCenter => (1, 0),
            Self::NearRight => (1, -1),
            Self::MidLeft => (2, 1),
            Self::MidCenter => (2, 0),
            Self::MidRight => (2, -1),
            Self::FarCenter => (3, 0),
        }
    }

    /// Grid offset `(dx, dy)` of this cell for an actor facing `orientation`.
    #[must_use]
    pub const fn offset(self, orientation: Orientation) -> (isize, isize) {
        let (forward, left) = self.relative();
        let (fx, fy) = orientation.forward();
        let (lx, ly) = orientation.left_hand();
        (forward * fx + left * lx, forward * fy + left * ly)
    }
}

/// Linearized grid offsets per orientation, indexed by [`ConePosition`].
const CONE_OFFSETS: [[isize; ConePosition::COUNT]; 4] = {
    let mut table = [[0; ConePosition::COUNT]; 4];
    let mut o = 0;
    while o < 4 {
        let mut c = 0;
        while c < ConePosition::COUNT {
            let (dx, dy) = ConePosition::ALL[c].offset(Orientation::ALL[o]);
            #[expect(clippy::cast_possible_wrap)]
            let width = Level::WIDTH as isize;
            table[o][c] = dy * width + dx;
            c += 1;
        }
        o += 1;
    }
    table
};

/// Eight-cell directional observation of an actor.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewCone {
    values: [TileFlags; ConePosition::COUNT],
}

impl ViewCone {
    /// Reads the cone of an actor at `pos` facing `orientation`.
    ///
    /// A collidable near cell hides the mid cell behind it; a collidable near-center
    /// cell also hides the far cell, as does a collidable mid-center cell. Hidden cells
    /// read as [`TileFlags::HIDDEN`] only.
    ///
    /// # Panics
    ///
    /// Panics if a cone cell falls outside the grid, which cannot happen for positions
    /// in the level interior.
    #[must_use]
    pub fn sense(level: &Level, pos: Position, orientation: Orientation) -> Self {
        let base = Level::index_of(pos);
        let offsets = CONE_OFFSETS[orientation.index()];
        let values = offsets.map(|offset| {
            let index = base
                .checked_add_signed(offset)
                .filter(|i| *i < Level::TILE_COUNT);
            let Some(index) = index else {
                panic!("view cone of {pos} facing {orientation} leaves the level");
            };
            level.tile_at_index(index)
        });

        let mut cone = Self { values };
        if cone[ConePosition::NearLeft].is_collidable() {
            cone.values[ConePosition::MidLeft as usize] = TileFlags::HIDDEN;
        }
        if cone[ConePosition::NearCenter].is_collidable() {
            cone.values[ConePosition::MidCenter as usize] = TileFlags::HIDDEN;
            cone.values[ConePosition::FarCenter as usize] = TileFlags::HIDDEN;
        } else if cone[ConePosition::MidCenter].is_collidable() {
            cone.values[ConePosition::FarCenter as usize] = TileFlags::HIDDEN;
        }
        if cone[ConePosition::NearRight].is_collidable() {
            cone.values[ConePosition::MidRight as usize] = TileFlags::HIDDEN;
        }
        cone
    }

    #[must_use]
    pub const fn from_values(values: [TileFlags; ConePosition::COUNT]) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn values(&self) -> &[TileFlags; ConePosition::COUNT] {
        &self.values
    }

    /// Raw flag bytes in [`ConePosition`] order.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; ConePosition::COUNT] {
        self.values.map(TileFlags::bits)
    }
}

impl Index<ConePosition> for ViewCone {
    type Output = TileFlags;

    fn index(&self, pos: ConePosition) -> &Self::Output {
        &self.values[pos as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(pos: Position, (dx, dy): (isize, isize)) -> Position {
        pos.offset((dx, dy)).unwrap()
    }

    #[test]
    fn test_offsets_up() {
        let o = Orientation::Up;
        assert_eq!(ConePosition::NearLeft.offset(o), (-1, -1));
        assert_eq!(ConePosition::NearCenter.offset(o), (0, -1));
        assert_eq!(ConePosition::NearRight.offset(o), (1, -1));
        assert_eq!(ConePosition::MidCenter.offset(o), (0, -2));
        assert_eq!(ConePosition::FarCenter.offset(o), (0, -3));
        assert_eq!(CONE_OFFSETS[o.index()][1], -32 - 1);
    }

    #[test]
    fn test_offsets_left() {
        let o = Orientation::Left;
        assert_eq!(CONE_OFFSETS[o.index()], [0, 31, -1, -33, 30, -2, -34, -3]);
    }

    #[test]
    fn test_sense_reads_tiles() {
        let mut level = Level::new();
        let pos = Position::new(10, 10);
        level.set_tile(pos, TileFlags::UNDERWATER);
        level.set_tile(Position::new(12, 9), TileFlags::SUGAR);
        level.set_tile(Position::new(13, 10), TileFlags::FAT);

        let cone = ViewCone::sense(&level, pos, Orientation::Right);
        assert_eq!(cone[ConePosition::Own], TileFlags::UNDERWATER);
        // Facing right, the left-hand side is up.
        assert_eq!(cone[ConePosition::MidLeft], TileFlags::SUGAR);
        assert_eq!(cone[ConePosition::FarCenter], TileFlags::FAT);
        assert_eq!(cone[ConePosition::NearCenter], TileFlags::EMPTY);
    }

    #[test]
    fn test_blocked_center_hides_mid_and_far() {
        let mut level = Level::new();
        let pos = Position::new(10, 10);
        level.set_tile(Position::new(10, 9), TileFlags::COLLIDABLE);
        level.set_tile(Position::new(10, 8), TileFlags::SUGAR);

        let cone = ViewCone::sense(&level, pos, Orientation::Up);
        assert_eq!(cone[ConePosition::NearCenter], TileFlags::COLLIDABLE);
        assert_eq!(cone[ConePosition::MidCenter], TileFlags::HIDDEN);
        assert_eq!(cone[ConePosition::FarCenter], TileFlags::HIDDEN);
        assert_eq!(cone[ConePosition::MidLeft], TileFlags::EMPTY);
        assert_eq!(cone[ConePosition::MidRight], TileFlags::EMPTY);
    }

    #[test]
    fn test_occlusion_rule_for_all_orientations() {
        let pos = Position::new(10, 10);
        for o in Orientation::ALL {
            for (near, mid) in [
                (ConePosition::NearLeft, ConePosition::MidLeft),
                (ConePosition::NearRight, ConePosition::MidRight),
            ] {
                let mut level = Level::new();
                level.set_tile(at(pos, near.offset(o)), TileFlags::COLLIDABLE);
                level.set_tile(at(pos, mid.offset(o)), TileFlags::FAT);
                let cone = ViewCone::sense(&level, pos, o);
                assert_eq!(cone[mid], TileFlags::HIDDEN, "{o} {near:?}");
                assert_eq!(cone[ConePosition::MidCenter], TileFlags::EMPTY);
                assert_eq!(cone[ConePosition::FarCenter], TileFlags::EMPTY);
            }

            let mut level = Level::new();
            level.set_tile(at(pos, ConePosition::MidCenter.offset(o)), TileFlags::COLLIDABLE);
            level.set_tile(at(pos, ConePosition::FarCenter.offset(o)), TileFlags::PROTEIN);
            let cone = ViewCone::sense(&level, pos, o);
            assert_eq!(cone[ConePosition::MidCenter], TileFlags::COLLIDABLE);
            assert_eq!(cone[ConePosition::FarCenter], TileFlags::HIDDEN);
            assert_eq!(cone[ConePosition::MidLeft], TileFlags::EMPTY);
        }
    }

    #[test]
    fn test_border_is_visible_from_edge_of_interior() {
        let level = Level::new();
        let pos = Position::new(3, 3);
        let cone = ViewCone::sense(&level, pos, Orientation::Left);
        assert!(cone[ConePosition::NearCenter].is_collidable());
        assert_eq!(cone[ConePosition::FarCenter], TileFlags::HIDDEN);
    }

    #[test]
    fn test_sense_is_idempotent() {
        let mut level = Level::new();
        level.set_tile(Position::new(11, 10), TileFlags::COLLIDABLE);
        level.set_tile(Position::new(10, 11), TileFlags::VITAMIN | TileFlags::UNDERWATER);
        for o in Orientation::ALL {
            let a = ViewCone::sense(&level, Position::new(10, 10), o);
            let b = ViewCone::sense(&level, Position::new(10, 10), o);
            assert_eq!(a, b);
        }
    }
}

use std::{
    fmt,
    ops::{BitAnd, BitOr, BitOrAssign, Not},
};

/// Bit set describing the contents of one level tile.
///
/// # Bit Layout (LSB to MSB)
///
/// | Bit | Flag | Letter |
/// |---|---|---|
/// | 0 | [`UNDERWATER`](Self::UNDERWATER) | `U` |
/// | 1 | [`PROTEIN`](Self::PROTEIN) | `P` |
/// | 2 | [`SUGAR`](Self::SUGAR) | `S` |
/// | 3 | [`VITAMIN`](Self::VITAMIN) | `V` |
/// | 4 | [`FAT`](Self::FAT) | `F` |
/// | 5 | [`COLLIDABLE`](Self::COLLIDABLE) | `C` |
/// | 6 | [`OTHER_ACTOR`](Self::OTHER_ACTOR) | `O` |
/// | 7 | [`HIDDEN`](Self::HIDDEN) | `H` |
///
/// `OTHER_ACTOR` and `HIDDEN` never appear on a level; they only show up in sensor
/// output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileFlags(u8);

impl TileFlags {
    pub const EMPTY: Self = Self(0);
    pub const UNDERWATER: Self = Self(1);
    pub const PROTEIN: Self = Self(1 << 1);
    pub const SUGAR: Self = Self(1 << 2);
    pub const VITAMIN: Self = Self(1 << 3);
    pub const FAT: Self = Self(1 << 4);
    pub const COLLIDABLE: Self = Self(1 << 5);
    pub const OTHER_ACTOR: Self = Self(1 << 6);
    pub const HIDDEN: Self = Self(1 << 7);

    /// All four food flags.
    pub const FOOD: Self = Self(Self::PROTEIN.0 | Self::SUGAR.0 | Self::VITAMIN.0 | Self::FAT.0);

    /// Flags produced by the sensor that must not be stored on a level.
    pub const RUNTIME: Self = Self(Self::OTHER_ACTOR.0 | Self::HIDDEN.0);

    const LETTERS: [u8; 8] = *b"UPSVFCOH";

    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` if every flag of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if any flag of `other` is set.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    #[must_use]
    pub const fn is_collidable(self) -> bool {
        self.contains(Self::COLLIDABLE)
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for TileFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for TileFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for TileFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl Not for TileFlags {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

/// Fixed-width form, one letter per set flag and a space otherwise (e.g. `"U    C  "`).
impl fmt::Display for TileFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write as _;
        for (bit, letter) in Self::LETTERS.iter().enumerate() {
            let c = if self.0 & (1 << bit) != 0 {
                char::from(*letter)
            } else {
                ' '
            };
            f.write_char(c)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_and_intersects() {
        let t = TileFlags::UNDERWATER | TileFlags::SUGAR;
        assert!(t.contains(TileFlags::SUGAR));
        assert!(!t.contains(TileFlags::SUGAR | TileFlags::FAT));
        assert!(t.intersects(TileFlags::FOOD));
        assert!(!t.is_collidable());
    }

    #[test]
    fn test_remove_only_clears_given_flag() {
        let mut t = TileFlags::PROTEIN | TileFlags::FAT | TileFlags::UNDERWATER;
        t.remove(TileFlags::FAT);
        assert_eq!(t, TileFlags::PROTEIN | TileFlags::UNDERWATER);
    }

    #[test]
    fn test_display_letters() {
        let t = TileFlags::UNDERWATER | TileFlags::COLLIDABLE | TileFlags::HIDDEN;
        assert_eq!(t.to_string(), "U    C H");
        assert_eq!(TileFlags::EMPTY.to_string(), "        ");
    }
}

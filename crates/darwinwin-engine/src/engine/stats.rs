use std::ops::RangeInclusive;

use crate::{core::TileFlags, engine::economy};

/// Stat slots of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Energy,
    Air,
    Protein,
    Sugar,
    Vitamin,
    Fat,
}

impl Stat {
    pub const COUNT: usize = 6;
    pub const ALL: [Self; Self::COUNT] = [
        Self::Energy,
        Self::Air,
        Self::Protein,
        Self::Sugar,
        Self::Vitamin,
        Self::Fat,
    ];

    /// Food stats paired with the tile flag that fills them.
    pub const FOOD: [(Self, TileFlags); 4] = [
        (Self::Protein, TileFlags::PROTEIN),
        (Self::Sugar, TileFlags::SUGAR),
        (Self::Vitamin, TileFlags::VITAMIN),
        (Self::Fat, TileFlags::FAT),
    ];

    /// Declared value range of every stat.
    pub const RANGE: RangeInclusive<u8> = u8::MIN..=u8::MAX;
}

/// Bounded stat vector of an actor.
///
/// Every value stays within [`Stat::RANGE`]; all changes should go through
/// [`modify_with_clamp`](Self::modify_with_clamp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Stats {
    values: [u8; Stat::COUNT],
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    /// Full energy and air, empty stomach.
    #[must_use]
    pub const fn new() -> Self {
        let mut values = [0; Stat::COUNT];
        values[Stat::Energy as usize] = economy::INITIAL_ENERGY;
        values[Stat::Air as usize] = economy::INITIAL_AIR;
        Self { values }
    }

    #[must_use]
    pub const fn from_values(values: [u8; Stat::COUNT]) -> Self {
        Self { values }
    }

    #[must_use]
    pub const fn values(&self) -> &[u8; Stat::COUNT] {
        &self.values
    }

    #[must_use]
    pub const fn get(&self, stat: Stat) -> u8 {
        self.values[stat as usize]
    }

    pub const fn set(&mut self, stat: Stat, value: u8) {
        self.values[stat as usize] = value;
    }

    /// Adds `delta` to `stat`, clamping the result to [`Stat::RANGE`].
    ///
    /// Returns the delta actually applied (`new - old`).
    pub fn modify_with_clamp(&mut self, stat: Stat, delta: i16) -> i16 {
        let old = self.get(stat);
        let new = (i16::from(old) + delta).clamp(
            i16::from(*Stat::RANGE.start()),
            i16::from(*Stat::RANGE.end()),
        );
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let value = new as u8;
        self.set(stat, value);
        new - i16::from(old)
    }

    /// Sum of all food stats.
    #[must_use]
    pub fn stomach_total(&self) -> u16 {
        Stat::FOOD
            .iter()
            .map(|(stat, _)| u16::from(self.get(*stat)))
            .sum()
    }
}

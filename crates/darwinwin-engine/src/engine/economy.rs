//! Energy, air and food economy of an actor.
//!
//! All values are in stat units (`0..=255`).

/// Energy lost every step.
pub const IDLE_ENERGY_COST: u8 = 1;
/// Air lost every step spent on an underwater tile.
pub const UNDERWATER_AIR_COST: u8 = 5;
/// Air regained every step spent on a dry tile.
pub const SURFACE_AIR_RECOVERY: u8 = 10;
/// Additional energy lost every step while air is exhausted.
pub const SUFFOCATION_ENERGY_COST: u8 = 10;

/// Amount removed from every non-empty food stat per step.
pub const DIGESTION_RATE: u8 = 1;
/// Energy gained per food stat digested in a step.
pub const DIGESTION_ENERGY: u8 = 2;

/// Food stat gained per food flag eaten.
pub const FOOD_PER_TILE: u8 = 24;
/// Upper bound on the sum of all food stats.
pub const STOMACH_CAPACITY: u16 = 96;

pub const MOVE_ENERGY_COST: u8 = 10;
pub const DOUBLE_MOVE_ENERGY_COST: u8 = 17;
pub const DIAGONAL_MOVE_ENERGY_COST: u8 = 14;
pub const TURN_ENERGY_COST: u8 = 1;
pub const EAT_ENERGY_COST: u8 = 1;
pub const WAIT_ENERGY_COST: u8 = 0;
/// Extra energy lost when a movement runs into a collidable tile.
pub const COLLISION_ENERGY_PENALTY: u8 = 5;

pub const INITIAL_ENERGY: u8 = u8::MAX;
pub const INITIAL_AIR: u8 = u8::MAX;

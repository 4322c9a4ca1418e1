use std::fmt;

use arrayvec::ArrayVec;

use crate::{
    core::{ConePosition, Orientation, Position},
    engine::economy,
};

/// One decision of an actor per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Move,
    Move2,
    DiagonalLeft,
    DiagonalRight,
    TurnLeft,
    TurnRight,
    Eat,
    Wait,
}

impl Action {
    pub const COUNT: usize = 8;
    pub const ALL: [Self; Self::COUNT] = [
        Self::Move,
        Self::Move2,
        Self::DiagonalLeft,
        Self::DiagonalRight,
        Self::TurnLeft,
        Self::TurnRight,
        Self::Eat,
        Self::Wait,
    ];

    /// Numeric identifier used by the control surface and the brain output layout.
    #[must_use]
    pub const fn id(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_id(id: usize) -> Option<Self> {
        Self::ALL.get(id).copied()
    }

    /// Energy paid up front when the action is attempted.
    #[must_use]
    pub const fn energy_cost(self) -> u8 {
        match self {
            Self::Move => economy::MOVE_ENERGY_COST,
            Self::Move2 => economy::DOUBLE_MOVE_ENERGY_COST,
            Self::DiagonalLeft | Self::DiagonalRight => economy::DIAGONAL_MOVE_ENERGY_COST,
            Self::TurnLeft | Self::TurnRight => economy::TURN_ENERGY_COST,
            Self::Eat => economy::EAT_ENERGY_COST,
            Self::Wait => economy::WAIT_ENERGY_COST,
        }
    }

    /// Tiles a movement passes through, destination last.
    ///
    /// Returns an empty list for actions that do not move the actor.
    ///
    /// # Panics
    ///
    /// Panics if a tile on the path falls outside the grid. Actors stay in the level
    /// interior, so this indicates a corrupt level or offset table.
    #[must_use]
    pub fn movement_path(self, from: Position, orientation: Orientation) -> ArrayVec<Position, 2> {
        let mut offsets = ArrayVec::<(isize, isize), 2>::new();
        match self {
            Self::Move => offsets.push(orientation.forward()),
            Self::Move2 => {
                let (fx, fy) = orientation.forward();
                offsets.push((fx, fy));
                offsets.push((2 * fx, 2 * fy));
            }
            Self::DiagonalLeft => offsets.push(ConePosition::NearLeft.offset(orientation)),
            Self::DiagonalRight => offsets.push(ConePosition::NearRight.offset(orientation)),
            Self::TurnLeft | Self::TurnRight | Self::Eat | Self::Wait => {}
        }
        offsets
            .into_iter()
            .map(|offset| {
                let Some(pos) = from.offset(offset) else {
                    panic!("{self} from {from} facing {orientation} leaves the level");
                };
                pos
            })
            .collect()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What happened when an action was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum ActionOutcome {
    /// The full effect was applied.
    Applied,
    /// The movement hit a collidable tile; cost and collision penalty were paid.
    Collided,
    /// The actor could not afford the action; only the (clamped) cost was paid.
    Exhausted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::from_id(action.id()), Some(action));
        }
        assert_eq!(Action::from_id(Action::COUNT), None);
    }

    #[test]
    fn test_movement_paths() {
        let p = Position::new(10, 10);
        assert_eq!(
            Action::Move.movement_path(p, Orientation::Up).as_slice(),
            &[Position::new(10, 9)]
        );
        assert_eq!(
            Action::Move2.movement_path(p, Orientation::Left).as_slice(),
            &[Position::new(9, 10), Position::new(8, 10)]
        );
        assert_eq!(
            Action::DiagonalLeft.movement_path(p, Orientation::Up).as_slice(),
            &[Position::new(9, 9)]
        );
        assert_eq!(
            Action::DiagonalRight.movement_path(p, Orientation::Up).as_slice(),
            &[Position::new(11, 9)]
        );
        assert_eq!(
            Action::DiagonalLeft.movement_path(p, Orientation::Down).as_slice(),
            &[Position::new(11, 11)]
        );
        assert_eq!(
            Action::DiagonalRight.movement_path(p, Orientation::Right).as_slice(),
            &[Position::new(11, 11)]
        );
        assert!(Action::Eat.movement_path(p, Orientation::Up).is_empty());
    }
}

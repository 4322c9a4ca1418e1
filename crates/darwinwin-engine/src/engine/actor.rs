use rand::Rng;

use crate::{
    core::{ConePosition, Level, Orientation, Position, TileFlags, ViewCone},
    engine::{
        action::{Action, ActionOutcome},
        brain::{self, Brain, BrainIo, FEEDBACK_LEN, Feedback},
        economy,
        stats::{Stat, Stats},
    },
};

/// Result of one simulated step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Action sampled from the brain, if any weight was positive.
    pub action: Option<Action>,
    pub action_outcome: Option<ActionOutcome>,
    /// Total stomach content is lower than before the step.
    pub digested: bool,
}

/// A brain-driven agent on a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    position: Position,
    orientation: Orientation,
    stats: Stats,
    feedback: Feedback,
    brain: Brain,
}

impl Actor {
    /// Creates an actor with initial stats and cleared feedback.
    ///
    /// # Panics
    ///
    /// Panics if `position` is not in the level interior.
    #[must_use]
    pub fn new(position: Position, orientation: Orientation, brain: Brain) -> Self {
        assert!(
            Level::is_interior(position),
            "actor position {position} is outside the level interior"
        );
        Self {
            position,
            orientation,
            stats: Stats::new(),
            feedback: [0; FEEDBACK_LEN],
            brain,
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[must_use]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut Stats {
        &mut self.stats
    }

    #[must_use]
    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    #[must_use]
    pub fn brain(&self) -> &Brain {
        &self.brain
    }

    pub fn brain_mut(&mut self) -> &mut Brain {
        &mut self.brain
    }

    #[must_use]
    pub fn into_brain(self) -> Brain {
        self.brain
    }

    /// Moves the actor to a new start and restores initial stats and feedback.
    ///
    /// The brain is kept.
    ///
    /// # Panics
    ///
    /// Panics if `position` is not in the level interior.
    pub fn respawn(&mut self, position: Position, orientation: Orientation) {
        assert!(
            Level::is_interior(position),
            "actor position {position} is outside the level interior"
        );
        self.position = position;
        self.orientation = orientation;
        self.stats = Stats::new();
        self.feedback = [0; FEEDBACK_LEN];
    }

    /// An actor with no energy or no air cannot act anymore.
    #[must_use]
    pub fn is_viable(&self) -> bool {
        self.stats.get(Stat::Energy) > 0 && self.stats.get(Stat::Air) > 0
    }

    #[must_use]
    pub fn sense(&self, level: &Level) -> ViewCone {
        ViewCone::sense(level, self.position, self.orientation)
    }

    /// Applies the passive per-step stat changes.
    ///
    /// Idle energy cost, air loss underwater or recovery on dry tiles, the
    /// suffocation penalty while air is exhausted, and digestion of every non-empty
    /// food stat into energy.
    pub fn update_stats(&mut self, cone: &ViewCone) {
        let stats = &mut self.stats;
        stats.modify_with_clamp(Stat::Energy, -i16::from(economy::IDLE_ENERGY_COST));

        if cone[ConePosition::Own].contains(TileFlags::UNDERWATER) {
            stats.modify_with_clamp(Stat::Air, -i16::from(economy::UNDERWATER_AIR_COST));
        } else {
            stats.modify_with_clamp(Stat::Air, i16::from(economy::SURFACE_AIR_RECOVERY));
        }

        if stats.get(Stat::Air) == 0 {
            stats.modify_with_clamp(Stat::Energy, -i16::from(economy::SUFFOCATION_ENERGY_COST));
        }

        for (stat, _) in Stat::FOOD {
            if stats.get(stat) == 0 {
                continue;
            }
            let digested = stats.modify_with_clamp(stat, -i16::from(economy::DIGESTION_RATE));
            if digested < 0 {
                stats.modify_with_clamp(Stat::Energy, i16::from(economy::DIGESTION_ENERGY));
            }
        }
    }

    /// Applies one action.
    ///
    /// The energy cost is paid first. If the actor could not afford it, nothing else
    /// happens. A movement into a collidable tile additionally costs the collision
    /// penalty and leaves the actor in place.
    ///
    /// # Panics
    ///
    /// Panics if a successful movement would leave the level interior.
    pub fn act(&mut self, level: &mut Level, action: Action) -> ActionOutcome {
        let cost = action.energy_cost();
        let energy = self.stats.get(Stat::Energy);
        self.stats.modify_with_clamp(Stat::Energy, -i16::from(cost));
        if energy < cost {
            return ActionOutcome::Exhausted;
        }

        match action {
            Action::Move | Action::Move2 | Action::DiagonalLeft | Action::DiagonalRight => {
                let path = action.movement_path(self.position, self.orientation);
                if path.iter().any(|pos| level.tile(*pos).is_collidable()) {
                    self.stats.modify_with_clamp(
                        Stat::Energy,
                        -i16::from(economy::COLLISION_ENERGY_PENALTY),
                    );
                    return ActionOutcome::Collided;
                }
                let Some(target) = path.last().copied() else {
                    unreachable!("movement path of {action} is empty");
                };
                assert!(
                    Level::is_interior(target),
                    "{action} moved actor to {target} outside the level interior"
                );
                self.position = target;
            }
            Action::TurnLeft => self.orientation = self.orientation.turned_left(),
            Action::TurnRight => self.orientation = self.orientation.turned_right(),
            Action::Eat => self.eat(level),
            Action::Wait => {}
        }
        ActionOutcome::Applied
    }

    fn eat(&mut self, level: &mut Level) {
        let tile = level.tile(self.position);
        for (stat, flag) in Stat::FOOD {
            if !tile.contains(flag) {
                continue;
            }
            let room = economy::STOMACH_CAPACITY.saturating_sub(self.stats.stomach_total());
            let amount = u16::from(economy::FOOD_PER_TILE).min(room);
            #[expect(clippy::cast_possible_wrap)]
            let amount = amount as i16;
            self.stats.modify_with_clamp(stat, amount);
            level.remove_flags(self.position, flag);
        }
    }

    /// Runs one step: sense, passive update, brain evaluation and action.
    ///
    /// Returns `None` without touching anything if the actor is no longer viable.
    pub fn step<R>(&mut self, level: &mut Level, rng: &mut R) -> Option<StepOutcome>
    where
        R: Rng + ?Sized,
    {
        if !self.is_viable() {
            return None;
        }

        let cone = self.sense(level);
        let stomach_before = self.stats.stomach_total();
        self.update_stats(&cone);

        let mut io = BrainIo::new();
        brain::encode_input(&mut io, &cone, &self.stats, &self.feedback);
        self.brain.evaluate(&mut io);
        self.feedback = brain::extract_feedback(&io);

        let action = brain::sample_action(&io, rng);
        let action_outcome = action.map(|action| self.act(level, action));

        Some(StepOutcome {
            action,
            action_outcome,
            digested: self.stats.stomach_total() < stomach_before,
        })
    }
}

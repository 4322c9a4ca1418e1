use darwinwin_engine::{Actor, Level};
use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Scores an actor by simulating it on a private copy of a level.
///
/// The score is one point per step the actor survives plus `digestion_bonus` for every
/// step in which its stomach content decreased. A score depends only on the actor, the
/// level and the evaluation seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessEvaluator {
    /// Upper bound on simulated steps per evaluation.
    pub max_steps: u32,
    pub digestion_bonus: u64,
}

impl Default for FitnessEvaluator {
    fn default() -> Self {
        Self {
            max_steps: 2000,
            digestion_bonus: 4,
        }
    }
}

impl FitnessEvaluator {
    #[must_use]
    pub fn evaluate(&self, actor: &Actor, level: &Level, seed: u64) -> u64 {
        let mut actor = actor.clone();
        let mut level = level.clone();
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut score = 0;
        for _ in 0..self.max_steps {
            let Some(outcome) = actor.step(&mut level, &mut rng) else {
                break;
            };
            score += 1;
            if outcome.digested {
                score += self.digestion_bonus;
            }
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use darwinwin_engine::{Brain, Orientation, Position, Stat, TileFlags};

    use super::*;

    fn actor(brain: Brain) -> Actor {
        Actor::new(Position::new(10, 10), Orientation::Up, brain)
    }

    #[test]
    fn test_silent_brain_survives_until_energy_runs_out() {
        let evaluator = FitnessEvaluator {
            max_steps: 1000,
            digestion_bonus: 0,
        };
        // One energy per idle step; the step that reaches zero still counts.
        let score = evaluator.evaluate(&actor(Brain::zeroed()), &Level::new(), 0);
        assert_eq!(score, 255);
    }

    #[test]
    fn test_max_steps_caps_score() {
        let evaluator = FitnessEvaluator {
            max_steps: 10,
            digestion_bonus: 0,
        };
        assert_eq!(
            evaluator.evaluate(&actor(Brain::zeroed()), &Level::new(), 0),
            10
        );
    }

    #[test]
    fn test_digestion_bonus() {
        let evaluator = FitnessEvaluator {
            max_steps: 5,
            digestion_bonus: 3,
        };
        let mut actor = actor(Brain::zeroed());
        actor.stats_mut().set(Stat::Sugar, 2);
        // Two digesting steps, three plain steps.
        assert_eq!(evaluator.evaluate(&actor, &Level::new(), 0), 5 + 2 * 3);
    }

    #[test]
    fn test_evaluation_does_not_touch_inputs() {
        let evaluator = FitnessEvaluator::default();
        let mut level = Level::new();
        level.set_tile(Position::new(10, 10), TileFlags::SUGAR);
        let mut brain = Brain::zeroed();
        brain.set_bias(Brain::LAYERS - 1, 6, 100);
        let actor = actor(brain);

        let level_before = level.clone();
        let actor_before = actor.clone();
        let a = evaluator.evaluate(&actor, &level, 9);
        let b = evaluator.evaluate(&actor, &level, 9);
        assert_eq!(a, b);
        assert_eq!(level, level_before);
        assert_eq!(actor, actor_before);
    }
}

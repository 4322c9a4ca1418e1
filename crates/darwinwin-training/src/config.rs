use darwinwin_engine::ScatterLevelGenerator;
use serde::{Deserialize, Serialize};

use crate::{
    fitness::FitnessEvaluator,
    genetic::Evolver,
    policy::{Crossbreed, Mutation},
};

/// Parameters of a training run.
///
/// Missing fields in a deserialized config take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Genes kept unchanged per generation, also the size of the global reseed set.
    pub survivors: usize,
    /// Children bred per generation.
    pub children: usize,
    pub tournament_size: usize,
    pub islands: usize,
    /// Worker threads for multi-island training. `0` uses one per core.
    pub threads: usize,
    /// Generations each island runs on a level before the global reseed.
    pub generations_per_level: usize,
    pub max_steps: u32,
    /// Extra score for each step in which stored food was digested.
    pub digestion_bonus: u64,
    /// Random tries per level when looking for a free spawn tile.
    pub spawn_attempts: usize,
    /// Master seed. A random seed is drawn when absent.
    pub seed: Option<u64>,
    pub mutation: Mutation,
    pub crossbreed: Crossbreed,
    pub level: ScatterLevelGenerator,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        let evolver = Evolver::default();
        let fitness = FitnessEvaluator::default();
        Self {
            survivors: evolver.survivors,
            children: evolver.children,
            tournament_size: evolver.tournament_size,
            islands: 4,
            threads: 0,
            generations_per_level: 16,
            max_steps: fitness.max_steps,
            digestion_bonus: fitness.digestion_bonus,
            spawn_attempts: 64,
            seed: None,
            mutation: evolver.mutation,
            crossbreed: evolver.crossbreed,
            level: ScatterLevelGenerator::default(),
        }
    }
}

/// A configuration value that cannot drive a training run.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("`{field}` must be at least 1")]
    Zero { field: &'static str },
    #[display("`{field}` must be within [0, 1], got {value}")]
    Probability { field: &'static str, value: f64 },
    #[display("`{field}` must be finite and non-negative, got {value}")]
    NonNegative { field: &'static str, value: f64 },
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("survivors", self.survivors),
            ("tournament_size", self.tournament_size),
            ("islands", self.islands),
            ("generations_per_level", self.generations_per_level),
            ("spawn_attempts", self.spawn_attempts),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero { field });
            }
        }

        let mut probabilities = vec![
            ("level.water", self.level.water),
            ("level.food", self.level.food),
        ];
        let mut magnitudes = vec![];
        match self.mutation {
            Mutation::Gaussian { rate, sigma } => {
                probabilities.push(("mutation.rate", rate));
                magnitudes.push(("mutation.sigma", sigma));
            }
            Mutation::Reset { rate } => probabilities.push(("mutation.rate", rate)),
        }
        if let Crossbreed::Blend { alpha } = self.crossbreed {
            magnitudes.push(("crossbreed.alpha", alpha));
        }

        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { field, value });
            }
        }
        for (field, value) in magnitudes {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NonNegative { field, value });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn evolver(&self) -> Evolver {
        Evolver {
            survivors: self.survivors,
            children: self.children,
            tournament_size: self.tournament_size,
            mutation: self.mutation,
            crossbreed: self.crossbreed,
        }
    }

    #[must_use]
    pub fn fitness(&self) -> FitnessEvaluator {
        FitnessEvaluator {
            max_steps: self.max_steps,
            digestion_bonus: self.digestion_bonus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(TrainingConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TrainingConfig = serde_json::from_str(
            r#"{
                "survivors": 4,
                "mutation": {"kind": "reset", "rate": 0.01},
                "level": {"water": 0.3}
            }"#,
        )
        .unwrap();
        assert_eq!(config.survivors, 4);
        assert_eq!(config.children, TrainingConfig::default().children);
        assert_eq!(config.mutation, Mutation::Reset { rate: 0.01 });
        assert!((config.level.water - 0.3).abs() < f64::EPSILON);
        assert!(
            (config.level.food - ScatterLevelGenerator::default().food).abs() < f64::EPSILON
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = TrainingConfig {
            islands: 0,
            ..TrainingConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Zero { field: "islands" })
        );

        let config = TrainingConfig {
            mutation: Mutation::Gaussian {
                rate: 1.5,
                sigma: 1.0,
            },
            ..TrainingConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Probability {
                field: "mutation.rate",
                ..
            })
        ));

        let config = TrainingConfig {
            crossbreed: Crossbreed::Blend { alpha: f64::NAN },
            ..TrainingConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonNegative { .. })
        ));
    }

    #[test]
    fn test_evolver_and_fitness_follow_config() {
        let config = TrainingConfig {
            survivors: 3,
            children: 5,
            max_steps: 77,
            ..TrainingConfig::default()
        };
        let evolver = config.evolver();
        assert_eq!((evolver.survivors, evolver.children), (3, 5));
        assert_eq!(config.fitness().max_steps, 77);
    }
}

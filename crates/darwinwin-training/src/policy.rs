//! Mutation and crossbreeding operators on flat brain parameter buffers.
//!
//! The genetic loop in [`genetic`](crate::genetic) only depends on the
//! [`MutationPolicy`] and [`CrossbreedPolicy`] traits. [`Mutation`] and [`Crossbreed`]
//! are the configurable implementations used by the binaries.
//!
//! # Operators
//!
//! - [`Mutation::Gaussian`] - Adds `N(0, sigma)` noise to each parameter with probability `rate`
//! - [`Mutation::Reset`] - Redraws each parameter uniformly with probability `rate`
//! - [`Crossbreed::UniformPick`] - Takes each parameter from either parent with equal probability
//! - [`Crossbreed::Blend`] - BLX-α: samples each parameter from the parents' interval
//!   widened by `alpha` on both sides
//!
//! Every operator keeps parameters inside the legal range it is given.

use std::ops::RangeInclusive;

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Perturbs some parameters of a buffer in place.
pub trait MutationPolicy {
    fn mutate<R>(&self, params: &mut [i16], range: RangeInclusive<i16>, rng: &mut R)
    where
        R: Rng + ?Sized;
}

/// Combines two parent buffers into a child buffer.
pub trait CrossbreedPolicy {
    /// Writes the child into `dst`.
    ///
    /// # Panics
    ///
    /// Panics if the three buffers differ in length.
    fn crossbreed<R>(
        &self,
        dst: &mut [i16],
        parent_a: &[i16],
        parent_b: &[i16],
        range: RangeInclusive<i16>,
        rng: &mut R,
    ) where
        R: Rng + ?Sized;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mutation {
    /// Gaussian noise with standard deviation `sigma` (in parameter units).
    Gaussian { rate: f64, sigma: f64 },
    /// Uniform redraw from the legal range.
    Reset { rate: f64 },
}

impl Default for Mutation {
    fn default() -> Self {
        Self::Gaussian {
            rate: 0.02,
            sigma: 24.0,
        }
    }
}

impl MutationPolicy for Mutation {
    fn mutate<R>(&self, params: &mut [i16], range: RangeInclusive<i16>, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        match *self {
            Self::Gaussian { rate, sigma } => {
                let rate = rate.clamp(0.0, 1.0);
                for p in params {
                    if rng.random_bool(rate) {
                        let noise: f64 = rng.sample(StandardNormal);
                        *p = round_into_range(f64::from(*p) + noise * sigma, &range);
                    }
                }
            }
            Self::Reset { rate } => {
                let rate = rate.clamp(0.0, 1.0);
                for p in params {
                    if rng.random_bool(rate) {
                        *p = rng.random_range(range.clone());
                    }
                }
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Crossbreed {
    #[default]
    UniformPick,
    Blend { alpha: f64 },
}

impl CrossbreedPolicy for Crossbreed {
    fn crossbreed<R>(
        &self,
        dst: &mut [i16],
        parent_a: &[i16],
        parent_b: &[i16],
        range: RangeInclusive<i16>,
        rng: &mut R,
    ) where
        R: Rng + ?Sized,
    {
        assert_eq!(dst.len(), parent_a.len());
        assert_eq!(dst.len(), parent_b.len());
        let parents = parent_a.iter().zip(parent_b);
        match *self {
            Self::UniformPick => {
                for (d, (a, b)) in dst.iter_mut().zip(parents) {
                    *d = if rng.random_bool(0.5) { *a } else { *b };
                }
            }
            Self::Blend { alpha } => {
                let alpha = alpha.max(0.0);
                for (d, (a, b)) in dst.iter_mut().zip(parents) {
                    let min = f64::from(*a.min(b));
                    let max = f64::from(*a.max(b));
                    let spread = alpha * (max - min);
                    let value = rng.random_range((min - spread)..=(max + spread));
                    *d = round_into_range(value, &range);
                }
            }
        }
    }
}

fn round_into_range(value: f64, range: &RangeInclusive<i16>) -> i16 {
    let clamped = value
        .round()
        .clamp(f64::from(*range.start()), f64::from(*range.end()));
    #[expect(clippy::cast_possible_truncation)]
    let value = clamped as i16;
    value
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    const RANGE: RangeInclusive<i16> = -255..=255;

    #[test]
    fn test_gaussian_mutation_stays_in_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut params = vec![255, -255, 0, 100, -100];
        let mutation = Mutation::Gaussian {
            rate: 1.0,
            sigma: 1000.0,
        };
        for _ in 0..100 {
            mutation.mutate(&mut params, RANGE, &mut rng);
            assert!(params.iter().all(|p| RANGE.contains(p)));
        }
    }

    #[test]
    fn test_zero_rate_mutation_is_identity() {
        let mut rng = Pcg32::seed_from_u64(2);
        let original: Vec<i16> = (-50..50).collect();
        for mutation in [
            Mutation::Gaussian {
                rate: 0.0,
                sigma: 50.0,
            },
            Mutation::Reset { rate: 0.0 },
        ] {
            let mut params = original.clone();
            mutation.mutate(&mut params, RANGE, &mut rng);
            assert_eq!(params, original);
        }
    }

    #[test]
    fn test_reset_mutation_changes_params() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut params = vec![0_i16; 256];
        Mutation::Reset { rate: 1.0 }.mutate(&mut params, RANGE, &mut rng);
        assert!(params.iter().any(|p| *p != 0));
        assert!(params.iter().all(|p| RANGE.contains(p)));
    }

    #[test]
    fn test_uniform_pick_takes_from_parents() {
        let mut rng = Pcg32::seed_from_u64(4);
        let a = vec![1_i16; 200];
        let b = vec![2_i16; 200];
        let mut child = vec![0_i16; 200];
        Crossbreed::UniformPick.crossbreed(&mut child, &a, &b, RANGE, &mut rng);
        assert!(child.iter().all(|c| *c == 1 || *c == 2));
        assert!(child.contains(&1));
        assert!(child.contains(&2));
    }

    #[test]
    fn test_blend_without_alpha_stays_between_parents() {
        let mut rng = Pcg32::seed_from_u64(5);
        let a: Vec<i16> = (0..100).map(|i| i * 2).collect();
        let b: Vec<i16> = (0..100).map(|i| -i).collect();
        let mut child = vec![0_i16; 100];
        Crossbreed::Blend { alpha: 0.0 }.crossbreed(&mut child, &a, &b, RANGE, &mut rng);
        for ((c, a), b) in child.iter().zip(&a).zip(&b) {
            assert!((*a.min(b)..=*a.max(b)).contains(c));
        }
    }

    #[test]
    fn test_blend_identical_parents() {
        let mut rng = Pcg32::seed_from_u64(6);
        let a = vec![-255, 7, 255];
        let mut child = vec![0; 3];
        Crossbreed::Blend { alpha: 0.5 }.crossbreed(&mut child, &a, &a, RANGE, &mut rng);
        assert_eq!(child, a);
    }

    #[test]
    #[should_panic(expected = "assertion")]
    fn test_crossbreed_rejects_mismatched_lengths() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut child = vec![0; 3];
        Crossbreed::UniformPick.crossbreed(&mut child, &[1, 2, 3], &[1, 2], RANGE, &mut rng);
    }

    #[test]
    fn test_policies_deserialize_from_tagged_json() {
        let mutation: Mutation =
            serde_json::from_str(r#"{"kind":"gaussian","rate":0.1,"sigma":8.0}"#).unwrap();
        assert_eq!(
            mutation,
            Mutation::Gaussian {
                rate: 0.1,
                sigma: 8.0
            }
        );
        let crossbreed: Crossbreed = serde_json::from_str(r#"{"kind":"uniform_pick"}"#).unwrap();
        assert_eq!(crossbreed, Crossbreed::UniformPick);
    }
}

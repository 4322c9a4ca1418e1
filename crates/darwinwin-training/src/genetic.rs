//! Island-local genetic algorithm.
//!
//! An [`Island`] is a sub-population of [`Gene`]s that evolves independently of the
//! others between synchronization points. Each generation:
//!
//! 1. **Evaluate** - Every gene without a score is scored by the [`FitnessEvaluator`]
//! 2. **Select** - Genes are stable-sorted by score (best first) and the top
//!    `survivors` are kept unchanged
//! 3. **Breed** - `children` new genes are created from pairs of distinct parents
//!    picked by tournament selection among the survivors, using the crossbreed and
//!    mutation policies of the [`Evolver`]
//! 4. **Evaluate** - The children are scored
//!
//! Scores are only comparable when they come from the same level and the same
//! evaluation seed. Callers keep both fixed for as long as scores are kept; the
//! scheduler draws one seed per level and clears all scores when the level changes.
//!
//! # State Machine
//!
//! ```text
//! Empty --seed--> Seeded --run_generation--> Evaluated --run_generation--> Evaluated
//!                    ^                           |
//!                    +-----------seed------------+
//! ```

use darwinwin_engine::{Actor, Brain, Level, Orientation, Position};
use std::ptr;

use rand::{
    Rng, SeedableRng as _,
    seq::{IndexedRandom as _, IteratorRandom as _},
};
use rand_pcg::Pcg32;
use tracing::debug;

use crate::{
    fitness::FitnessEvaluator,
    policy::{Crossbreed, CrossbreedPolicy, Mutation, MutationPolicy},
    stats::FitnessStats,
};

/// One candidate: an actor snapshot and its most recent fitness score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gene {
    actor: Actor,
    score: Option<u64>,
}

impl Gene {
    #[must_use]
    pub fn new(actor: Actor) -> Self {
        Self { actor, score: None }
    }

    /// Wraps a brain in a fresh actor placed at the level center.
    #[must_use]
    pub fn from_brain(brain: Brain) -> Self {
        Self::new(Actor::new(Level::CENTER, Orientation::Up, brain))
    }

    #[must_use]
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    #[must_use]
    pub fn brain(&self) -> &Brain {
        self.actor.brain()
    }

    /// `None` until the gene has been evaluated.
    #[must_use]
    pub fn score(&self) -> Option<u64> {
        self.score
    }

    #[must_use]
    pub fn is_evaluated(&self) -> bool {
        self.score.is_some()
    }

    #[cfg(test)]
    pub(crate) fn with_score(self, score: u64) -> Self {
        Self {
            score: Some(score),
            ..self
        }
    }

    /// Moves the actor to a new start and forgets the score.
    pub fn respawn(&mut self, position: Position, orientation: Orientation) {
        self.actor.respawn(position, orientation);
        self.score = None;
    }
}

/// Selection and breeding parameters shared by all islands.
#[derive(Debug, Clone, PartialEq)]
pub struct Evolver<M = Mutation, C = Crossbreed> {
    /// Number of top genes kept unchanged each generation.
    pub survivors: usize,
    /// Number of children bred each generation.
    pub children: usize,
    /// Number of genes competing in each parent tournament.
    pub tournament_size: usize,
    pub mutation: M,
    pub crossbreed: C,
}

impl Default for Evolver {
    fn default() -> Self {
        Self {
            survivors: 8,
            children: 24,
            tournament_size: 3,
            mutation: Mutation::default(),
            crossbreed: Crossbreed::default(),
        }
    }
}

impl<M, C> Evolver<M, C>
where
    M: MutationPolicy,
    C: CrossbreedPolicy,
{
    /// Breeds one child from two parents.
    ///
    /// The child starts as a copy of `parent_a`'s actor so it inherits its start
    /// state, then receives the crossbred and mutated brain.
    pub fn breed<R>(&self, parent_a: &Gene, parent_b: &Gene, rng: &mut R) -> Gene
    where
        R: Rng + ?Sized,
    {
        let mut actor = parent_a.actor.clone();
        let brain = actor.brain_mut();
        self.crossbreed.crossbreed(
            brain.params_mut(),
            parent_a.brain().params(),
            parent_b.brain().params(),
            Brain::PARAM_RANGE,
            rng,
        );
        self.mutation.mutate(brain.params_mut(), Brain::PARAM_RANGE, rng);
        Gene::new(actor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum IslandState {
    Empty,
    /// Holds genes, some of which may be unevaluated.
    Seeded,
    /// Every gene has a score.
    Evaluated,
}

/// An independently evolving sub-population with its own random stream.
#[derive(Debug, Clone)]
pub struct Island {
    genes: Vec<Gene>,
    state: IslandState,
    rng: Pcg32,
    generation: u64,
}

impl Island {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            genes: vec![],
            state: IslandState::Empty,
            rng: Pcg32::seed_from_u64(seed),
            generation: 0,
        }
    }

    #[must_use]
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    #[must_use]
    pub fn state(&self) -> IslandState {
        self.state
    }

    /// Number of generations run since creation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replaces the whole population.
    pub fn seed<I>(&mut self, genes: I)
    where
        I: IntoIterator<Item = Gene>,
    {
        self.genes = genes.into_iter().collect();
        self.state = if self.genes.is_empty() {
            IslandState::Empty
        } else if self.genes.iter().all(Gene::is_evaluated) {
            IslandState::Evaluated
        } else {
            IslandState::Seeded
        };
    }

    /// Respawns every gene at the same start, invalidating all scores.
    pub fn respawn_all(&mut self, position: Position, orientation: Orientation) {
        for gene in &mut self.genes {
            gene.respawn(position, orientation);
        }
        if !self.state.is_empty() {
            self.state = IslandState::Seeded;
        }
    }

    /// Scores every gene that has no score yet with the given evaluation seed.
    pub fn evaluate(&mut self, fitness: &FitnessEvaluator, level: &Level, seed: u64) {
        for gene in self.genes.iter_mut().filter(|gene| !gene.is_evaluated()) {
            gene.score = Some(fitness.evaluate(&gene.actor, level, seed));
        }
        if !self.state.is_empty() {
            self.state = IslandState::Evaluated;
        }
    }

    /// Runs one evaluate, select, breed, evaluate cycle.
    ///
    /// # Panics
    ///
    /// Panics if the island is empty.
    pub fn run_generation<M, C>(
        &mut self,
        evolver: &Evolver<M, C>,
        fitness: &FitnessEvaluator,
        level: &Level,
        seed: u64,
    ) where
        M: MutationPolicy,
        C: CrossbreedPolicy,
    {
        assert!(!self.state.is_empty(), "cannot evolve an empty island");

        self.evaluate(fitness, level, seed);
        sort_by_score(&mut self.genes);
        self.genes.truncate(evolver.survivors.max(1));

        let mut children = Vec::with_capacity(evolver.children);
        for _ in 0..evolver.children {
            let Some((parent_a, parent_b)) =
                select_parents(&self.genes, evolver.tournament_size, &mut self.rng)
            else {
                break;
            };
            children.push(evolver.breed(parent_a, parent_b, &mut self.rng));
        }
        self.genes.extend(children);

        self.evaluate(fitness, level, seed);
        self.generation += 1;

        debug!(
            generation = self.generation,
            genes = self.genes.len(),
            best = self.best().and_then(Gene::score),
            "island generation finished"
        );
    }

    /// Gene with the highest score.
    #[must_use]
    pub fn best(&self) -> Option<&Gene> {
        self.genes
            .iter()
            .filter(|gene| gene.is_evaluated())
            .max_by_key(|gene| gene.score)
    }

    #[must_use]
    pub fn fitness_stats(&self) -> Option<FitnessStats> {
        FitnessStats::new(self.genes.iter().filter_map(Gene::score))
    }
}

/// Stable sort, best score first. Unevaluated genes go last.
pub fn sort_by_score(genes: &mut [Gene]) {
    genes.sort_by(|a, b| b.score.cmp(&a.score));
}

/// Picks `tournament_size` distinct genes at random and returns the best of them.
///
/// Returns `None` if `genes` is empty.
pub fn tournament_select<'a, R>(
    genes: &'a [Gene],
    tournament_size: usize,
    rng: &mut R,
) -> Option<&'a Gene>
where
    R: Rng + ?Sized,
{
    genes
        .choose_multiple(rng, tournament_size.max(1))
        .max_by_key(|gene| gene.score)
}

/// Picks two parents by tournament. The second tournament excludes the first winner.
///
/// Both parents are the same gene only when `genes` holds a single gene. Returns
/// `None` if `genes` is empty.
pub fn select_parents<'a, R>(
    genes: &'a [Gene],
    tournament_size: usize,
    rng: &mut R,
) -> Option<(&'a Gene, &'a Gene)>
where
    R: Rng + ?Sized,
{
    let parent_a = tournament_select(genes, tournament_size, rng)?;
    let parent_b = genes
        .iter()
        .filter(|gene| !ptr::eq(*gene, parent_a))
        .choose_multiple(rng, tournament_size.max(1))
        .into_iter()
        .max_by_key(|gene| gene.score)
        .unwrap_or(parent_a);
    Some((parent_a, parent_b))
}

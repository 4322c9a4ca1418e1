//! Batch scheduling across islands.
//!
//! One batch:
//!
//! 1. Generate a new level and pick a free spawn tile (skip the batch if none is found)
//! 2. Draw one evaluation seed for the level
//! 3. Respawn every gene of every island at that tile
//! 4. Run `generations_per_level` generations on every island, all scoring with the
//!    level's evaluation seed
//! 5. Barrier: wait until every island has finished
//! 6. Pool all genes tagged with their island, keep the global top `survivors`, and
//!    reseed every island with copies of that set
//!
//! With a single island, step 3 runs on the calling thread. With several islands, each
//! island runs as one task on a [`rayon::ThreadPool`] inside a [`ThreadPool::scope`],
//! and the scope's return is the barrier. Islands own disjoint data; the only shared
//! state during a batch is the level, its evaluation seed and the training switch, all
//! read-only.

use darwinwin_engine::{Brain, LevelGenerator, Orientation, ScatterLevelGenerator};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use tracing::{info, warn};

use crate::{
    config::TrainingConfig,
    fitness::FitnessEvaluator,
    genetic::{Evolver, Gene, Island},
    session::TrainingSession,
    stats::FitnessStats,
};

/// The worker pool could not be created.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("failed to build training thread pool: {source}")]
pub struct SchedulerError {
    source: ThreadPoolBuildError,
}

/// Result of one completed batch.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Zero-based batch number.
    pub batch: u64,
    pub best: Gene,
    /// Index of the island that produced `best`.
    pub island: usize,
    /// Scores of all genes before the reseed.
    pub stats: FitnessStats,
}

#[derive(Debug)]
pub struct IslandScheduler<G = ScatterLevelGenerator> {
    pool: Option<ThreadPool>,
    islands: Vec<Island>,
    evolver: Evolver,
    fitness: FitnessEvaluator,
    level_generator: G,
    generations_per_level: usize,
    spawn_attempts: usize,
    rng: Pcg32,
    batch: u64,
}

impl IslandScheduler {
    /// Creates the islands and seeds each of them with `brains`.
    ///
    /// Levels come from the scatter generator in `config.level`. A worker pool is only
    /// built when `config.islands > 1`.
    pub fn new<I>(config: &TrainingConfig, seed: u64, brains: I) -> Result<Self, SchedulerError>
    where
        I: IntoIterator<Item = Brain>,
    {
        Self::with_level_generator(config, seed, brains, config.level)
    }
}

impl<G> IslandScheduler<G>
where
    G: LevelGenerator,
{
    /// Like [`IslandScheduler::new`], drawing levels from `level_generator`.
    pub fn with_level_generator<I>(
        config: &TrainingConfig,
        seed: u64,
        brains: I,
        level_generator: G,
    ) -> Result<Self, SchedulerError>
    where
        I: IntoIterator<Item = Brain>,
    {
        let pool = if config.islands > 1 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(config.threads)
                .thread_name(|i| format!("island-worker-{i}"))
                .build()
                .map_err(|source| SchedulerError { source })?;
            Some(pool)
        } else {
            None
        };

        let mut rng = Pcg32::seed_from_u64(seed);
        let genes: Vec<Gene> = brains.into_iter().map(Gene::from_brain).collect();
        let islands = (0..config.islands)
            .map(|_| {
                let mut island = Island::new(rng.random());
                island.seed(genes.iter().cloned());
                island
            })
            .collect();

        Ok(Self {
            pool,
            islands,
            evolver: config.evolver(),
            fitness: config.fitness(),
            level_generator,
            generations_per_level: config.generations_per_level,
            spawn_attempts: config.spawn_attempts,
            rng,
            batch: 0,
        })
    }

    #[must_use]
    pub fn islands(&self) -> &[Island] {
        &self.islands
    }

    /// Number of completed batches.
    #[must_use]
    pub fn batches(&self) -> u64 {
        self.batch
    }

    /// Runs one batch on a freshly generated level.
    ///
    /// Returns `None` if the batch was skipped because no spawn tile was found, or
    /// because training was disabled before any gene was scored.
    pub fn run_batch(&mut self, session: &mut TrainingSession) -> Option<BatchReport> {
        let level = self.level_generator.generate(&mut self.rng);
        let spawn = match level.find_spawn(&mut self.rng, self.spawn_attempts) {
            Ok(spawn) => spawn,
            Err(err) => {
                warn!(batch = self.batch, "skipping batch: {err}");
                return None;
            }
        };
        let orientation = Orientation::ALL[self.rng.random_range(0..Orientation::ALL.len())];
        let eval_seed: u64 = self.rng.random();
        session.replace_level(level);

        for island in &mut self.islands {
            island.respawn_all(spawn, orientation);
        }

        let evolver = &self.evolver;
        let fitness = &self.fitness;
        let generations = self.generations_per_level;
        let session = &*session;
        let run_island = |island: &mut Island| {
            for _ in 0..generations {
                if !session.is_enabled() {
                    break;
                }
                island.run_generation(evolver, fitness, session.level(), eval_seed);
            }
        };
        let run_island = &run_island;
        match &self.pool {
            Some(pool) => pool.scope(|s| {
                for island in &mut self.islands {
                    s.spawn(move |_| run_island(island));
                }
            }),
            None => {
                for island in &mut self.islands {
                    run_island(island);
                }
            }
        }

        self.reseed()
    }

    /// Keeps the global top `survivors` and copies them into every island.
    fn reseed(&mut self) -> Option<BatchReport> {
        let mut pooled: Vec<(usize, &Gene)> = self
            .islands
            .iter()
            .enumerate()
            .flat_map(|(index, island)| island.genes().iter().map(move |gene| (index, gene)))
            .filter(|(_, gene)| gene.is_evaluated())
            .collect();
        let stats = FitnessStats::new(pooled.iter().filter_map(|(_, gene)| gene.score()))?;

        pooled.sort_by(|(_, a), (_, b)| b.score().cmp(&a.score()));
        pooled.truncate(self.evolver.survivors.max(1));
        let (island, best) = pooled.first().map(|(index, gene)| (*index, (*gene).clone()))?;
        let survivors: Vec<Gene> = pooled.into_iter().map(|(_, gene)| gene.clone()).collect();
        for target in &mut self.islands {
            target.seed(survivors.iter().cloned());
        }

        let report = BatchReport {
            batch: self.batch,
            best,
            island,
            stats,
        };
        self.batch += 1;

        info!(
            batch = report.batch,
            island = report.island,
            best = report.stats.max,
            mean = report.stats.mean,
            median = report.stats.median,
            std_dev = report.stats.std_dev,
            genes = report.stats.count,
            "batch finished"
        );
        Some(report)
    }

    /// Runs batches until the training switch is cleared.
    ///
    /// `sink` receives the report of every completed batch.
    pub fn run<F>(&mut self, session: &mut TrainingSession, mut sink: F)
    where
        F: FnMut(&BatchReport),
    {
        while session.is_enabled() {
            if let Some(report) = self.run_batch(session) {
                sink(&report);
            }
        }
        info!(batches = self.batch, "training stopped");
    }
}

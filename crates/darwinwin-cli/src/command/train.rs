use std::path::PathBuf;

use anyhow::Context as _;
use darwinwin_engine::Brain;
use darwinwin_training::{
    config::TrainingConfig,
    scheduler::IslandScheduler,
    session::{TrainingSession, TrainingSwitch},
};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use tracing::info;

use crate::{model::brain_store::BrainStore, util};

/// Options shared by the training commands.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainingArgs {
    /// Training config JSON file (defaults are used for missing fields)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory to load the starting brain from and save the best brains to
    #[arg(long, default_value = "brains")]
    brain_dir: PathBuf,
    /// Stop after this many completed batches (runs until killed otherwise)
    #[arg(long)]
    batches: Option<u64>,
    /// Master random seed
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    survivors: Option<usize>,
    #[arg(long)]
    children: Option<usize>,
    #[arg(long)]
    generations_per_level: Option<usize>,
    #[arg(long)]
    max_steps: Option<u32>,
}

impl TrainingArgs {
    pub(crate) fn load_config(&self) -> anyhow::Result<TrainingConfig> {
        let mut config = util::load_config(self.config.as_ref())?;
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(survivors) = self.survivors {
            config.survivors = survivors;
        }
        if let Some(children) = self.children {
            config.children = children;
        }
        if let Some(generations) = self.generations_per_level {
            config.generations_per_level = generations;
        }
        if let Some(max_steps) = self.max_steps {
            config.max_steps = max_steps;
        }
        Ok(config)
    }
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    #[clap(flatten)]
    training: TrainingArgs,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let mut config = arg.training.load_config()?;
    config.islands = 1;
    run_training(&arg.training, &config)
}

/// Seeds the islands from the brain store and trains until the batch limit is reached.
pub(crate) fn run_training(args: &TrainingArgs, config: &TrainingConfig) -> anyhow::Result<()> {
    config.validate().context("Invalid training config")?;
    let store = BrainStore::open(&args.brain_dir)?;

    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = Pcg32::seed_from_u64(seed);
    let brains = match store.load_latest()? {
        Some((path, brain)) => {
            info!(path = %path.display(), "seeding from saved brain");
            vec![brain]
        }
        None => {
            info!(
                dir = %store.dir().display(),
                "no saved brain found, seeding with random brains"
            );
            (0..config.survivors)
                .map(|_| Brain::random(&mut rng))
                .collect()
        }
    };

    info!(
        seed,
        islands = config.islands,
        survivors = config.survivors,
        children = config.children,
        generations_per_level = config.generations_per_level,
        "starting training"
    );
    let mut scheduler = IslandScheduler::new(config, rng.random(), brains)
        .context("Failed to start training")?;
    let switch = TrainingSwitch::new();
    let mut session = TrainingSession::new(switch.clone());

    let mut result = Ok(());
    scheduler.run(&mut session, |report| {
        match store.save(report.best.brain()) {
            Ok(path) => info!(
                batch = report.batch,
                island = report.island,
                path = %path.display(),
                "saved best brain"
            ),
            Err(err) => {
                result = Err(err);
                switch.disable();
                return;
            }
        }
        if args.batches.is_some_and(|max| report.batch + 1 >= max) {
            switch.disable();
        }
    });
    result
}

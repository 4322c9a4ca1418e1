use std::{
    io::{self, BufRead as _, Write as _},
    path::PathBuf,
};

use anyhow::Context as _;
use darwinwin_engine::{
    Actor, Brain, ControlResponse, LevelGenerator as _, Orientation, Sandbox,
};
use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use tracing::{info, warn};

use crate::{model::brain_store::BrainStore, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ControlArg {
    /// Training config JSON file; its level generator settings shape the level
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory to load the actor's brain from
    #[arg(long, default_value = "brains")]
    brain_dir: PathBuf,
    /// Random seed for the level and the spawn position
    #[arg(long)]
    seed: Option<u64>,
}

pub(crate) fn run(arg: &ControlArg) -> anyhow::Result<()> {
    let config = util::load_config(arg.config.as_ref())?;
    let seed = arg.seed.or(config.seed).unwrap_or_else(rand::random);
    let mut rng = Pcg32::seed_from_u64(seed);

    let level = config.level.generate(&mut rng);
    let spawn = level
        .find_spawn(&mut rng, config.spawn_attempts)
        .context("Failed to place the actor")?;

    let store = BrainStore::open(&arg.brain_dir)?;
    let brain = match store.load_latest()? {
        Some((path, brain)) => {
            info!(path = %path.display(), "loaded brain");
            brain
        }
        None => {
            info!("no saved brain found, using a random brain");
            Brain::random(&mut rng)
        }
    };

    let mut sandbox = Sandbox::new(level, Actor::new(spawn, Orientation::Up, brain));
    info!(seed, %spawn, "control sandbox ready, reading requests from stdin");

    let stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    for line in stdin.lines() {
        let line = line.context("Failed to read request from stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let response = sandbox.handle_json(&line);
        if let ControlResponse::Rejected { reason } = &response {
            warn!(%reason, "request rejected");
        }
        serde_json::to_writer(&mut stdout, &response).context("Failed to write response")?;
        writeln!(stdout).context("Failed to write response")?;
        stdout.flush().context("Failed to flush stdout")?;
    }
    Ok(())
}

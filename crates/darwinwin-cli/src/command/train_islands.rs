use super::train::{self, TrainingArgs};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainIslandsArg {
    #[clap(flatten)]
    training: TrainingArgs,
    /// Number of islands evolving in parallel
    #[arg(long)]
    islands: Option<usize>,
    /// Worker threads (0 = one per core)
    #[arg(long)]
    threads: Option<usize>,
}

pub(crate) fn run(arg: &TrainIslandsArg) -> anyhow::Result<()> {
    let mut config = arg.training.load_config()?;
    if let Some(islands) = arg.islands {
        config.islands = islands;
    }
    if let Some(threads) = arg.threads {
        config.threads = threads;
    }
    train::run_training(&arg.training, &config)
}

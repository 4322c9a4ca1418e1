use clap::{Parser, Subcommand};

use self::{control::ControlArg, train::TrainArg, train_islands::TrainIslandsArg};

mod control;
mod train;
mod train_islands;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve brains on a single island, synchronously
    Train(#[clap(flatten)] TrainArg),
    /// Evolve brains on several islands in parallel with periodic global reseeding
    TrainIslands(#[clap(flatten)] TrainIslandsArg),
    /// Drive one actor manually with JSON requests on stdin
    Control(#[clap(flatten)] ControlArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::TrainIslands(arg) => train_islands::run(&arg)?,
        Mode::Control(arg) => control::run(&arg)?,
    }
    Ok(())
}

use clap::{Parser, Subcommand};

use self::{predict::PredictArg, project::ProjectArg, train::TrainArg};

mod predict;
mod project;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve network weights until the dataset is learned
    Train(#[clap(flatten)] TrainArg),
    /// Run a trained model on one input
    Predict(#[clap(flatten)] PredictArg),
    /// Show how the population size develops under a configuration
    Project(#[clap(flatten)] ProjectArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Predict(arg) => predict::run(&arg)?,
        Mode::Project(arg) => project::run(&arg)?,
    }
    Ok(())
}

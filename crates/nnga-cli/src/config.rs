use std::path::PathBuf;

use anyhow::{Context as _, ensure};
use nnga_genetic::{Coefficients, selection::SelectionKind};
use nnga_network::{Network, NetworkConfig};
use serde::{Deserialize, Serialize};

use crate::util;

/// One input/expected-output pair of the training set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
}

impl Sample {
    fn new(input: &[f64], target: &[f64]) -> Self {
        Self {
            input: input.to_vec(),
            target: target.to_vec(),
        }
    }
}

/// Everything a training run needs, loadable from JSON.
///
/// Missing fields fall back to [`TrainConfig::default`], which learns XNOR on a
/// 2-2-2-1 sigmoid network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub population: usize,
    pub network: NetworkConfig,
    pub coefficients: Coefficients,
    pub selection: SelectionKind,
    pub dataset: Vec<Sample>,
    /// Training stops once `1 - best fitness` drops below this.
    pub target_error: f64,
    pub max_generations: usize,
    pub seed: Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            population: 1000,
            network: NetworkConfig::default(),
            coefficients: Coefficients::default(),
            selection: SelectionKind::Truncation,
            dataset: vec![
                Sample::new(&[1.0, 1.0], &[1.0]),
                Sample::new(&[1.0, 0.0], &[0.0]),
                Sample::new(&[0.0, 1.0], &[0.0]),
                Sample::new(&[0.0, 0.0], &[1.0]),
            ],
            target_error: 1e-6,
            max_generations: 1000,
            seed: None,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.network
            .validate()
            .context("Invalid network configuration")?;
        self.coefficients
            .validate()
            .context("Invalid coefficients")?;
        ensure!(!self.dataset.is_empty(), "Dataset is empty");
        let outputs = self.network.outputs();
        for (i, sample) in self.dataset.iter().enumerate() {
            ensure!(
                sample.input.len() == self.network.inputs,
                "Sample {i} has {} inputs, network expects {}",
                sample.input.len(),
                self.network.inputs
            );
            ensure!(
                sample.target.len() == outputs,
                "Sample {i} has {} targets, network has {outputs} outputs",
                sample.target.len()
            );
        }
        ensure!(
            self.target_error.is_finite() && self.target_error >= 0.0,
            "Target error must be a finite value >= 0, got {}",
            self.target_error
        );
        Ok(())
    }

    /// Mean of `1 - |target - output|` over every output of every sample.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn fitness(&self, network: &Network) -> f64 {
        let mut sum = 0.0;
        let mut count = 0_usize;
        for sample in &self.dataset {
            let output = network.predict(&sample.input);
            for (target, output) in sample.target.iter().zip(output) {
                sum += 1.0 - (target - output).abs();
                count += 1;
            }
        }
        if count == 0 { 0.0 } else { sum / count as f64 }
    }
}

/// Configuration file and command line overrides shared by the commands.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ConfigArg {
    /// Training configuration file (JSON); defaults to the built-in XNOR setup
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of initial candidates
    #[arg(long)]
    population: Option<usize>,
    /// Survivor selection strategy (truncation or proportionate)
    #[arg(long)]
    selection: Option<SelectionKind>,
    /// Breeding pairs per survivor
    #[arg(long)]
    crossover: Option<f64>,
    /// Maximum number of evolution steps
    #[arg(long)]
    max_generations: Option<usize>,
    /// Seed of the random number generator
    #[arg(long)]
    seed: Option<u64>,
}

impl ConfigArg {
    pub(crate) fn load(&self) -> anyhow::Result<TrainConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file("training config", path)?,
            None => TrainConfig::default(),
        };
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut TrainConfig) {
        let Self {
            config: _,
            population,
            selection,
            crossover,
            max_generations,
            seed,
        } = self;
        if let Some(population) = population {
            config.population = *population;
        }
        if let Some(selection) = selection {
            config.selection = *selection;
        }
        if let Some(crossover) = crossover {
            config.coefficients.crossover = *crossover;
        }
        if let Some(max_generations) = max_generations {
            config.max_generations = *max_generations;
        }
        if seed.is_some() {
            config.seed = *seed;
        }
    }
}

use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use nnga_genetic::{EvolveError, Population};
use nnga_network::NetworkBuilder;
use nnga_stats::descriptive::DescriptiveStats;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg64;
use tracing::{info, warn};

use crate::{
    config::{ConfigArg, TrainConfig},
    model::trained_model::TrainedModel,
    util,
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    #[clap(flatten)]
    config: ConfigArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy)]
struct Progress {
    generations: usize,
    converged: bool,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg { config, output } = arg;
    let config = config.load()?;
    let seed = config.seed.unwrap_or_else(|| rand::rng().random());

    if let Some(generation) = config
        .coefficients
        .generations_before_collapse(config.population, config.max_generations)
    {
        warn!(
            generation,
            population = config.population,
            "population will be exhausted before the generation limit"
        );
    }

    let builder = NetworkBuilder::new(config.network.clone())?;
    let mut population = Population::new(
        config.population,
        builder,
        config.coefficients,
        config.selection.build(config.coefficients.scale),
        Pcg64::seed_from_u64(seed),
    )
    .context("Failed to create population")?;
    info!(
        seed,
        population = population.len(),
        genes = population.gene_count(),
        selection = ?config.selection,
        "training started"
    );

    let progress = evolve(&mut population, &config)?;

    let best = population
        .best()
        .context("No scored candidate left in the population")?;
    let final_fitness = best.fitness().unwrap_or(f64::NEG_INFINITY);
    let model = TrainedModel {
        trained_at: Utc::now(),
        generations: progress.generations,
        converged: progress.converged,
        final_fitness,
        final_error: 1.0 - final_fitness,
        seed,
        coefficients: config.coefficients,
        network: config.network.clone(),
        weights: best.model().weights().clone(),
    };
    util::write_json(&model, output.as_deref())?;

    eprintln!();
    if model.converged {
        eprintln!("Training converged after {} generations", model.generations);
    } else {
        eprintln!("Training stopped after {} generations", model.generations);
    }
    if let Some(path) = &output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Seed: {}", model.seed);
    eprintln!("  Final fitness: {:.6}", model.final_fitness);
    eprintln!("  Final error: {:.3e}", model.final_error);
    eprintln!("  Weights: {}", model.network.weight_count());
    eprintln!("  Predictions:");
    let network = best.model();
    for sample in &config.dataset {
        eprintln!(
            "    {:?} => {:.4?} (target {:?})",
            sample.input,
            network.predict(&sample.input),
            sample.target
        );
    }

    Ok(())
}

/// Scores and evolves until the error target, the generation limit or a collapse.
///
/// On return every candidate is scored.
fn evolve(
    population: &mut Population<NetworkBuilder, Pcg64>,
    config: &TrainConfig,
) -> anyhow::Result<Progress> {
    let mut best_error = f64::INFINITY;
    let mut generation = 0;
    loop {
        population.evaluate_fitness(|network| config.fitness(network));

        let fitness = population
            .compute_fitness_stats()
            .context("Population is empty")?;
        best_error = best_error.min(1.0 - fitness.max);
        info!(
            generation,
            size = population.len(),
            best = fitness.max,
            mean = fitness.mean,
            spread = fitness.range(),
            error = best_error,
            diversity = mean_spread(&population.compute_gene_stats()),
            "generation scored"
        );

        let converged = best_error < config.target_error;
        if converged || generation >= config.max_generations {
            return Ok(Progress {
                generations: generation,
                converged,
            });
        }
        match population.evolve() {
            Ok(()) => {}
            Err(err @ EvolveError::Collapsed { .. }) => {
                warn!(generation, "{err}");
                return Ok(Progress {
                    generations: generation,
                    converged: false,
                });
            }
            Err(err) => return Err(err).context(format!("Generation {generation} failed")),
        }
        generation += 1;
    }
}

/// Mean per-gene standard deviation, a rough measure of population diversity.
#[expect(clippy::cast_precision_loss)]
fn mean_spread(gene_stats: &[DescriptiveStats]) -> f64 {
    if gene_stats.is_empty() {
        return 0.0;
    }
    gene_stats.iter().map(|s| s.std_dev).sum::<f64>() / gene_stats.len() as f64
}

//! The evolving population.
//!
//! A [`Population`] owns its candidates and runs one generation per
//! [`Population::evolve`] call: selection, crossover, mutation, then commit.

use std::{mem, num::NonZeroUsize, sync::Arc, thread};

use nnga_stats::descriptive::DescriptiveStats;
use rand::Rng;

use crate::{
    Candidate, Coefficients, ConfigError, EvolveError, MIN_GENE_COUNT, MIN_SURVIVORS, ModelBuilder,
    TagOf, coefficients::share, genes, selection::Selection,
};

/// A population of candidates under evolution.
///
/// The population owns everything a run needs: the model builder (to construct
/// crossover children), the shared tag sequence, the operator coefficients, the
/// selection strategy and the random source. Two populations never share mutable
/// state, so independent runs (e.g. islands) can evolve on different threads.
#[derive(Debug)]
pub struct Population<B, R>
where
    B: ModelBuilder,
{
    builder: B,
    tags: Arc<[TagOf<B>]>,
    coefficients: Coefficients,
    selection: Box<dyn Selection>,
    candidates: Vec<Candidate<B::Model>>,
    rng: R,
}

impl<B, R> Population<B, R>
where
    B: ModelBuilder,
    R: Rng,
{
    /// Creates a population of `size` freshly built candidates.
    ///
    /// The tag sequence is derived once from `builder`; every model it builds must
    /// report exactly that sequence.
    pub fn new(
        size: usize,
        builder: B,
        coefficients: Coefficients,
        selection: Box<dyn Selection>,
        mut rng: R,
    ) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        coefficients.validate()?;

        let tags: Arc<[TagOf<B>]> = builder.gene_tags().into();
        if tags.len() < MIN_GENE_COUNT {
            return Err(ConfigError::TooFewGenes {
                gene_count: tags.len(),
                required: MIN_GENE_COUNT,
            });
        }

        let candidates = (0..size)
            .map(|_| Candidate::from_model(builder.build(&mut rng), Arc::clone(&tags)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(ConfigError::Topology)?;

        tracing::debug!(size, gene_count = tags.len(), "population created");

        Ok(Self {
            builder,
            tags,
            coefficients,
            selection,
            candidates,
            rng,
        })
    }

    /// Runs one evolution step: selection, crossover, mutation, then commits every
    /// candidate's genes to its model.
    ///
    /// Every candidate must be scored. On error the population is left as it was
    /// before the failing operator.
    pub fn evolve(&mut self) -> Result<(), EvolveError> {
        let before = self.candidates.len();
        self.select()?;
        let survivors = self.candidates.len();
        self.crossover()?;
        self.mutate();
        self.commit();
        tracing::debug!(
            before,
            survivors,
            after = self.candidates.len(),
            "evolution step"
        );
        Ok(())
    }

    /// Keeps `round(selection × size)` candidates chosen by the selection strategy.
    pub fn select(&mut self) -> Result<(), EvolveError> {
        let scores = self.scores()?;
        let population = scores.len();
        let survivors = self.coefficients.survivor_count(population);
        if survivors < MIN_SURVIVORS {
            return Err(EvolveError::Collapsed {
                survivors,
                population,
            });
        }

        let chosen = self.selection.select(&scores, survivors, &mut self.rng);
        debug_assert_eq!(chosen.len(), survivors);

        let mut slots = mem::take(&mut self.candidates)
            .into_iter()
            .map(Some)
            .collect::<Vec<_>>();
        self.candidates = chosen
            .into_iter()
            .filter_map(|index| slots[index].take())
            .collect();

        tracing::debug!(population, survivors, selection = ?self.selection, "selection");
        Ok(())
    }

    /// Appends two single-point children for each of `round(crossover × size)` pairs.
    ///
    /// Parents are drawn uniformly with replacement (a candidate may pair with
    /// itself), and the cut point is drawn from `[1, N - 2]`. Children are built from
    /// fresh model instances and start unscored.
    pub fn crossover(&mut self) -> Result<(), EvolveError> {
        let parents = self.candidates.len();
        let pairs = self.coefficients.pair_count(parents);
        if pairs == 0 {
            return Ok(());
        }

        let gene_count = self.gene_count();
        let mut children = Vec::with_capacity(pairs * 2);
        for _ in 0..pairs {
            let mother = self.rng.random_range(0..parents);
            let father = self.rng.random_range(0..parents);
            let cut = self.rng.random_range(1..=gene_count - 2);
            let (first, second) = genes::single_point(
                self.candidates[mother].values(),
                self.candidates[father].values(),
                cut,
            );
            children.push(self.spawn(first)?);
            children.push(self.spawn(second)?);
        }
        self.candidates.extend(children);

        tracing::debug!(parents, pairs, size = self.candidates.len(), "crossover");
        Ok(())
    }

    /// Applies classic (additive) and offset (swap) mutation in place.
    ///
    /// Targets are drawn uniformly with replacement. Each mutated candidate receives
    /// a number of edits drawn from `[0, round(mutation_gene_fraction × N))`; any
    /// candidate that was edited becomes unscored.
    pub fn mutate(&mut self) {
        let size = self.candidates.len();
        if size == 0 {
            return;
        }
        let max_genes = self.coefficients.max_mutated_genes(self.gene_count());

        let classic = share(self.coefficients.mutation_classic, size);
        let mut additions = 0;
        for _ in 0..classic {
            let delta = genes::growth_delta(self.coefficients.mutation_growth, &mut self.rng);
            let target = self.rng.random_range(0..size);
            additions += self.candidates[target]
                .edit_values(|values| genes::add_growth(values, delta, max_genes, &mut self.rng));
        }

        let offset = share(self.coefficients.mutation_offset, size);
        let mut swaps = 0;
        for _ in 0..offset {
            let target = self.rng.random_range(0..size);
            swaps += self.candidates[target]
                .edit_values(|values| genes::swap_offsets(values, max_genes, &mut self.rng));
        }

        tracing::debug!(classic, additions, offset, swaps, max_genes, "mutation");
    }

    /// Pushes every candidate's genes into its bound model.
    pub fn commit(&mut self) {
        for candidate in &mut self.candidates {
            candidate.commit();
        }
    }

    fn spawn(&mut self, values: Vec<f64>) -> Result<Candidate<B::Model>, EvolveError> {
        let model = self.builder.build(&mut self.rng);
        Candidate::with_values(model, Arc::clone(&self.tags), values).map_err(EvolveError::Topology)
    }

    fn scores(&self) -> Result<Vec<f64>, EvolveError> {
        self.candidates
            .iter()
            .enumerate()
            .map(|(index, candidate)| match candidate.fitness() {
                None => Err(EvolveError::Unscored { index }),
                Some(fitness) if !fitness.is_finite() => {
                    Err(EvolveError::NonFiniteFitness { index, fitness })
                }
                Some(fitness) => Ok(fitness),
            })
            .collect()
    }
}

impl<B, R> Population<B, R>
where
    B: ModelBuilder,
{
    /// Scores every candidate with `fitness`, in parallel.
    ///
    /// Candidates are split into one chunk per available core and evaluated on
    /// scoped threads. Models are only read while their fitness is computed.
    pub fn evaluate_fitness<F>(&mut self, fitness: F)
    where
        F: Fn(&B::Model) -> f64 + Sync,
        B::Model: Send,
        TagOf<B>: Send + Sync,
    {
        let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        let chunk_size = self.candidates.len().div_ceil(workers).max(1);
        let fitness = &fitness;
        thread::scope(|s| {
            for chunk in self.candidates.chunks_mut(chunk_size) {
                s.spawn(move || {
                    for candidate in chunk {
                        let score = fitness(candidate.model());
                        candidate.score(score);
                    }
                });
            }
        });
    }

    #[must_use]
    pub fn candidates(&self) -> &[Candidate<B::Model>] {
        &self.candidates
    }

    /// Mutable access for the driver to assign scores.
    pub fn candidates_mut(&mut self) -> &mut [Candidate<B::Model>] {
        &mut self.candidates
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Number of genes per candidate, fixed for the run.
    #[must_use]
    pub fn gene_count(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn tags(&self) -> &[TagOf<B>] {
        &self.tags
    }

    #[must_use]
    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    /// Returns the scored candidate with the highest fitness.
    #[must_use]
    pub fn best(&self) -> Option<&Candidate<B::Model>> {
        self.candidates
            .iter()
            .filter_map(|candidate| candidate.fitness().map(|fitness| (candidate, fitness)))
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(candidate, _)| candidate)
    }

    /// Computes descriptive statistics over the fitness of scored candidates.
    #[must_use]
    pub fn compute_fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.candidates.iter().filter_map(Candidate::fitness))
    }

    /// Computes descriptive statistics for each gene across all candidates.
    ///
    /// Useful for tracking population diversity: a gene whose spread collapses has
    /// converged. Returns an empty vector for an empty population.
    #[must_use]
    pub fn compute_gene_stats(&self) -> Vec<DescriptiveStats> {
        (0..self.gene_count())
            .map(|i| DescriptiveStats::new(self.candidates.iter().map(|c| c.values()[i])))
            .collect::<Option<Vec<_>>>()
            .unwrap_or_default()
    }
}

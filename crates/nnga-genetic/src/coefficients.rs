//! Operator rates of the genetic algorithm.
//!
//! The population size is not fixed: each step keeps a share of the candidates and
//! breeds children from them. [`Coefficients::project_sizes`] follows that recurrence
//! without running the algorithm.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, MIN_SURVIVORS};

/// Genetic operator rates, fixed for the duration of a run.
///
/// All counts derived from these fractions use [`share`], i.e. `round(fraction × n)`
/// with halves rounded away from zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coefficients {
    /// Standard-deviation multiplier of proportionate selection's fitness shift.
    ///
    /// Larger values flatten the selection probabilities (more exploration).
    pub scale: f64,
    /// Fraction of the population kept by selection, in `(0, 1]`.
    pub selection: f64,
    /// Breeding pairs per survivor; each pair appends two children.
    pub crossover: f64,
    /// Additive mutation draws per candidate.
    pub mutation_classic: f64,
    /// Magnitude of the additive delta, drawn from `[-growth / 2, growth / 2)`.
    pub mutation_growth: f64,
    /// Upper bound (exclusive) on the genes touched per mutated candidate, as a
    /// fraction of the gene count.
    pub mutation_gene_fraction: f64,
    /// Swap mutation draws per candidate.
    pub mutation_offset: f64,
}

impl Default for Coefficients {
    /// Rates that keep the population size steady: selection keeps 20% and crossover
    /// refills the remaining 80%.
    fn default() -> Self {
        Self {
            scale: 1.0,
            selection: 0.2,
            crossover: 2.0,
            mutation_classic: 0.1,
            mutation_growth: 2.0,
            mutation_gene_fraction: 0.2,
            mutation_offset: 0.1,
        }
    }
}

impl Coefficients {
    /// Checks that every coefficient is finite and within its range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Self {
            scale,
            selection,
            crossover,
            mutation_classic,
            mutation_growth,
            mutation_gene_fraction,
            mutation_offset,
        } = *self;

        check("scale", scale, "a finite value >= 0", |v| v >= 0.0)?;
        check("selection", selection, "a value in (0, 1]", |v| {
            v > 0.0 && v <= 1.0
        })?;
        check("crossover", crossover, "a finite value >= 0", |v| v >= 0.0)?;
        check(
            "mutation_classic",
            mutation_classic,
            "a finite value >= 0",
            |v| v >= 0.0,
        )?;
        check(
            "mutation_growth",
            mutation_growth,
            "a finite value >= 0",
            |v| v >= 0.0,
        )?;
        check(
            "mutation_gene_fraction",
            mutation_gene_fraction,
            "a value in [0, 1]",
            |v| (0.0..=1.0).contains(&v),
        )?;
        check(
            "mutation_offset",
            mutation_offset,
            "a finite value >= 0",
            |v| v >= 0.0,
        )?;
        Ok(())
    }

    /// Number of candidates selection keeps out of `population`.
    #[must_use]
    pub fn survivor_count(&self, population: usize) -> usize {
        share(self.selection, population)
    }

    /// Number of breeding pairs drawn from `survivors`.
    #[must_use]
    pub fn pair_count(&self, survivors: usize) -> usize {
        share(self.crossover, survivors)
    }

    /// Exclusive upper bound of the per-candidate mutation count.
    #[must_use]
    pub fn max_mutated_genes(&self, gene_count: usize) -> usize {
        share(self.mutation_gene_fraction, gene_count)
    }

    /// Population size after one evolution step, or `None` if selection would keep
    /// fewer than [`MIN_SURVIVORS`] candidates.
    ///
    /// Saturates at `usize::MAX`.
    #[must_use]
    pub fn next_size(&self, size: usize) -> Option<usize> {
        let survivors = self.survivor_count(size);
        (survivors >= MIN_SURVIVORS)
            .then(|| survivors.saturating_add(self.pair_count(survivors).saturating_mul(2)))
    }

    /// Follows the population size from `initial_size` for up to `limit` steps.
    ///
    /// Returns the sizes visited (starting with `initial_size`) and how the run ends.
    /// [`next_size`](Self::next_size) never decreases as the size grows, so a step that
    /// does not shrink the population means it will never shrink again.
    #[must_use]
    pub fn project_sizes(&self, initial_size: usize, limit: usize) -> (Vec<usize>, SizeTrend) {
        let mut sizes = vec![initial_size];
        let mut size = initial_size;
        for generation in 0..limit {
            let Some(next) = self.next_size(size) else {
                return (sizes, SizeTrend::Collapses { generation });
            };
            match next.cmp(&size) {
                Ordering::Equal => return (sizes, SizeTrend::Stable { generation }),
                Ordering::Greater => return (sizes, SizeTrend::Grows { generation }),
                Ordering::Less => {}
            }
            tracing::trace!(generation, size = next, "projected population size");
            size = next;
            sizes.push(size);
        }
        (sizes, SizeTrend::Shrinking)
    }

    /// Projects how many evolution steps succeed before selection empties the
    /// population.
    ///
    /// Returns `Some(n)` if step `n + 1` would collapse, or `None` if the population
    /// survives `limit` steps (or stops shrinking).
    ///
    /// # Examples
    ///
    /// ```
    /// use nnga_genetic::Coefficients;
    ///
    /// let shrinking = Coefficients { crossover: 0.0, ..Coefficients::default() };
    /// // 1000 -> 200 -> 40 -> 8 -> 2 -> (0)
    /// assert_eq!(shrinking.generations_before_collapse(1000, 100), Some(4));
    ///
    /// let steady = Coefficients::default();
    /// assert_eq!(steady.generations_before_collapse(1000, 100), None);
    /// ```
    #[must_use]
    pub fn generations_before_collapse(&self, initial_size: usize, limit: usize) -> Option<usize> {
        match self.project_sizes(initial_size, limit).1 {
            SizeTrend::Collapses { generation } => Some(generation),
            SizeTrend::Stable { .. } | SizeTrend::Grows { .. } | SizeTrend::Shrinking => None,
        }
    }
}

/// How a projected population size develops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTrend {
    /// Step `generation + 1` would leave fewer than [`MIN_SURVIVORS`] candidates.
    Collapses { generation: usize },
    /// The size stays the same from `generation` on.
    Stable { generation: usize },
    /// The size grows with every step from `generation` on.
    Grows { generation: usize },
    /// Still shrinking when the step limit was reached.
    Shrinking,
}

/// Returns `round(fraction × count)`.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
#[must_use]
pub fn share(fraction: f64, count: usize) -> usize {
    (fraction * count as f64).round().max(0.0) as usize
}

fn check<F>(
    name: &'static str,
    value: f64,
    expected: &'static str,
    in_range: F,
) -> Result<(), ConfigError>
where
    F: FnOnce(f64) -> bool,
{
    if value.is_finite() && in_range(value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidCoefficient {
            name,
            value,
            expected,
        })
    }
}

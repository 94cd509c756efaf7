//! Genetic algorithm engine for evolving fixed-length real-valued gene vectors.
//!
//! The engine evolves a [`Population`] of [`Candidate`]s toward higher fitness by
//! repeating selection, crossover and mutation. It never computes fitness itself and
//! never interprets what a gene encodes: genes come from an external [`Model`] (in the
//! `nnga` CLI, the weights of a feed-forward network), and fitness is assigned by the
//! driver through [`Candidate::score`].
//!
//! # Generation Cycle
//!
//! ```text
//! driver: score every candidate   (Candidate::score / Population::evaluate_fitness)
//!     ↓
//! Population::evolve
//!     1. Selection  - keep round(selection × size) candidates (Truncation or Proportionate)
//!     2. Crossover  - append 2 × round(crossover × survivors) single-point children
//!     3. Mutation   - additive ("classic") and swap ("offset") mutation, in place
//!     4. Commit     - push every candidate's genes back into its bound model
//!     ↓
//! driver: score again ...
//! ```
//!
//! # Key Components
//!
//! - [`Gene`] - A gene value together with its structural tag
//! - [`Candidate`] - A gene vector bound to a model instance, plus an optional fitness
//! - [`Population`] - Candidates, coefficients, selection strategy and the random source
//! - [`Coefficients`] - Operator rates, fixed for a run
//! - [`selection::Selection`] - Pluggable survivor selection
//!
//! # Invariants
//!
//! - Every candidate of a population shares one tag sequence, derived once from
//!   [`ModelBuilder::gene_tags`]. Gene index `i` always refers to the same slot of the
//!   model, which is what makes positional crossover and mutation meaningful.
//! - A candidate is either scored or not; any operator that changes gene values clears
//!   the score. Selection refuses to run while a candidate is unscored.
//! - Population size is emergent: `s' = r(sel·s) + 2·r(cross·r(sel·s))`. Use
//!   [`Coefficients::generations_before_collapse`] to see how long a configuration
//!   lasts; selection fails with [`EvolveError::Collapsed`] instead of emptying the
//!   population.
//!
//! # Example
//!
//! ```rust,ignore
//! use nnga_genetic::{Coefficients, Population, selection::Truncation};
//! use rand::SeedableRng as _;
//!
//! let mut population = Population::new(
//!     1000,
//!     builder,
//!     Coefficients::default(),
//!     Box::new(Truncation),
//!     rand_pcg::Pcg64::seed_from_u64(42),
//! )?;
//!
//! loop {
//!     population.evaluate_fitness(|model| fitness_of(model));
//!     if converged(&population) {
//!         break;
//!     }
//!     population.evolve()?;
//! }
//! ```

pub use self::{
    candidate::Candidate,
    coefficients::Coefficients,
    model::{Gene, Model, ModelBuilder, TagOf},
    population::Population,
};

pub mod candidate;
pub mod coefficients;
pub mod genes;
pub mod model;
pub mod population;
pub mod selection;

#[cfg(test)]
mod test_model;

/// Smallest gene count a population accepts.
///
/// Crossover draws its cut point from `[1, N - 2]`, which is empty below three genes.
pub const MIN_GENE_COUNT: usize = 3;

/// Fewest survivors a selection step may leave.
///
/// A single survivor can only breed with itself, so selection keeping fewer than two
/// candidates is reported as a collapse.
pub const MIN_SURVIVORS: usize = 2;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
#[display(
    "model genes do not match the shared tag sequence: expected {expected} genes, found {found}, first mismatch at index {first_mismatch}"
)]
pub struct TopologyMismatchError {
    pub expected: usize,
    pub found: usize,
    pub first_mismatch: usize,
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("population size must be positive")]
    EmptyPopulation,
    #[display("gene count {gene_count} is too small, at least {required} genes are required")]
    TooFewGenes { gene_count: usize, required: usize },
    #[display("coefficient `{name}` is {value}, expected {expected}")]
    InvalidCoefficient {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },
    #[display("{_0}")]
    Topology(TopologyMismatchError),
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum EvolveError {
    #[display("candidate #{index} has not been scored")]
    Unscored { index: usize },
    #[display("candidate #{index} has non-finite fitness {fitness}")]
    NonFiniteFitness { index: usize, fitness: f64 },
    #[display("selection would keep {survivors} of {population} candidates")]
    Collapsed { survivors: usize, population: usize },
    #[display("{_0}")]
    Topology(TopologyMismatchError),
}

//! Survivor selection strategies.
//!
//! A [`Selection`] picks which candidates survive into the next generation, given
//! their fitness scores. Strategies only see scores and return indices, so they can
//! be swapped without touching crossover or mutation.
//!
//! - [`Truncation`] keeps the best candidates (the default pipeline).
//! - [`Proportionate`] samples survivors without replacement with probabilities
//!   derived from sigma-scaled fitness.
//!
//! Preconditions (every candidate scored, every score finite) are enforced by
//! [`Population::select`](crate::Population::select) before a strategy runs.

use std::fmt;

use nnga_stats::descriptive::DescriptiveStats;
use rand::{Rng as _, RngCore};
use serde::{Deserialize, Serialize};

pub trait Selection: fmt::Debug + Send + Sync {
    /// Chooses `count` distinct indices into `scores`, in survivor order.
    ///
    /// `count` never exceeds `scores.len()`, and every score is finite.
    fn select(&self, scores: &[f64], count: usize, rng: &mut dyn RngCore) -> Vec<usize>;
}

/// Keeps the `count` highest-scoring candidates, best first.
///
/// Equal scores keep their previous relative order. That order carries no meaning, so
/// which of several tied candidates survives the cut is effectively arbitrary.
#[derive(Debug, Default, Clone, Copy)]
pub struct Truncation;

impl Selection for Truncation {
    fn select(&self, scores: &[f64], count: usize, _rng: &mut dyn RngCore) -> Vec<usize> {
        let mut order = (0..scores.len()).collect::<Vec<_>>();
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
        order.truncate(count);
        order
    }
}

/// Fitness-proportionate selection without replacement.
///
/// Scores are sigma-scaled: `f' = max(f - (mean - scale × std_dev), 0)` with the
/// sample standard deviation, then normalized into probabilities. Survivors are drawn
/// one at a time: a uniform value in `[0, remaining)` is located on the cumulative
/// distribution, the chosen candidate's probability is zeroed and subtracted from the
/// remaining mass.
///
/// When every remaining probability is zero (all scores equal, or all below the
/// shift), the next survivor is drawn uniformly from the candidates not yet chosen.
#[derive(Debug, Clone, Copy)]
pub struct Proportionate {
    pub scale: f64,
}

impl Proportionate {
    #[must_use]
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }

    /// Normalized selection probabilities for `scores`.
    #[must_use]
    pub fn chances(&self, scores: &[f64]) -> Vec<f64> {
        let Some(stats) = DescriptiveStats::new(scores.iter().copied()) else {
            return vec![];
        };
        let floor = stats.mean - self.scale * stats.sample_std_dev;
        let mut chances = scores
            .iter()
            .map(|score| (score - floor).max(0.0))
            .collect::<Vec<_>>();
        let total = chances.iter().sum::<f64>();
        if total > 0.0 && total.is_finite() {
            for chance in &mut chances {
                *chance /= total;
            }
        } else {
            chances.fill(0.0);
        }
        chances
    }
}

impl Selection for Proportionate {
    fn select(&self, scores: &[f64], count: usize, rng: &mut dyn RngCore) -> Vec<usize> {
        let mut chances = self.chances(scores);
        let mut chosen = vec![false; scores.len()];
        let mut remaining = 1.0;
        let mut survivors = Vec::with_capacity(count);

        for _ in 0..count.min(scores.len()) {
            let index = match draw_weighted(&chances, remaining, rng) {
                Some(index) => index,
                None => draw_uniform(&chosen, rng),
            };
            remaining -= chances[index];
            chances[index] = 0.0;
            chosen[index] = true;
            survivors.push(index);
        }
        survivors
    }
}

/// Locates a uniform draw from `[0, remaining)` on the cumulative distribution.
///
/// Zero-probability entries (already chosen, or scaled to zero) are never returned.
/// Rounding can leave the draw just past the last cumulative value; the last
/// positive entry is returned in that case.
fn draw_weighted(chances: &[f64], remaining: f64, rng: &mut dyn RngCore) -> Option<usize> {
    let x = rng.random::<f64>() * remaining.max(0.0);
    let mut sum = 0.0;
    let mut last = None;
    for (index, &chance) in chances.iter().enumerate() {
        if chance <= 0.0 {
            continue;
        }
        sum += chance;
        last = Some(index);
        if x < sum {
            return last;
        }
    }
    last
}

fn draw_uniform(chosen: &[bool], rng: &mut dyn RngCore) -> usize {
    let open = chosen.iter().filter(|&&c| !c).count();
    let nth = rng.random_range(0..open);
    chosen
        .iter()
        .enumerate()
        .filter(|&(_, &c)| !c)
        .nth(nth)
        .map(|(index, _)| index)
        .expect("nth < number of unchosen candidates")
}

/// Selection strategy named in configuration files and on the command line.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    #[default]
    Truncation,
    Proportionate,
}

impl SelectionKind {
    /// Builds the strategy; `scale` is only used by proportionate selection.
    #[must_use]
    pub fn build(self, scale: f64) -> Box<dyn Selection> {
        match self {
            SelectionKind::Truncation => Box::new(Truncation),
            SelectionKind::Proportionate => Box::new(Proportionate::new(scale)),
        }
    }
}

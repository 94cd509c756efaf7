use std::{iter, sync::Arc};

use crate::{Gene, Model, TopologyMismatchError};

/// A single member of the population.
///
/// A candidate owns a model instance and the gene values evolved for it. The tag
/// sequence is shared with every other candidate of the population, so index `i`
/// refers to the same structural slot everywhere.
///
/// Fitness is `None` until the driver calls [`Candidate::score`], and goes back to
/// `None` whenever an operator changes the gene values.
#[derive(Debug)]
pub struct Candidate<M>
where
    M: Model,
{
    model: M,
    tags: Arc<[M::Tag]>,
    values: Vec<f64>,
    fitness: Option<f64>,
}

impl<M> Candidate<M>
where
    M: Model,
{
    /// Creates a candidate from a freshly built model, taking its initial parameters
    /// as gene values.
    ///
    /// Fails if the model's gene tags differ from the shared sequence.
    pub fn from_model(model: M, tags: Arc<[M::Tag]>) -> Result<Self, TopologyMismatchError> {
        let genes = model.genes();
        check_tags(&tags, genes.iter().map(|gene| &gene.tag))?;
        let values = genes.into_iter().map(|gene| gene.value).collect();
        Ok(Self {
            model,
            tags,
            values,
            fitness: None,
        })
    }

    /// Creates a candidate from a freshly built model and explicit gene values.
    ///
    /// The model's own initial parameters are discarded; they are overwritten on the
    /// next [`Candidate::commit`].
    pub fn with_values(
        model: M,
        tags: Arc<[M::Tag]>,
        values: Vec<f64>,
    ) -> Result<Self, TopologyMismatchError> {
        let mut candidate = Self::from_model(model, tags)?;
        if values.len() != candidate.values.len() {
            return Err(TopologyMismatchError {
                expected: candidate.values.len(),
                found: values.len(),
                first_mismatch: values.len().min(candidate.values.len()),
            });
        }
        candidate.values = values;
        Ok(candidate)
    }

    /// Returns the bound model instance.
    ///
    /// The model reflects the gene values as of the last [`Candidate::commit`].
    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    #[must_use]
    pub fn gene_count(&self) -> usize {
        self.values.len()
    }

    /// Returns the genes as tag/value pairs.
    pub fn genes(&self) -> impl Iterator<Item = Gene<&M::Tag>> {
        iter::zip(self.tags.iter(), &self.values).map(|(tag, &value)| Gene::new(tag, value))
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the assigned fitness, or `None` if the candidate is unscored.
    #[must_use]
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    #[must_use]
    pub fn is_scored(&self) -> bool {
        self.fitness.is_some()
    }

    /// Assigns a fitness score and marks the candidate as scored.
    pub fn score(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    pub fn invalidate_score(&mut self) {
        self.fitness = None;
    }

    /// Pushes the current gene values into the bound model.
    pub fn commit(&mut self) {
        self.model.apply_genes(&self.tags, &self.values);
    }

    /// Runs an in-place operator over the gene values.
    ///
    /// `f` returns the number of edits it made; any edit clears the score.
    pub(crate) fn edit_values<F>(&mut self, f: F) -> usize
    where
        F: FnOnce(&mut [f64]) -> usize,
    {
        let edits = f(&mut self.values);
        if edits > 0 {
            self.invalidate_score();
        }
        edits
    }
}

fn check_tags<'a, T, I>(expected: &[T], found: I) -> Result<(), TopologyMismatchError>
where
    T: PartialEq + 'a,
    I: ExactSizeIterator<Item = &'a T>,
{
    let found_len = found.len();
    let first_mismatch = iter::zip(expected, found).position(|(e, f)| e != f);
    match first_mismatch {
        None if found_len == expected.len() => Ok(()),
        _ => Err(TopologyMismatchError {
            expected: expected.len(),
            found: found_len,
            first_mismatch: first_mismatch.unwrap_or(found_len.min(expected.len())),
        }),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;
    use crate::{
        ModelBuilder as _,
        test_model::{VecModel, VecModelBuilder},
    };

    fn tags(n: usize) -> Arc<[usize]> {
        (0..n).collect()
    }

    #[test]
    fn test_from_model_takes_initial_values() {
        let model = VecModel::new(vec![0.5, -1.0, 2.0]);
        let candidate = Candidate::from_model(model, tags(3)).unwrap();
        assert_eq!(candidate.values(), &[0.5, -1.0, 2.0]);
        assert_eq!(candidate.gene_count(), 3);
        assert!(!candidate.is_scored());
        assert_eq!(candidate.fitness(), None);

        let genes = candidate.genes().collect::<Vec<_>>();
        assert_eq!(genes[1], Gene::new(&1, -1.0));
    }

    #[test]
    fn test_from_model_rejects_mismatched_tags() {
        let model = VecModel::new(vec![0.0; 2]);
        let err = Candidate::from_model(model, tags(3)).unwrap_err();
        assert_eq!(
            err,
            TopologyMismatchError {
                expected: 3,
                found: 2,
                first_mismatch: 2,
            }
        );

        let shifted: Arc<[usize]> = vec![0, 2, 1].into();
        let err = Candidate::from_model(VecModel::new(vec![0.0; 3]), shifted).unwrap_err();
        assert_eq!(err.first_mismatch, 1);
    }

    #[test]
    fn test_with_values_rejects_wrong_length() {
        let err =
            Candidate::with_values(VecModel::new(vec![0.0; 3]), tags(3), vec![1.0; 4]).unwrap_err();
        assert_eq!(err.expected, 3);
        assert_eq!(err.found, 4);
    }

    #[test]
    fn test_score_and_edit() {
        let mut rng = Pcg64::seed_from_u64(1);
        let model = VecModelBuilder::new(4).build(&mut rng);
        let mut candidate = Candidate::from_model(model, tags(4)).unwrap();

        candidate.score(0.75);
        assert_eq!(candidate.fitness(), Some(0.75));

        // a no-op edit keeps the score
        assert_eq!(candidate.edit_values(|_| 0), 0);
        assert!(candidate.is_scored());

        candidate.edit_values(|values| {
            values[0] += 1.0;
            1
        });
        assert!(!candidate.is_scored());
    }

    #[test]
    fn test_commit_pushes_values_into_model() {
        let mut candidate =
            Candidate::with_values(VecModel::new(vec![0.0; 3]), tags(3), vec![1.0, 2.0, 3.0])
                .unwrap();
        assert_eq!(candidate.model().values, vec![0.0; 3]);

        candidate.commit();
        assert_eq!(candidate.model().values, vec![1.0, 2.0, 3.0]);
        assert_eq!(candidate.model().commits, 1);
    }
}

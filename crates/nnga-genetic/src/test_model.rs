use rand::Rng;

use crate::{Gene, Model, ModelBuilder};

/// Minimal model: a plain vector whose tags are gene indices.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct VecModel {
    pub(crate) values: Vec<f64>,
    pub(crate) commits: usize,
}

impl VecModel {
    pub(crate) fn new(values: Vec<f64>) -> Self {
        Self { values, commits: 0 }
    }
}

impl Model for VecModel {
    type Tag = usize;

    fn genes(&self) -> Vec<Gene<usize>> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &value)| Gene::new(i, value))
            .collect()
    }

    fn apply_genes(&mut self, tags: &[usize], values: &[f64]) {
        for (&tag, &value) in tags.iter().zip(values) {
            self.values[tag] = value;
        }
        self.commits += 1;
    }
}

#[derive(Debug, Clone)]
pub(crate) struct VecModelBuilder {
    gene_count: usize,
    built_gene_count: usize,
}

impl VecModelBuilder {
    pub(crate) fn new(gene_count: usize) -> Self {
        Self {
            gene_count,
            built_gene_count: gene_count,
        }
    }

    /// A builder whose models disagree with the advertised topology.
    pub(crate) fn inconsistent(gene_count: usize, built_gene_count: usize) -> Self {
        Self {
            gene_count,
            built_gene_count,
        }
    }
}

impl ModelBuilder for VecModelBuilder {
    type Model = VecModel;

    fn gene_tags(&self) -> Vec<usize> {
        (0..self.gene_count).collect()
    }

    fn build<R>(&self, rng: &mut R) -> VecModel
    where
        R: Rng + ?Sized,
    {
        VecModel::new(
            (0..self.built_gene_count)
                .map(|_| rng.random_range(-1.0..1.0))
                .collect(),
        )
    }
}

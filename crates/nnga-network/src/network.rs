use std::sync::Arc;

use nnga_genetic::{Gene, Model, ModelBuilder};
use rand::Rng;

use crate::{
    NetworkConfigError, WeightShapeError,
    config::{NetworkConfig, WeightSampler},
};

/// Weights nested as `[layer][neuron][input]`, bias weight last.
pub type Weights = Vec<Vec<Vec<f64>>>;

/// Location of one weight inside a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeightTag {
    pub layer: usize,
    pub neuron: usize,
    pub input: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    config: Arc<NetworkConfig>,
    weights: Weights,
}

impl Network {
    #[must_use]
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    #[must_use]
    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Replaces every weight at once.
    ///
    /// The network is left untouched if `weights` does not match its topology.
    pub fn apply_weights(&mut self, weights: Weights) -> Result<(), WeightShapeError> {
        check_shape(&self.config, &weights)?;
        self.weights = weights;
        Ok(())
    }

    /// Runs a forward pass.
    ///
    /// # Panics
    ///
    /// Panics if `input` does not have `config().inputs` values.
    #[must_use]
    pub fn predict(&self, input: &[f64]) -> Vec<f64> {
        assert_eq!(
            input.len(),
            self.config.inputs,
            "network expects {} inputs",
            self.config.inputs
        );
        let last = self.weights.len() - 1;
        let mut signal = input.to_vec();
        for (layer, neurons) in self.weights.iter().enumerate() {
            let mut next = neurons
                .iter()
                .map(|weights| weighted_sum(weights, &signal, self.config.bias))
                .collect::<Vec<_>>();
            if layer == last {
                self.config.mode.apply(&mut next);
            } else {
                for x in &mut next {
                    *x = self.config.activation.apply(*x);
                }
            }
            signal = next;
        }
        signal
    }
}

fn weighted_sum(weights: &[f64], inputs: &[f64], bias: bool) -> f64 {
    let sum = weights.iter().zip(inputs).map(|(w, x)| w * x).sum::<f64>();
    if bias { sum + weights[inputs.len()] } else { sum }
}

fn check_shape(config: &NetworkConfig, weights: &Weights) -> Result<(), WeightShapeError> {
    let expected = config.shape();
    let found = weights
        .iter()
        .map(|neurons| neurons.iter().map(Vec::len).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    if expected == found {
        Ok(())
    } else {
        Err(WeightShapeError { expected, found })
    }
}

impl Model for Network {
    type Tag = WeightTag;

    fn genes(&self) -> Vec<Gene<WeightTag>> {
        let mut genes = Vec::with_capacity(self.config.weight_count());
        for (layer, neurons) in self.weights.iter().enumerate() {
            for (neuron, weights) in neurons.iter().enumerate() {
                for (input, &value) in weights.iter().enumerate() {
                    genes.push(Gene::new(
                        WeightTag {
                            layer,
                            neuron,
                            input,
                        },
                        value,
                    ));
                }
            }
        }
        genes
    }

    fn apply_genes(&mut self, tags: &[WeightTag], values: &[f64]) {
        for (tag, &value) in tags.iter().zip(values) {
            self.weights[tag.layer][tag.neuron][tag.input] = value;
        }
    }
}

/// Builds networks of one validated topology with freshly sampled weights.
#[derive(Debug, Clone)]
pub struct NetworkBuilder {
    config: Arc<NetworkConfig>,
    sampler: WeightSampler,
}

impl NetworkBuilder {
    pub fn new(config: NetworkConfig) -> Result<Self, NetworkConfigError> {
        config.validate()?;
        let sampler = WeightSampler::new(config.weight_init)?;
        Ok(Self {
            config: Arc::new(config),
            sampler,
        })
    }

    #[must_use]
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn build_network<R>(&self, rng: &mut R) -> Network
    where
        R: Rng + ?Sized,
    {
        let weights = self
            .config
            .shape()
            .into_iter()
            .map(|neurons| {
                neurons
                    .into_iter()
                    .map(|fan_in| (0..fan_in).map(|_| self.sampler.sample(rng)).collect())
                    .collect()
            })
            .collect();
        Network {
            config: Arc::clone(&self.config),
            weights,
        }
    }

    /// Restores a network from saved weights.
    pub fn with_weights(&self, weights: Weights) -> Result<Network, WeightShapeError> {
        check_shape(&self.config, &weights)?;
        Ok(Network {
            config: Arc::clone(&self.config),
            weights,
        })
    }
}

impl ModelBuilder for NetworkBuilder {
    type Model = Network;

    fn gene_tags(&self) -> Vec<WeightTag> {
        let mut tags = Vec::with_capacity(self.config.weight_count());
        for (layer, neurons) in self.config.shape().into_iter().enumerate() {
            for (neuron, fan_in) in neurons.into_iter().enumerate() {
                tags.extend((0..fan_in).map(|input| WeightTag {
                    layer,
                    neuron,
                    input,
                }));
            }
        }
        tags
    }

    fn build<R>(&self, rng: &mut R) -> Network
    where
        R: Rng + ?Sized,
    {
        self.build_network(rng)
    }
}

//! Network topology and weight initialization settings.
//!
//! [`NetworkConfig`] is loaded from JSON and checked with [`NetworkConfig::validate`]
//! before any network is built.

use rand::Rng;
use rand_distr::{Distribution as _, Normal, Uniform};
use serde::{Deserialize, Serialize};

use crate::{
    NetworkConfigError,
    activation::{Activation, Mode},
};

/// Topology and behaviour of a feed-forward network.
///
/// `layout` lists the neuron count of each layer after the input; the last entry is
/// the output layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub inputs: usize,
    pub layout: Vec<usize>,
    #[serde(default)]
    pub activation: Activation,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default = "default_bias")]
    pub bias: bool,
    #[serde(default)]
    pub weight_init: WeightInit,
}

fn default_bias() -> bool {
    true
}

impl Default for NetworkConfig {
    /// Two inputs, layout `[2, 2, 1]`, sigmoid hidden layers, binary output.
    fn default() -> Self {
        Self {
            inputs: 2,
            layout: vec![2, 2, 1],
            activation: Activation::Sigmoid,
            mode: Mode::Binary,
            bias: true,
            weight_init: WeightInit::default(),
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<(), NetworkConfigError> {
        if self.inputs == 0 {
            return Err(NetworkConfigError::NoInputs);
        }
        if self.layout.is_empty() {
            return Err(NetworkConfigError::EmptyLayout);
        }
        if let Some(layer) = self.layout.iter().position(|&n| n == 0) {
            return Err(NetworkConfigError::EmptyLayer { layer });
        }
        WeightSampler::new(self.weight_init)?;
        Ok(())
    }

    #[must_use]
    pub fn outputs(&self) -> usize {
        self.layout.last().copied().unwrap_or(0)
    }

    /// Number of weights each neuron of `layer` holds, bias included.
    #[must_use]
    pub fn fan_in(&self, layer: usize) -> usize {
        let inputs = if layer == 0 {
            self.inputs
        } else {
            self.layout[layer - 1]
        };
        inputs + usize::from(self.bias)
    }

    /// Expected `[layer][neuron] -> weight count` nesting.
    #[must_use]
    pub fn shape(&self) -> Vec<Vec<usize>> {
        self.layout
            .iter()
            .enumerate()
            .map(|(layer, &neurons)| vec![self.fan_in(layer); neurons])
            .collect()
    }

    #[must_use]
    pub fn weight_count(&self) -> usize {
        self.layout
            .iter()
            .enumerate()
            .map(|(layer, &neurons)| self.fan_in(layer) * neurons)
            .sum()
    }
}

/// Distribution initial weights are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeightInit {
    Normal { mean: f64, std_dev: f64 },
    Uniform { low: f64, high: f64 },
}

impl Default for WeightInit {
    fn default() -> Self {
        WeightInit::Normal {
            mean: 0.0,
            std_dev: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum WeightSampler {
    Normal(Normal<f64>),
    Uniform(Uniform<f64>),
}

impl WeightSampler {
    pub(crate) fn new(init: WeightInit) -> Result<Self, NetworkConfigError> {
        let sampler = match init {
            // rand_distr accepts a negative std_dev and samples with its magnitude
            WeightInit::Normal { mean, std_dev }
                if mean.is_finite() && std_dev.is_finite() && std_dev >= 0.0 =>
            {
                Normal::new(mean, std_dev).ok().map(WeightSampler::Normal)
            }
            WeightInit::Normal { .. } => None,
            WeightInit::Uniform { low, high } if low.is_finite() && high.is_finite() => {
                Uniform::new(low, high).ok().map(WeightSampler::Uniform)
            }
            WeightInit::Uniform { .. } => None,
        };
        sampler.ok_or(NetworkConfigError::InvalidWeightInit { init })
    }

    pub(crate) fn sample<R>(&self, rng: &mut R) -> f64
    where
        R: Rng + ?Sized,
    {
        match self {
            WeightSampler::Normal(normal) => normal.sample(rng),
            WeightSampler::Uniform(uniform) => uniform.sample(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_count() {
        assert_eq!(NetworkConfig::default().weight_count(), 15);

        let config = NetworkConfig {
            inputs: 1,
            layout: vec![1, 1, 1],
            ..NetworkConfig::default()
        };
        assert_eq!(config.weight_count(), 6);

        let config = NetworkConfig {
            inputs: 3,
            layout: vec![4, 2],
            bias: false,
            ..NetworkConfig::default()
        };
        assert_eq!(config.weight_count(), 3 * 4 + 4 * 2);
        assert_eq!(config.shape(), [vec![3; 4], vec![4; 2]]);
        assert_eq!(config.outputs(), 2);
    }

    #[test]
    fn test_validate() {
        assert!(NetworkConfig::default().validate().is_ok());

        let config = NetworkConfig {
            inputs: 0,
            ..NetworkConfig::default()
        };
        assert_eq!(config.validate(), Err(NetworkConfigError::NoInputs));

        let config = NetworkConfig {
            layout: vec![],
            ..NetworkConfig::default()
        };
        assert_eq!(config.validate(), Err(NetworkConfigError::EmptyLayout));

        let config = NetworkConfig {
            layout: vec![3, 0, 1],
            ..NetworkConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(NetworkConfigError::EmptyLayer { layer: 1 })
        );
    }

    #[test]
    fn test_validate_weight_init() {
        for init in [
            WeightInit::Normal {
                mean: 0.0,
                std_dev: -1.0,
            },
            WeightInit::Normal {
                mean: f64::INFINITY,
                std_dev: 1.0,
            },
            WeightInit::Uniform {
                low: 1.0,
                high: 1.0,
            },
            WeightInit::Uniform {
                low: 0.0,
                high: f64::INFINITY,
            },
        ] {
            let config = NetworkConfig {
                weight_init: init,
                ..NetworkConfig::default()
            };
            assert_eq!(
                config.validate(),
                Err(NetworkConfigError::InvalidWeightInit { init })
            );
        }
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: NetworkConfig =
            serde_json::from_str(r#"{ "inputs": 4, "layout": [8, 3] }"#).unwrap();
        assert_eq!(config.inputs, 4);
        assert_eq!(config.layout, [8, 3]);
        assert!(config.bias);
        assert_eq!(config.mode, Mode::Binary);
        assert_eq!(config.weight_init, WeightInit::default());

        let init: WeightInit =
            serde_json::from_str(r#"{ "kind": "uniform", "low": -0.5, "high": 0.5 }"#).unwrap();
        assert_eq!(
            init,
            WeightInit::Uniform {
                low: -0.5,
                high: 0.5
            }
        );
    }
}

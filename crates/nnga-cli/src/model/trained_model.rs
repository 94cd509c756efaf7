use chrono::{DateTime, Utc};
use nnga_genetic::Coefficients;
use nnga_network::{Network, NetworkBuilder, NetworkConfig, Weights};
use serde::{Deserialize, Serialize};

/// Best network of a training run, as written by `nnga train`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TrainedModel {
    pub trained_at: DateTime<Utc>,
    pub generations: usize,
    pub converged: bool,
    pub final_fitness: f64,
    pub final_error: f64,
    pub seed: u64,
    pub coefficients: Coefficients,
    pub network: NetworkConfig,
    pub weights: Weights,
}

impl TrainedModel {
    /// Rebuilds the network, checking the saved weights against the topology.
    pub fn to_network(&self) -> anyhow::Result<Network> {
        let builder = NetworkBuilder::new(self.network.clone())?;
        Ok(builder.with_weights(self.weights.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;

    // weights with short exact decimal forms, so JSON keeps them bit for bit
    fn dyadic_network() -> Network {
        let config = NetworkConfig::default();
        let builder = NetworkBuilder::new(config.clone()).unwrap();
        let mut next = 1.0;
        let weights = config
            .shape()
            .into_iter()
            .map(|neurons| {
                neurons
                    .into_iter()
                    .map(|fan_in| {
                        (0..fan_in)
                            .map(|_| {
                                next -= 0.375;
                                next
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect();
        builder.with_weights(weights).unwrap()
    }

    #[test]
    fn test_json_restores_same_predictions() {
        let network = dyadic_network();
        let model = TrainedModel {
            trained_at: Utc::now(),
            generations: 12,
            converged: true,
            final_fitness: 0.99,
            final_error: 0.01,
            seed: 0,
            coefficients: Coefficients::default(),
            network: network.config().clone(),
            weights: network.weights().clone(),
        };

        let json = serde_json::to_string(&model).unwrap();
        let restored: TrainedModel = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, model);

        let restored = restored.to_network().unwrap();
        for input in [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]] {
            assert_eq!(restored.predict(&input), network.predict(&input));
        }
    }

    #[test]
    fn test_rejects_truncated_weights() {
        let builder = NetworkBuilder::new(NetworkConfig::default()).unwrap();
        let network = builder.build_network(&mut Pcg64::seed_from_u64(1));
        let mut weights = network.weights().clone();
        weights.pop();
        let model = TrainedModel {
            trained_at: Utc::now(),
            generations: 0,
            converged: false,
            final_fitness: 0.0,
            final_error: 1.0,
            seed: 1,
            coefficients: Coefficients::default(),
            network: network.config().clone(),
            weights,
        };
        assert!(model.to_network().is_err());
    }
}

//! Fixed-topology feed-forward networks whose weights are evolved by `nnga-genetic`.
//!
//! This crate is the model side of the genetic algorithm: it knows how to build a
//! network from a [`NetworkConfig`], run a forward pass, and expose its weights as a
//! flat sequence of tagged genes. It does not compute fitness; that is the driver's
//! job (see the `nnga` CLI).
//!
//! # Architecture
//!
//! ```text
//! NetworkConfig  (inputs, layout, activation, output mode, bias, weight init)
//!     ↓ validated into
//! NetworkBuilder ── ModelBuilder ──→ Population (nnga-genetic)
//!     ↓ builds
//! Network ── Model ──→ genes: [WeightTag { layer, neuron, input } => value]
//!     ↓
//! predict(input) → output
//! ```
//!
//! Weights are stored as `[layer][neuron][input]`; with `bias` enabled each neuron has
//! one extra trailing weight applied to a constant input of `1.0`.
//!
//! # Example
//!
//! ```
//! use nnga_network::{NetworkBuilder, NetworkConfig};
//! use rand::SeedableRng as _;
//!
//! let builder = NetworkBuilder::new(NetworkConfig::default()).unwrap();
//! let mut rng = rand_pcg::Pcg64::seed_from_u64(0);
//! let network = builder.build_network(&mut rng);
//!
//! // 2 inputs, layout [2, 2, 1], bias: (2+1)·2 + (2+1)·2 + (2+1)·1
//! assert_eq!(network.config().weight_count(), 15);
//! assert_eq!(network.predict(&[1.0, 0.0]).len(), 1);
//! ```

pub use self::{
    activation::{Activation, Mode},
    config::{NetworkConfig, WeightInit},
    network::{Network, NetworkBuilder, WeightTag, Weights},
};

pub mod activation;
pub mod config;
pub mod network;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum NetworkConfigError {
    #[display("network needs at least one input")]
    NoInputs,
    #[display("network layout must have at least one layer")]
    EmptyLayout,
    #[display("layer {layer} has no neurons")]
    EmptyLayer { layer: usize },
    #[display("invalid weight initializer {init:?}")]
    InvalidWeightInit { init: WeightInit },
}

/// Weights whose nesting does not match the network topology.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
#[display("weights have shape {found:?}, network expects {expected:?}")]
pub struct WeightShapeError {
    pub expected: Vec<Vec<usize>>,
    pub found: Vec<Vec<usize>>,
}

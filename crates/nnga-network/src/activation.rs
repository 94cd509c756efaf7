use serde::{Deserialize, Serialize};

/// Activation function of hidden layers.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Sigmoid,
    Tanh,
    Relu,
    Linear,
}

impl Activation {
    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Tanh => x.tanh(),
            Activation::Relu => x.max(0.0),
            Activation::Linear => x,
        }
    }
}

/// Output layer behaviour.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Linear outputs.
    Regression,
    /// Sigmoid outputs in `(0, 1)`.
    #[default]
    Binary,
    /// Softmax over the output layer.
    MultiClass,
    /// Independent sigmoid outputs.
    MultiLabel,
}

impl Mode {
    /// Applies the output activation to the raw sums of the last layer, in place.
    pub fn apply(self, outputs: &mut [f64]) {
        match self {
            Mode::Regression => {}
            Mode::Binary | Mode::MultiLabel => {
                for x in outputs {
                    *x = Activation::Sigmoid.apply(*x);
                }
            }
            Mode::MultiClass => softmax(outputs),
        }
    }
}

fn softmax(outputs: &mut [f64]) {
    let max = outputs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut sum = 0.0;
    for x in outputs.iter_mut() {
        *x = (*x - max).exp();
        sum += *x;
    }
    for x in outputs {
        *x /= sum;
    }
}

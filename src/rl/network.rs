//! Q-network mapping encoded states to one value per action
//!
//! # Architecture
//!
//! ```text
//! Input: [batch, 9]
//!   ↓ Linear(9 → 128) + activation
//!   ↓ Linear(128 → 256) + activation
//!   ↓ Linear(256 → 4) → Action values
//! ```
//!
//! The hidden widths and the activation are configurable. The activation is
//! picked once, when the network is built; `Activation::Identity` leaves the
//! layers stacked without any non-linearity.
//!
//! # Example
//!
//! ```rust
//! use grid_snake::rl::DqnConfig;
//! use burn::backend::ndarray::NdArrayDevice;
//! use burn::backend::NdArray;
//! use burn::tensor::Tensor;
//!
//! type Backend = NdArray<f32>;
//!
//! let device = NdArrayDevice::default();
//! let network = DqnConfig::default().init::<Backend>(&device);
//!
//! let observation = Tensor::zeros([8, 9], &device);
//! let q_values = network.forward(observation);
//!
//! assert_eq!(q_values.dims(), [8, 4]);
//! ```

use burn::{
    module::Module,
    nn::{Linear, LinearConfig, Relu},
    tensor::{Tensor, backend::Backend},
};
use serde::{Deserialize, Serialize};

use super::observation::OBSERVATION_SIZE;
use crate::game::NUM_ACTIONS;

/// Non-linearity placed between consecutive linear layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Activation {
    #[default]
    Relu,
    /// No activation: the network is a stack of affine maps
    Identity,
}

/// Configuration for the Q-network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqnConfig {
    /// Length of the input feature vector (default: 9)
    pub input_size: usize,

    /// Number of action values produced (default: 4)
    pub output_size: usize,

    /// Width of each hidden layer, in order (default: [128, 256])
    pub hidden_layers: Vec<usize>,

    /// Activation between layers (default: ReLU)
    pub activation: Activation,
}

impl DqnConfig {
    /// Create a configuration with the default hidden layers and ReLU
    pub fn new(input_size: usize, output_size: usize) -> Self {
        Self {
            input_size,
            output_size,
            hidden_layers: vec![128, 256],
            activation: Activation::Relu,
        }
    }

    pub fn with_hidden_layers(mut self, hidden_layers: Vec<usize>) -> Self {
        self.hidden_layers = hidden_layers;
        self
    }

    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    /// Validate layer sizes
    ///
    /// # Returns
    ///
    /// `Ok(())` if all sizes are usable, `Err(String)` with an error message otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if self.input_size == 0 {
            return Err("input_size must be at least 1".to_string());
        }

        if self.output_size == 0 {
            return Err("output_size must be at least 1".to_string());
        }

        if let Some(position) = self.hidden_layers.iter().position(|&width| width == 0) {
            return Err(format!("hidden layer {} has zero width", position));
        }

        Ok(())
    }

    /// Check that the network reads snake observations and scores snake actions
    pub fn validate_for_environment(&self) -> Result<(), String> {
        self.validate()?;

        if self.input_size != OBSERVATION_SIZE {
            return Err(format!(
                "input_size is {}, observations have {} features",
                self.input_size, OBSERVATION_SIZE
            ));
        }

        if self.output_size != NUM_ACTIONS {
            return Err(format!(
                "output_size is {}, the action space has {} actions",
                self.output_size, NUM_ACTIONS
            ));
        }

        Ok(())
    }

    /// Initialize the Q-network from this configuration
    pub fn init<B: Backend>(&self, device: &B::Device) -> Dqn<B> {
        let sizes: Vec<usize> = std::iter::once(self.input_size)
            .chain(self.hidden_layers.iter().copied())
            .chain(std::iter::once(self.output_size))
            .collect();

        let layers = sizes
            .windows(2)
            .map(|pair| LinearConfig::new(pair[0], pair[1]).init(device))
            .collect();

        let activation = match self.activation {
            Activation::Relu => Some(Relu::new()),
            Activation::Identity => None,
        };

        Dqn { layers, activation }
    }
}

impl Default for DqnConfig {
    fn default() -> Self {
        Self::new(OBSERVATION_SIZE, NUM_ACTIONS)
    }
}

/// Multilayer perceptron estimating the value of each action
#[derive(Module, Debug)]
pub struct Dqn<B: Backend> {
    /// Linear layers from input to output
    layers: Vec<Linear<B>>,
    /// Activation applied after every layer but the last
    activation: Option<Relu>,
}

impl<B: Backend> Dqn<B> {
    /// Forward pass
    ///
    /// Input `[batch, input_size]`, output `[batch, output_size]`.
    pub fn forward(&self, observation: Tensor<B, 2>) -> Tensor<B, 2> {
        let last = self.layers.len().saturating_sub(1);
        let mut x = observation;

        for (index, layer) in self.layers.iter().enumerate() {
            x = layer.forward(x);

            if index < last {
                if let Some(activation) = &self.activation {
                    x = activation.forward(x);
                }
            }
        }

        x
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn has_activation(&self) -> bool {
        self.activation.is_some()
    }
}

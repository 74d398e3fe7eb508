//! Action selection strategies that drive the environment

use burn::tensor::{ElementConversion, backend::Backend};
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::network::Dqn;
use super::observation::{Observation, observations_to_tensor};
use crate::game::NUM_ACTIONS;

/// Chooses an action index for an encoded state
pub trait Policy {
    fn select_action(&mut self, observation: &Observation) -> usize;

    /// Short label shown in the UI and logs
    fn name(&self) -> &'static str;
}

/// Uniformly random actions
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl Policy for RandomPolicy {
    fn select_action(&mut self, _observation: &Observation) -> usize {
        self.rng.gen_range(0..NUM_ACTIONS)
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Picks the action with the highest Q-value
pub struct GreedyPolicy<B: Backend> {
    network: Dqn<B>,
    device: B::Device,
}

impl<B: Backend> GreedyPolicy<B> {
    pub fn new(network: Dqn<B>, device: B::Device) -> Self {
        Self { network, device }
    }

    pub fn network(&self) -> &Dqn<B> {
        &self.network
    }
}

impl<B: Backend> Policy for GreedyPolicy<B> {
    fn select_action(&mut self, observation: &Observation) -> usize {
        let input = observations_to_tensor::<B>(std::slice::from_ref(observation), &self.device);
        let q_values = self.network.forward(input);

        // Ties resolve to the lowest index
        q_values.argmax(1).into_scalar().elem::<i64>() as usize
    }

    fn name(&self) -> &'static str {
        "dqn"
    }
}

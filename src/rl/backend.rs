//! Backend type alias and device management
//!
//! The Q-network is small enough that the CPU NdArray backend covers both
//! interactive play and headless rollouts.

use burn::backend::ndarray::{NdArray, NdArrayDevice};

/// Backend used to run the Q-network
pub type InferenceBackend = NdArray<f32>;

/// Get the default device for computation
pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::default()
}

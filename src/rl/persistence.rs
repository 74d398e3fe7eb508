//! Saving and loading Q-network weights
//!
//! A saved network is split over two files:
//! - `<path>.mpk` - weights, written by Burn's named MessagePack recorder
//! - `<path>.meta.json` - the `DqnConfig` needed to rebuild the network

use anyhow::{Context, Result};
use burn::{
    module::Module,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
    tensor::backend::Backend,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::network::{Dqn, DqnConfig};

/// Metadata saved with the weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetadata {
    /// Architecture used to build the network
    pub dqn_config: DqnConfig,

    /// Crate version that wrote the file
    pub version: String,
}

impl NetworkMetadata {
    pub fn new(dqn_config: DqnConfig) -> Self {
        Self {
            dqn_config,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Save network weights and metadata
///
/// Creates parent directories if they don't exist.
pub fn save_network<B: Backend>(network: &Dqn<B>, config: &DqnConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let record = network.clone().into_record();
    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    recorder
        .record(record, path.to_path_buf())
        .context("Failed to save network weights")?;

    let metadata = NetworkMetadata::new(config.clone());
    let meta_path = path.with_extension("meta.json");
    let meta_json =
        serde_json::to_string_pretty(&metadata).context("Failed to serialize metadata")?;
    std::fs::write(&meta_path, meta_json)
        .with_context(|| format!("Failed to write metadata to {:?}", meta_path))?;

    info!("saved network to {:?}", path);
    Ok(())
}

/// Load a network saved with [`save_network`]
pub fn load_network<B: Backend>(
    path: &Path,
    device: &B::Device,
) -> Result<(Dqn<B>, NetworkMetadata)> {
    let meta_path = path.with_extension("meta.json");
    let meta_json = std::fs::read_to_string(&meta_path)
        .with_context(|| format!("Failed to read metadata from {:?}", meta_path))?;
    let metadata: NetworkMetadata =
        serde_json::from_str(&meta_json).context("Failed to deserialize metadata")?;

    metadata
        .dqn_config
        .validate_for_environment()
        .map_err(anyhow::Error::msg)
        .with_context(|| {
            format!(
                "Saved network at {:?} does not fit the snake environment",
                path
            )
        })?;

    let network = metadata.dqn_config.init::<B>(device);

    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    let record = recorder
        .load(path.to_path_buf(), device)
        .with_context(|| format!("Failed to load network weights from {:?}", path))?;

    let network = network.load_record(record);

    info!(
        "loaded network from {:?} (hidden layers {:?}, {:?})",
        path, metadata.dqn_config.hidden_layers, metadata.dqn_config.activation
    );

    Ok((network, metadata))
}

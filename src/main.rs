use anyhow::{Context, Result};
use burn::tensor::backend::Backend;
use clap::{Parser, ValueEnum};
use grid_snake::game::GameConfig;
use grid_snake::modes::{AgentMode, HumanMode, RolloutMode};
use grid_snake::rl::{
    Activation, DqnConfig, GreedyPolicy, InferenceBackend, Policy, RandomPolicy, default_device,
    load_network, save_network,
};
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Grid Snake environment for RL experiments")]
struct Cli {
    /// What drives the snake
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// JSON game configuration; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board width in board units
    #[arg(long)]
    width: Option<i32>,

    /// Board height in board units
    #[arg(long)]
    height: Option<i32>,

    /// Size of one grid cell
    #[arg(long)]
    cell_size: Option<i32>,

    /// Seed for fruit placement, random policy and network initialisation
    #[arg(long)]
    seed: Option<u64>,

    /// Policy used by the agent and rollout modes
    #[arg(long, default_value = "dqn")]
    policy: PolicyKind,

    /// Saved Q-network to load (path without extension)
    #[arg(long)]
    weights: Option<PathBuf>,

    /// Save the Q-network in use to this path
    #[arg(long)]
    export_weights: Option<PathBuf>,

    /// Hidden layer widths of a freshly built Q-network
    #[arg(long, value_delimiter = ',', default_value = "128,256")]
    hidden_layers: Vec<usize>,

    /// Activation of a freshly built Q-network
    #[arg(long, default_value = "relu")]
    activation: ActivationArg,

    /// Number of episodes (rollout mode; agent mode quits after this many when set)
    #[arg(long)]
    episodes: Option<usize>,

    /// Step limit per episode for agent-driven modes
    #[arg(long, default_value = "1000")]
    max_steps: u32,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
    /// Watch a policy play
    Agent,
    /// Evaluate a policy without rendering
    Rollout,
}

#[derive(Clone, ValueEnum)]
enum PolicyKind {
    /// Greedy actions from a Q-network
    Dqn,
    /// Uniformly random actions
    Random,
}

#[derive(Clone, ValueEnum)]
enum ActivationArg {
    Relu,
    Identity,
}

impl From<ActivationArg> for Activation {
    fn from(arg: ActivationArg) -> Self {
        match arg {
            ActivationArg::Relu => Activation::Relu,
            ActivationArg::Identity => Activation::Identity,
        }
    }
}

fn game_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };

    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }
    if let Some(cell_size) = cli.cell_size {
        config.cell_size = cell_size;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    config.validate()?;
    Ok(config)
}

fn build_policy(cli: &Cli) -> Result<Box<dyn Policy>> {
    match cli.policy {
        PolicyKind::Random => Ok(Box::new(RandomPolicy::new(cli.seed))),
        PolicyKind::Dqn => {
            let device = default_device();
            if let Some(seed) = cli.seed {
                InferenceBackend::seed(seed);
            }

            let (network, dqn_config) = match &cli.weights {
                Some(path) => {
                    let (network, metadata) = load_network::<InferenceBackend>(path, &device)
                        .with_context(|| format!("Failed to load model from {:?}", path))?;
                    (network, metadata.dqn_config)
                }
                None => {
                    let dqn_config = DqnConfig::default()
                        .with_hidden_layers(cli.hidden_layers.clone())
                        .with_activation(cli.activation.clone().into());
                    dqn_config.validate().map_err(anyhow::Error::msg)?;
                    warn!("no --weights given, the Q-network is untrained");
                    (dqn_config.init::<InferenceBackend>(&device), dqn_config)
                }
            };

            if let Some(path) = &cli.export_weights {
                save_network(&network, &dqn_config, path)?;
            }

            Ok(Box::new(GreedyPolicy::new(network, device)))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = game_config(&cli)?;
    info!("game config: {:?}", config);

    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(config)?;
            human_mode.run().await?;
        }
        Mode::Agent => {
            let policy = build_policy(&cli)?;
            let mut agent_mode = AgentMode::new(config, policy, cli.episodes, cli.max_steps)?;
            agent_mode.run().await?;
        }
        Mode::Rollout => {
            let policy = build_policy(&cli)?;
            let episodes = cli.episodes.unwrap_or(100);
            let mut rollout_mode = RolloutMode::new(config, policy, episodes, cli.max_steps)?;
            let summary = rollout_mode.run()?;

            println!("{}", "=".repeat(60));
            println!("Rollout Summary ({} policy)", rollout_mode.policy_name());
            println!("{}", "=".repeat(60));
            println!("Episodes:       {}", summary.episodes);
            println!("High score:     {}", summary.high_score);
            println!("Mean score:     {:.2}", summary.mean_score);
            println!("Mean steps:     {:.2}", summary.mean_steps);
            println!("Total reward:   {:.1}", summary.total_reward);
            println!("Truncated:      {}", summary.truncated);
            println!("{}", "=".repeat(60));
        }
    }

    Ok(())
}

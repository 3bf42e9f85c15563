//! Train a CVaR Q-learner on the cliff-walking grid world and emit the
//! learned value/policy grids as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cvarq::{CliffWorld, CvarQLearner, ExplorationStrategy, RunConfig};

#[derive(Debug, Parser)]
#[command(name = "train", about = "Tabular CVaR Q-learning trainer")]
struct Args {
    /// TOML config file; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of episodes to run
    #[arg(long)]
    episodes: Option<usize>,

    /// Risk level the policy optimizes for
    #[arg(long)]
    alpha: Option<f64>,

    /// Epsilon for epsilon-greedy exploration
    #[arg(long)]
    eps: Option<f64>,

    /// Learning rate
    #[arg(long)]
    beta: Option<f64>,

    /// Discount factor
    #[arg(long)]
    gamma: Option<f64>,

    /// Number of atoms on the risk axis
    #[arg(long)]
    atoms: Option<usize>,

    /// Spacing exponent for log-spaced atoms
    #[arg(long)]
    spacing: Option<u32>,

    /// Log-space the atoms toward the loss tail
    #[arg(long)]
    log_spacing: bool,

    /// Write the learned grids to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

/// The two arrays the visualization side consumes
#[derive(Debug, Serialize)]
struct LearnedGrids {
    /// Expected value per cell under the greedy policy
    value: Vec<Vec<f64>>,
    /// Greedy action index per cell
    policy: Vec<Vec<usize>>,
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,cvarq=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => RunConfig::default(),
    };

    if let Some(episodes) = args.episodes {
        config.training.max_episodes = episodes;
    }
    if let Some(alpha) = args.alpha {
        config.training.alpha = alpha;
    }
    if let Some(eps) = args.eps {
        config.training.exploration = ExplorationStrategy::EpsilonGreedy { eps };
    }
    if let Some(beta) = args.beta {
        config.learning.beta = beta;
    }
    if let Some(gamma) = args.gamma {
        config.learning.gamma = gamma;
    }
    if let Some(atoms) = args.atoms {
        config.atoms.nb_atoms = atoms;
    }
    if let Some(spacing) = args.spacing {
        config.atoms.spacing = spacing;
    }
    if args.log_spacing {
        config.atoms.log_spacing = true;
    }

    if let Err(errors) = config.validate() {
        anyhow::bail!("invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let args = Args::parse();
    let config = load_config(&args)?;

    let world = CliffWorld::new(config.world);
    let mut learner = CvarQLearner::new(world, &config.atoms, config.learning, config.training)?;
    learner.run()?;

    let stats = *learner.stats();
    info!(
        episodes = stats.episodes,
        steps = stats.steps,
        avg_reward = stats.avg_episode_reward,
        avg_length = stats.avg_episode_length,
        "training finished"
    );

    let table = learner.into_table();
    let grids = LearnedGrids {
        value: table.expected_value_grid(),
        policy: table.greedy_action_grid(),
    };

    let json = serde_json::to_string_pretty(&grids)?;
    match args.output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("writing grids to {}", path.display()))?;
            info!(path = %path.display(), "grids written");
        }
        None => println!("{json}"),
    }

    Ok(())
}

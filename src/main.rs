#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use robomind::simulation::agent::{HybridAgent, ProbabilisticAgent};
use robomind::simulation::episode::{run_episode, EpisodeOutcome};
use robomind::simulation::planning::{parse_algorithms, search, Algorithm};
use robomind::simulation::sensor::NoisySensor;
use robomind::{Result, RoboMindConfig};

/// Grid-world agent combining search, logic and Bayesian beliefs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Which agent (or search comparison) to run
    #[arg(short, long, value_enum, default_value_t = Mode::Hybrid)]
    mode: Mode,

    /// Grid width in cells
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Number of random obstacles
    #[arg(long)]
    obstacles: Option<usize>,

    /// Sensor accuracy in [0, 1]
    #[arg(long)]
    accuracy: Option<f64>,

    /// Seed for obstacle placement and sensor noise
    #[arg(short, long)]
    seed: Option<u64>,

    /// Step budget per episode
    #[arg(long)]
    max_steps: Option<usize>,

    /// Independent episodes to run, in parallel when more than one
    #[arg(short, long, default_value_t = 1)]
    episodes: usize,

    /// Algorithms compared in search mode
    #[arg(long, value_delimiter = ',', default_value = "bfs,ucs,astar")]
    algorithms: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Hybrid,
    Probability,
    Search,
}

impl Args {
    fn resolve_config(&self) -> Result<RoboMindConfig> {
        let mut config = match &self.config {
            Some(path) => RoboMindConfig::load(path)?,
            None => RoboMindConfig::default(),
        };
        if let Some(width) = self.width {
            config.world.width = width;
        }
        if let Some(height) = self.height {
            config.world.height = height;
        }
        if let Some(obstacles) = self.obstacles {
            config.world.obstacles = obstacles;
        }
        if let Some(accuracy) = self.accuracy {
            config.sensor.accuracy = accuracy;
        }
        if let Some(seed) = self.seed {
            config.sensor.seed = Some(seed);
        }
        if let Some(max_steps) = self.max_steps {
            config.agent.max_steps = max_steps;
        }
        config.validate()?;
        Ok(config)
    }
}

fn episode_rng(seed: Option<u64>, episode: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(episode as u64)),
        None => StdRng::from_os_rng(),
    }
}

fn run_agent(config: &RoboMindConfig, mode: Mode, episode: usize) -> Result<EpisodeOutcome> {
    let mut rng = episode_rng(config.sensor.seed, episode);
    let mut world = config.build_world(&mut rng)?;
    let sensor = NoisySensor::with_seed(config.sensor.accuracy, rng.random());
    info!(
        "Episode {episode}: {}x{} grid, {} obstacles, {} -> {}",
        world.width(),
        world.height(),
        world.obstacle_count(),
        world.start(),
        world.goal()
    );

    let outcome = match mode {
        Mode::Probability => {
            let mut agent = ProbabilisticAgent::new(&world, sensor)
                .with_risk_threshold(config.agent.risk_threshold);
            run_episode(&mut agent, &mut world, config.agent.max_steps)
        }
        Mode::Hybrid | Mode::Search => {
            let mut agent = HybridAgent::with_config(&world, sensor, config.agent.clone());
            run_episode(&mut agent, &mut world, config.agent.max_steps)
        }
    };
    Ok(outcome)
}

fn compare_search(
    config: &RoboMindConfig,
    algorithms: &[Algorithm],
    episode: usize,
) -> Result<()> {
    let mut rng = episode_rng(config.sensor.seed, episode);
    let world = config.build_world(&mut rng)?;

    for &algorithm in algorithms {
        match search(&world, world.start(), world.goal(), algorithm) {
            Ok(result) => info!(
                "Episode {episode} [{algorithm}]: path length {}, cost {:.1}, {} nodes expanded",
                result.path.len(),
                result.cost,
                result.nodes_expanded
            ),
            Err(e) => warn!("Episode {episode} [{algorithm}]: {e}"),
        }
    }
    Ok(())
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.resolve_config()?;
    let episodes = args.episodes.max(1);

    if args.mode == Mode::Search {
        let algorithms = parse_algorithms(&args.algorithms)?;
        for episode in 0..episodes {
            compare_search(&config, &algorithms, episode)?;
        }
        return Ok(());
    }

    let outcomes: Vec<Result<EpisodeOutcome>> = if episodes > 1 {
        (0..episodes)
            .into_par_iter()
            .map(|episode| run_agent(&config, args.mode, episode))
            .collect()
    } else {
        vec![run_agent(&config, args.mode, 0)]
    };

    let mut reached = 0;
    let mut total_steps = 0;
    for (episode, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(outcome) => {
                if outcome.reached_goal {
                    reached += 1;
                }
                total_steps += outcome.steps;
                info!(
                    "Episode {episode}: {} after {} steps at {} (last strategy: {})",
                    if outcome.reached_goal { "goal" } else { "no goal" },
                    outcome.steps,
                    outcome.final_position,
                    outcome
                        .final_strategy
                        .map_or("none", |strategy| strategy.as_str())
                );
            }
            Err(e) => error!("Episode {episode} failed: {e}"),
        }
    }
    info!("{reached}/{episodes} episodes reached the goal ({total_steps} steps in total)");
    Ok(())
}

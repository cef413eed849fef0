//! Configuration loading for RoboMind

use std::path::Path;

use rand::Rng;
use serde::Deserialize;

use crate::error::{Result, RoboMindError};
use crate::simulation::environment::{GridWorld, Position};
use crate::simulation::params::{
    BACKTRACK_PENALTY, CONFIDENCE_RATIO_THRESHOLD, FREE_FACT_THRESHOLD, GRID_HEIGHT, GRID_WIDTH,
    LOGIC_FACT_THRESHOLD, MAX_STEPS, OBSTACLE_COUNT, OBSTACLE_FACT_THRESHOLD, RISK_THRESHOLD,
    RISK_WEIGHT, SENSOR_ACCURACY,
};

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RoboMindConfig {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Grid world layout
#[derive(Clone, Debug, Deserialize)]
pub struct WorldConfig {
    /// Grid width in cells (default: 8)
    #[serde(default = "default_width")]
    pub width: usize,

    /// Grid height in cells (default: 8)
    #[serde(default = "default_height")]
    pub height: usize,

    /// Number of randomly placed obstacles (default: 10)
    #[serde(default = "default_obstacles")]
    pub obstacles: usize,

    /// Start cell as `[row, col]` (default: top-left corner)
    #[serde(default)]
    pub start: Option<[i32; 2]>,

    /// Goal cell as `[row, col]` (default: bottom-right corner)
    #[serde(default)]
    pub goal: Option<[i32; 2]>,
}

/// Sensor model
#[derive(Clone, Debug, Deserialize)]
pub struct SensorConfig {
    /// Probability that a reading matches ground truth (default: 0.9)
    #[serde(default = "default_accuracy")]
    pub accuracy: f64,

    /// Seed for sensor noise and obstacle placement; random when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Hybrid agent decision parameters
#[derive(Clone, Debug, Deserialize)]
pub struct AgentConfig {
    /// Beliefs above this assert an Obstacle fact (default: 0.9)
    #[serde(default = "default_obstacle_threshold")]
    pub obstacle_threshold: f64,

    /// Beliefs below this assert a Free fact (default: 0.1)
    #[serde(default = "default_free_threshold")]
    pub free_threshold: f64,

    /// Cells at or above this belief are too risky to enter (default: 0.7)
    #[serde(default = "default_risk_threshold")]
    pub risk_threshold: f64,

    /// Confidence ratio above which the search strategy is used (default: 0.7)
    #[serde(default = "default_confidence_ratio_threshold")]
    pub confidence_ratio_threshold: f64,

    /// Fact count above which the logic strategy is used (default: 5)
    #[serde(default = "default_logic_fact_threshold")]
    pub logic_fact_threshold: usize,

    /// Score weight applied to a candidate's obstacle belief (default: 10.0)
    #[serde(default = "default_risk_weight")]
    pub risk_weight: f64,

    /// Score added when a candidate is the previous cell (default: 10.0)
    #[serde(default = "default_backtrack_penalty")]
    pub backtrack_penalty: f64,

    /// Step budget per episode (default: 20)
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            obstacles: default_obstacles(),
            start: None,
            goal: None,
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            accuracy: default_accuracy(),
            seed: None,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            obstacle_threshold: default_obstacle_threshold(),
            free_threshold: default_free_threshold(),
            risk_threshold: default_risk_threshold(),
            confidence_ratio_threshold: default_confidence_ratio_threshold(),
            logic_fact_threshold: default_logic_fact_threshold(),
            risk_weight: default_risk_weight(),
            backtrack_penalty: default_backtrack_penalty(),
            max_steps: default_max_steps(),
        }
    }
}

// Default value functions
fn default_width() -> usize {
    GRID_WIDTH
}
fn default_height() -> usize {
    GRID_HEIGHT
}
fn default_obstacles() -> usize {
    OBSTACLE_COUNT
}
fn default_accuracy() -> f64 {
    SENSOR_ACCURACY
}
fn default_obstacle_threshold() -> f64 {
    OBSTACLE_FACT_THRESHOLD
}
fn default_free_threshold() -> f64 {
    FREE_FACT_THRESHOLD
}
fn default_risk_threshold() -> f64 {
    RISK_THRESHOLD
}
fn default_confidence_ratio_threshold() -> f64 {
    CONFIDENCE_RATIO_THRESHOLD
}
fn default_logic_fact_threshold() -> usize {
    LOGIC_FACT_THRESHOLD
}
fn default_risk_weight() -> f64 {
    RISK_WEIGHT
}
fn default_backtrack_penalty() -> f64 {
    BACKTRACK_PENALTY
}
fn default_max_steps() -> usize {
    MAX_STEPS
}

fn check_probability(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(RoboMindError::Config(format!(
            "{name} must lie in [0, 1], got {value}"
        )))
    }
}

impl RoboMindConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: RoboMindConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.world.width == 0 || self.world.height == 0 {
            return Err(RoboMindError::Config(format!(
                "grid must be at least 1x1, got {}x{}",
                self.world.width, self.world.height
            )));
        }
        check_probability("sensor.accuracy", self.sensor.accuracy)?;
        check_probability("agent.obstacle_threshold", self.agent.obstacle_threshold)?;
        check_probability("agent.free_threshold", self.agent.free_threshold)?;
        check_probability("agent.risk_threshold", self.agent.risk_threshold)?;
        check_probability(
            "agent.confidence_ratio_threshold",
            self.agent.confidence_ratio_threshold,
        )?;
        if self.agent.free_threshold >= self.agent.obstacle_threshold {
            return Err(RoboMindError::Config(format!(
                "agent.free_threshold ({}) must be below agent.obstacle_threshold ({})",
                self.agent.free_threshold, self.agent.obstacle_threshold
            )));
        }

        let world = GridWorld::new(self.world.width, self.world.height);
        for (name, cell) in [("start", self.world.start), ("goal", self.world.goal)] {
            if let Some([row, col]) = cell {
                let pos = Position::new(row, col);
                if !world.in_bounds(pos) {
                    return Err(RoboMindError::Config(format!(
                        "world.{name} {pos} is outside the {}x{} grid",
                        self.world.width, self.world.height
                    )));
                }
            }
        }
        Ok(())
    }

    /// Builds the grid world described by `[world]`, placing obstacles with `rng`.
    pub fn build_world(&self, rng: &mut impl Rng) -> Result<GridWorld> {
        let mut world = GridWorld::new(self.world.width, self.world.height);
        if let Some([row, col]) = self.world.start {
            world.set_start(Position::new(row, col))?;
        }
        if let Some([row, col]) = self.world.goal {
            world.set_goal(Position::new(row, col))?;
        }
        world.reset();

        let placed = world.add_random_obstacles(self.world.obstacles, rng);
        if placed < self.world.obstacles {
            log::warn!(
                "Only {placed} of {} obstacles fit in a {}x{} grid",
                self.world.obstacles,
                self.world.width,
                self.world.height
            );
        }
        Ok(world)
    }
}

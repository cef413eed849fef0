//! Error types for RoboMind

use thiserror::Error;

use crate::simulation::environment::Position;
use crate::simulation::planning::PlanError;

/// RoboMind error type
#[derive(Error, Debug)]
pub enum RoboMindError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        position: Position,
        width: usize,
        height: usize,
    },

    #[error("Planning failed: {0}")]
    Plan(#[from] PlanError),
}

impl From<toml::de::Error> for RoboMindError {
    fn from(e: toml::de::Error) -> Self {
        RoboMindError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RoboMindError>;

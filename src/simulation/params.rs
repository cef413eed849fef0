//! Simulation hyperparameters.

pub const SENSOR_ACCURACY: f64 = 0.9;
pub const UNKNOWN_PRIOR: f64 = 0.5; // Maximal uncertainty
pub const KNOWN_FREE_PRIOR: f64 = 0.0; // Start and goal

pub const OBSTACLE_FACT_THRESHOLD: f64 = 0.9;
pub const FREE_FACT_THRESHOLD: f64 = 0.1;
pub const RISK_THRESHOLD: f64 = 0.7;

pub const CONFIDENCE_RATIO_THRESHOLD: f64 = 0.7;
pub const LOGIC_FACT_THRESHOLD: usize = 5;

pub const RISK_WEIGHT: f64 = 10.0;
pub const BACKTRACK_PENALTY: f64 = 10.0;
pub const PROBABILISTIC_BACKTRACK_PENALTY: f64 = 1.0;

pub const GRID_WIDTH: usize = 8;
pub const GRID_HEIGHT: usize = 8;
pub const OBSTACLE_COUNT: usize = 10;
pub const MAX_STEPS: usize = 20;

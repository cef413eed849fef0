#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

//! RoboMind: a grid-world agent that combines informed search, propositional
//! inference and Bayesian belief tracking.

pub mod config;
pub mod error;
pub mod simulation;

pub use config::RoboMindConfig;
pub use error::{Result, RoboMindError};

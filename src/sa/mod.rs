//! Simulated Annealing (SA) for tours.
//!
//! A pass starts from a seed tour at a calibrated temperature, proposes one
//! neighbour at a time and accepts it by the Metropolis criterion. The
//! temperature cools geometrically, is periodically reheated, and a finished
//! pass may restart from the best tour found so far.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"
//! - Ben-Ameur (2004), "Computing the Initial Temperature of Simulated Annealing"

mod calibrate;
mod config;
mod runner;
mod types;

pub use calibrate::{Calibration, TemperatureCalibrator};
pub use config::AnnealingOptions;
pub use runner::{metropolis, AnnealResult, AnnealingRunner};
pub use types::{AnnealingState, Phase, Schedule, SolutionPool};

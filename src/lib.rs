//! Battery storage value estimation for biogas, solar and community energy systems.

/// Capacity sweep and baseline comparison.
pub mod analytics;
pub mod config;
/// Battery model and synthetic generation/demand sources.
pub mod devices;
pub mod error;
pub mod io;
/// Spot price loading, reference prices and day-ahead visibility.
pub mod market;
pub mod reporting;
pub mod series;
/// Simulation engine, control policies and metrics.
pub mod sim;

pub use error::{Error, Result};

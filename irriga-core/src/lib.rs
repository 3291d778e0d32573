//! Core library for the `irriga` CLI.
//!
//! This crate defines:
//! - Weather-report models and coordinate validation
//! - The irrigation threshold rule
//! - The device line codec and condition translation
//! - Configuration handling and the weather-source abstraction
//!
//! It is used by `irriga-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod decision;
pub mod error;
pub mod line;
pub mod model;
pub mod provider;
pub mod translate;

pub use config::{Config, LocationConfig, ScriptConfig};
pub use decision::{Decision, Rule, decide_irrigation, evaluate};
pub use error::IrrigaError;
pub use line::DeviceLine;
pub use model::{Coordinates, WeatherReport, validate_coordinates};
pub use provider::{SourceId, WeatherSource};

//! Core library for the `citytemp` CLI.
//!
//! This crate defines:
//! - The fixed city lookup table
//! - Temperature resolution (archive vs. forecast) over a pluggable source
//! - The Open-Meteo source and its configuration
//!
//! It is used by `citytemp-cli`, but can also be embedded in other front ends.

pub mod city;
pub mod config;
pub mod error;
pub mod model;
pub mod resolver;
pub mod source;

pub use city::{City, CityId, CityTable, Coordinates};
pub use config::Config;
pub use error::ResolveError;
pub use model::{DataSource, TemperatureResult};
pub use resolver::TemperatureResolver;
pub use source::{TemperatureSource, open_meteo::OpenMeteoConfig, open_meteo::OpenMeteoSource};
